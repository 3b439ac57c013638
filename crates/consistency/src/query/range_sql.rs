//! Dialect-correct SQL for ordered range queries, point queries and
//! checksum aggregates. Bound values are always bind parameters; only the
//! predicate *shape* is baked into the SQL, which is what makes the built
//! strings cacheable per chunk phase.

use connectors::sql::base::dialect::Dialect;
use model::{core::identifiers::QualifiedTable, pagination::range::QueryRange};

/// Which bounds a range query carries, independent of their values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeShape {
    pub has_lower: bool,
    pub lower_inclusive: bool,
    pub has_upper: bool,
}

impl RangeShape {
    pub fn of(range: &QueryRange) -> Self {
        Self {
            has_lower: range.lower().is_some(),
            lower_inclusive: range.is_lower_inclusive(),
            has_upper: range.upper().is_some(),
        }
    }
}

pub struct RangeQueryBuilder<'a> {
    dialect: &'a dyn Dialect,
}

impl<'a> RangeQueryBuilder<'a> {
    pub fn new(dialect: &'a dyn Dialect) -> Self {
        Self { dialect }
    }

    /// Ordered, optionally paginated range SELECT. Bind parameter order is
    /// lower bound first (when present), then upper bound.
    pub fn build_range_query(
        &self,
        table: &QualifiedTable,
        columns: &[String],
        unique_key: &str,
        shape: RangeShape,
        sharding_columns: &[String],
        limit: Option<usize>,
    ) -> String {
        let key = self.dialect.quote_identifier(unique_key);
        let mut sql = self.base_select(table, columns);

        let mut predicates = Vec::new();
        let mut placeholder_index = 0;
        if shape.has_lower {
            let op = if shape.lower_inclusive { ">=" } else { ">" };
            predicates.push(format!(
                "{key} {op} {}",
                self.dialect.placeholder(placeholder_index)
            ));
            placeholder_index += 1;
        }
        if shape.has_upper {
            predicates.push(format!(
                "{key} <= {}",
                self.dialect.placeholder(placeholder_index)
            ));
        }
        if !predicates.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&predicates.join(" AND "));
        }

        let mut order_by = vec![format!("{key} ASC")];
        order_by.extend(
            sharding_columns
                .iter()
                .map(|col| format!("{} ASC", self.dialect.quote_identifier(col))),
        );
        sql.push_str(" ORDER BY ");
        sql.push_str(&order_by.join(", "));

        match limit {
            Some(limit) => self.dialect.wrap_limit(&sql, limit),
            None => sql,
        }
    }

    /// Exact lookup on the full key column list, ordered for determinism
    /// when a partial key matches several rows.
    pub fn build_point_query(
        &self,
        table: &QualifiedTable,
        columns: &[String],
        key_columns: &[String],
    ) -> String {
        let mut sql = self.base_select(table, columns);
        let predicates: Vec<String> = key_columns
            .iter()
            .enumerate()
            .map(|(index, col)| {
                format!(
                    "{} = {}",
                    self.dialect.quote_identifier(col),
                    self.dialect.placeholder(index)
                )
            })
            .collect();
        sql.push_str(" WHERE ");
        sql.push_str(&predicates.join(" AND "));

        let order_by: Vec<String> = key_columns
            .iter()
            .map(|col| format!("{} ASC", self.dialect.quote_identifier(col)))
            .collect();
        sql.push_str(" ORDER BY ");
        sql.push_str(&order_by.join(", "));
        sql
    }

    /// Server-side aggregate checksum over one column. `None` when the
    /// dialect has no checksum function.
    pub fn build_checksum_query(&self, table: &QualifiedTable, column: &str) -> Option<String> {
        let quoted = self.dialect.quote_identifier(column);
        let expr = self.dialect.checksum_expr(&quoted)?;
        Some(format!(
            "SELECT {expr} AS checksum, COUNT(1) AS records_count FROM {}",
            self.qualified(table)
        ))
    }

    fn base_select(&self, table: &QualifiedTable, columns: &[String]) -> String {
        let select_list = columns
            .iter()
            .map(|col| self.dialect.quote_identifier(col))
            .collect::<Vec<_>>()
            .join(", ");
        format!("SELECT {select_list} FROM {}", self.qualified(table))
    }

    fn qualified(&self, table: &QualifiedTable) -> String {
        self.dialect
            .qualify_table(table.schema.as_deref(), &table.name)
    }
}
