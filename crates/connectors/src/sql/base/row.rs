use crate::sql::base::metadata::column::ColumnMetadata;
use bigdecimal::BigDecimal;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use model::{
    core::{data_type::DataType, value::Value},
    records::row::{FieldValue, RowData},
};
use sqlx::{Row, mysql::MySqlRow, postgres::PgRow};
use uuid::Uuid;

/// A borrowed driver row from either supported backend. Column values are
/// read through the accessor matching the declared column type, so that
/// decimals keep their precision and large character objects come back as
/// materialized text rather than opaque handles.
pub enum DbRow<'a> {
    MySql(&'a MySqlRow),
    Postgres(&'a PgRow),
}

impl DbRow<'_> {
    /// Reads one row into declared column order.
    pub fn into_row_data(&self, columns: &[ColumnMetadata]) -> RowData {
        let field_values = columns
            .iter()
            .map(|col| FieldValue::new(&col.name, self.read_value(&col.data_type, &col.name)))
            .collect();
        RowData::new(field_values)
    }

    /// Type-aware column read. `None` means SQL NULL or a value the declared
    /// type cannot decode.
    pub fn read_value(&self, data_type: &DataType, name: &str) -> Option<Value> {
        match data_type {
            DataType::Short | DataType::Int | DataType::Long | DataType::Year => {
                self.try_get_i64(name).map(Value::Int)
            }
            DataType::IntUnsigned => self.try_get_u64(name).map(Value::Uint),
            DataType::Float | DataType::Double => self.try_get_f64(name).map(Value::Float),
            DataType::Decimal => self.try_get_bigdecimal(name).map(Value::Decimal),
            DataType::Char | DataType::VarChar | DataType::String | DataType::Enum => {
                self.try_get_string(name).map(Value::String)
            }
            // Large character objects are materialized here so later equality
            // checks compare content, not handles.
            DataType::Text => self.try_get_string(name).map(Value::String),
            DataType::Boolean => self.try_get_bool(name).map(Value::Boolean),
            DataType::Json => self.try_get_json(name).map(Value::Json),
            DataType::Date => self.try_get_date(name).map(Value::Date),
            DataType::Time => self.try_get_time(name).map(|t| Value::String(t.to_string())),
            DataType::Timestamp => self.try_get_timestamp(name).map(Value::Timestamp),
            DataType::Blob | DataType::Bytea => self.try_get_bytes(name).map(Value::Bytes),
            DataType::Uuid => self.try_get_uuid(name).map(Value::Uuid),
            DataType::Null => None,
            DataType::Custom(_) => self.try_get_string(name).map(Value::String),
        }
    }

    pub fn try_get_i64(&self, name: &str) -> Option<i64> {
        match self {
            DbRow::MySql(row) => row
                .try_get::<i64, _>(name)
                .ok()
                .or_else(|| row.try_get::<i32, _>(name).ok().map(i64::from))
                .or_else(|| row.try_get::<u64, _>(name).ok().and_then(|v| i64::try_from(v).ok())),
            DbRow::Postgres(row) => row
                .try_get::<i64, _>(name)
                .ok()
                .or_else(|| row.try_get::<i32, _>(name).ok().map(i64::from))
                .or_else(|| row.try_get::<i16, _>(name).ok().map(i64::from)),
        }
    }

    pub fn try_get_u64(&self, name: &str) -> Option<u64> {
        match self {
            DbRow::MySql(row) => row
                .try_get::<u64, _>(name)
                .ok()
                .or_else(|| row.try_get::<i64, _>(name).ok().and_then(|v| u64::try_from(v).ok())),
            DbRow::Postgres(row) => row
                .try_get::<i64, _>(name)
                .ok()
                .and_then(|v| u64::try_from(v).ok()),
        }
    }

    pub fn try_get_f64(&self, name: &str) -> Option<f64> {
        match self {
            DbRow::MySql(row) => row
                .try_get::<f64, _>(name)
                .ok()
                .or_else(|| row.try_get::<f32, _>(name).ok().map(f64::from)),
            DbRow::Postgres(row) => row
                .try_get::<f64, _>(name)
                .ok()
                .or_else(|| row.try_get::<f32, _>(name).ok().map(f64::from)),
        }
    }

    pub fn try_get_bigdecimal(&self, name: &str) -> Option<BigDecimal> {
        match self {
            DbRow::MySql(row) => row.try_get::<BigDecimal, _>(name).ok(),
            DbRow::Postgres(row) => row.try_get::<BigDecimal, _>(name).ok(),
        }
    }

    pub fn try_get_string(&self, name: &str) -> Option<String> {
        match self {
            // MySQL hands some text columns back as raw bytes.
            DbRow::MySql(row) => row.try_get::<String, _>(name).ok().or_else(|| {
                row.try_get::<Vec<u8>, _>(name)
                    .ok()
                    .and_then(|bytes| String::from_utf8(bytes).ok())
            }),
            DbRow::Postgres(row) => row.try_get::<String, _>(name).ok(),
        }
    }

    pub fn try_get_bool(&self, name: &str) -> Option<bool> {
        match self {
            DbRow::MySql(row) => row
                .try_get::<bool, _>(name)
                .ok()
                .or_else(|| row.try_get::<i64, _>(name).ok().map(|v| v != 0)),
            DbRow::Postgres(row) => row.try_get::<bool, _>(name).ok(),
        }
    }

    pub fn try_get_json(&self, name: &str) -> Option<serde_json::Value> {
        match self {
            DbRow::MySql(row) => row.try_get::<serde_json::Value, _>(name).ok(),
            DbRow::Postgres(row) => row.try_get::<serde_json::Value, _>(name).ok(),
        }
    }

    pub fn try_get_date(&self, name: &str) -> Option<NaiveDate> {
        match self {
            DbRow::MySql(row) => row.try_get::<NaiveDate, _>(name).ok(),
            DbRow::Postgres(row) => row.try_get::<NaiveDate, _>(name).ok(),
        }
    }

    pub fn try_get_time(&self, name: &str) -> Option<NaiveTime> {
        match self {
            DbRow::MySql(row) => row.try_get::<NaiveTime, _>(name).ok(),
            DbRow::Postgres(row) => row.try_get::<NaiveTime, _>(name).ok(),
        }
    }

    pub fn try_get_timestamp(&self, name: &str) -> Option<DateTime<Utc>> {
        match self {
            DbRow::MySql(row) => row.try_get::<DateTime<Utc>, _>(name).ok().or_else(|| {
                row.try_get::<NaiveDateTime, _>(name)
                    .ok()
                    .map(|naive| naive.and_utc())
            }),
            DbRow::Postgres(row) => row.try_get::<DateTime<Utc>, _>(name).ok().or_else(|| {
                row.try_get::<NaiveDateTime, _>(name)
                    .ok()
                    .map(|naive| naive.and_utc())
            }),
        }
    }

    pub fn try_get_bytes(&self, name: &str) -> Option<Vec<u8>> {
        match self {
            DbRow::MySql(row) => row.try_get::<Vec<u8>, _>(name).ok(),
            DbRow::Postgres(row) => row.try_get::<Vec<u8>, _>(name).ok(),
        }
    }

    pub fn try_get_uuid(&self, name: &str) -> Option<Uuid> {
        match self {
            DbRow::MySql(row) => row
                .try_get::<String, _>(name)
                .ok()
                .and_then(|s| Uuid::parse_str(&s).ok()),
            DbRow::Postgres(row) => row.try_get::<Uuid, _>(name).ok(),
        }
    }
}
