pub mod cache;
pub mod range_sql;
