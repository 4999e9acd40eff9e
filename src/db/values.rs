//! Typed column values for dynamically built INSERT/UPDATE statements.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use modelbook_schema::ColumnType;
use serde::Serialize;
use sqlx::{QueryBuilder, Sqlite};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Integer(i64),
    Text(String),
    Boolean(bool),
    Time(NaiveTime),
    Date(NaiveDate),
    DateTime(DateTime<Utc>),
}

impl FieldValue {
    /// Whether this value may be stored in a column declared as `ty`.
    pub fn fits(&self, ty: ColumnType) -> bool {
        matches!(
            (self, ty),
            (FieldValue::Integer(_), ColumnType::Integer)
                | (FieldValue::Text(_), ColumnType::String | ColumnType::Text)
                | (FieldValue::Boolean(_), ColumnType::Boolean)
                | (FieldValue::Time(_), ColumnType::Time)
                | (FieldValue::Date(_), ColumnType::Date)
                | (FieldValue::DateTime(_), ColumnType::DateTime)
        )
    }

    pub(crate) fn push_bind(self, qb: &mut QueryBuilder<'_, Sqlite>) {
        match self {
            FieldValue::Integer(v) => qb.push_bind(v),
            FieldValue::Text(v) => qb.push_bind(v),
            FieldValue::Boolean(v) => qb.push_bind(v),
            FieldValue::Time(v) => qb.push_bind(v),
            FieldValue::Date(v) => qb.push_bind(v),
            FieldValue::DateTime(v) => qb.push_bind(v),
        };
    }
}

/// Column name paired with the value to write.
pub type Assignment = (&'static str, FieldValue);
