use modelbook_schema::{SchemaError, Table};
use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum ModelbookError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error("Ractor error: {0}")]
    RactorError(String),

    #[error("{table} record not found for id={id}")]
    NotFound { table: Table, id: i64 },

    #[error("Expected a {expected} record, got {found}")]
    RecordMismatch { expected: Table, found: Table },

    #[error("Schema drift on {table}: {detail}")]
    SchemaDrift { table: Table, detail: String },

    #[error("Unexpected error: {0}")]
    UnexpectedError(String),
}

impl ModelbookError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ModelbookError::NotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_missing_rows_count_as_not_found() {
        let missing = ModelbookError::NotFound {
            table: Table::Doctors,
            id: 7,
        };
        assert!(missing.is_not_found());
        assert_eq!(missing.to_string(), "doctors record not found for id=7");

        assert!(!ModelbookError::DatabaseError(sqlx::Error::RowNotFound).is_not_found());
        assert!(!ModelbookError::RactorError("stopped".to_string()).is_not_found());
    }
}
