use thiserror::Error as ThisError;

#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
pub enum SchemaError {
    #[error("Unknown table: {0}")]
    UnknownTable(String),

    #[error("Unknown association `{name}` on table `{table}`")]
    UnknownAssociation { table: &'static str, name: String },

    #[error("Invalid association `{name}` on table `{table}`: {reason}")]
    InvalidAssociation {
        table: &'static str,
        name: &'static str,
        reason: String,
    },

    #[error("Unknown column `{column}` on table `{table}`")]
    UnknownColumn { table: &'static str, column: String },
}
