use serde::Serialize;

/// Logical column type, as declared in a migration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnType {
    Integer,
    String,
    Text,
    Time,
    Date,
    DateTime,
    Boolean,
}

impl ColumnType {
    /// Declared type written into SQLite DDL. SQLite only uses it for affinity,
    /// but `PRAGMA table_info` reports it back verbatim.
    pub const fn sqlite_type(self) -> &'static str {
        match self {
            ColumnType::Integer => "INTEGER",
            ColumnType::String => "VARCHAR",
            ColumnType::Text => "TEXT",
            ColumnType::Time => "TIME",
            ColumnType::Date => "DATE",
            ColumnType::DateTime => "DATETIME",
            ColumnType::Boolean => "BOOLEAN",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ColumnDef {
    pub name: &'static str,
    #[serde(rename = "type")]
    pub ty: ColumnType,
    /// `true` => NULL allowed.
    pub null: bool,
    pub primary_key: bool,
}

impl ColumnDef {
    /// Nullable, non-key column. Every user column in the catalog is one of these.
    pub const fn new(name: &'static str, ty: ColumnType) -> Self {
        Self {
            name,
            ty,
            null: true,
            primary_key: false,
        }
    }

    pub const fn id() -> Self {
        Self {
            name: "id",
            ty: ColumnType::Integer,
            null: false,
            primary_key: true,
        }
    }

    pub const fn timestamp(name: &'static str) -> Self {
        Self {
            name,
            ty: ColumnType::DateTime,
            null: false,
            primary_key: false,
        }
    }

    /// Column fragment for `CREATE TABLE`.
    pub fn sql_fragment(&self) -> String {
        let mut out = format!("\"{}\" {}", self.name, self.ty.sqlite_type());
        if self.primary_key {
            out.push_str(" PRIMARY KEY AUTOINCREMENT");
        }
        if !self.null {
            out.push_str(" NOT NULL");
        }
        out
    }
}
