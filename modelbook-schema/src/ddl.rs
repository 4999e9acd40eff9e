use crate::migration::{MIGRATIONS, SCHEMA_VERSION};
use crate::table::{Table, TableDef};

pub fn render_create_table(def: &TableDef) -> String {
    let cols = def
        .all_columns()
        .iter()
        .map(|c| c.sql_fragment())
        .collect::<Vec<_>>()
        .join(", ");
    format!("CREATE TABLE \"{}\" ({cols})", def.name())
}

pub fn render_drop_table(table: Table) -> String {
    format!("DROP TABLE IF EXISTS \"{}\"", table.name())
}

/// Full schema dump in migration order, one statement per table.
pub fn render_schema() -> String {
    let mut out = format!("-- schema version {SCHEMA_VERSION}\n");
    for m in MIGRATIONS {
        out.push_str(&m.up_sql());
        out.push_str(";\n");
    }
    out
}
