//! Static table definitions, association declarations and migrations.
//!
//! Nothing in this crate touches a database; the runtime in `modelbook`
//! consumes these declarations to build DDL and association queries.

pub mod association;
pub mod catalog;
pub mod column;
pub mod ddl;
pub mod error;
pub mod migration;
pub mod table;

pub use association::{Association, AssociationQuery, Cardinality, resolve, resolve_in};
pub use catalog::{validate_catalog, validate_catalog_in};
pub use column::{ColumnDef, ColumnType};
pub use ddl::{render_create_table, render_drop_table, render_schema};
pub use error::SchemaError;
pub use migration::{MIGRATIONS, Migration, SCHEMA_VERSION};
pub use table::{Table, TableDef};
