//! Versioned migrations against SQLite.
//!
//! Applied versions are recorded in `schema_migrations`, one row per version,
//! stored as text.

use std::collections::HashSet;

use modelbook_schema::{MIGRATIONS, Migration, Table};
use serde::Serialize;
use sqlx::{FromRow, SqlitePool};
use tracing::{info, warn};

use crate::error::ModelbookError;

const SCHEMA_MIGRATIONS_INIT: &str = r#"
CREATE TABLE IF NOT EXISTS "schema_migrations" (
    "version" VARCHAR PRIMARY KEY NOT NULL
)
"#;

/// One column as reported by `PRAGMA table_info`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnInfo {
    pub name: String,
    pub decl_type: String,
    pub not_null: bool,
    pub primary_key: bool,
}

#[derive(FromRow)]
struct PragmaColumn {
    name: String,
    #[sqlx(rename = "type")]
    decl_type: String,
    notnull: i64,
    pk: i64,
}

impl From<PragmaColumn> for ColumnInfo {
    fn from(c: PragmaColumn) -> Self {
        Self {
            name: c.name,
            decl_type: c.decl_type,
            not_null: c.notnull != 0,
            primary_key: c.pk != 0,
        }
    }
}

async fn ensure_migrations_table(pool: &SqlitePool) -> Result<(), ModelbookError> {
    sqlx::query(SCHEMA_MIGRATIONS_INIT).execute(pool).await?;
    Ok(())
}

/// Applied versions, ascending.
pub async fn applied_versions(pool: &SqlitePool) -> Result<Vec<i64>, ModelbookError> {
    ensure_migrations_table(pool).await?;
    let raw: Vec<String> = sqlx::query_scalar("SELECT version FROM schema_migrations")
        .fetch_all(pool)
        .await?;

    let mut versions = raw
        .iter()
        .map(|v| {
            v.parse::<i64>().map_err(|e| {
                ModelbookError::UnexpectedError(format!("invalid schema_migrations version {v}: {e}"))
            })
        })
        .collect::<Result<Vec<_>, _>>()?;
    versions.sort_unstable();
    Ok(versions)
}

/// Apply every pending migration in version order. Returns the versions applied.
pub async fn migrate(pool: &SqlitePool) -> Result<Vec<i64>, ModelbookError> {
    let applied: HashSet<i64> = applied_versions(pool).await?.into_iter().collect();

    let mut done = Vec::new();
    for m in MIGRATIONS.iter().filter(|m| !applied.contains(&m.version)) {
        let mut tx = pool.begin().await?;
        sqlx::query(&m.up_sql()).execute(&mut *tx).await?;
        sqlx::query("INSERT INTO schema_migrations (version) VALUES (?)")
            .bind(m.version.to_string())
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        info!(version = m.version, name = m.name, table = %m.table, "migrated");
        done.push(m.version);
    }

    Ok(done)
}

/// Revert the most recent `steps` migrations, newest first. Returns the versions reverted.
pub async fn rollback(pool: &SqlitePool, steps: usize) -> Result<Vec<i64>, ModelbookError> {
    let applied = applied_versions(pool).await?;

    let mut done = Vec::new();
    for version in applied.into_iter().rev().take(steps) {
        let m = find_migration(version)?;
        let mut tx = pool.begin().await?;
        sqlx::query(&m.down_sql()).execute(&mut *tx).await?;
        sqlx::query("DELETE FROM schema_migrations WHERE version = ?")
            .bind(version.to_string())
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        info!(version, name = m.name, table = %m.table, "rolled back");
        done.push(version);
    }

    Ok(done)
}

/// Drop every table and rebuild from the migration list.
pub async fn reset(pool: &SqlitePool) -> Result<Vec<i64>, ModelbookError> {
    let applied = applied_versions(pool).await?;
    rollback(pool, applied.len()).await?;
    migrate(pool).await
}

fn find_migration(version: i64) -> Result<&'static Migration, ModelbookError> {
    MIGRATIONS
        .iter()
        .find(|m| m.version == version)
        .ok_or_else(|| {
            ModelbookError::UnexpectedError(format!("no migration defined for version {version}"))
        })
}

pub async fn table_columns(
    pool: &SqlitePool,
    table: Table,
) -> Result<Vec<ColumnInfo>, ModelbookError> {
    let rows = sqlx::query_as::<_, PragmaColumn>(&format!(
        "PRAGMA table_info(\"{}\")",
        table.name()
    ))
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(ColumnInfo::from).collect())
}

/// Expected introspection result for a table, derived from its definition.
pub fn expected_columns(table: Table) -> Vec<ColumnInfo> {
    table
        .def()
        .all_columns()
        .into_iter()
        .map(|c| ColumnInfo {
            name: c.name.to_string(),
            decl_type: c.ty.sqlite_type().to_string(),
            not_null: !c.null,
            primary_key: c.primary_key,
        })
        .collect()
}

/// Compare every table in the database with its definition.
pub async fn verify_schema(pool: &SqlitePool) -> Result<(), ModelbookError> {
    for table in Table::ALL {
        let found = table_columns(pool, table).await?;
        if found.is_empty() {
            warn!(table = %table, "table missing");
            return Err(ModelbookError::SchemaDrift {
                table,
                detail: "table does not exist".to_string(),
            });
        }

        let expected = expected_columns(table);
        if found != expected {
            warn!(table = %table, "column set differs from definition");
            return Err(ModelbookError::SchemaDrift {
                table,
                detail: format!("expected {expected:?}, found {found:?}"),
            });
        }
    }
    Ok(())
}
