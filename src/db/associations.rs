use modelbook_schema::{Table, resolve};
use sqlx::SqlitePool;
use tracing::debug;

use crate::db::models::{Record, fetch_records};
use crate::error::ModelbookError;

/// Load `owner.name` for the owner row `id`.
///
/// An owner id with no row simply yields no associated rows.
pub(crate) async fn load_association(
    pool: &SqlitePool,
    owner: Table,
    id: i64,
    name: &str,
) -> Result<Vec<Record>, ModelbookError> {
    let query = resolve(owner, name)?;
    let rows = fetch_records(pool, query.target, &query.sql, Some(id)).await?;

    debug!(
        owner = %owner,
        id,
        association = query.name,
        target_table = %query.target,
        rows = rows.len(),
        "association loaded"
    );
    Ok(rows)
}

pub(crate) async fn find_record(
    pool: &SqlitePool,
    table: Table,
    id: i64,
) -> Result<Record, ModelbookError> {
    let t = table.name();
    let sql = format!(
        "SELECT {} FROM {t} WHERE {t}.id = ?",
        table.def().qualified_columns()
    );
    fetch_records(pool, table, &sql, Some(id))
        .await?
        .into_iter()
        .next()
        .ok_or(ModelbookError::NotFound { table, id })
}

pub(crate) async fn all_records(
    pool: &SqlitePool,
    table: Table,
) -> Result<Vec<Record>, ModelbookError> {
    let t = table.name();
    let sql = format!(
        "SELECT {} FROM {t} ORDER BY {t}.id",
        table.def().qualified_columns()
    );
    fetch_records(pool, table, &sql, None)
        .await
        .map_err(ModelbookError::from)
}
