//! RecordAttrs -> INSERT / RecordPatch -> UPDATE.
//!
//! Statements are built from the table catalog, so only declared columns can
//! ever reach the SQL text; values always travel as bind parameters.

use async_trait::async_trait;
use chrono::Utc;
use modelbook_schema::{Table, TableDef};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use tracing::debug;

use crate::db::patch::{DbPatchable, RecordAttrs, RecordPatch};
use crate::db::values::{Assignment, FieldValue};
use crate::error::ModelbookError;

fn check_assignments(def: &TableDef, assignments: &[Assignment]) -> Result<(), ModelbookError> {
    for (column, value) in assignments {
        let col = def.column(column)?;
        if !value.fits(col.ty) {
            return Err(ModelbookError::UnexpectedError(format!(
                "value {value:?} does not fit {}.{column} ({:?})",
                def.name(),
                col.ty
            )));
        }
    }
    Ok(())
}

/// Insert a row and return its id. Timestamped tables get
/// `created_at = updated_at = now`.
pub(crate) async fn insert_record(
    pool: &SqlitePool,
    attrs: RecordAttrs,
) -> Result<i64, ModelbookError> {
    let table = attrs.table();
    let def = table.def();
    let mut assignments = attrs.into_assignments();
    check_assignments(def, &assignments)?;

    if def.timestamps {
        let now = Utc::now();
        assignments.push(("created_at", FieldValue::DateTime(now)));
        assignments.push(("updated_at", FieldValue::DateTime(now)));
    }

    let columns: Vec<&'static str> = assignments.iter().map(|(c, _)| *c).collect();

    let id: i64 = if assignments.is_empty() {
        sqlx::query_scalar::<_, i64>(&format!(
            "INSERT INTO {} DEFAULT VALUES RETURNING id",
            table.name()
        ))
        .fetch_one(pool)
        .await?
    } else {
        let mut qb = QueryBuilder::<Sqlite>::new(format!("INSERT INTO {} (", table.name()));
        {
            let mut cols = qb.separated(", ");
            for column in &columns {
                cols.push(column);
            }
        }
        qb.push(") VALUES (");
        for (i, (_, value)) in assignments.into_iter().enumerate() {
            if i > 0 {
                qb.push(", ");
            }
            value.push_bind(&mut qb);
        }
        qb.push(") RETURNING id");

        qb.build_query_scalar::<i64>().fetch_one(pool).await?
    };

    debug!(table = %table, id, columns = ?columns, "db record created");
    Ok(id)
}

#[async_trait]
impl DbPatchable for RecordPatch {
    async fn apply_patch(&self, pool: &SqlitePool) -> Result<(), ModelbookError> {
        let table = self.attrs.table();
        let def = table.def();
        let id = self.id;
        let assignments = self.attrs.clone().into_assignments();
        check_assignments(def, &assignments)?;

        if assignments.is_empty() {
            // Nothing to write; still report a missing row.
            ensure_exists(pool, table, id).await?;
            debug!(table = %table, id, "db patch skipped: no columns set");
            return Ok(());
        }

        let columns: Vec<&'static str> = assignments.iter().map(|(c, _)| *c).collect();
        let updated_at = Utc::now();

        let mut qb = QueryBuilder::<Sqlite>::new(format!("UPDATE {} SET ", table.name()));
        for (i, (column, value)) in assignments.into_iter().enumerate() {
            if i > 0 {
                qb.push(", ");
            }
            qb.push(column);
            qb.push(" = ");
            value.push_bind(&mut qb);
        }
        if def.timestamps {
            qb.push(", updated_at = ");
            qb.push_bind(updated_at);
        }
        qb.push(" WHERE id = ");
        qb.push_bind(id);

        let res = qb.build().execute(pool).await?;
        let affected = res.rows_affected();
        debug!(
            table = %table,
            id,
            affected,
            updated_at = %updated_at,
            columns = ?columns,
            "db patch applied"
        );

        if affected == 0 {
            return Err(ModelbookError::NotFound { table, id });
        }

        Ok(())
    }
}

/// Delete one row. No dependent rows are touched.
pub(crate) async fn destroy_record(
    pool: &SqlitePool,
    table: Table,
    id: i64,
) -> Result<(), ModelbookError> {
    let res = sqlx::query(&format!("DELETE FROM {} WHERE id = ?", table.name()))
        .bind(id)
        .execute(pool)
        .await?;

    let affected = res.rows_affected();
    debug!(table = %table, id, affected, "db record destroyed");

    if affected == 0 {
        return Err(ModelbookError::NotFound { table, id });
    }
    Ok(())
}

async fn ensure_exists(pool: &SqlitePool, table: Table, id: i64) -> Result<(), ModelbookError> {
    let found: Option<i64> =
        sqlx::query_scalar(&format!("SELECT id FROM {} WHERE id = ?", table.name()))
            .bind(id)
            .fetch_optional(pool)
            .await?;

    match found {
        Some(_) => Ok(()),
        None => Err(ModelbookError::NotFound { table, id }),
    }
}
