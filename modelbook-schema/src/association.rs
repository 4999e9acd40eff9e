//! Association declarations and their resolution into SQL.
//!
//! Every resolved query selects the target table's full column list and takes
//! exactly one bind parameter: the owner row's id.

use serde::Serialize;

use crate::error::SchemaError;
use crate::table::{Table, TableDef};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Association {
    /// Foreign key lives on the owner table.
    BelongsTo {
        name: &'static str,
        target: Table,
        foreign_key: &'static str,
    },
    /// Foreign key lives on the target table.
    HasMany {
        name: &'static str,
        target: Table,
        foreign_key: &'static str,
    },
    /// `through` names a `HasMany` on the owner; `source` names an association
    /// on the intermediate table.
    HasManyThrough {
        name: &'static str,
        through: &'static str,
        source: &'static str,
    },
    HasAndBelongsToMany {
        name: &'static str,
        target: Table,
        join_table: Table,
        /// Join table column pointing at the owner.
        foreign_key: &'static str,
        /// Join table column pointing at the target.
        association_foreign_key: &'static str,
    },
}

impl Association {
    pub fn name(&self) -> &'static str {
        match self {
            Association::BelongsTo { name, .. }
            | Association::HasMany { name, .. }
            | Association::HasManyThrough { name, .. }
            | Association::HasAndBelongsToMany { name, .. } => name,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Cardinality {
    One,
    Many,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssociationQuery {
    pub owner: Table,
    pub name: &'static str,
    pub target: Table,
    pub cardinality: Cardinality,
    pub sql: String,
}

/// Resolve `owner.name` into a query over the target table, using the shipped catalog.
pub fn resolve(owner: Table, name: &str) -> Result<AssociationQuery, SchemaError> {
    resolve_in(Table::def, owner, name)
}

/// Resolve `owner.name` against the table definitions returned by `defs`.
pub fn resolve_in<'a, F>(defs: F, owner: Table, name: &str) -> Result<AssociationQuery, SchemaError>
where
    F: Fn(Table) -> &'a TableDef,
{
    let owner_def = defs(owner);
    let assoc = owner_def
        .association(name)
        .ok_or_else(|| SchemaError::UnknownAssociation {
            table: owner.name(),
            name: name.to_string(),
        })?;

    match *assoc {
        Association::BelongsTo {
            name,
            target,
            foreign_key,
        } => {
            require_column(owner_def, name, owner_def, foreign_key)?;
            let t = target.name();
            let o = owner.name();
            let sql = format!(
                "SELECT {cols} FROM {t} INNER JOIN {o} ON {t}.id = {o}.{foreign_key} WHERE {o}.id = ?",
                cols = defs(target).qualified_columns(),
            );
            Ok(AssociationQuery {
                owner,
                name,
                target,
                cardinality: Cardinality::One,
                sql,
            })
        }

        Association::HasMany {
            name,
            target,
            foreign_key,
        } => {
            require_column(owner_def, name, defs(target), foreign_key)?;
            let t = target.name();
            let sql = format!(
                "SELECT {cols} FROM {t} WHERE {t}.{foreign_key} = ? ORDER BY {t}.id",
                cols = defs(target).qualified_columns(),
            );
            Ok(AssociationQuery {
                owner,
                name,
                target,
                cardinality: Cardinality::Many,
                sql,
            })
        }

        Association::HasManyThrough {
            name,
            through,
            source,
        } => {
            let (mid, owner_fk) = match owner_def.association(through) {
                Some(Association::HasMany {
                    target,
                    foreign_key,
                    ..
                }) => (*target, *foreign_key),
                Some(_) => return Err(invalid(owner, name, "through must name a has_many")),
                None => {
                    return Err(invalid(
                        owner,
                        name,
                        format!("through association `{through}` is not declared"),
                    ));
                }
            };
            let mid_def = defs(mid);
            require_column(owner_def, name, mid_def, owner_fk)?;
            let m = mid.name();

            let (target, join) = match mid_def.association(source) {
                Some(Association::BelongsTo {
                    target,
                    foreign_key,
                    ..
                }) => {
                    require_column(owner_def, name, mid_def, foreign_key)?;
                    let t = target.name();
                    (*target, format!("{t}.id = {m}.{foreign_key}"))
                }
                Some(Association::HasMany {
                    target,
                    foreign_key,
                    ..
                }) => {
                    require_column(owner_def, name, defs(*target), foreign_key)?;
                    let t = target.name();
                    (*target, format!("{t}.{foreign_key} = {m}.id"))
                }
                Some(_) => {
                    return Err(invalid(
                        owner,
                        name,
                        "source must name a belongs_to or has_many",
                    ));
                }
                None => {
                    return Err(invalid(
                        owner,
                        name,
                        format!("source association `{source}` is not declared on {m}"),
                    ));
                }
            };

            let t = target.name();
            let sql = format!(
                "SELECT {cols} FROM {t} INNER JOIN {m} ON {join} WHERE {m}.{owner_fk} = ? ORDER BY {m}.id, {t}.id",
                cols = defs(target).qualified_columns(),
            );
            Ok(AssociationQuery {
                owner,
                name,
                target,
                cardinality: Cardinality::Many,
                sql,
            })
        }

        Association::HasAndBelongsToMany {
            name,
            target,
            join_table,
            foreign_key,
            association_foreign_key,
        } => {
            let join_def = defs(join_table);
            require_column(owner_def, name, join_def, foreign_key)?;
            require_column(owner_def, name, join_def, association_foreign_key)?;
            let t = target.name();
            let j = join_table.name();
            let sql = format!(
                "SELECT {cols} FROM {t} INNER JOIN {j} ON {t}.id = {j}.{association_foreign_key} WHERE {j}.{foreign_key} = ? ORDER BY {j}.id",
                cols = defs(target).qualified_columns(),
            );
            Ok(AssociationQuery {
                owner,
                name,
                target,
                cardinality: Cardinality::Many,
                sql,
            })
        }
    }
}

fn require_column(
    owner: &TableDef,
    name: &'static str,
    on: &TableDef,
    column: &str,
) -> Result<(), SchemaError> {
    if on.has_column(column) {
        Ok(())
    } else {
        Err(invalid(
            owner.table,
            name,
            format!("foreign key `{}.{column}` does not exist", on.name()),
        ))
    }
}

fn invalid(owner: Table, name: &'static str, reason: impl Into<String>) -> SchemaError {
    SchemaError::InvalidAssociation {
        table: owner.name(),
        name,
        reason: reason.into(),
    }
}
