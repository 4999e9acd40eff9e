//! The table catalog.
//!
//! One `TableDef` per table. Foreign keys are plain nullable integers; the
//! associations below only describe intent and are never enforced by SQLite.

use crate::association::Association;
use crate::column::{ColumnDef, ColumnType};
use crate::error::SchemaError;
use crate::table::{Table, TableDef};

static DOCTORS: TableDef = TableDef {
    table: Table::Doctors,
    columns: &[
        ColumnDef::new("name", ColumnType::String),
        ColumnDef::new("office_address", ColumnType::String),
        ColumnDef::new("phone", ColumnType::String),
    ],
    timestamps: true,
    associations: &[
        Association::HasMany {
            name: "appt_infos",
            target: Table::ApptInfos,
            foreign_key: "doctor_id",
        },
        Association::HasManyThrough {
            name: "patients",
            through: "appt_infos",
            source: "patient",
        },
    ],
};

static PATIENTS: TableDef = TableDef {
    table: Table::Patients,
    columns: &[
        ColumnDef::new("name", ColumnType::String),
        ColumnDef::new("address", ColumnType::String),
        ColumnDef::new("phone", ColumnType::String),
    ],
    timestamps: true,
    associations: &[
        Association::HasMany {
            name: "appt_infos",
            target: Table::ApptInfos,
            foreign_key: "patient_id",
        },
        Association::HasManyThrough {
            name: "doctors",
            through: "appt_infos",
            source: "doctor",
        },
    ],
};

static APPT_INFOS: TableDef = TableDef {
    table: Table::ApptInfos,
    columns: &[
        ColumnDef::new("doctor_id", ColumnType::Integer),
        ColumnDef::new("patient_id", ColumnType::Integer),
        ColumnDef::new("appt_time", ColumnType::Time),
        ColumnDef::new("appt_location", ColumnType::String),
        ColumnDef::new("spouse_accompanying", ColumnType::Boolean),
    ],
    timestamps: true,
    associations: &[
        Association::BelongsTo {
            name: "doctor",
            target: Table::Doctors,
            foreign_key: "doctor_id",
        },
        Association::BelongsTo {
            name: "patient",
            target: Table::Patients,
            foreign_key: "patient_id",
        },
    ],
};

static CUSTOMERS: TableDef = TableDef {
    table: Table::Customers,
    columns: &[
        ColumnDef::new("name", ColumnType::String),
        ColumnDef::new("mailing_address", ColumnType::Text),
        ColumnDef::new("email", ColumnType::String),
    ],
    timestamps: true,
    associations: &[Association::HasMany {
        name: "orders",
        target: Table::Orders,
        foreign_key: "customer_id",
    }],
};

static ORDERS: TableDef = TableDef {
    table: Table::Orders,
    columns: &[
        ColumnDef::new("order_number", ColumnType::Integer),
        ColumnDef::new("date", ColumnType::Date),
        ColumnDef::new("customer_id", ColumnType::Integer),
    ],
    timestamps: true,
    associations: &[Association::BelongsTo {
        name: "customer",
        target: Table::Customers,
        foreign_key: "customer_id",
    }],
};

static RECIPES: TableDef = TableDef {
    table: Table::Recipes,
    columns: &[ColumnDef::new("name", ColumnType::String)],
    timestamps: true,
    associations: &[
        Association::HasMany {
            name: "ingredient_recipes",
            target: Table::IngredientRecipes,
            foreign_key: "recipe_id",
        },
        Association::HasManyThrough {
            name: "ingredients",
            through: "ingredient_recipes",
            source: "ingredient",
        },
    ],
};

static INGREDIENTS: TableDef = TableDef {
    table: Table::Ingredients,
    columns: &[ColumnDef::new("name", ColumnType::String)],
    timestamps: true,
    associations: &[
        Association::HasMany {
            name: "ingredient_recipes",
            target: Table::IngredientRecipes,
            foreign_key: "ingredient_id",
        },
        Association::HasManyThrough {
            name: "recipes",
            through: "ingredient_recipes",
            source: "recipe",
        },
    ],
};

static INGREDIENT_RECIPES: TableDef = TableDef {
    table: Table::IngredientRecipes,
    columns: &[
        ColumnDef::new("recipe_id", ColumnType::Integer),
        ColumnDef::new("ingredient_id", ColumnType::Integer),
        ColumnDef::new("ingredient_quantity", ColumnType::Integer),
    ],
    timestamps: true,
    associations: &[
        Association::BelongsTo {
            name: "recipe",
            target: Table::Recipes,
            foreign_key: "recipe_id",
        },
        Association::BelongsTo {
            name: "ingredient",
            target: Table::Ingredients,
            foreign_key: "ingredient_id",
        },
    ],
};

static HOSTS: TableDef = TableDef {
    table: Table::Hosts,
    columns: &[ColumnDef::new("name", ColumnType::String)],
    timestamps: true,
    associations: &[Association::HasMany {
        name: "events",
        target: Table::Events,
        foreign_key: "host_id",
    }],
};

static EVENTS: TableDef = TableDef {
    table: Table::Events,
    columns: &[
        ColumnDef::new("event_name", ColumnType::String),
        ColumnDef::new("location", ColumnType::String),
        ColumnDef::new("capacity", ColumnType::Integer),
        ColumnDef::new("host_id", ColumnType::Integer),
    ],
    timestamps: true,
    associations: &[
        Association::BelongsTo {
            name: "host",
            target: Table::Hosts,
            foreign_key: "host_id",
        },
        Association::HasAndBelongsToMany {
            name: "guests",
            target: Table::Guests,
            join_table: Table::EventsGuests,
            foreign_key: "event_id",
            association_foreign_key: "guest_id",
        },
    ],
};

static GUESTS: TableDef = TableDef {
    table: Table::Guests,
    columns: &[ColumnDef::new("name", ColumnType::String)],
    timestamps: true,
    associations: &[Association::HasAndBelongsToMany {
        name: "events",
        target: Table::Events,
        join_table: Table::EventsGuests,
        foreign_key: "guest_id",
        association_foreign_key: "event_id",
    }],
};

static EVENTS_GUESTS: TableDef = TableDef {
    table: Table::EventsGuests,
    columns: &[
        ColumnDef::new("event_id", ColumnType::Integer),
        ColumnDef::new("guest_id", ColumnType::Integer),
    ],
    timestamps: false,
    associations: &[
        Association::BelongsTo {
            name: "event",
            target: Table::Events,
            foreign_key: "event_id",
        },
        Association::BelongsTo {
            name: "guest",
            target: Table::Guests,
            foreign_key: "guest_id",
        },
    ],
};

pub(crate) fn definition(table: Table) -> &'static TableDef {
    match table {
        Table::Doctors => &DOCTORS,
        Table::Patients => &PATIENTS,
        Table::ApptInfos => &APPT_INFOS,
        Table::Customers => &CUSTOMERS,
        Table::Orders => &ORDERS,
        Table::Recipes => &RECIPES,
        Table::Ingredients => &INGREDIENTS,
        Table::IngredientRecipes => &INGREDIENT_RECIPES,
        Table::Hosts => &HOSTS,
        Table::Events => &EVENTS,
        Table::Guests => &GUESTS,
        Table::EventsGuests => &EVENTS_GUESTS,
    }
}

/// Checks that every association points at existing tables and columns.
pub fn validate_catalog() -> Result<(), SchemaError> {
    validate_catalog_in(Table::def)
}

/// Same check against the definitions returned by `defs`.
///
/// Resolving each declaration is enough: `resolve_in` walks through/source
/// chains and verifies every foreign key it joins on.
pub fn validate_catalog_in<'a, F>(defs: F) -> Result<(), SchemaError>
where
    F: Fn(Table) -> &'a TableDef,
{
    for table in Table::ALL {
        let def = defs(table);
        if def.table != table {
            return Err(SchemaError::UnknownTable(table.name().to_string()));
        }
        for assoc in def.associations {
            crate::association::resolve_in(&defs, table, assoc.name())?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shipped_catalog_validates() {
        assert_eq!(validate_catalog(), Ok(()));
    }

    #[test]
    fn catalog_with_dropped_foreign_key_fails_validation() {
        static APPT_INFOS_WITHOUT_KEYS: TableDef = TableDef {
            table: Table::ApptInfos,
            columns: &[ColumnDef::new("appt_location", ColumnType::String)],
            timestamps: true,
            associations: &[],
        };
        let lookup = |table: Table| match table {
            Table::ApptInfos => &APPT_INFOS_WITHOUT_KEYS,
            other => definition(other),
        };
        assert_eq!(
            validate_catalog_in(lookup),
            Err(SchemaError::InvalidAssociation {
                table: "doctors",
                name: "appt_infos",
                reason: "foreign key `appt_infos.doctor_id` does not exist".to_string(),
            })
        );
    }

    #[test]
    fn definition_table_must_match_its_slot() {
        let lookup = |table: Table| match table {
            Table::Orders => definition(Table::Customers),
            other => definition(other),
        };
        assert_eq!(
            validate_catalog_in(lookup),
            Err(SchemaError::UnknownTable("orders".to_string()))
        );
    }

    #[test]
    fn association_names_are_unique_per_table() {
        for table in Table::ALL {
            let mut names: Vec<_> = table.def().associations.iter().map(|a| a.name()).collect();
            let before = names.len();
            names.sort_unstable();
            names.dedup();
            assert_eq!(names.len(), before, "duplicate association on {table}");
        }
    }

    #[test]
    fn appointment_flag_has_no_predicate_suffix() {
        let def = Table::ApptInfos.def();
        let flag = def.column("spouse_accompanying").unwrap();
        assert_eq!(flag.ty, ColumnType::Boolean);
        assert!(def.all_columns().iter().all(|c| !c.name.ends_with('?')));
    }

    #[test]
    fn mailing_address_is_text() {
        let col = Table::Customers.def().column("mailing_address").unwrap();
        assert_eq!(col.ty, ColumnType::Text);
    }
}
