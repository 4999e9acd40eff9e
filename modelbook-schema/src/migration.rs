use serde::Serialize;

use crate::ddl::{render_create_table, render_drop_table};
use crate::table::Table;

/// One versioned schema change. Each migration creates exactly one table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Migration {
    pub version: i64,
    pub name: &'static str,
    pub table: Table,
}

impl Migration {
    pub fn up_sql(&self) -> String {
        render_create_table(self.table.def())
    }

    pub fn down_sql(&self) -> String {
        render_drop_table(self.table)
    }
}

/// Ordered by version, ascending.
pub const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 20_160_830_180_008,
        name: "create_doctors",
        table: Table::Doctors,
    },
    Migration {
        version: 20_160_830_180_150,
        name: "create_patients",
        table: Table::Patients,
    },
    Migration {
        version: 20_160_830_180_352,
        name: "create_appt_infos",
        table: Table::ApptInfos,
    },
    Migration {
        version: 20_160_830_182_410,
        name: "create_customers",
        table: Table::Customers,
    },
    Migration {
        version: 20_160_830_182_655,
        name: "create_orders",
        table: Table::Orders,
    },
    Migration {
        version: 20_160_830_183_512,
        name: "create_recipes",
        table: Table::Recipes,
    },
    Migration {
        version: 20_160_830_183_640,
        name: "create_ingredients",
        table: Table::Ingredients,
    },
    Migration {
        version: 20_160_830_183_925,
        name: "create_ingredient_recipes",
        table: Table::IngredientRecipes,
    },
    Migration {
        version: 20_160_830_185_420,
        name: "create_hosts",
        table: Table::Hosts,
    },
    Migration {
        version: 20_160_830_185_653,
        name: "create_events",
        table: Table::Events,
    },
    Migration {
        version: 20_160_830_185_810,
        name: "create_guests",
        table: Table::Guests,
    },
    Migration {
        version: 20_160_830_190_602,
        name: "create_events_guests",
        table: Table::EventsGuests,
    },
];

/// Version of the last migration; a fully migrated database reports this.
pub const SCHEMA_VERSION: i64 = 20_160_830_190_602;
