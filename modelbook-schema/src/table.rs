use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::association::Association;
use crate::catalog;
use crate::column::ColumnDef;
use crate::error::SchemaError;

/// Every table the application knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Table {
    Doctors,
    Patients,
    ApptInfos,
    Customers,
    Orders,
    Recipes,
    Ingredients,
    IngredientRecipes,
    Hosts,
    Events,
    Guests,
    EventsGuests,
}

impl Table {
    pub const ALL: [Table; 12] = [
        Table::Doctors,
        Table::Patients,
        Table::ApptInfos,
        Table::Customers,
        Table::Orders,
        Table::Recipes,
        Table::Ingredients,
        Table::IngredientRecipes,
        Table::Hosts,
        Table::Events,
        Table::Guests,
        Table::EventsGuests,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Table::Doctors => "doctors",
            Table::Patients => "patients",
            Table::ApptInfos => "appt_infos",
            Table::Customers => "customers",
            Table::Orders => "orders",
            Table::Recipes => "recipes",
            Table::Ingredients => "ingredients",
            Table::IngredientRecipes => "ingredient_recipes",
            Table::Hosts => "hosts",
            Table::Events => "events",
            Table::Guests => "guests",
            Table::EventsGuests => "events_guests",
        }
    }

    pub fn def(self) -> &'static TableDef {
        catalog::definition(self)
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Table {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Table::ALL
            .into_iter()
            .find(|t| t.name() == s)
            .ok_or_else(|| SchemaError::UnknownTable(s.to_string()))
    }
}

/// Static shape of one table.
#[derive(Debug, Serialize)]
pub struct TableDef {
    pub table: Table,
    /// User-declared columns, excluding `id` and timestamps.
    pub columns: &'static [ColumnDef],
    /// Adds `created_at` / `updated_at`.
    pub timestamps: bool,
    pub associations: &'static [Association],
}

impl TableDef {
    pub fn name(&self) -> &'static str {
        self.table.name()
    }

    /// `id`, then declared columns, then timestamps.
    pub fn all_columns(&self) -> Vec<ColumnDef> {
        let mut cols = Vec::with_capacity(self.columns.len() + 3);
        cols.push(ColumnDef::id());
        cols.extend_from_slice(self.columns);
        if self.timestamps {
            cols.push(ColumnDef::timestamp("created_at"));
            cols.push(ColumnDef::timestamp("updated_at"));
        }
        cols
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.all_columns().iter().any(|c| c.name == name)
    }

    pub fn column(&self, name: &str) -> Result<ColumnDef, SchemaError> {
        self.all_columns()
            .into_iter()
            .find(|c| c.name == name)
            .ok_or_else(|| SchemaError::UnknownColumn {
                table: self.name(),
                column: name.to_string(),
            })
    }

    pub fn association(&self, name: &str) -> Option<&'static Association> {
        self.associations.iter().find(|a| a.name() == name)
    }

    /// `table.col, table.col, ...` in `all_columns` order.
    pub fn qualified_columns(&self) -> String {
        self.all_columns()
            .iter()
            .map(|c| format!("{}.{}", self.name(), c.name))
            .collect::<Vec<_>>()
            .join(", ")
    }
}
