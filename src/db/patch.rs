//! Attribute payloads for creating and patching records.
//!
//! Every field is optional. On create, `None` leaves the column NULL; on
//! patch, `None` leaves the column unchanged.

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime};
use modelbook_schema::Table;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::db::values::{Assignment, FieldValue};
use crate::error::ModelbookError;

/// Abstraction for applying a patch envelope to the database.
#[async_trait]
pub trait DbPatchable {
    async fn apply_patch(&self, pool: &SqlitePool) -> Result<(), ModelbookError>;
}

macro_rules! collect_assignments {
    ($attrs:expr; $($field:ident => $ctor:path),+ $(,)?) => {{
        let attrs = $attrs;
        let mut out: Vec<Assignment> = Vec::new();
        $(
            if let Some(v) = attrs.$field {
                out.push((stringify!($field), $ctor(v)));
            }
        )+
        out
    }};
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DoctorAttrs {
    pub name: Option<String>,
    pub office_address: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PatientAttrs {
    pub name: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApptInfoAttrs {
    pub doctor_id: Option<i64>,
    pub patient_id: Option<i64>,
    pub appt_time: Option<NaiveTime>,
    pub appt_location: Option<String>,
    pub spouse_accompanying: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CustomerAttrs {
    pub name: Option<String>,
    pub mailing_address: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrderAttrs {
    pub order_number: Option<i64>,
    pub date: Option<NaiveDate>,
    pub customer_id: Option<i64>,
}

/// Shared by the name-only tables: recipes, ingredients, hosts, guests.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NameAttrs {
    pub name: Option<String>,
}

impl NameAttrs {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IngredientRecipeAttrs {
    pub recipe_id: Option<i64>,
    pub ingredient_id: Option<i64>,
    pub ingredient_quantity: Option<i64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventAttrs {
    pub event_name: Option<String>,
    pub location: Option<String>,
    pub capacity: Option<i64>,
    pub host_id: Option<i64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventGuestAttrs {
    pub event_id: Option<i64>,
    pub guest_id: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
#[serde(rename_all = "snake_case")]
pub enum RecordAttrs {
    Doctor(DoctorAttrs),
    Patient(PatientAttrs),
    ApptInfo(ApptInfoAttrs),
    Customer(CustomerAttrs),
    Order(OrderAttrs),
    Recipe(NameAttrs),
    Ingredient(NameAttrs),
    IngredientRecipe(IngredientRecipeAttrs),
    Host(NameAttrs),
    Event(EventAttrs),
    Guest(NameAttrs),
    EventGuest(EventGuestAttrs),
}

impl RecordAttrs {
    pub fn table(&self) -> Table {
        match self {
            RecordAttrs::Doctor(_) => Table::Doctors,
            RecordAttrs::Patient(_) => Table::Patients,
            RecordAttrs::ApptInfo(_) => Table::ApptInfos,
            RecordAttrs::Customer(_) => Table::Customers,
            RecordAttrs::Order(_) => Table::Orders,
            RecordAttrs::Recipe(_) => Table::Recipes,
            RecordAttrs::Ingredient(_) => Table::Ingredients,
            RecordAttrs::IngredientRecipe(_) => Table::IngredientRecipes,
            RecordAttrs::Host(_) => Table::Hosts,
            RecordAttrs::Event(_) => Table::Events,
            RecordAttrs::Guest(_) => Table::Guests,
            RecordAttrs::EventGuest(_) => Table::EventsGuests,
        }
    }

    /// Provided columns in declaration order.
    pub fn into_assignments(self) -> Vec<Assignment> {
        use FieldValue::{Boolean, Date, Integer, Text, Time};

        match self {
            RecordAttrs::Doctor(a) => collect_assignments!(a;
                name => Text,
                office_address => Text,
                phone => Text,
            ),
            RecordAttrs::Patient(a) => collect_assignments!(a;
                name => Text,
                address => Text,
                phone => Text,
            ),
            RecordAttrs::ApptInfo(a) => collect_assignments!(a;
                doctor_id => Integer,
                patient_id => Integer,
                appt_time => Time,
                appt_location => Text,
                spouse_accompanying => Boolean,
            ),
            RecordAttrs::Customer(a) => collect_assignments!(a;
                name => Text,
                mailing_address => Text,
                email => Text,
            ),
            RecordAttrs::Order(a) => collect_assignments!(a;
                order_number => Integer,
                date => Date,
                customer_id => Integer,
            ),
            RecordAttrs::Recipe(a)
            | RecordAttrs::Ingredient(a)
            | RecordAttrs::Host(a)
            | RecordAttrs::Guest(a) => collect_assignments!(a; name => Text),
            RecordAttrs::IngredientRecipe(a) => collect_assignments!(a;
                recipe_id => Integer,
                ingredient_id => Integer,
                ingredient_quantity => Integer,
            ),
            RecordAttrs::Event(a) => collect_assignments!(a;
                event_name => Text,
                location => Text,
                capacity => Integer,
                host_id => Integer,
            ),
            RecordAttrs::EventGuest(a) => collect_assignments!(a;
                event_id => Integer,
                guest_id => Integer,
            ),
        }
    }
}

/// Update envelope: which row, and which columns to change.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordPatch {
    pub id: i64,
    pub attrs: RecordAttrs,
}

impl RecordPatch {
    pub fn new(id: i64, attrs: RecordAttrs) -> Self {
        Self { id, attrs }
    }
}
