//! Database module: row models, attribute payloads, migrations and the actor
//! that owns the SQLite pool.
//!
//! Layout:
//! - `models.rs`: Rust structs mirroring DB rows, plus the `Record` union
//! - `patch.rs`: attribute payloads for create/patch
//! - `migrate.rs`: versioned migrations and schema introspection
//! - `associations.rs`: lookups driven by the association declarations

pub mod actor;
pub mod migrate;
pub mod models;
pub mod patch;
pub mod values;

mod associations;
mod patch_impl;

pub use migrate::ColumnInfo;
pub use models::{
    DbApptInfo, DbCustomer, DbDoctor, DbEvent, DbEventGuest, DbGuest, DbHost, DbIngredient,
    DbIngredientRecipe, DbOrder, DbPatient, DbRecipe, Record,
};
pub use patch::{
    ApptInfoAttrs, CustomerAttrs, DbPatchable, DoctorAttrs, EventAttrs, EventGuestAttrs,
    IngredientRecipeAttrs, NameAttrs, OrderAttrs, PatientAttrs, RecordAttrs, RecordPatch,
};
pub use values::FieldValue;

pub use actor::{DbActorHandle, spawn, spawn_with};
