use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use modelbook_schema::Table;
use serde::{Deserialize, Serialize};
use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, SqlitePool};

use crate::error::ModelbookError;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, FromRow)]
pub struct DbDoctor {
    pub id: i64,
    pub name: Option<String>,
    pub office_address: Option<String>,
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, FromRow)]
pub struct DbPatient {
    pub id: i64,
    pub name: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Join row between a doctor and a patient.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, FromRow)]
pub struct DbApptInfo {
    pub id: i64,
    pub doctor_id: Option<i64>,
    pub patient_id: Option<i64>,
    pub appt_time: Option<NaiveTime>,
    pub appt_location: Option<String>,
    pub spouse_accompanying: Option<bool>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, FromRow)]
pub struct DbCustomer {
    pub id: i64,
    pub name: Option<String>,
    pub mailing_address: Option<String>,
    pub email: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, FromRow)]
pub struct DbOrder {
    pub id: i64,
    pub order_number: Option<i64>,
    pub date: Option<NaiveDate>,
    pub customer_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, FromRow)]
pub struct DbRecipe {
    pub id: i64,
    pub name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, FromRow)]
pub struct DbIngredient {
    pub id: i64,
    pub name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, FromRow)]
pub struct DbIngredientRecipe {
    pub id: i64,
    pub recipe_id: Option<i64>,
    pub ingredient_id: Option<i64>,
    pub ingredient_quantity: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, FromRow)]
pub struct DbHost {
    pub id: i64,
    pub name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, FromRow)]
pub struct DbEvent {
    pub id: i64,
    pub event_name: Option<String>,
    pub location: Option<String>,
    pub capacity: Option<i64>,
    pub host_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, FromRow)]
pub struct DbGuest {
    pub id: i64,
    pub name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Row of the `events_guests` join table (no timestamps).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, FromRow)]
pub struct DbEventGuest {
    pub id: i64,
    pub event_id: Option<i64>,
    pub guest_id: Option<i64>,
}

macro_rules! records {
    ($($variant:ident($row:ty) => $table:ident),+ $(,)?) => {
        /// Any row, tagged with the table it came from.
        #[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
        #[serde(tag = "table", content = "row", rename_all = "snake_case")]
        pub enum Record {
            $($variant($row),)+
        }

        impl Record {
            pub fn table(&self) -> Table {
                match self {
                    $(Record::$variant(_) => Table::$table,)+
                }
            }

            pub fn id(&self) -> i64 {
                match self {
                    $(Record::$variant(row) => row.id,)+
                }
            }
        }

        $(
            impl From<$row> for Record {
                fn from(row: $row) -> Self {
                    Record::$variant(row)
                }
            }

            impl TryFrom<Record> for $row {
                type Error = ModelbookError;

                fn try_from(record: Record) -> Result<Self, Self::Error> {
                    match record {
                        Record::$variant(row) => Ok(row),
                        other => Err(ModelbookError::RecordMismatch {
                            expected: Table::$table,
                            found: other.table(),
                        }),
                    }
                }
            }
        )+

        /// Run `sql` (with an optional id bind) and decode rows as `table`'s model.
        pub(crate) async fn fetch_records(
            pool: &SqlitePool,
            table: Table,
            sql: &str,
            bind: Option<i64>,
        ) -> Result<Vec<Record>, sqlx::Error> {
            match table {
                $(Table::$table => Ok(fetch_as::<$row>(pool, sql, bind)
                    .await?
                    .into_iter()
                    .map(Record::$variant)
                    .collect()),)+
            }
        }
    };
}

records! {
    Doctor(DbDoctor) => Doctors,
    Patient(DbPatient) => Patients,
    ApptInfo(DbApptInfo) => ApptInfos,
    Customer(DbCustomer) => Customers,
    Order(DbOrder) => Orders,
    Recipe(DbRecipe) => Recipes,
    Ingredient(DbIngredient) => Ingredients,
    IngredientRecipe(DbIngredientRecipe) => IngredientRecipes,
    Host(DbHost) => Hosts,
    Event(DbEvent) => Events,
    Guest(DbGuest) => Guests,
    EventGuest(DbEventGuest) => EventsGuests,
}

async fn fetch_as<T>(pool: &SqlitePool, sql: &str, bind: Option<i64>) -> Result<Vec<T>, sqlx::Error>
where
    T: for<'r> FromRow<'r, SqliteRow> + Send + Unpin,
{
    let mut query = sqlx::query_as::<_, T>(sql);
    if let Some(id) = bind {
        query = query.bind(id);
    }
    query.fetch_all(pool).await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn guest(id: i64) -> DbGuest {
        DbGuest {
            id,
            name: Some("Ada".to_string()),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn record_reports_its_table_and_id() {
        let record = Record::from(guest(7));
        assert_eq!(record.table(), Table::Guests);
        assert_eq!(record.id(), 7);
    }

    #[test]
    fn try_from_rejects_other_tables() {
        let err = DbHost::try_from(Record::from(guest(1))).unwrap_err();
        assert!(matches!(
            err,
            ModelbookError::RecordMismatch {
                expected: Table::Hosts,
                found: Table::Guests
            }
        ));
    }

    #[test]
    fn record_serializes_with_table_tag() {
        let json = serde_json::to_value(Record::from(DbEventGuest {
            id: 3,
            event_id: Some(1),
            guest_id: Some(2),
        }))
        .unwrap();
        assert_eq!(json["table"], "event_guest");
        assert_eq!(json["row"]["guest_id"], 2);
    }
}
