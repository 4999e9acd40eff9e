use crate::config::DatabaseConfig;
use crate::db::associations::{all_records, find_record, load_association};
use crate::db::migrate::{self, ColumnInfo};
use crate::db::models::{
    DbApptInfo, DbCustomer, DbDoctor, DbEvent, DbGuest, DbHost, DbIngredient, DbOrder, DbPatient,
    DbRecipe, Record,
};
use crate::db::patch::{DbPatchable, RecordAttrs, RecordPatch};
use crate::db::patch_impl::{destroy_record, insert_record};
use crate::error::ModelbookError;
use modelbook_schema::Table;
use ractor::{Actor, ActorProcessingErr, ActorRef, RpcReplyPort};
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use std::{str::FromStr, sync::Arc, time::Duration};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::info;

#[derive(Debug)]
pub enum DbActorMessage {
    /// Apply pending migrations; reply with the versions applied.
    Migrate(RpcReplyPort<Result<Vec<i64>, ModelbookError>>),

    /// Revert the newest N migrations.
    Rollback(usize, RpcReplyPort<Result<Vec<i64>, ModelbookError>>),

    /// Drop everything and migrate again.
    Reset(RpcReplyPort<Result<Vec<i64>, ModelbookError>>),

    AppliedVersions(RpcReplyPort<Result<Vec<i64>, ModelbookError>>),

    TableColumns(Table, RpcReplyPort<Result<Vec<ColumnInfo>, ModelbookError>>),

    VerifySchema(RpcReplyPort<Result<(), ModelbookError>>),

    /// Insert a record and return its id.
    Create(RecordAttrs, RpcReplyPort<Result<i64, ModelbookError>>),

    /// Patch a record by id.
    Patch(RecordPatch, RpcReplyPort<Result<(), ModelbookError>>),

    Destroy(Table, i64, RpcReplyPort<Result<(), ModelbookError>>),

    Find(Table, i64, RpcReplyPort<Result<Record, ModelbookError>>),

    All(Table, RpcReplyPort<Result<Vec<Record>, ModelbookError>>),

    /// Load a declared association for one owner row.
    LoadAssociation(
        Table,
        i64,
        String,
        RpcReplyPort<Result<Vec<Record>, ModelbookError>>,
    ),
}

#[derive(Clone)]
pub struct DbActorHandle {
    actor: ActorRef<DbActorMessage>,
    /// Taken by the first `shutdown`; shared by every clone.
    join: Arc<Mutex<Option<JoinHandle<()>>>>,
}

impl DbActorHandle {
    pub async fn migrate(&self) -> Result<Vec<i64>, ModelbookError> {
        ractor::call!(self.actor, DbActorMessage::Migrate)
            .map_err(|e| ModelbookError::RactorError(format!("DbActor Migrate RPC failed: {e}")))?
    }

    pub async fn rollback(&self, steps: usize) -> Result<Vec<i64>, ModelbookError> {
        ractor::call!(self.actor, DbActorMessage::Rollback, steps)
            .map_err(|e| ModelbookError::RactorError(format!("DbActor Rollback RPC failed: {e}")))?
    }

    pub async fn reset(&self) -> Result<Vec<i64>, ModelbookError> {
        ractor::call!(self.actor, DbActorMessage::Reset)
            .map_err(|e| ModelbookError::RactorError(format!("DbActor Reset RPC failed: {e}")))?
    }

    pub async fn applied_versions(&self) -> Result<Vec<i64>, ModelbookError> {
        ractor::call!(self.actor, DbActorMessage::AppliedVersions).map_err(|e| {
            ModelbookError::RactorError(format!("DbActor AppliedVersions RPC failed: {e}"))
        })?
    }

    pub async fn table_columns(&self, table: Table) -> Result<Vec<ColumnInfo>, ModelbookError> {
        ractor::call!(self.actor, DbActorMessage::TableColumns, table).map_err(|e| {
            ModelbookError::RactorError(format!("DbActor TableColumns RPC failed: {e}"))
        })?
    }

    pub async fn verify_schema(&self) -> Result<(), ModelbookError> {
        ractor::call!(self.actor, DbActorMessage::VerifySchema).map_err(|e| {
            ModelbookError::RactorError(format!("DbActor VerifySchema RPC failed: {e}"))
        })?
    }

    pub async fn create(&self, attrs: RecordAttrs) -> Result<i64, ModelbookError> {
        ractor::call!(self.actor, DbActorMessage::Create, attrs)
            .map_err(|e| ModelbookError::RactorError(format!("DbActor Create RPC failed: {e}")))?
    }

    pub async fn patch(&self, patch: RecordPatch) -> Result<(), ModelbookError> {
        ractor::call!(self.actor, DbActorMessage::Patch, patch)
            .map_err(|e| ModelbookError::RactorError(format!("DbActor Patch RPC failed: {e}")))?
    }

    pub async fn destroy(&self, table: Table, id: i64) -> Result<(), ModelbookError> {
        ractor::call!(self.actor, DbActorMessage::Destroy, table, id)
            .map_err(|e| ModelbookError::RactorError(format!("DbActor Destroy RPC failed: {e}")))?
    }

    pub async fn find(&self, table: Table, id: i64) -> Result<Record, ModelbookError> {
        ractor::call!(self.actor, DbActorMessage::Find, table, id)
            .map_err(|e| ModelbookError::RactorError(format!("DbActor Find RPC failed: {e}")))?
    }

    pub async fn all(&self, table: Table) -> Result<Vec<Record>, ModelbookError> {
        ractor::call!(self.actor, DbActorMessage::All, table)
            .map_err(|e| ModelbookError::RactorError(format!("DbActor All RPC failed: {e}")))?
    }

    pub async fn load_association(
        &self,
        owner: Table,
        id: i64,
        name: &str,
    ) -> Result<Vec<Record>, ModelbookError> {
        ractor::call!(
            self.actor,
            DbActorMessage::LoadAssociation,
            owner,
            id,
            name.to_string()
        )
        .map_err(|e| {
            ModelbookError::RactorError(format!("DbActor LoadAssociation RPC failed: {e}"))
        })?
    }

    async fn load_many<T>(&self, owner: Table, id: i64, name: &str) -> Result<Vec<T>, ModelbookError>
    where
        T: TryFrom<Record, Error = ModelbookError>,
    {
        self.load_association(owner, id, name)
            .await?
            .into_iter()
            .map(T::try_from)
            .collect()
    }

    async fn load_one<T>(
        &self,
        owner: Table,
        id: i64,
        name: &str,
    ) -> Result<Option<T>, ModelbookError>
    where
        T: TryFrom<Record, Error = ModelbookError>,
    {
        self.load_association(owner, id, name)
            .await?
            .into_iter()
            .next()
            .map(T::try_from)
            .transpose()
    }

    pub async fn doctors_of_patient(&self, patient_id: i64) -> Result<Vec<DbDoctor>, ModelbookError> {
        self.load_many(Table::Patients, patient_id, "doctors").await
    }

    pub async fn patients_of_doctor(&self, doctor_id: i64) -> Result<Vec<DbPatient>, ModelbookError> {
        self.load_many(Table::Doctors, doctor_id, "patients").await
    }

    pub async fn appt_infos_of_patient(
        &self,
        patient_id: i64,
    ) -> Result<Vec<DbApptInfo>, ModelbookError> {
        self.load_many(Table::Patients, patient_id, "appt_infos").await
    }

    pub async fn appt_infos_of_doctor(
        &self,
        doctor_id: i64,
    ) -> Result<Vec<DbApptInfo>, ModelbookError> {
        self.load_many(Table::Doctors, doctor_id, "appt_infos").await
    }

    pub async fn guests_of_event(&self, event_id: i64) -> Result<Vec<DbGuest>, ModelbookError> {
        self.load_many(Table::Events, event_id, "guests").await
    }

    pub async fn events_of_guest(&self, guest_id: i64) -> Result<Vec<DbEvent>, ModelbookError> {
        self.load_many(Table::Guests, guest_id, "events").await
    }

    pub async fn events_of_host(&self, host_id: i64) -> Result<Vec<DbEvent>, ModelbookError> {
        self.load_many(Table::Hosts, host_id, "events").await
    }

    pub async fn host_of_event(&self, event_id: i64) -> Result<Option<DbHost>, ModelbookError> {
        self.load_one(Table::Events, event_id, "host").await
    }

    pub async fn ingredients_of_recipe(
        &self,
        recipe_id: i64,
    ) -> Result<Vec<DbIngredient>, ModelbookError> {
        self.load_many(Table::Recipes, recipe_id, "ingredients").await
    }

    pub async fn recipes_of_ingredient(
        &self,
        ingredient_id: i64,
    ) -> Result<Vec<DbRecipe>, ModelbookError> {
        self.load_many(Table::Ingredients, ingredient_id, "recipes").await
    }

    pub async fn orders_of_customer(&self, customer_id: i64) -> Result<Vec<DbOrder>, ModelbookError> {
        self.load_many(Table::Customers, customer_id, "orders").await
    }

    pub async fn customer_of_order(&self, order_id: i64) -> Result<Option<DbCustomer>, ModelbookError> {
        self.load_one(Table::Orders, order_id, "customer").await
    }

    /// Stop the actor and wait until `post_stop` has closed the pool.
    ///
    /// Calls after the first one only signal the stop; they do not wait.
    pub async fn shutdown(&self) -> Result<(), ModelbookError> {
        self.actor.stop(Some("shutdown requested".to_string()));
        let join = self.join.lock().await.take();
        if let Some(join) = join {
            join.await
                .map_err(|e| ModelbookError::RactorError(format!("DbActor task failed: {e}")))?;
        }
        Ok(())
    }
}

struct DbActorState {
    pool: SqlitePool,
}

struct DbActor;

#[ractor::async_trait]
impl Actor for DbActor {
    type Msg = DbActorMessage;
    type State = DbActorState;
    type Arguments = DatabaseConfig;

    async fn pre_start(
        &self,
        _myself: ActorRef<Self::Msg>,
        config: Self::Arguments,
    ) -> Result<Self::State, ActorProcessingErr> {
        let journal_mode = if config.wal {
            SqliteJournalMode::Wal
        } else {
            SqliteJournalMode::Delete
        };
        let connect_opts = SqliteConnectOptions::from_str(config.url.as_str())
            .map_err(|e| ActorProcessingErr::from(format!("invalid database url: {e}")))?
            .create_if_missing(true)
            .busy_timeout(Duration::from_secs(config.busy_timeout_secs))
            .journal_mode(journal_mode)
            .synchronous(SqliteSynchronous::Normal);

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .connect_with(connect_opts)
            .await
            .map_err(|e| ActorProcessingErr::from(format!("db connect failed: {e}")))?;

        if config.migrate_on_start {
            let applied = migrate::migrate(&pool)
                .await
                .map_err(|e| ActorProcessingErr::from(format!("db migration failed: {e}")))?;
            info!(applied = applied.len(), "pending migrations applied");
        }

        info!("DbActor initialized");
        Ok(DbActorState { pool })
    }

    async fn post_stop(
        &self,
        _myself: ActorRef<Self::Msg>,
        state: &mut Self::State,
    ) -> Result<(), ActorProcessingErr> {
        state.pool.close().await;
        info!("DbActor stopped");
        Ok(())
    }

    async fn handle(
        &self,
        _myself: ActorRef<Self::Msg>,
        message: Self::Msg,
        state: &mut Self::State,
    ) -> Result<(), ActorProcessingErr> {
        let pool = &state.pool;
        match message {
            DbActorMessage::Migrate(reply) => {
                let _ = reply.send(migrate::migrate(pool).await);
            }
            DbActorMessage::Rollback(steps, reply) => {
                let _ = reply.send(migrate::rollback(pool, steps).await);
            }
            DbActorMessage::Reset(reply) => {
                let _ = reply.send(migrate::reset(pool).await);
            }
            DbActorMessage::AppliedVersions(reply) => {
                let _ = reply.send(migrate::applied_versions(pool).await);
            }
            DbActorMessage::TableColumns(table, reply) => {
                let _ = reply.send(migrate::table_columns(pool, table).await);
            }
            DbActorMessage::VerifySchema(reply) => {
                let _ = reply.send(migrate::verify_schema(pool).await);
            }
            DbActorMessage::Create(attrs, reply) => {
                let _ = reply.send(insert_record(pool, attrs).await);
            }
            DbActorMessage::Patch(patch, reply) => {
                let _ = reply.send(patch.apply_patch(pool).await);
            }
            DbActorMessage::Destroy(table, id, reply) => {
                let _ = reply.send(destroy_record(pool, table, id).await);
            }
            DbActorMessage::Find(table, id, reply) => {
                let _ = reply.send(find_record(pool, table, id).await);
            }
            DbActorMessage::All(table, reply) => {
                let _ = reply.send(all_records(pool, table).await);
            }
            DbActorMessage::LoadAssociation(owner, id, name, reply) => {
                let _ = reply.send(load_association(pool, owner, id, &name).await);
            }
        }
        Ok(())
    }
}

/// Spawn the database actor with default settings for `database_url`.
pub async fn spawn(database_url: &str) -> Result<DbActorHandle, ModelbookError> {
    spawn_with(DatabaseConfig::with_url(database_url)).await
}

/// Spawn the database actor and return a cloneable handle.
pub async fn spawn_with(config: DatabaseConfig) -> Result<DbActorHandle, ModelbookError> {
    let (actor, join) = ractor::Actor::spawn(None, DbActor, config)
        .await
        .map_err(|e| ModelbookError::RactorError(format!("failed to spawn DbActor: {e}")))?;

    Ok(DbActorHandle {
        actor,
        join: Arc::new(Mutex::new(Some(join))),
    })
}
