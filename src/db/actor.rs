use crate::db::models::{BreedIdentity, DogBreed};
use crate::db::schema::SQLITE_INIT;
use crate::error::DogApiError;
use crate::seed::{self, ReferenceDataset, SeedOutcome, SeedState};
use crate::service::lifecycle;
use ractor::{Actor, ActorProcessingErr, ActorRef, RpcReplyPort};
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use std::{str::FromStr, time::Duration};
use tracing::info;

#[derive(Debug)]
pub enum DbActorMessage {
    /// List every dog breed record (ordered by id).
    List(RpcReplyPort<Result<Vec<DogBreed>, DogApiError>>),

    /// Get a dog breed by id.
    Get(i64, RpcReplyPort<Result<DogBreed, DogApiError>>),

    /// Create a record, or return the one already holding the identity.
    Create(BreedIdentity, RpcReplyPort<Result<DogBreed, DogApiError>>),

    /// Replace the identity of a record.
    Update(i64, BreedIdentity, RpcReplyPort<Result<DogBreed, DogApiError>>),

    /// Delete a record; absent ids are not an error.
    Delete(i64, RpcReplyPort<Result<(), DogApiError>>),

    /// Read the persisted seed flag.
    SeedState(RpcReplyPort<Result<SeedState, DogApiError>>),

    /// Load the dataset and set the seed flag in one transaction.
    Seed(ReferenceDataset, RpcReplyPort<Result<SeedOutcome, DogApiError>>),
}

/// Cloneable handle to the database actor; this is the breed service used by the HTTP layer.
#[derive(Clone)]
pub struct DbActorHandle {
    actor: ActorRef<DbActorMessage>,
}

impl DbActorHandle {
    pub async fn list(&self) -> Result<Vec<DogBreed>, DogApiError> {
        ractor::call!(self.actor, DbActorMessage::List)
            .map_err(|e| DogApiError::RactorError(format!("DbActor List RPC failed: {e}")))?
    }

    pub async fn get_by_id(&self, id: i64) -> Result<DogBreed, DogApiError> {
        ractor::call!(self.actor, DbActorMessage::Get, id)
            .map_err(|e| DogApiError::RactorError(format!("DbActor Get RPC failed: {e}")))?
    }

    pub async fn create(&self, identity: BreedIdentity) -> Result<DogBreed, DogApiError> {
        ractor::call!(self.actor, DbActorMessage::Create, identity)
            .map_err(|e| DogApiError::RactorError(format!("DbActor Create RPC failed: {e}")))?
    }

    pub async fn update(&self, id: i64, identity: BreedIdentity) -> Result<DogBreed, DogApiError> {
        ractor::call!(self.actor, DbActorMessage::Update, id, identity)
            .map_err(|e| DogApiError::RactorError(format!("DbActor Update RPC failed: {e}")))?
    }

    pub async fn delete(&self, id: i64) -> Result<(), DogApiError> {
        ractor::call!(self.actor, DbActorMessage::Delete, id)
            .map_err(|e| DogApiError::RactorError(format!("DbActor Delete RPC failed: {e}")))?
    }

    pub async fn seed_state(&self) -> Result<SeedState, DogApiError> {
        ractor::call!(self.actor, DbActorMessage::SeedState)
            .map_err(|e| DogApiError::RactorError(format!("DbActor SeedState RPC failed: {e}")))?
    }

    pub async fn seed(&self, dataset: ReferenceDataset) -> Result<SeedOutcome, DogApiError> {
        ractor::call!(self.actor, DbActorMessage::Seed, dataset)
            .map_err(|e| DogApiError::RactorError(format!("DbActor Seed RPC failed: {e}")))?
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
    type Arguments = String;

    async fn pre_start(
        &self,
        _myself: ActorRef<Self::Msg>,
        database_url: Self::Arguments,
    ) -> Result<Self::State, ActorProcessingErr> {
        let connect_opts = SqliteConnectOptions::from_str(database_url.as_str())
            .map_err(|e| ActorProcessingErr::from(format!("invalid database url: {e}")))?
            .create_if_missing(true)
            .busy_timeout(Duration::from_secs(5))
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal);

        let pool = SqlitePoolOptions::new()
            .connect_with(connect_opts)
            .await
            .map_err(|e| ActorProcessingErr::from(format!("db connect failed: {e}")))?;

        apply_schema(&pool)
            .await
            .map_err(|e| ActorProcessingErr::from(format!("db schema init failed: {e}")))?;

        info!("DbActor initialized");
        Ok(DbActorState { pool })
    }

    async fn handle(
        &self,
        _myself: ActorRef<Self::Msg>,
        message: Self::Msg,
        state: &mut Self::State,
    ) -> Result<(), ActorProcessingErr> {
        match message {
            DbActorMessage::List(reply) => {
                let res = self.list(&state.pool).await;
                let _ = reply.send(res);
            }
            DbActorMessage::Get(id, reply) => {
                let res = self.get_by_id(&state.pool, id).await;
                let _ = reply.send(res);
            }
            DbActorMessage::Create(identity, reply) => {
                let res = self.create(&state.pool, identity).await;
                let _ = reply.send(res);
            }
            DbActorMessage::Update(id, identity, reply) => {
                let res = self.update(&state.pool, id, identity).await;
                let _ = reply.send(res);
            }
            DbActorMessage::Delete(id, reply) => {
                let res = self.delete(&state.pool, id).await;
                let _ = reply.send(res);
            }
            DbActorMessage::SeedState(reply) => {
                let res = self.seed_state(&state.pool).await;
                let _ = reply.send(res);
            }
            DbActorMessage::Seed(dataset, reply) => {
                let res = self.seed(&state.pool, &dataset).await;
                let _ = reply.send(res);
            }
        }
        Ok(())
    }
}

// Reads use a pooled connection; every mutation runs in its own transaction, which rolls back
// when dropped on an error path.
impl DbActor {
    async fn list(&self, pool: &SqlitePool) -> Result<Vec<DogBreed>, DogApiError> {
        let mut conn = pool.acquire().await?;
        lifecycle::list(&mut *conn).await
    }

    async fn get_by_id(&self, pool: &SqlitePool, id: i64) -> Result<DogBreed, DogApiError> {
        let mut conn = pool.acquire().await?;
        lifecycle::get_by_id(&mut *conn, id).await
    }

    async fn create(
        &self,
        pool: &SqlitePool,
        identity: BreedIdentity,
    ) -> Result<DogBreed, DogApiError> {
        let mut tx = pool.begin().await?;
        let record = lifecycle::create(&mut *tx, &identity).await?;
        tx.commit().await?;
        Ok(record)
    }

    async fn update(
        &self,
        pool: &SqlitePool,
        id: i64,
        identity: BreedIdentity,
    ) -> Result<DogBreed, DogApiError> {
        let mut tx = pool.begin().await?;
        let record = lifecycle::update(&mut *tx, id, &identity).await?;
        tx.commit().await?;
        Ok(record)
    }

    async fn delete(&self, pool: &SqlitePool, id: i64) -> Result<(), DogApiError> {
        let mut tx = pool.begin().await?;
        lifecycle::delete(&mut *tx, id).await?;
        tx.commit().await?;
        Ok(())
    }

    async fn seed_state(&self, pool: &SqlitePool) -> Result<SeedState, DogApiError> {
        let mut conn = pool.acquire().await?;
        seed::seed_state(&mut *conn).await
    }

    async fn seed(
        &self,
        pool: &SqlitePool,
        dataset: &ReferenceDataset,
    ) -> Result<SeedOutcome, DogApiError> {
        let mut tx = pool.begin().await?;
        let outcome = seed::apply(&mut *tx, dataset).await?;
        tx.commit().await?;
        Ok(outcome)
    }
}

/// Spawn the database actor and return a cloneable handle.
///
/// The actor is unnamed so several instances (e.g. one per test) can coexist in a process.
pub async fn spawn(database_url: &str) -> Result<DbActorHandle, DogApiError> {
    let (actor, _jh) = ractor::Actor::spawn(None, DbActor, database_url.to_string())
        .await
        .map_err(|e| DogApiError::RactorError(format!("failed to spawn DbActor: {e}")))?;

    Ok(DbActorHandle { actor })
}

async fn apply_schema(pool: &SqlitePool) -> Result<(), DogApiError> {
    for stmt in SQLITE_INIT.split(';') {
        let s = stmt.trim();
        if s.is_empty() {
            continue;
        }
        sqlx::query(s).execute(pool).await?;
    }
    Ok(())
}
