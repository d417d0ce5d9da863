//! # annota-db
//!
//! Persistence layer for the annota notes backend.
//!
//! Two interchangeable store families live here: `PgNoteStore`/`PgCategoryStore`
//! backed by PostgreSQL via sqlx, and `MemNoteStore`/`MemCategoryStore`, an
//! in-process document store for development and tests. The [`Database`]
//! aggregate bundles one family behind the store traits so callers never care
//! which backend they got.

pub mod categories;
pub mod memory;
pub mod notes;
pub mod pool;

use std::sync::Arc;

use tracing::info;

use annota_core::{CategoryStore, Error, NoteStore, Result};

pub use categories::PgCategoryStore;
pub use memory::{MemCategoryStore, MemNoteStore};
pub use notes::PgNoteStore;
pub use pool::{create_pool, create_pool_with_config, log_pool_metrics, PoolConfig};

/// Environment variable selecting the backing store (`postgres` or `memory`).
pub const STORE_ENV: &str = "ANNOTA_STORE";

/// Environment variable carrying the Postgres connection string.
pub const DATABASE_URL_ENV: &str = "DATABASE_URL";

/// Aggregate of all stores, handed to the API layer as a unit.
#[derive(Clone)]
pub struct Database {
    pub notes: Arc<dyn NoteStore>,
    pub categories: Arc<dyn CategoryStore>,
    pool: Option<sqlx::PgPool>,
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database")
            .field("pool", &self.pool)
            .finish_non_exhaustive()
    }
}

impl Database {
    /// Build a database backed by the in-process document store.
    pub fn in_memory() -> Self {
        info!(subsystem = "db", store = "memory", "Using in-memory store");
        Self {
            notes: Arc::new(MemNoteStore::new()),
            categories: Arc::new(MemCategoryStore::new()),
            pool: None,
        }
    }

    /// Connect to Postgres and build the store aggregate on a shared pool.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = pool::create_pool(database_url).await?;
        Ok(Self::from_pool(pool))
    }

    /// Build the store aggregate from an existing pool.
    pub fn from_pool(pool: sqlx::PgPool) -> Self {
        info!(subsystem = "db", store = "postgres", "Using Postgres store");
        Self {
            notes: Arc::new(PgNoteStore::new(pool.clone())),
            categories: Arc::new(PgCategoryStore::new(pool.clone())),
            pool: Some(pool),
        }
    }

    /// Select a backend from the environment.
    ///
    /// `ANNOTA_STORE=memory` yields the in-process store; `postgres` (the
    /// default) connects using `DATABASE_URL`.
    pub async fn from_env() -> Result<Self> {
        let store = std::env::var(STORE_ENV).unwrap_or_else(|_| "postgres".to_string());
        match store.to_lowercase().as_str() {
            "memory" => Ok(Self::in_memory()),
            "postgres" => {
                let url = std::env::var(DATABASE_URL_ENV).map_err(|_| {
                    Error::Config(format!(
                        "{} must be set when {}=postgres",
                        DATABASE_URL_ENV, STORE_ENV
                    ))
                })?;
                Self::connect(&url).await
            }
            other => Err(Error::Config(format!(
                "unknown {} value '{}', expected 'postgres' or 'memory'",
                STORE_ENV, other
            ))),
        }
    }

    /// The underlying pool, if this database is Postgres-backed.
    pub fn pool(&self) -> Option<&sqlx::PgPool> {
        self.pool.as_ref()
    }

    /// Run pending schema migrations. No-op for the in-memory store.
    #[cfg(feature = "migrations")]
    pub async fn migrate(&self) -> Result<()> {
        if let Some(pool) = &self.pool {
            info!(subsystem = "db", op = "migrate", "Running schema migrations");
            sqlx::migrate!("../../migrations")
                .run(pool)
                .await
                .map_err(|e| Error::Internal(format!("migration failed: {}", e)))?;
        }
        Ok(())
    }
}
