use std::sync::Arc;

use anyhow::Context;
use sqlx::PgPool;

use beerstock_catalog::{BeerLedger, BeerStore};
use beerstock_infra::{InMemoryBeerStore, PostgresBeerStore};

use crate::config::{ApiConfig, StoreBackend};

/// Ledger over whichever store the process was configured with.
pub type SharedLedger = BeerLedger<Arc<dyn BeerStore>>;

/// Services shared by every request handler.
pub struct AppServices {
    ledger: SharedLedger,
    backend: &'static str,
}

impl AppServices {
    /// In-memory wiring (dev/test).
    pub fn in_memory() -> Self {
        let store: Arc<dyn BeerStore> = Arc::new(InMemoryBeerStore::new());
        Self {
            ledger: BeerLedger::new(store),
            backend: "in_memory",
        }
    }

    /// Postgres wiring; creates the schema if needed.
    pub async fn postgres(database_url: &str) -> anyhow::Result<Self> {
        let pool = PgPool::connect(database_url)
            .await
            .context("failed to connect to Postgres")?;

        let store = PostgresBeerStore::new(pool);
        store
            .ensure_schema()
            .await
            .context("failed to create beers schema")?;

        let store: Arc<dyn BeerStore> = Arc::new(store);
        Ok(Self {
            ledger: BeerLedger::new(store),
            backend: "postgres",
        })
    }

    pub fn ledger(&self) -> &SharedLedger {
        &self.ledger
    }

    /// Short name of the configured store, for logs.
    pub fn backend(&self) -> &'static str {
        self.backend
    }
}

pub async fn build_services(config: &ApiConfig) -> anyhow::Result<AppServices> {
    match &config.store {
        StoreBackend::InMemory => Ok(AppServices::in_memory()),
        StoreBackend::Postgres { database_url } => AppServices::postgres(database_url).await,
    }
}
