//! Persistence contract the ledger runs against.

use std::sync::Arc;

use thiserror::Error;

use beerstock_core::BeerId;

use crate::beer::{Beer, NewBeer};

pub type StoreResult<T> = Result<T, StoreError>;

/// Store operation error.
///
/// These are **infrastructure errors** (connectivity, corrupt rows) as opposed
/// to ledger business outcomes. The ledger never recovers from them.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backing storage failed (connection, query, lock poisoning).
    #[error("store backend failure: {0}")]
    Backend(String),

    /// A persisted record could not be mapped back into a `Beer`.
    #[error("corrupt record: {0}")]
    Corrupt(String),

    /// `save` was called for an id the store does not hold.
    #[error("no record with id {0}")]
    Missing(BeerId),
}

/// Durable keyed storage for beers.
///
/// `insert` assigns the id; `save` replaces an existing record by id.
/// `delete_by_id` reports whether a record was removed; absence is not an
/// error at this level.
#[async_trait::async_trait]
pub trait BeerStore: Send + Sync {
    async fn find_by_name(&self, name: &str) -> StoreResult<Option<Beer>>;

    async fn find_by_id(&self, id: BeerId) -> StoreResult<Option<Beer>>;

    async fn insert(&self, beer: NewBeer) -> StoreResult<Beer>;

    async fn save(&self, beer: Beer) -> StoreResult<Beer>;

    async fn delete_by_id(&self, id: BeerId) -> StoreResult<bool>;

    async fn find_all(&self) -> StoreResult<Vec<Beer>>;
}

#[async_trait::async_trait]
impl<S> BeerStore for Arc<S>
where
    S: BeerStore + ?Sized,
{
    async fn find_by_name(&self, name: &str) -> StoreResult<Option<Beer>> {
        (**self).find_by_name(name).await
    }

    async fn find_by_id(&self, id: BeerId) -> StoreResult<Option<Beer>> {
        (**self).find_by_id(id).await
    }

    async fn insert(&self, beer: NewBeer) -> StoreResult<Beer> {
        (**self).insert(beer).await
    }

    async fn save(&self, beer: Beer) -> StoreResult<Beer> {
        (**self).save(beer).await
    }

    async fn delete_by_id(&self, id: BeerId) -> StoreResult<bool> {
        (**self).delete_by_id(id).await
    }

    async fn find_all(&self) -> StoreResult<Vec<Beer>> {
        (**self).find_all().await
    }
}
