use std::collections::BTreeMap;
use std::sync::RwLock;

use beerstock_catalog::{Beer, BeerStore, NewBeer, StoreError, StoreResult};
use beerstock_core::BeerId;

/// In-memory beer store for tests/dev.
///
/// Records are keyed by id; ids are time-ordered, so `find_all` returns
/// beers in registration order. Each call takes the lock once, which makes
/// individual calls atomic but not read-then-write sequences.
#[derive(Debug, Default)]
pub struct InMemoryBeerStore {
    inner: RwLock<BTreeMap<BeerId, Beer>>,
}

impl InMemoryBeerStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.inner.read().map(|m| m.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn poisoned<T>(_: T) -> StoreError {
    StoreError::Backend("in-memory store lock poisoned".to_string())
}

#[async_trait::async_trait]
impl BeerStore for InMemoryBeerStore {
    async fn find_by_name(&self, name: &str) -> StoreResult<Option<Beer>> {
        let map = self.inner.read().map_err(poisoned)?;
        Ok(map.values().find(|b| b.name() == name).cloned())
    }

    async fn find_by_id(&self, id: BeerId) -> StoreResult<Option<Beer>> {
        let map = self.inner.read().map_err(poisoned)?;
        Ok(map.get(&id).cloned())
    }

    async fn insert(&self, beer: NewBeer) -> StoreResult<Beer> {
        let beer = Beer::from_new(BeerId::new(), beer);
        let mut map = self.inner.write().map_err(poisoned)?;
        map.insert(beer.id_typed(), beer.clone());
        Ok(beer)
    }

    async fn save(&self, beer: Beer) -> StoreResult<Beer> {
        let mut map = self.inner.write().map_err(poisoned)?;
        let slot = map
            .get_mut(&beer.id_typed())
            .ok_or(StoreError::Missing(beer.id_typed()))?;
        *slot = beer.clone();
        Ok(beer)
    }

    async fn delete_by_id(&self, id: BeerId) -> StoreResult<bool> {
        let mut map = self.inner.write().map_err(poisoned)?;
        Ok(map.remove(&id).is_some())
    }

    async fn find_all(&self) -> StoreResult<Vec<Beer>> {
        let map = self.inner.read().map_err(poisoned)?;
        Ok(map.values().cloned().collect())
    }
}
