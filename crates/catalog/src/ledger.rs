//! Catalog ledger: guarded operations over a [`BeerStore`].
//!
//! The ledger keeps no state of its own. Every check re-reads the store right
//! before acting, so each operation is a read followed (at most) by one write.
//! Nothing serializes those pairs: two concurrent adjustments of the same beer
//! can both pass the bound check against the same snapshot, and the later
//! write wins.

use thiserror::Error;

use beerstock_core::BeerId;

use crate::beer::{Beer, NewBeer, StockDelta};
use crate::store::{BeerStore, StoreError};

pub type LedgerResult<T> = Result<T, LedgerError>;

/// Outcome of a rejected ledger operation.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("beer {0} is already registered")]
    AlreadyRegistered(String),

    #[error("beer {0} not found")]
    NameNotFound(String),

    #[error("beer id {0} not registered")]
    IdNotFound(BeerId),

    #[error("stock of beer {id} would exceed max {max} (quantity {quantity} + {delta})")]
    StockExceeded {
        id: BeerId,
        quantity: u32,
        delta: u32,
        max: u32,
    },

    #[error("stock of beer {id} would go negative (quantity {quantity} - {delta})")]
    StockNegative { id: BeerId, quantity: u32, delta: u32 },

    /// Infrastructure failure, passed through untouched.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl LedgerError {
    /// Lookup by name or by id found nothing.
    pub fn is_not_found(&self) -> bool {
        matches!(self, LedgerError::NameNotFound(_) | LedgerError::IdNotFound(_))
    }
}

/// Which way an adjustment moves the stock.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Direction {
    Increment,
    Decrement,
}

impl Direction {
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Increment => "increment",
            Direction::Decrement => "decrement",
        }
    }
}

/// Quantity after applying `delta` in `direction`, or the bound it violates.
///
/// Pure: no store access.
pub fn next_quantity(beer: &Beer, delta: StockDelta, direction: Direction) -> LedgerResult<u32> {
    let quantity = beer.quantity();
    let amount = delta.get();

    match direction {
        Direction::Increment => match quantity.checked_add(amount) {
            Some(total) if total <= beer.max() => Ok(total),
            _ => Err(LedgerError::StockExceeded {
                id: beer.id_typed(),
                quantity,
                delta: amount,
                max: beer.max(),
            }),
        },
        Direction::Decrement => quantity.checked_sub(amount).ok_or(LedgerError::StockNegative {
            id: beer.id_typed(),
            quantity,
            delta: amount,
        }),
    }
}

/// Stateless set of guarded transactions over a store.
#[derive(Debug, Clone)]
pub struct BeerLedger<S> {
    store: S,
}

impl<S: BeerStore> BeerLedger<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Register a new beer. Fails without writing if the name is taken.
    #[tracing::instrument(skip_all, fields(name = %candidate.name))]
    pub async fn register(&self, candidate: NewBeer) -> LedgerResult<Beer> {
        if self.store.find_by_name(&candidate.name).await?.is_some() {
            tracing::debug!("registration rejected: name already taken");
            return Err(LedgerError::AlreadyRegistered(candidate.name));
        }

        let beer = self.store.insert(candidate).await?;
        tracing::info!(beer_id = %beer.id_typed(), quantity = beer.quantity(), max = beer.max(), "beer registered");
        Ok(beer)
    }

    pub async fn find_by_name(&self, name: &str) -> LedgerResult<Beer> {
        self.store
            .find_by_name(name)
            .await?
            .ok_or_else(|| LedgerError::NameNotFound(name.to_string()))
    }

    pub async fn find_by_id(&self, id: BeerId) -> LedgerResult<Beer> {
        self.verify_exists(id).await
    }

    /// Every stored beer, in store order.
    pub async fn list_all(&self) -> LedgerResult<Vec<Beer>> {
        Ok(self.store.find_all().await?)
    }

    #[tracing::instrument(skip_all, fields(beer_id = %id))]
    pub async fn delete_by_id(&self, id: BeerId) -> LedgerResult<()> {
        self.verify_exists(id).await?;

        if !self.store.delete_by_id(id).await? {
            tracing::debug!("record vanished between existence check and delete");
        }
        tracing::info!("beer deleted");
        Ok(())
    }

    /// Move the stock of one beer by `delta`, keeping it within `[0, max]`.
    #[tracing::instrument(
        skip_all,
        fields(beer_id = %id, delta = delta.get(), direction = direction.as_str())
    )]
    pub async fn adjust_quantity(
        &self,
        id: BeerId,
        delta: StockDelta,
        direction: Direction,
    ) -> LedgerResult<Beer> {
        let current = self.verify_exists(id).await?;

        let quantity = match next_quantity(&current, delta, direction) {
            Ok(q) => q,
            Err(e) => {
                tracing::warn!(quantity = current.quantity(), max = current.max(), "adjustment rejected: {e}");
                return Err(e);
            }
        };

        let saved = self.store.save(current.with_quantity(quantity)).await?;
        tracing::info!(quantity = saved.quantity(), max = saved.max(), "stock adjusted");
        Ok(saved)
    }

    pub async fn increment(&self, id: BeerId, delta: StockDelta) -> LedgerResult<Beer> {
        self.adjust_quantity(id, delta, Direction::Increment).await
    }

    pub async fn decrement(&self, id: BeerId, delta: StockDelta) -> LedgerResult<Beer> {
        self.adjust_quantity(id, delta, Direction::Decrement).await
    }

    async fn verify_exists(&self, id: BeerId) -> LedgerResult<Beer> {
        self.store
            .find_by_id(id)
            .await?
            .ok_or(LedgerError::IdNotFound(id))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::beer::BeerType;
    use crate::store::StoreResult;

    /// Vec-backed store that counts writes.
    #[derive(Default)]
    struct CountingStore {
        beers: Mutex<Vec<Beer>>,
        writes: AtomicUsize,
    }

    impl CountingStore {
        fn writes(&self) -> usize {
            self.writes.load(Ordering::SeqCst)
        }

        fn len(&self) -> usize {
            self.beers.lock().unwrap().len()
        }
    }

    #[async_trait::async_trait]
    impl BeerStore for CountingStore {
        async fn find_by_name(&self, name: &str) -> StoreResult<Option<Beer>> {
            Ok(self.beers.lock().unwrap().iter().find(|b| b.name() == name).cloned())
        }

        async fn find_by_id(&self, id: BeerId) -> StoreResult<Option<Beer>> {
            Ok(self.beers.lock().unwrap().iter().find(|b| b.id_typed() == id).cloned())
        }

        async fn insert(&self, beer: NewBeer) -> StoreResult<Beer> {
            self.writes.fetch_add(1, Ordering::SeqCst);
            let beer = Beer::from_new(BeerId::new(), beer);
            self.beers.lock().unwrap().push(beer.clone());
            Ok(beer)
        }

        async fn save(&self, beer: Beer) -> StoreResult<Beer> {
            self.writes.fetch_add(1, Ordering::SeqCst);
            let mut beers = self.beers.lock().unwrap();
            let slot = beers
                .iter_mut()
                .find(|b| b.id_typed() == beer.id_typed())
                .ok_or(StoreError::Missing(beer.id_typed()))?;
            *slot = beer.clone();
            Ok(beer)
        }

        async fn delete_by_id(&self, id: BeerId) -> StoreResult<bool> {
            self.writes.fetch_add(1, Ordering::SeqCst);
            let mut beers = self.beers.lock().unwrap();
            let before = beers.len();
            beers.retain(|b| b.id_typed() != id);
            Ok(beers.len() != before)
        }

        async fn find_all(&self) -> StoreResult<Vec<Beer>> {
            Ok(self.beers.lock().unwrap().clone())
        }
    }

    fn brahma(quantity: u32, max: u32) -> NewBeer {
        NewBeer {
            name: "Brahma".to_string(),
            brand: "Ambev".to_string(),
            kind: BeerType::Lager,
            quantity,
            max,
        }
    }

    fn delta(n: u32) -> StockDelta {
        StockDelta::new(n).unwrap()
    }

    #[tokio::test]
    async fn register_then_find_by_name_returns_same_fields() {
        let ledger = BeerLedger::new(CountingStore::default());

        let created = ledger.register(brahma(10, 50)).await.unwrap();
        let found = ledger.find_by_name("Brahma").await.unwrap();

        assert_eq!(found, created);
        assert_eq!(found.brand(), "Ambev");
        assert_eq!(found.kind(), BeerType::Lager);
        assert_eq!(found.quantity(), 10);
        assert_eq!(found.max(), 50);
    }

    #[tokio::test]
    async fn duplicate_name_is_rejected_without_writing() {
        let ledger = BeerLedger::new(CountingStore::default());
        ledger.register(brahma(10, 50)).await.unwrap();

        let err = ledger.register(brahma(1, 5)).await.unwrap_err();

        assert!(matches!(err, LedgerError::AlreadyRegistered(ref n) if n == "Brahma"));
        assert_eq!(ledger.store().len(), 1);
        assert_eq!(ledger.store().writes(), 1);
    }

    #[tokio::test]
    async fn names_are_case_sensitive() {
        let ledger = BeerLedger::new(CountingStore::default());
        ledger.register(brahma(10, 50)).await.unwrap();

        let mut other = brahma(10, 50);
        other.name = "brahma".to_string();
        assert!(ledger.register(other).await.is_ok());

        assert!(ledger.find_by_name("BRAHMA").await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn unknown_name_is_not_found() {
        let ledger = BeerLedger::new(CountingStore::default());
        let err = ledger.find_by_name("Skol").await.unwrap_err();
        assert!(matches!(err, LedgerError::NameNotFound(ref n) if n == "Skol"));
    }

    #[tokio::test]
    async fn list_all_on_empty_store_is_empty() {
        let ledger = BeerLedger::new(CountingStore::default());
        assert!(ledger.list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn list_all_returns_registered_beer() {
        let ledger = BeerLedger::new(CountingStore::default());
        let created = ledger.register(brahma(10, 50)).await.unwrap();

        assert_eq!(ledger.list_all().await.unwrap(), vec![created]);
    }

    #[tokio::test]
    async fn delete_removes_the_record() {
        let ledger = BeerLedger::new(CountingStore::default());
        let created = ledger.register(brahma(10, 50)).await.unwrap();

        ledger.delete_by_id(created.id_typed()).await.unwrap();

        assert!(ledger.find_by_id(created.id_typed()).await.unwrap_err().is_not_found());
        assert!(ledger.find_by_name("Brahma").await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn delete_of_unknown_id_is_not_found_and_does_not_write() {
        let ledger = BeerLedger::new(CountingStore::default());
        let id = BeerId::new();

        let err = ledger.delete_by_id(id).await.unwrap_err();

        assert!(matches!(err, LedgerError::IdNotFound(missing) if missing == id));
        assert_eq!(ledger.store().writes(), 0);
    }

    #[tokio::test]
    async fn increment_within_max_updates_quantity() {
        let ledger = BeerLedger::new(CountingStore::default());
        let created = ledger.register(brahma(10, 50)).await.unwrap();

        let updated = ledger.increment(created.id_typed(), delta(10)).await.unwrap();

        assert_eq!(updated.quantity(), 20);
        assert_eq!(updated.max(), 50);
        assert_eq!(updated.name(), "Brahma");
    }

    #[tokio::test]
    async fn increment_past_max_is_rejected_and_leaves_quantity() {
        let ledger = BeerLedger::new(CountingStore::default());
        let id = ledger.register(brahma(10, 50)).await.unwrap().id_typed();
        ledger.increment(id, delta(10)).await.unwrap();
        let writes = ledger.store().writes();

        let err = ledger.increment(id, delta(31)).await.unwrap_err();

        assert!(matches!(
            err,
            LedgerError::StockExceeded { quantity: 20, delta: 31, max: 50, .. }
        ));
        assert_eq!(ledger.find_by_id(id).await.unwrap().quantity(), 20);
        assert_eq!(ledger.store().writes(), writes);
    }

    #[tokio::test]
    async fn increment_up_to_exactly_max_is_allowed() {
        let ledger = BeerLedger::new(CountingStore::default());
        let id = ledger.register(brahma(10, 50)).await.unwrap().id_typed();

        let updated = ledger.increment(id, delta(40)).await.unwrap();

        assert_eq!(updated.quantity(), 50);
    }

    #[tokio::test]
    async fn decrement_below_zero_is_rejected_and_leaves_quantity() {
        let ledger = BeerLedger::new(CountingStore::default());
        let id = ledger.register(brahma(10, 50)).await.unwrap().id_typed();

        let err = ledger.decrement(id, delta(11)).await.unwrap_err();

        assert!(matches!(err, LedgerError::StockNegative { quantity: 10, delta: 11, .. }));
        assert_eq!(ledger.find_by_id(id).await.unwrap().quantity(), 10);
    }

    #[tokio::test]
    async fn decrement_to_zero_is_allowed() {
        let ledger = BeerLedger::new(CountingStore::default());
        let id = ledger.register(brahma(10, 50)).await.unwrap().id_typed();

        let updated = ledger.decrement(id, delta(10)).await.unwrap();

        assert_eq!(updated.quantity(), 0);
    }

    #[tokio::test]
    async fn adjusting_unknown_id_is_not_found() {
        let ledger = BeerLedger::new(CountingStore::default());

        let inc = ledger.increment(BeerId::new(), delta(1)).await.unwrap_err();
        let dec = ledger.decrement(BeerId::new(), delta(1)).await.unwrap_err();

        assert!(inc.is_not_found());
        assert!(dec.is_not_found());
    }

    #[tokio::test]
    async fn registration_accepts_quantity_above_max_but_increment_refuses() {
        let ledger = BeerLedger::new(CountingStore::default());
        let id = ledger.register(brahma(40, 5)).await.unwrap().id_typed();

        assert!(matches!(
            ledger.increment(id, delta(1)).await.unwrap_err(),
            LedgerError::StockExceeded { .. }
        ));
        assert_eq!(ledger.decrement(id, delta(35)).await.unwrap().quantity(), 5);
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 500,
                ..ProptestConfig::default()
            })]

            /// Property: any sequence of accepted adjustments stays within [0, max].
            #[test]
            fn adjustments_never_leave_bounds(
                max in 0u32..=500,
                steps in prop::collection::vec((1u32..=100, any::<bool>()), 0..64),
            ) {
                let mut beer = Beer::from_new(BeerId::new(), brahma(0, max));

                for (amount, up) in steps {
                    let direction = if up { Direction::Increment } else { Direction::Decrement };
                    let before = beer.quantity();
                    match next_quantity(&beer, delta(amount), direction) {
                        Ok(q) => {
                            prop_assert!(q <= max);
                            beer = beer.with_quantity(q);
                        }
                        Err(LedgerError::StockExceeded { .. }) => {
                            prop_assert_eq!(direction, Direction::Increment);
                            prop_assert!(before + amount > max);
                        }
                        Err(LedgerError::StockNegative { .. }) => {
                            prop_assert_eq!(direction, Direction::Decrement);
                            prop_assert!(amount > before);
                        }
                        Err(other) => prop_assert!(false, "unexpected error: {other}"),
                    }
                }
            }
        }
    }
}
