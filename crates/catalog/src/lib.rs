//! Beer catalog ledger.
//!
//! This crate contains the business rules for registering beers and keeping
//! their stock within `[0, max]`. Storage is reached only through the
//! [`BeerStore`] contract; concrete stores live in `beerstock-infra`.

pub mod beer;
pub mod ledger;
pub mod store;

pub use beer::{Beer, BeerType, NewBeer, StockDelta};
pub use ledger::{BeerLedger, Direction, LedgerError, LedgerResult};
pub use store::{BeerStore, StoreError, StoreResult};
