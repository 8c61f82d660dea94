//! Infrastructure layer: concrete beer stores.

pub mod store;

pub use store::{InMemoryBeerStore, PostgresBeerStore};
