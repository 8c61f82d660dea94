//! `BeerStore` implementations.

pub mod in_memory;
pub mod postgres;

pub use in_memory::InMemoryBeerStore;
pub use postgres::PostgresBeerStore;
