//! Value object trait: equality by value, not identity.
//!
//! Value objects have **no identity**; they are defined entirely by their
//! attribute values. A stock adjustment amount is one: two deltas of `5` are
//! interchangeable.

/// Marker trait for value objects.
///
/// Value objects are **immutable** and **compared by value**. To "modify" one,
/// construct a new instance through its validating constructor.
///
/// ## Value Object vs Entity
///
/// - **Value Object**: `StockDelta(5)` equals any other `StockDelta(5)`
/// - **Entity**: a `Beer` is the same beer as long as its id matches
///
/// The trait requires `Clone + PartialEq + Debug` so values can be copied,
/// compared, and logged freely.
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
