//! Core business logic - framework-agnostic ledger operations.
//!
//! `customer` and `record` hold the `SeaORM` queries; `aggregate`, `view` and
//! `reconcile` are pure functions over record slices.

pub mod aggregate;
pub mod customer;
pub mod reconcile;
pub mod record;
pub mod view;
