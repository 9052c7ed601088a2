//! Repository implementations for domain entities
//!
//! Repositories encapsulate SQL queries and map between database rows and
//! domain types. Queries are checked at runtime (`query_as::<_, Row>`), so
//! building the crate does not need a live database.

pub mod orders;

pub use orders::{DbOrderStatus, OrderRepository, OrderRow};
