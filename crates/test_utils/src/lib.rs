//! Test Utilities Crate
//!
//! Provides shared test infrastructure, fixtures, and helpers for the
//! delivery orders test suite.
//!
//! # Modules
//!
//! - `fixtures`: Pre-built orders and coordinates
//! - `builders`: Builder for test orders
//! - `database`: PostgreSQL container management
//! - `assertions`: Assertion helpers for claim races and listings
//! - `generators`: Property-based input generators

pub mod fixtures;
pub mod builders;
pub mod database;
pub mod assertions;
pub mod generators;

pub use fixtures::*;
pub use builders::*;
pub use database::*;
pub use assertions::*;
pub use generators::*;
