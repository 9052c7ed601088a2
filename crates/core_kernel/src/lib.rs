//! Core Kernel - Foundational types shared by the delivery orders crates
//!
//! This crate provides the building blocks used across all layers:
//! - Strongly-typed identifiers
//! - Common error types
//! - Port (hexagonal architecture) infrastructure

pub mod error;
pub mod identifiers;
pub mod ports;

pub use error::CoreError;
pub use identifiers::OrderId;
pub use ports::{AdapterHealth, DomainPort, HealthCheckResult, HealthCheckable, PortError};
