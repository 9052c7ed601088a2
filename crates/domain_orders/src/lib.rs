//! Delivery Orders Domain
//!
//! This crate implements the delivery order lifecycle: an order is created
//! once the road distance between its origin and destination is known, it is
//! listed page by page, and a courier claims it exactly once.
//!
//! # Order Lifecycle
//!
//! ```text
//! UNASSIGNED -> TAKEN
//! ```
//!
//! The claim transition is owned by a [`ClaimEngine`] adapter; the
//! [`OrderService`] only orchestrates validation and delegation.

pub mod adapters;
pub mod coordinates;
pub mod error;
pub mod order;
pub mod pagination;
pub mod ports;
pub mod services;

pub use coordinates::{Coordinates, CoordinatesError};
pub use error::{DistanceError, OrderError};
pub use order::{ClaimOutcome, Order, OrderStatus};
pub use pagination::{PageRequest, PaginationError, PaginationField};
pub use ports::{ClaimEngine, DistanceProvider, OrderStore};
pub use services::OrderService;
