//! Infrastructure Database Layer
//!
//! This crate provides the PostgreSQL adapters for the delivery orders
//! system using SQLx.
//!
//! # Architecture
//!
//! The crate follows the repository pattern. [`OrderRepository`] implements
//! the `OrderStore` port (insert and ordered listing) and [`PgClaimEngine`]
//! implements the `ClaimEngine` port. The claim engine is the only code that
//! writes an order's status.
//!
//! # Claiming
//!
//! Each claim runs in its own transaction and reads the order with
//! `SELECT ... FOR UPDATE`. Concurrent claims for one order queue on the row
//! lock, so the second claimant only sees the row after the first transaction
//! has ended. This holds across any number of API processes sharing the
//! database.
//!
//! # Example
//!
//! ```rust,ignore
//! use infra_db::{DatabaseConfig, create_pool, OrderRepository, PgClaimEngine};
//!
//! let config = DatabaseConfig::new("postgres://localhost/delivery");
//! let pool = create_pool(config.clone()).await?;
//! infra_db::run_migrations(&pool).await?;
//! let store = OrderRepository::new(pool.clone());
//! let claims = PgClaimEngine::new(pool, config.claim_lock_timeout);
//! ```

pub mod claim_engine;
pub mod error;
pub mod migrations;
pub mod pool;
pub mod repositories;

pub use claim_engine::PgClaimEngine;
pub use error::DatabaseError;
pub use migrations::run_migrations;
pub use pool::{create_pool, DatabaseConfig, DatabasePool};
pub use repositories::OrderRepository;
