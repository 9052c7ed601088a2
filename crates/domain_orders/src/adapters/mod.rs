//! External Adapters for the Order Domain
//!
//! Adapter implementations for external systems the order domain consumes.
//!
//! # Available Adapters
//!
//! - **GoogleDistanceMatrix**: road distance via the Google Distance Matrix REST API
//!
//! # Usage
//!
//! ```rust,ignore
//! use domain_orders::adapters::{DistanceMatrixConfig, GoogleDistanceMatrix};
//! use domain_orders::DistanceProvider;
//! use std::sync::Arc;
//!
//! let adapter = GoogleDistanceMatrix::new(DistanceMatrixConfig {
//!     api_key: "secret".to_string(),
//!     ..Default::default()
//! })?;
//! let provider: Arc<dyn DistanceProvider> = Arc::new(adapter);
//! ```

pub mod distance_matrix;

pub use distance_matrix::{DistanceMatrixConfig, GoogleDistanceMatrix};
