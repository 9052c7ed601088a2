//! Order domain errors

use thiserror::Error;

use core_kernel::PortError;
use crate::pagination::PaginationError;

/// Errors that can occur in the order domain
///
/// `NotFound` and `AlreadyTaken` are business rejections; `Storage` is an
/// infrastructure failure whose final state is unknown to the caller.
#[derive(Debug, Error)]
pub enum OrderError {
    #[error("Delivery order Id {0} does not exist")]
    NotFound(String),

    #[error("Delivery has been taken for order {0}")]
    AlreadyTaken(String),

    #[error(transparent)]
    InvalidPagination(#[from] PaginationError),

    #[error("Failed to retrieve distance")]
    DistanceUnavailable(#[from] DistanceError),

    #[error("Storage failure: {0}")]
    Storage(#[from] PortError),
}

impl OrderError {
    /// Returns true for expected rejections that are not failures
    pub fn is_business_rejection(&self) -> bool {
        matches!(
            self,
            OrderError::NotFound(_)
                | OrderError::AlreadyTaken(_)
                | OrderError::InvalidPagination(_)
        )
    }
}

/// Errors returned by a distance provider
#[derive(Debug, Error)]
pub enum DistanceError {
    #[error("Distance request failed: {0}")]
    Request(String),

    #[error("Distance request timed out after {0}ms")]
    Timeout(u64),

    #[error("Distance service returned HTTP {0}")]
    HttpStatus(u16),

    #[error("Distance service rejected the request: {0}")]
    Rejected(String),

    #[error("No route between origin and destination: {0}")]
    NoRoute(String),

    #[error("Malformed distance response: {0}")]
    MalformedResponse(String),
}
