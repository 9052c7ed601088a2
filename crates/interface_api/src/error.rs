//! API error handling

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

use domain_orders::OrderError;

/// Body rejection for `POST /orders` with unknown keys
pub const EXCESS_FIELDS_MESSAGE: &str = "Request body has excess fields";

/// Body rejection for `PATCH /orders/{id}`
pub const INVALID_TAKE_BODY_MESSAGE: &str =
    "Request body is either missing status field/ status field is not set as TAKEN/ excess fields";

/// API error types
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Bad request: {message}")]
    BadRequest {
        message: String,
        details: Vec<String>,
    },

    /// Well-formed request the current state or body shape cannot satisfy
    #[error("Not acceptable: {0}")]
    NotAcceptable(String),

    /// Page or limit outside what the listing accepts
    #[error("Range not satisfiable: {0}")]
    RangeNotSatisfiable(String),

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl ApiError {
    /// Creates a bad request carrying one message per invalid field
    pub fn validation(details: Vec<String>) -> Self {
        ApiError::BadRequest {
            message: "Request body failed validation".to_string(),
            details,
        }
    }
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<String>>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type, message, details) = match self {
            ApiError::BadRequest { message, details } => (
                StatusCode::BAD_REQUEST,
                "bad_request",
                message,
                (!details.is_empty()).then_some(details),
            ),
            ApiError::NotAcceptable(msg) => {
                (StatusCode::NOT_ACCEPTABLE, "not_acceptable", msg, None)
            }
            ApiError::RangeNotSatisfiable(msg) => (
                StatusCode::RANGE_NOT_SATISFIABLE,
                "invalid_pagination",
                msg,
                None,
            ),
            ApiError::ServiceUnavailable(msg) => {
                (StatusCode::SERVICE_UNAVAILABLE, "service_unavailable", msg, None)
            }
            ApiError::Internal(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", msg, None)
            }
        };

        let body = ErrorResponse {
            error: error_type.to_string(),
            message,
            details,
        };

        (status, Json(body)).into_response()
    }
}

impl From<OrderError> for ApiError {
    fn from(err: OrderError) -> Self {
        match err {
            OrderError::NotFound(_) | OrderError::AlreadyTaken(_) => {
                ApiError::NotAcceptable(err.to_string())
            }
            OrderError::InvalidPagination(e) => ApiError::RangeNotSatisfiable(e.to_string()),
            OrderError::DistanceUnavailable(_) => ApiError::ServiceUnavailable(err.to_string()),
            OrderError::Storage(e) => {
                error!(error = %e, transient = e.is_transient(), "Storage failure");
                ApiError::Internal("Failed to process order request".to_string())
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest {
            message: rejection.body_text(),
            details: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_kernel::PortError;
    use domain_orders::PaginationError;

    #[test]
    fn test_order_error_status_codes() {
        let cases = [
            (OrderError::NotFound("x".into()), StatusCode::NOT_ACCEPTABLE),
            (OrderError::AlreadyTaken("x".into()), StatusCode::NOT_ACCEPTABLE),
            (
                OrderError::InvalidPagination(PaginationError::PageOutOfRange),
                StatusCode::RANGE_NOT_SATISFIABLE,
            ),
            (
                OrderError::Storage(PortError::connection("down")),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, status) in cases {
            assert_eq!(ApiError::from(err).into_response().status(), status);
        }
    }

    #[test]
    fn test_storage_detail_not_exposed() {
        let err = ApiError::from(OrderError::Storage(PortError::connection("password=secret")));
        assert!(!err.to_string().contains("secret"));
    }
}
