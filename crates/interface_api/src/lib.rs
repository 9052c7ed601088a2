//! HTTP API Layer
//!
//! This crate provides the REST API for delivery orders using Axum.
//!
//! # Architecture
//!
//! - **Handlers**: Request handlers for orders and health
//! - **Middleware**: Request ids, tracing and request logging
//! - **DTOs**: Request/Response data transfer objects
//! - **Error Handling**: Consistent error responses
//!
//! Handlers only translate HTTP to calls on [`OrderService`]; which store,
//! claim engine and distance provider sit behind it is decided by the caller
//! of [`create_router`].
//!
//! # Example
//!
//! ```rust,ignore
//! use interface_api::create_router;
//!
//! let app = create_router(service);
//! axum::serve(listener, app).await?;
//! ```

pub mod config;
pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;

use axum::{
    middleware as axum_middleware,
    routing::{get, patch},
    Router,
};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use domain_orders::OrderService;

use crate::handlers::{health, orders};
use crate::middleware::request_log_middleware;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub service: OrderService,
}

/// Creates the main API router
///
/// # Arguments
///
/// * `service` - Order service wired to its adapters
///
/// # Returns
///
/// Configured Axum router with all routes and middleware
pub fn create_router(service: OrderService) -> Router {
    let state = AppState { service };

    let public_routes = Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check));

    let order_routes = Router::new()
        .route("/", get(orders::list_orders).post(orders::create_order))
        .route("/:id", patch(orders::take_order))
        .layer(axum_middleware::from_fn(request_log_middleware));

    Router::new()
        .merge(public_routes)
        .nest("/orders", order_routes)
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(TraceLayer::new_for_http())
                .layer(PropagateRequestIdLayer::x_request_id())
                .layer(
                    CorsLayer::new()
                        .allow_origin(Any)
                        .allow_methods(Any)
                        .allow_headers(Any),
                ),
        )
        .with_state(state)
}
