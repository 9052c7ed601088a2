//! Order domain services
//!
//! The [`OrderService`] orchestrates the order use cases. It validates input,
//! calls the distance provider, and delegates persistence and claiming to the
//! injected ports. It never writes an order's status itself.

use std::sync::Arc;

use tracing::{debug, error, info, warn};

use core_kernel::{HealthCheckResult, OrderId};

use crate::coordinates::Coordinates;
use crate::error::OrderError;
use crate::order::{ClaimOutcome, Order};
use crate::pagination::PageRequest;
use crate::ports::{ClaimEngine, DistanceProvider, OrderStore};

/// Service for creating, listing and claiming delivery orders
///
/// Collaborators are injected at construction, so the same service runs
/// against PostgreSQL in production and in-memory adapters in tests.
#[derive(Clone)]
pub struct OrderService {
    store: Arc<dyn OrderStore>,
    claims: Arc<dyn ClaimEngine>,
    distance: Arc<dyn DistanceProvider>,
}

impl OrderService {
    /// Creates a new order service
    ///
    /// # Arguments
    ///
    /// * `store` - Order persistence
    /// * `claims` - Claim engine owning the status transition
    /// * `distance` - Road distance lookup
    pub fn new(
        store: Arc<dyn OrderStore>,
        claims: Arc<dyn ClaimEngine>,
        distance: Arc<dyn DistanceProvider>,
    ) -> Self {
        Self {
            store,
            claims,
            distance,
        }
    }

    /// Creates an order after measuring its distance
    ///
    /// The distance provider is called exactly once. If it fails, no order is
    /// written.
    ///
    /// # Errors
    ///
    /// * `OrderError::DistanceUnavailable` - the lookup failed
    /// * `OrderError::Storage` - the insert failed
    pub async fn create_order(
        &self,
        origin: Coordinates,
        destination: Coordinates,
    ) -> Result<Order, OrderError> {
        let distance = match self.distance.distance(origin, destination).await {
            Ok(distance) => distance,
            Err(e) => {
                warn!(%origin, %destination, error = %e, "Distance lookup failed");
                return Err(OrderError::DistanceUnavailable(e));
            }
        };

        let order = Order::new(distance);
        let saved = self.store.insert(&order).await.map_err(|e| {
            error!(order_id = %order.id(), error = %e, "Failed to save order");
            OrderError::Storage(e)
        })?;

        info!(order_id = %saved.id(), distance = saved.distance(), "Order created");
        Ok(saved)
    }

    /// Validates raw pagination input and returns the requested page
    ///
    /// Validation happens before the store is touched.
    pub async fn get_page(
        &self,
        raw_page: Option<&str>,
        raw_limit: Option<&str>,
    ) -> Result<Vec<Order>, OrderError> {
        let page = PageRequest::parse(raw_page, raw_limit).map_err(|e| {
            debug!(?raw_page, ?raw_limit, error = %e, "Rejected pagination input");
            OrderError::InvalidPagination(e)
        })?;
        self.list_orders(page).await
    }

    /// Returns one page of orders, oldest first
    pub async fn list_orders(&self, page: PageRequest) -> Result<Vec<Order>, OrderError> {
        self.store.list(page).await.map_err(|e| {
            error!(page = page.page(), limit = page.limit(), error = %e, "Failed to list orders");
            OrderError::Storage(e)
        })
    }

    /// Claims an order for a courier
    ///
    /// An identifier that does not parse cannot exist, so it is reported as
    /// not found without reaching the claim engine. Retrying after an error is
    /// safe: a claim that did commit is then reported as already taken.
    ///
    /// # Errors
    ///
    /// * `OrderError::NotFound` - no such order
    /// * `OrderError::AlreadyTaken` - another courier claimed it first
    /// * `OrderError::Storage` - infrastructure failure, outcome unknown
    pub async fn take_order(&self, raw_id: &str) -> Result<(), OrderError> {
        let Ok(order_id) = raw_id.parse::<OrderId>() else {
            debug!(raw_id, "Claim for malformed order id");
            return Err(OrderError::NotFound(raw_id.to_string()));
        };

        let outcome = self.claims.claim(order_id).await.map_err(|e| {
            error!(%order_id, error = %e, transient = e.is_transient(), "Claim failed");
            OrderError::Storage(e)
        })?;

        match outcome {
            ClaimOutcome::Success => {
                info!(%order_id, "Order taken");
                Ok(())
            }
            ClaimOutcome::AlreadyTaken => {
                debug!(%order_id, "Order already taken");
                Err(OrderError::AlreadyTaken(raw_id.to_string()))
            }
            ClaimOutcome::NotFound => {
                debug!(%order_id, "Order not found");
                Err(OrderError::NotFound(raw_id.to_string()))
            }
        }
    }

    /// Reports the health of the order store
    pub async fn health_check(&self) -> HealthCheckResult {
        self.store.health_check().await
    }
}
