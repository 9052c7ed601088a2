//! Order Domain Ports
//!
//! This module defines the port interfaces the order domain needs from the
//! outside world, enabling swappable implementations (PostgreSQL, HTTP,
//! in-memory).
//!
//! # Architecture
//!
//! - **OrderStore**: durable order records, insert and ordered range scan
//! - **ClaimEngine**: the atomic `UNASSIGNED -> TAKEN` transition; the only
//!   component allowed to write an order's status
//! - **DistanceProvider**: road distance between two coordinate pairs
//!
//! # Usage
//!
//! ```rust,ignore
//! use domain_orders::{OrderService, ports::mock::InMemoryOrderStore};
//! use std::sync::Arc;
//!
//! let store = Arc::new(InMemoryOrderStore::new());
//! let service = OrderService::new(store.clone(), store, distance);
//! ```

use async_trait::async_trait;

use core_kernel::{DomainPort, HealthCheckable, OrderId, PortError};

use crate::coordinates::Coordinates;
use crate::error::DistanceError;
use crate::order::{ClaimOutcome, Order};
use crate::pagination::PageRequest;

/// Port for persisted orders
#[async_trait]
pub trait OrderStore: DomainPort + HealthCheckable {
    /// Persists a new order in a single atomic write
    async fn insert(&self, order: &Order) -> Result<Order, PortError>;

    /// Lists orders by creation time, oldest first
    ///
    /// Ties on creation time keep insertion order. A page past the end is
    /// empty, not an error. Rows are not locked.
    async fn list(&self, page: PageRequest) -> Result<Vec<Order>, PortError>;
}

/// Port for the claim transition
#[async_trait]
pub trait ClaimEngine: DomainPort {
    /// Atomically claims an order
    ///
    /// Concurrent calls for the same id are totally ordered; exactly one of
    /// them can return `Success`. Errors mean the final state is unknown.
    async fn claim(&self, order_id: OrderId) -> Result<ClaimOutcome, PortError>;
}

/// Port for road distance lookups
#[async_trait]
pub trait DistanceProvider: DomainPort {
    /// Returns the road distance in metres
    async fn distance(
        &self,
        origin: Coordinates,
        destination: Coordinates,
    ) -> Result<u32, DistanceError>;
}

/// In-memory implementations of the order ports for testing
///
/// The store keeps one async mutex per order so that claims on the same id
/// serialize the way row locks do, while claims on different ids never wait
/// on each other. Reads go through a separate snapshot lock that is only
/// held for the instant of a copy, so listings never queue behind a claim.
#[cfg(any(test, feature = "mock"))]
pub mod mock {
    use super::*;
    use chrono::Utc;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tokio::sync::{Mutex, RwLock};

    use core_kernel::{AdapterHealth, HealthCheckResult};

    #[derive(Debug)]
    pub(super) struct Row {
        pub(super) claim: Mutex<()>,
        current: RwLock<Order>,
    }

    impl Row {
        fn new(order: Order) -> Arc<Self> {
            Arc::new(Self {
                claim: Mutex::new(()),
                current: RwLock::new(order),
            })
        }

        async fn snapshot(&self) -> Order {
            self.current.read().await.clone()
        }
    }

    #[derive(Debug, Default)]
    struct Rows {
        insertion_order: Vec<OrderId>,
        by_id: HashMap<OrderId, Arc<Row>>,
    }

    /// In-memory implementation of OrderStore and ClaimEngine
    #[derive(Debug, Default)]
    pub struct InMemoryOrderStore {
        rows: RwLock<Rows>,
    }

    impl InMemoryOrderStore {
        /// Creates an empty store
        pub fn new() -> Self {
            Self::default()
        }

        /// Pre-populates with orders for testing, in the given insertion order
        pub async fn with_orders(orders: Vec<Order>) -> Self {
            let store = Self::new();
            for order in orders {
                store.put(order).await;
            }
            store
        }

        async fn put(&self, order: Order) {
            let mut rows = self.rows.write().await;
            rows.insertion_order.push(order.id());
            rows.by_id.insert(order.id(), Row::new(order));
        }

        pub(super) async fn row(&self, order_id: OrderId) -> Option<Arc<Row>> {
            self.rows.read().await.by_id.get(&order_id).cloned()
        }

        /// Returns the current state of an order
        pub async fn get(&self, order_id: OrderId) -> Option<Order> {
            let row = self.row(order_id).await?;
            Some(row.snapshot().await)
        }

        /// Number of stored orders
        pub async fn len(&self) -> usize {
            self.rows.read().await.insertion_order.len()
        }

        pub async fn is_empty(&self) -> bool {
            self.len().await == 0
        }
    }

    impl DomainPort for InMemoryOrderStore {}

    #[async_trait]
    impl HealthCheckable for InMemoryOrderStore {
        async fn health_check(&self) -> HealthCheckResult {
            HealthCheckResult {
                adapter_id: "in-memory-order-store".to_string(),
                status: AdapterHealth::Healthy,
                latency_ms: 0,
                message: Some("In-memory store always healthy".to_string()),
                checked_at: Utc::now(),
            }
        }
    }

    #[async_trait]
    impl OrderStore for InMemoryOrderStore {
        async fn insert(&self, order: &Order) -> Result<Order, PortError> {
            let mut rows = self.rows.write().await;
            if rows.by_id.contains_key(&order.id()) {
                return Err(PortError::Conflict {
                    message: format!("Order {} already exists", order.id()),
                });
            }
            rows.insertion_order.push(order.id());
            rows.by_id.insert(order.id(), Row::new(order.clone()));
            Ok(order.clone())
        }

        async fn list(&self, page: PageRequest) -> Result<Vec<Order>, PortError> {
            let handles: Vec<Arc<Row>> = {
                let rows = self.rows.read().await;
                rows.insertion_order
                    .iter()
                    .filter_map(|id| rows.by_id.get(id).cloned())
                    .collect()
            };

            let mut orders = Vec::with_capacity(handles.len());
            for handle in handles {
                orders.push(handle.snapshot().await);
            }

            // Stable sort keeps insertion order among equal timestamps
            orders.sort_by_key(|order| order.created_at());

            let offset = usize::try_from(page.offset()).unwrap_or(usize::MAX);
            Ok(orders
                .into_iter()
                .skip(offset)
                .take(usize::try_from(page.limit()).unwrap_or(usize::MAX))
                .collect())
        }
    }

    #[async_trait]
    impl ClaimEngine for InMemoryOrderStore {
        async fn claim(&self, order_id: OrderId) -> Result<ClaimOutcome, PortError> {
            let Some(row) = self.row(order_id).await else {
                return Ok(ClaimOutcome::NotFound);
            };

            let _claim = row.claim.lock().await;
            // Yield while holding the row so contenders queue on the lock
            tokio::task::yield_now().await;
            let outcome = row.current.write().await.take();
            Ok(outcome)
        }
    }

    /// Distance provider returning a fixed distance and counting calls
    #[derive(Debug, Default)]
    pub struct FixedDistanceProvider {
        distance: u32,
        calls: AtomicUsize,
    }

    impl FixedDistanceProvider {
        pub fn new(distance: u32) -> Self {
            Self {
                distance,
                calls: AtomicUsize::new(0),
            }
        }

        /// Number of lookups performed
        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl DomainPort for FixedDistanceProvider {}

    #[async_trait]
    impl DistanceProvider for FixedDistanceProvider {
        async fn distance(
            &self,
            _origin: Coordinates,
            _destination: Coordinates,
        ) -> Result<u32, DistanceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.distance)
        }
    }

    /// Distance provider that always fails
    #[derive(Debug, Default)]
    pub struct FailingDistanceProvider;

    impl DomainPort for FailingDistanceProvider {}

    #[async_trait]
    impl DistanceProvider for FailingDistanceProvider {
        async fn distance(
            &self,
            _origin: Coordinates,
            _destination: Coordinates,
        ) -> Result<u32, DistanceError> {
            Err(DistanceError::Request("distance service unreachable".to_string()))
        }
    }
}
