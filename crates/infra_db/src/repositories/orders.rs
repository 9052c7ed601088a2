//! Order repository implementation
//!
//! Database access for delivery orders: single-row inserts and ordered,
//! lock-free page scans. Status changes belong to
//! [`PgClaimEngine`](crate::PgClaimEngine).

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::time::Instant;
use tracing::error;
use uuid::Uuid;

use core_kernel::{
    AdapterHealth, DomainPort, HealthCheckResult, HealthCheckable, OrderId, PortError,
};
use domain_orders::{Order, OrderStatus, OrderStore, PageRequest};

use crate::error::DatabaseError;

/// Columns selected for every order query
pub(crate) const ORDER_COLUMNS: &str = "order_id, status, distance, created_at";

/// Repository for managing delivery orders
#[derive(Debug, Clone)]
pub struct OrderRepository {
    pool: PgPool,
}

impl OrderRepository {
    /// Creates a new OrderRepository with the given connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Inserts a new order
    ///
    /// # Returns
    ///
    /// The order as stored
    pub async fn create(&self, order: &Order) -> Result<Order, DatabaseError> {
        let row = sqlx::query_as::<_, OrderRow>(&format!(
            r#"
            INSERT INTO delivery_orders (order_id, status, distance, created_at)
            VALUES ($1, $2, $3, $4)
            RETURNING {ORDER_COLUMNS}
            "#
        ))
        .bind(*order.id().as_uuid())
        .bind(DbOrderStatus::from(order.status()))
        .bind(i64::from(order.distance()))
        .bind(order.created_at())
        .fetch_one(&self.pool)
        .await?;

        Order::try_from(row)
    }

    /// Retrieves an order by its identifier
    pub async fn get_by_id(&self, order_id: OrderId) -> Result<Order, DatabaseError> {
        let row = sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {ORDER_COLUMNS} FROM delivery_orders WHERE order_id = $1"
        ))
        .bind(*order_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DatabaseError::not_found("Order", order_id))?;

        Order::try_from(row)
    }

    /// Retrieves one page of orders, oldest first
    ///
    /// Ties on `created_at` are broken by insertion sequence.
    pub async fn find_page(&self, page: PageRequest) -> Result<Vec<Order>, DatabaseError> {
        let offset = i64::try_from(page.offset()).unwrap_or(i64::MAX);

        let rows = sqlx::query_as::<_, OrderRow>(&format!(
            r#"
            SELECT {ORDER_COLUMNS}
            FROM delivery_orders
            ORDER BY created_at ASC, seq ASC
            LIMIT $1 OFFSET $2
            "#
        ))
        .bind(i64::try_from(page.limit()).unwrap_or(i64::MAX))
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Order::try_from).collect()
    }

    /// Counts all orders
    pub async fn count(&self) -> Result<i64, DatabaseError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM delivery_orders")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

impl DomainPort for OrderRepository {}

#[async_trait]
impl HealthCheckable for OrderRepository {
    async fn health_check(&self) -> HealthCheckResult {
        let started = Instant::now();
        let result = sqlx::query("SELECT 1").execute(&self.pool).await;
        let latency_ms = started.elapsed().as_millis() as u64;

        let (status, message) = match result {
            Ok(_) => (AdapterHealth::Healthy, None),
            Err(e) => (AdapterHealth::Unhealthy, Some(e.to_string())),
        };

        HealthCheckResult {
            adapter_id: "postgres-order-store".to_string(),
            status,
            latency_ms,
            message,
            checked_at: Utc::now(),
        }
    }
}

#[async_trait]
impl OrderStore for OrderRepository {
    async fn insert(&self, order: &Order) -> Result<Order, PortError> {
        self.create(order).await.map_err(|e| {
            error!(order_id = %order.id(), error = %e, "Order insert failed");
            PortError::from(e)
        })
    }

    async fn list(&self, page: PageRequest) -> Result<Vec<Order>, PortError> {
        self.find_page(page).await.map_err(PortError::from)
    }
}

/// Order status enumeration as stored in PostgreSQL
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "order_status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DbOrderStatus {
    Unassigned,
    Taken,
}

impl From<OrderStatus> for DbOrderStatus {
    fn from(status: OrderStatus) -> Self {
        match status {
            OrderStatus::Unassigned => DbOrderStatus::Unassigned,
            OrderStatus::Taken => DbOrderStatus::Taken,
        }
    }
}

impl From<DbOrderStatus> for OrderStatus {
    fn from(status: DbOrderStatus) -> Self {
        match status {
            DbOrderStatus::Unassigned => OrderStatus::Unassigned,
            DbOrderStatus::Taken => OrderStatus::Taken,
        }
    }
}

/// Database row for an order
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct OrderRow {
    pub order_id: Uuid,
    pub status: DbOrderStatus,
    pub distance: i64,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<OrderRow> for Order {
    type Error = DatabaseError;

    fn try_from(row: OrderRow) -> Result<Self, Self::Error> {
        let distance = u32::try_from(row.distance).map_err(|_| {
            DatabaseError::SerializationError(format!(
                "distance {} of order {} is out of range",
                row.distance, row.order_id
            ))
        })?;

        Ok(Order::restore(
            OrderId::from_uuid(row.order_id),
            row.status.into(),
            distance,
            row.created_at,
        ))
    }
}
