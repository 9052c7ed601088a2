//! PostgreSQL claim engine
//!
//! Implements the `UNASSIGNED -> TAKEN` transition with a pessimistic row
//! lock. The status check and the update happen inside one transaction that
//! holds `FOR UPDATE` on the order row, so a competing claim blocks until the
//! first one commits or rolls back and then observes its result.

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};
use std::time::Duration;
use tracing::{debug, instrument, warn};

use core_kernel::{DomainPort, OrderId, PortError};
use domain_orders::{ClaimEngine, ClaimOutcome, Order};

use crate::error::DatabaseError;
use crate::repositories::orders::{DbOrderStatus, OrderRow, ORDER_COLUMNS};

/// Claim engine backed by PostgreSQL row locks
#[derive(Debug, Clone)]
pub struct PgClaimEngine {
    pool: PgPool,
    lock_timeout: Duration,
}

impl PgClaimEngine {
    /// Creates a claim engine
    ///
    /// `lock_timeout` bounds how long a claim waits behind another
    /// transaction holding the same row.
    pub fn new(pool: PgPool, lock_timeout: Duration) -> Self {
        Self { pool, lock_timeout }
    }

    /// Returns the configured row lock wait limit
    pub fn lock_timeout(&self) -> Duration {
        self.lock_timeout
    }

    fn lock_timeout_ms(&self) -> u64 {
        u64::try_from(self.lock_timeout.as_millis()).unwrap_or(u64::MAX)
    }

    /// Runs one claim transaction
    ///
    /// The transaction is committed only when the status changed. Every other
    /// path rolls back, explicitly or when `tx` is dropped on error.
    async fn claim_in_transaction(
        &self,
        order_id: OrderId,
    ) -> Result<ClaimOutcome, DatabaseError> {
        let mut tx = self.pool.begin().await?;

        // Scoped to this transaction only
        sqlx::query("SELECT set_config('lock_timeout', $1, true)")
            .bind(format!("{}ms", self.lock_timeout_ms()))
            .execute(&mut *tx)
            .await?;

        let row = sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {ORDER_COLUMNS} FROM delivery_orders WHERE order_id = $1 FOR UPDATE"
        ))
        .bind(*order_id.as_uuid())
        .fetch_optional(&mut *tx)
        .await?;

        let Some(row) = row else {
            finish_rejected(tx, order_id).await;
            return Ok(ClaimOutcome::NotFound);
        };

        let mut order = Order::try_from(row)?;
        let outcome = order.take();
        if outcome != ClaimOutcome::Success {
            finish_rejected(tx, order_id).await;
            return Ok(outcome);
        }

        let updated = sqlx::query("UPDATE delivery_orders SET status = $1 WHERE order_id = $2")
            .bind(DbOrderStatus::from(order.status()))
            .bind(*order_id.as_uuid())
            .execute(&mut *tx)
            .await?
            .rows_affected();

        if updated != 1 {
            return Err(DatabaseError::TransactionFailed(format!(
                "expected to update one row for order {}, updated {}",
                order_id, updated
            )));
        }

        tx.commit().await?;

        Ok(ClaimOutcome::Success)
    }
}

/// Ends a transaction that changed nothing
///
/// The outcome is already decided, so a failed rollback is only logged. The
/// server discards the transaction when the connection is reset.
async fn finish_rejected(tx: Transaction<'_, Postgres>, order_id: OrderId) {
    if let Err(e) = tx.rollback().await {
        warn!(%order_id, error = %e, "Rollback after rejected claim failed");
    }
}

impl DomainPort for PgClaimEngine {}

#[async_trait]
impl ClaimEngine for PgClaimEngine {
    #[instrument(skip_all, fields(order_id = %order_id))]
    async fn claim(&self, order_id: OrderId) -> Result<ClaimOutcome, PortError> {
        match self.claim_in_transaction(order_id).await {
            Ok(outcome) => {
                debug!(?outcome, "Claim finished");
                Ok(outcome)
            }
            Err(DatabaseError::LockTimeout(message)) => {
                warn!(error = %message, "Timed out waiting for order lock");
                Err(PortError::Timeout {
                    operation: format!("claim order {}", order_id),
                    duration_ms: self.lock_timeout_ms(),
                })
            }
            Err(e) => Err(PortError::from(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::postgres::PgPoolOptions;

    #[tokio::test]
    async fn test_lock_timeout_formatting() {
        let pool = PgPoolOptions::new()
            .connect_lazy("postgres://localhost/unused")
            .unwrap();

        let engine = PgClaimEngine::new(pool, Duration::from_millis(1500));
        assert_eq!(engine.lock_timeout(), Duration::from_millis(1500));
        assert_eq!(engine.lock_timeout_ms(), 1500);
    }

    #[tokio::test]
    async fn test_unreachable_database_is_transient() {
        let pool = PgPoolOptions::new()
            .acquire_timeout(Duration::from_millis(200))
            .connect_lazy("postgres://postgres@127.0.0.1:1/unused")
            .unwrap();

        let engine = PgClaimEngine::new(pool, Duration::from_millis(100));
        let err = engine.claim(OrderId::new()).await.unwrap_err();
        assert!(err.is_transient(), "unexpected error: {err}");
    }
}
