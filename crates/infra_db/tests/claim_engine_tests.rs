//! PostgreSQL integration tests for the order repository and claim engine
//!
//! These start a database container and are ignored by default. Run with
//! `cargo test -p infra_db -- --ignored` on a machine with Docker.

use std::sync::Arc;
use std::time::Duration;

use core_kernel::{HealthCheckable, OrderId};
use domain_orders::{ClaimEngine, ClaimOutcome, OrderStatus, OrderStore, PageRequest};
use test_utils::{
    assert_oldest_first, assert_single_winner, create_isolated_test_database, OrderFixtures,
    TestOrderBuilder,
};

const LOCK_TIMEOUT: Duration = Duration::from_secs(5);

// ============================================================================
// Claim Engine Tests
// ============================================================================

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
#[ignore = "requires docker"]
async fn test_concurrent_claims_have_single_winner() {
    let db = create_isolated_test_database().await.unwrap();
    let repo = db.order_repository();
    let engine = Arc::new(db.claim_engine(LOCK_TIMEOUT));

    let order = repo.insert(&OrderFixtures::unassigned()).await.unwrap();

    let handles: Vec<_> = (0..10)
        .map(|_| {
            let engine = engine.clone();
            let id = order.id();
            tokio::spawn(async move { engine.claim(id).await })
        })
        .collect();

    let mut outcomes = Vec::new();
    for handle in handles {
        outcomes.push(handle.await.unwrap().unwrap());
    }
    assert_single_winner(&outcomes);

    let stored = repo.get_by_id(order.id()).await.unwrap();
    assert_eq!(stored.status(), OrderStatus::Taken);
    assert_eq!(stored.distance(), order.distance());
    assert_eq!(stored.created_at(), order.created_at());
}

#[tokio::test]
#[ignore = "requires docker"]
async fn test_claim_is_monotonic() {
    let db = create_isolated_test_database().await.unwrap();
    let repo = db.order_repository();
    let engine = db.claim_engine(LOCK_TIMEOUT);

    let order = repo.insert(&OrderFixtures::unassigned()).await.unwrap();

    assert_eq!(engine.claim(order.id()).await.unwrap(), ClaimOutcome::Success);
    assert_eq!(engine.claim(order.id()).await.unwrap(), ClaimOutcome::AlreadyTaken);
    assert_eq!(engine.claim(order.id()).await.unwrap(), ClaimOutcome::AlreadyTaken);
}

#[tokio::test]
#[ignore = "requires docker"]
async fn test_claim_unknown_order() {
    let db = create_isolated_test_database().await.unwrap();
    let repo = db.order_repository();
    let engine = db.claim_engine(LOCK_TIMEOUT);

    let order = repo.insert(&OrderFixtures::unassigned()).await.unwrap();

    assert_eq!(engine.claim(OrderId::new()).await.unwrap(), ClaimOutcome::NotFound);
    assert_eq!(repo.count().await.unwrap(), 1);
    assert_eq!(
        repo.get_by_id(order.id()).await.unwrap().status(),
        OrderStatus::Unassigned
    );
}

#[tokio::test]
#[ignore = "requires docker"]
async fn test_claim_waits_for_lock_then_times_out() {
    let db = create_isolated_test_database().await.unwrap();
    let repo = db.order_repository();
    let engine = db.claim_engine(Duration::from_millis(200));

    let order = repo.insert(&OrderFixtures::unassigned()).await.unwrap();

    // Hold the row lock from an outside transaction
    let mut blocker = db.pool().begin().await.unwrap();
    sqlx::query("SELECT 1 FROM delivery_orders WHERE order_id = $1 FOR UPDATE")
        .bind(*order.id().as_uuid())
        .execute(&mut *blocker)
        .await
        .unwrap();

    let err = engine.claim(order.id()).await.unwrap_err();
    assert!(err.is_transient());

    blocker.rollback().await.unwrap();
    assert_eq!(engine.claim(order.id()).await.unwrap(), ClaimOutcome::Success);
}

// ============================================================================
// Repository Tests
// ============================================================================

#[tokio::test]
#[ignore = "requires docker"]
async fn test_list_pages_by_creation_time() {
    let db = create_isolated_test_database().await.unwrap();
    let repo = db.order_repository();

    let orders = OrderFixtures::timeline(5);
    for order in orders.iter().rev() {
        repo.insert(order).await.unwrap();
    }

    let page = repo.list(PageRequest::new(2, 2).unwrap()).await.unwrap();
    let ids: Vec<_> = page.iter().map(|o| o.id()).collect();
    assert_eq!(ids, vec![orders[2].id(), orders[3].id()]);

    let all = repo.list(PageRequest::new(1, 10).unwrap()).await.unwrap();
    assert_eq!(all.len(), 5);
    assert_oldest_first(&all);

    let past_end = repo.list(PageRequest::new(4, 2).unwrap()).await.unwrap();
    assert!(past_end.is_empty());

    let saturated = repo.list(PageRequest::new(i64::MAX, i64::MAX).unwrap()).await.unwrap();
    assert!(saturated.is_empty());
}

#[tokio::test]
#[ignore = "requires docker"]
async fn test_equal_timestamps_keep_insertion_order() {
    let db = create_isolated_test_database().await.unwrap();
    let repo = db.order_repository();

    let at = OrderFixtures::epoch();
    let first = TestOrderBuilder::new().created_at(at).with_distance(1).build();
    let second = TestOrderBuilder::new().created_at(at).with_distance(2).build();
    let first = repo.insert(&first).await.unwrap();
    let second = repo.insert(&second).await.unwrap();

    let page = repo.list(PageRequest::new(1, 2).unwrap()).await.unwrap();
    assert_eq!(page, vec![first, second]);
}

#[tokio::test]
#[ignore = "requires docker"]
async fn test_duplicate_insert_is_conflict() {
    let db = create_isolated_test_database().await.unwrap();
    let repo = db.order_repository();

    let order = OrderFixtures::unassigned();
    repo.insert(&order).await.unwrap();
    let err = repo.insert(&order).await.unwrap_err();
    assert!(matches!(err, core_kernel::PortError::Conflict { .. }));
}

#[tokio::test]
#[ignore = "requires docker"]
async fn test_health_check_and_clear() {
    let db = create_isolated_test_database().await.unwrap();
    let repo = db.order_repository();

    assert!(repo.health_check().await.is_healthy());

    repo.insert(&OrderFixtures::taken()).await.unwrap();
    db.clear_data().await.unwrap();
    assert_eq!(repo.count().await.unwrap(), 0);
}
