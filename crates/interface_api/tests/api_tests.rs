//! HTTP tests for the order API against in-memory adapters

use std::sync::Arc;

use axum::http::StatusCode;
use axum_test::TestServer;
use serde_json::{json, Value};

use domain_orders::ports::mock::{
    FailingDistanceProvider, FixedDistanceProvider, InMemoryOrderStore,
};
use domain_orders::{DistanceProvider, OrderService, OrderStatus, OrderStore, PageRequest};
use interface_api::create_router;
use interface_api::dto::orders::OrderResponse;
use test_utils::{CoordinateFixtures, OrderFixtures};

fn server_with(store: Arc<InMemoryOrderStore>, distance: Arc<dyn DistanceProvider>) -> TestServer {
    let service = OrderService::new(store.clone(), store, distance);
    TestServer::new(create_router(service)).unwrap()
}

fn server() -> (TestServer, Arc<InMemoryOrderStore>) {
    let store = Arc::new(InMemoryOrderStore::new());
    let server = server_with(
        store.clone(),
        Arc::new(FixedDistanceProvider::new(OrderFixtures::DISTANCE)),
    );
    (server, store)
}

fn create_body() -> Value {
    json!({
        "origin": CoordinateFixtures::origin_raw(),
        "destination": CoordinateFixtures::destination_raw(),
    })
}

fn message(body: &Value) -> &str {
    body["message"].as_str().unwrap_or_default()
}

// ============================================================================
// POST /orders
// ============================================================================

mod create_order_tests {
    use super::*;

    #[tokio::test]
    async fn test_create_order() {
        let (server, store) = server();

        let response = server.post("/orders").json(&create_body()).await;
        response.assert_status(StatusCode::CREATED);

        let order: OrderResponse = response.json();
        assert_eq!(order.distance, OrderFixtures::DISTANCE);
        assert_eq!(order.status, OrderStatus::Unassigned);
        assert_eq!(store.len().await, 1);

        let raw: Value = response.json();
        assert_eq!(raw["status"], "UNASSIGNED");
    }

    #[tokio::test]
    async fn test_excess_fields_rejected() {
        let (server, store) = server();

        let mut body = create_body();
        body["courier"] = json!("bob");
        let response = server.post("/orders").json(&body).await;

        response.assert_status(StatusCode::NOT_ACCEPTABLE);
        assert_eq!(message(&response.json()), "Request body has excess fields");
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_shape_errors_report_both_fields() {
        let (server, _) = server();

        let response = server
            .post("/orders")
            .json(&json!({ "origin": ["1.3"], "destination": [1.28, 103.85] }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert_eq!(
            body["details"],
            json!([
                "Origin must have 2 coordinates",
                "Destination coordinates must contain only strings"
            ])
        );
    }

    #[tokio::test]
    async fn test_out_of_range_coordinates() {
        let (server, store) = server();

        let response = server
            .post("/orders")
            .json(&json!({ "origin": ["95", "103.7"], "destination": ["1.28", "103.85"] }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert_eq!(body["details"], json!(["Origin latitude must be between -90 and 90"]));
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_malformed_json() {
        let (server, _) = server();

        let response = server
            .post("/orders")
            .content_type("application/json")
            .bytes("{\"origin\":".into())
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_distance_failure_creates_nothing() {
        let store = Arc::new(InMemoryOrderStore::new());
        let server = server_with(store.clone(), Arc::new(FailingDistanceProvider));

        let response = server.post("/orders").json(&create_body()).await;

        response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(message(&response.json()), "Failed to retrieve distance");
        assert!(store.is_empty().await);
    }
}

// ============================================================================
// GET /orders
// ============================================================================

mod list_orders_tests {
    use super::*;

    async fn seeded() -> (TestServer, Vec<domain_orders::Order>) {
        let orders = OrderFixtures::timeline(5);
        let store = Arc::new(InMemoryOrderStore::with_orders(orders.clone()).await);
        let server = server_with(store, Arc::new(FixedDistanceProvider::new(1)));
        (server, orders)
    }

    #[tokio::test]
    async fn test_second_page() {
        let (server, orders) = seeded().await;

        let response = server
            .get("/orders")
            .add_query_param("page", "2")
            .add_query_param("limit", "2")
            .await;

        response.assert_status_ok();
        let page: Vec<OrderResponse> = response.json();
        let expected: Vec<OrderResponse> = orders[2..4].iter().map(OrderResponse::from).collect();
        assert_eq!(page, expected);
    }

    #[tokio::test]
    async fn test_page_past_end_is_empty() {
        let (server, _) = seeded().await;

        let response = server
            .get("/orders")
            .add_query_param("page", "10")
            .add_query_param("limit", "2")
            .await;

        response.assert_status_ok();
        response.assert_json(&json!([]));
    }

    #[tokio::test]
    async fn test_oversized_page_is_empty() {
        let (server, _) = seeded().await;

        let response = server
            .get("/orders")
            .add_query_param("page", "5000000000")
            .add_query_param("limit", "10")
            .await;

        response.assert_status_ok();
        response.assert_json(&json!([]));
    }

    #[tokio::test]
    async fn test_empty_page_is_invalid_integer() {
        let (server, _) = seeded().await;

        let response = server
            .get("/orders")
            .add_query_param("page", "")
            .add_query_param("limit", "10")
            .await;

        response.assert_status(StatusCode::RANGE_NOT_SATISFIABLE);
        assert_eq!(message(&response.json()), "Invalid integer input: Page");
    }

    #[tokio::test]
    async fn test_pagination_messages() {
        let (server, _) = seeded().await;

        let cases = [
            ("0", "2", "Page number must start with 1"),
            ("1", "0", "Limit must start with 1"),
            ("0", "-1", "Page number and limit must start with 1"),
            ("1.2", "2", "Invalid integer input: Page"),
            ("1", "abc", "Invalid integer input: Limit"),
            ("x", "y", "Invalid integer input: Page and limit"),
        ];

        for (page, limit, expected) in cases {
            let response = server
                .get("/orders")
                .add_query_param("page", page)
                .add_query_param("limit", limit)
                .await;

            response.assert_status(StatusCode::RANGE_NOT_SATISFIABLE);
            assert_eq!(message(&response.json()), expected, "page={page} limit={limit}");
        }
    }

    #[tokio::test]
    async fn test_missing_query_is_invalid_integer() {
        let (server, _) = seeded().await;

        let response = server.get("/orders").add_query_param("page", "1").await;

        response.assert_status(StatusCode::RANGE_NOT_SATISFIABLE);
        assert_eq!(message(&response.json()), "Invalid integer input: Limit");
    }
}

// ============================================================================
// PATCH /orders/{id}
// ============================================================================

mod take_order_tests {
    use super::*;

    async fn created(server: &TestServer) -> String {
        let order: OrderResponse = server.post("/orders").json(&create_body()).await.json();
        order.id.to_string()
    }

    #[tokio::test]
    async fn test_take_then_taken() {
        let (server, _) = server();
        let id = created(&server).await;

        let response = server
            .patch(&format!("/orders/{id}"))
            .json(&json!({ "status": "TAKEN" }))
            .await;
        response.assert_status_ok();
        response.assert_json(&json!({ "status": "success" }));

        let response = server
            .patch(&format!("/orders/{id}"))
            .json(&json!({ "status": "TAKEN" }))
            .await;
        response.assert_status(StatusCode::NOT_ACCEPTABLE);
        assert_eq!(
            message(&response.json()),
            format!("Delivery has been taken for order {id}")
        );
    }

    #[tokio::test]
    async fn test_take_unknown_and_malformed_ids() {
        let (server, _) = server();

        for id in ["123456", "0191d7a2-0000-7000-8000-000000000000"] {
            let response = server
                .patch(&format!("/orders/{id}"))
                .json(&json!({ "status": "TAKEN" }))
                .await;
            response.assert_status(StatusCode::NOT_ACCEPTABLE);
            assert_eq!(
                message(&response.json()),
                format!("Delivery order Id {id} does not exist")
            );
        }
    }

    #[tokio::test]
    async fn test_invalid_bodies_rejected_before_claiming() {
        let (server, store) = server();
        let id = created(&server).await;

        let bodies = [
            json!({}),
            json!({ "status": "taken" }),
            json!({ "status": "UNASSIGNED" }),
            json!({ "status": "TAKEN", "courier": "bob" }),
            json!({ "status": 1 }),
        ];

        for body in bodies {
            let response = server.patch(&format!("/orders/{id}")).json(&body).await;
            response.assert_status(StatusCode::NOT_ACCEPTABLE);
            assert_eq!(
                message(&response.json()),
                "Request body is either missing status field/ status field is not set as TAKEN/ excess fields"
            );
        }

        let page = store.list(PageRequest::new(1, 1).unwrap()).await.unwrap();
        assert_eq!(page[0].status(), OrderStatus::Unassigned);
    }
}

// ============================================================================
// Health
// ============================================================================

#[tokio::test]
async fn test_health_endpoints() {
    let (server, _) = server();

    server.get("/health").await.assert_status_ok();

    let response = server.get("/health/ready").await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["status"], "ready");
}

#[tokio::test]
async fn test_request_id_is_returned() {
    let (server, _) = server();

    let response = server.get("/health").await;
    assert!(response.headers().contains_key("x-request-id"));
}
