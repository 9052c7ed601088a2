//! Order handlers

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    Json,
};
use serde_json::Value;
use tracing::debug;
use validator::Validate;

use crate::dto::orders::*;
use crate::error::{ApiError, EXCESS_FIELDS_MESSAGE, INVALID_TAKE_BODY_MESSAGE};
use crate::AppState;

/// Creates an order from an origin and a destination
pub async fn create_order(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<OrderResponse>), ApiError> {
    let Json(body) = body?;

    let Some(fields) = body.as_object() else {
        return Err(ApiError::BadRequest {
            message: "Request body must be a JSON object".to_string(),
            details: Vec::new(),
        });
    };
    if CreateOrderRequest::has_excess_fields(fields) {
        debug!(keys = ?fields.keys().collect::<Vec<_>>(), "Create request with excess fields");
        return Err(ApiError::NotAcceptable(EXCESS_FIELDS_MESSAGE.to_string()));
    }

    let request: CreateOrderRequest =
        serde_json::from_value(body).map_err(|e| ApiError::BadRequest {
            message: e.to_string(),
            details: Vec::new(),
        })?;
    request
        .validate()
        .map_err(|errors| ApiError::validation(validation_messages(&errors)))?;

    let (origin, destination) = request.coordinates().map_err(|errors| {
        ApiError::validation(errors.iter().map(ToString::to_string).collect())
    })?;

    let order = state.service.create_order(origin, destination).await?;
    Ok((StatusCode::CREATED, Json(OrderResponse::from(&order))))
}

/// Lists orders page by page, oldest first
pub async fn list_orders(
    State(state): State<AppState>,
    Query(query): Query<ListOrdersQuery>,
) -> Result<Json<Vec<OrderResponse>>, ApiError> {
    let orders = state
        .service
        .get_page(query.page.as_deref(), query.limit.as_deref())
        .await?;

    Ok(Json(orders.iter().map(OrderResponse::from).collect()))
}

/// Takes an order for a courier
pub async fn take_order(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<TakeOrderResponse>, ApiError> {
    let take = body.ok().and_then(|Json(body)| TakeOrderRequest::from_value(body));
    if take.is_none() {
        debug!(order_id = %id, "Rejected take request body");
        return Err(ApiError::NotAcceptable(INVALID_TAKE_BODY_MESSAGE.to_string()));
    }

    state.service.take_order(&id).await?;
    Ok(Json(TakeOrderResponse::success()))
}
