//! Order DTOs
//!
//! Request bodies arrive as raw JSON so that unknown keys and element types
//! can be reported with the exact messages clients expect, rather than as a
//! generic deserialization failure.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;
use validator::{Validate, ValidationError, ValidationErrors};

use domain_orders::{Coordinates, CoordinatesError, Order, OrderStatus};

/// Keys accepted in a create request
const CREATE_FIELDS: [&str; 2] = ["origin", "destination"];

/// Body of `POST /orders`
#[derive(Debug, Deserialize, Validate)]
pub struct CreateOrderRequest {
    #[serde(default)]
    #[validate(custom(function = "validate_origin"))]
    pub origin: Value,
    #[serde(default)]
    #[validate(custom(function = "validate_destination"))]
    pub destination: Value,
}

impl CreateOrderRequest {
    /// Returns true when the body has keys other than origin and destination
    pub fn has_excess_fields(body: &Map<String, Value>) -> bool {
        body.keys().any(|key| !CREATE_FIELDS.contains(&key.as_str()))
    }

    /// Parses both coordinate pairs, collecting every failure
    ///
    /// Call after [`Validate::validate`] has passed, when both fields are
    /// arrays of two strings.
    pub fn coordinates(&self) -> Result<(Coordinates, Coordinates), Vec<CoordinatesError>> {
        let origin = Coordinates::parse("Origin", &string_items(&self.origin));
        let destination = Coordinates::parse("Destination", &string_items(&self.destination));

        match (origin, destination) {
            (Ok(origin), Ok(destination)) => Ok((origin, destination)),
            (origin, destination) => Err([origin.err(), destination.err()]
                .into_iter()
                .flatten()
                .collect()),
        }
    }
}

/// Flattens validation failures into messages, origin first
pub fn validation_messages(errors: &ValidationErrors) -> Vec<String> {
    let by_field = errors.field_errors();
    CREATE_FIELDS
        .iter()
        .filter_map(|field| by_field.get(*field))
        .flat_map(|errs| errs.iter())
        .map(|err| {
            err.message
                .as_ref()
                .map(|m| m.to_string())
                .unwrap_or_else(|| err.code.to_string())
        })
        .collect()
}

fn string_items(value: &Value) -> Vec<&str> {
    value
        .as_array()
        .map(|items| items.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default()
}

fn validate_origin(value: &Value) -> Result<(), ValidationError> {
    validate_pair(value, "Origin")
}

fn validate_destination(value: &Value) -> Result<(), ValidationError> {
    validate_pair(value, "Destination")
}

fn validate_pair(value: &Value, field: &str) -> Result<(), ValidationError> {
    let Some(items) = value.as_array() else {
        return Err(pair_error("array", format!("{field} must be an array")));
    };
    if items.len() != 2 {
        return Err(pair_error("length", format!("{field} must have 2 coordinates")));
    }
    if !items.iter().all(Value::is_string) {
        return Err(pair_error(
            "strings",
            format!("{field} coordinates must contain only strings"),
        ));
    }
    Ok(())
}

fn pair_error(code: &'static str, message: String) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(Cow::Owned(message));
    err
}

/// Body of `PATCH /orders/{id}`
///
/// Exactly one key, `status`, whose value must be `"TAKEN"`.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TakeOrderRequest {
    pub status: OrderStatus,
}

impl TakeOrderRequest {
    /// Reads a take request, returning `None` for any other body
    pub fn from_value(body: Value) -> Option<Self> {
        serde_json::from_value::<Self>(body)
            .ok()
            .filter(|request| request.status == OrderStatus::Taken)
    }
}

/// Result of a successful take
#[derive(Debug, Serialize, Deserialize)]
pub struct TakeOrderResponse {
    pub status: String,
}

impl TakeOrderResponse {
    pub fn success() -> Self {
        Self {
            status: "success".to_string(),
        }
    }
}

/// Order as returned to clients
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct OrderResponse {
    pub id: Uuid,
    pub distance: u32,
    pub status: OrderStatus,
}

impl From<&Order> for OrderResponse {
    fn from(order: &Order) -> Self {
        Self {
            id: *order.id().as_uuid(),
            distance: order.distance(),
            status: order.status(),
        }
    }
}

/// Query string of `GET /orders`
///
/// Values stay raw strings; integer parsing and range checks produce their
/// own messages.
#[derive(Debug, Default, Deserialize)]
pub struct ListOrdersQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
}
