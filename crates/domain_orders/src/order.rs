//! Order aggregate

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use core_kernel::{CoreError, OrderId};

/// Order status
///
/// Statuses are compared by identity. The wire form is the upper-case name and
/// parsing is exact, so `"taken"` is not a status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    /// Waiting for a courier
    Unassigned,
    /// Claimed by a courier
    Taken,
}

impl OrderStatus {
    /// Returns the wire representation of the status
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Unassigned => "UNASSIGNED",
            OrderStatus::Taken => "TAKEN",
        }
    }

    /// Checks if transition is valid
    pub fn can_transition_to(self, target: OrderStatus) -> bool {
        use OrderStatus::*;
        matches!((self, target), (Unassigned, Taken))
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "UNASSIGNED" => Ok(OrderStatus::Unassigned),
            "TAKEN" => Ok(OrderStatus::Taken),
            other => Err(CoreError::validation(format!("Unknown order status '{}'", other))),
        }
    }
}

/// Result of an attempt to claim an order
///
/// Rejections are ordinary outcomes, not errors: callers map them to
/// user-facing responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClaimOutcome {
    /// This caller moved the order from UNASSIGNED to TAKEN
    Success,
    /// Another caller claimed the order first
    AlreadyTaken,
    /// No order has the requested identifier
    NotFound,
}

/// A delivery order
///
/// Identifier, distance and creation time are fixed at construction; the
/// status only moves forward through [`Order::take`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    id: OrderId,
    status: OrderStatus,
    distance: u32,
    created_at: DateTime<Utc>,
}

impl Order {
    /// Creates a new unassigned order for a measured distance
    pub fn new(distance: u32) -> Self {
        Self {
            id: OrderId::new_v7(),
            status: OrderStatus::Unassigned,
            distance,
            created_at: Utc::now(),
        }
    }

    /// Rebuilds an order from persisted state
    pub fn restore(
        id: OrderId,
        status: OrderStatus,
        distance: u32,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            status,
            distance,
            created_at,
        }
    }

    pub fn id(&self) -> OrderId {
        self.id
    }

    pub fn status(&self) -> OrderStatus {
        self.status
    }

    /// Road distance in metres
    pub fn distance(&self) -> u32 {
        self.distance
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Whether a courier can still claim this order
    pub fn is_available(&self) -> bool {
        self.status.can_transition_to(OrderStatus::Taken)
    }

    /// Applies the claim transition in memory
    ///
    /// Callers must hold exclusive access to the order's stored row for the
    /// whole read-modify-write.
    pub fn take(&mut self) -> ClaimOutcome {
        if !self.is_available() {
            return ClaimOutcome::AlreadyTaken;
        }
        self.status = OrderStatus::Taken;
        ClaimOutcome::Success
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_order_is_unassigned() {
        let order = Order::new(1200);
        assert_eq!(order.status(), OrderStatus::Unassigned);
        assert_eq!(order.distance(), 1200);
        assert!(order.is_available());
    }

    #[test]
    fn test_take_is_monotonic() {
        let mut order = Order::new(10);
        assert_eq!(order.take(), ClaimOutcome::Success);
        assert_eq!(order.status(), OrderStatus::Taken);
        assert_eq!(order.take(), ClaimOutcome::AlreadyTaken);
        assert_eq!(order.status(), OrderStatus::Taken);
    }

    #[test]
    fn test_transition_table() {
        use OrderStatus::*;
        assert!(Unassigned.can_transition_to(Taken));
        assert!(!Taken.can_transition_to(Unassigned));
        assert!(!Taken.can_transition_to(Taken));
        assert!(!Unassigned.can_transition_to(Unassigned));
    }

    #[test]
    fn test_status_parsing_is_exact() {
        assert_eq!("TAKEN".parse::<OrderStatus>().unwrap(), OrderStatus::Taken);
        assert_eq!("UNASSIGNED".parse::<OrderStatus>().unwrap(), OrderStatus::Unassigned);
        assert!("taken".parse::<OrderStatus>().is_err());
        assert!("Taken".parse::<OrderStatus>().is_err());
    }

    #[test]
    fn test_status_serde_matches_display() {
        for status in [OrderStatus::Unassigned, OrderStatus::Taken] {
            let json = serde_json::to_string(&status).unwrap();
            assert_eq!(json, format!("\"{}\"", status));
        }
        assert!(serde_json::from_str::<OrderStatus>("\"taken\"").is_err());
    }
}
