//! Pre-built Test Fixtures
//!
//! Ready-to-use test data for delivery orders. Values are fixed so tests
//! stay predictable.

use chrono::{DateTime, Duration, TimeZone, Utc};
use core_kernel::OrderId;
use domain_orders::{Coordinates, Order, OrderStatus};

/// Fixture for coordinate data
pub struct CoordinateFixtures;

impl CoordinateFixtures {
    /// Raw origin pair as sent by clients
    pub fn origin_raw() -> [&'static str; 2] {
        ["1.34306", "103.71903"]
    }

    /// Raw destination pair as sent by clients
    pub fn destination_raw() -> [&'static str; 2] {
        ["1.2830", "103.8513"]
    }

    /// Parsed origin
    pub fn origin() -> Coordinates {
        Coordinates::new(1.34306, 103.71903, "Origin").expect("valid origin fixture")
    }

    /// Parsed destination
    pub fn destination() -> Coordinates {
        Coordinates::new(1.2830, 103.8513, "Destination").expect("valid destination fixture")
    }
}

/// Fixture for order data
pub struct OrderFixtures;

impl OrderFixtures {
    /// Distance returned by the fixed distance provider in API tests
    pub const DISTANCE: u32 = 20113;

    /// Base creation time for ordered fixtures
    pub fn epoch() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap()
    }

    /// An unassigned order
    pub fn unassigned() -> Order {
        Order::restore(OrderId::new(), OrderStatus::Unassigned, Self::DISTANCE, Self::epoch())
    }

    /// A taken order
    pub fn taken() -> Order {
        Order::restore(OrderId::new(), OrderStatus::Taken, Self::DISTANCE, Self::epoch())
    }

    /// `count` unassigned orders created one minute apart, oldest first
    ///
    /// The n-th order (1-based) has distance `n * 100`.
    pub fn timeline(count: u32) -> Vec<Order> {
        (1..=count)
            .map(|i| {
                Order::restore(
                    OrderId::new(),
                    OrderStatus::Unassigned,
                    i * 100,
                    Self::epoch() + Duration::minutes(i64::from(i)),
                )
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeline_is_strictly_ordered() {
        let orders = OrderFixtures::timeline(5);
        assert_eq!(orders.len(), 5);
        assert!(orders.windows(2).all(|w| w[0].created_at() < w[1].created_at()));
        assert_eq!(orders[2].distance(), 300);
    }

    #[test]
    fn test_raw_coordinates_parse() {
        let origin = Coordinates::parse("Origin", &CoordinateFixtures::origin_raw()).unwrap();
        assert_eq!(origin, CoordinateFixtures::origin());
    }
}
