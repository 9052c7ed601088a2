//! Test Data Builders
//!
//! Builder patterns for constructing orders with sensible defaults. Tests
//! specify only the fields they care about.

use chrono::{DateTime, Utc};
use core_kernel::OrderId;
use domain_orders::{Order, OrderStatus};

use crate::fixtures::OrderFixtures;

/// Builder for constructing test orders
#[derive(Debug, Clone)]
pub struct TestOrderBuilder {
    id: OrderId,
    status: OrderStatus,
    distance: u32,
    created_at: DateTime<Utc>,
}

impl Default for TestOrderBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestOrderBuilder {
    /// Creates a new builder for an unassigned order
    pub fn new() -> Self {
        Self {
            id: OrderId::new(),
            status: OrderStatus::Unassigned,
            distance: OrderFixtures::DISTANCE,
            created_at: OrderFixtures::epoch(),
        }
    }

    /// Sets the order ID
    pub fn with_id(mut self, id: OrderId) -> Self {
        self.id = id;
        self
    }

    /// Marks the order as taken
    pub fn taken(mut self) -> Self {
        self.status = OrderStatus::Taken;
        self
    }

    /// Sets the distance in metres
    pub fn with_distance(mut self, distance: u32) -> Self {
        self.distance = distance;
        self
    }

    /// Sets the creation time
    pub fn created_at(mut self, at: DateTime<Utc>) -> Self {
        self.created_at = at;
        self
    }

    pub fn build(self) -> Order {
        Order::restore(self.id, self.status, self.distance, self.created_at)
    }
}
