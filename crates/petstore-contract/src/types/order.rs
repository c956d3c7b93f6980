//! Store order and inventory representations

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::UnknownStatus;

/// Lifecycle state of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// Order placed
    Placed,
    /// Order approved
    Approved,
    /// Order delivered
    Delivered,
    /// Order canceled
    Canceled,
}

impl OrderStatus {
    /// Every status the service accepts.
    pub const ALL: [OrderStatus; 4] = [
        OrderStatus::Placed,
        OrderStatus::Approved,
        OrderStatus::Delivered,
        OrderStatus::Canceled,
    ];

    /// Wire spelling.
    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Placed => "placed",
            OrderStatus::Approved => "approved",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Canceled => "canceled",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OrderStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| UnknownStatus(s.to_string()))
    }
}

/// A store order. Every field is always serialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Order id
    pub id: i64,
    /// Ordered pet
    pub pet_id: i64,
    /// Quantity ordered
    pub quantity: i64,
    /// Lifecycle state
    pub status: OrderStatus,
    /// Whether the order is complete
    pub complete: bool,
}

impl Order {
    /// Build an order.
    pub fn new(id: i64, pet_id: i64, quantity: i64, status: OrderStatus, complete: bool) -> Self {
        Self {
            id,
            pet_id,
            quantity,
            status,
            complete,
        }
    }
}

/// Store inventory: order counts per status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inventory {
    /// Approved orders
    pub approved: i64,
    /// Delivered orders
    pub delivered: i64,
}
