//! # Orders
//!
//! Placed orders, their status timeline and order-history filtering.
//!
//! ## Status Timeline
//! ```text
//!   Confirmed ──► Processing ──► Shipped ──► Out for delivery ──► Delivered
//!
//!   status = Shipped:
//!   [Completed]   [Completed]   [Current]    [Pending]             [Pending]
//! ```
//!
//! A delivered order shows every step completed. A cancelled order only
//! shows the confirmation as completed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::cart::CartItem;
use crate::money::Money;
use crate::pricing::OrderTotals;
use crate::types::Address;

/// Order identifier for an order placed at `at`: `ORD` + epoch milliseconds.
///
/// ```rust
/// use agri_core::order::order_id_at;
/// use chrono::{TimeZone, Utc};
///
/// let at = Utc.timestamp_millis_opt(1_735_142_400_000).unwrap();
/// assert_eq!(order_id_at(at), "ORD1735142400000");
/// ```
pub fn order_id_at(at: DateTime<Utc>) -> String {
    format!("ORD{}", at.timestamp_millis())
}

// =============================================================================
// Status
// =============================================================================

/// Fulfilment status of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum OrderStatus {
    Confirmed,
    Processing,
    Shipped,
    OutForDelivery,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    /// The fulfilment steps in order. `Cancelled` is not a step.
    pub const PROGRESSION: [OrderStatus; 5] = [
        OrderStatus::Confirmed,
        OrderStatus::Processing,
        OrderStatus::Shipped,
        OrderStatus::OutForDelivery,
        OrderStatus::Delivered,
    ];

    /// Badge label.
    pub fn label(&self) -> &'static str {
        match self {
            OrderStatus::Confirmed => "Confirmed",
            OrderStatus::Processing => "Processing",
            OrderStatus::Shipped => "Shipped",
            OrderStatus::OutForDelivery => "Out for Delivery",
            OrderStatus::Delivered => "Delivered",
            OrderStatus::Cancelled => "Cancelled",
        }
    }

    fn describe(&self) -> (&'static str, &'static str) {
        match self {
            OrderStatus::Confirmed => (
                "Order Confirmed",
                "Your order has been placed and confirmed",
            ),
            OrderStatus::Processing => ("Processing", "Your order is being prepared for dispatch"),
            OrderStatus::Shipped => ("Shipped", "Your order is on its way to you"),
            OrderStatus::OutForDelivery => ("Out for Delivery", "Your order is out for delivery"),
            OrderStatus::Delivered => ("Delivered", "Order delivered successfully"),
            OrderStatus::Cancelled => ("Cancelled", "This order was cancelled"),
        }
    }

    fn position(&self) -> Option<usize> {
        Self::PROGRESSION.iter().position(|s| s == self)
    }
}

/// Progress marker of one timeline or stepper step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum StepState {
    Completed,
    Current,
    Pending,
}

/// One row of the order tracking timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct TimelineEntry {
    pub step: OrderStatus,
    pub title: String,
    pub description: String,
    pub state: StepState,
}

/// Derives the tracking timeline for an order in `status`.
pub fn timeline(status: OrderStatus) -> Vec<TimelineEntry> {
    let state_of = |index: usize| -> StepState {
        match status {
            OrderStatus::Delivered => StepState::Completed,
            OrderStatus::Cancelled if index == 0 => StepState::Completed,
            OrderStatus::Cancelled => StepState::Pending,
            _ => {
                let current = status.position().unwrap_or(0);
                if index < current {
                    StepState::Completed
                } else if index == current {
                    StepState::Current
                } else {
                    StepState::Pending
                }
            }
        }
    };

    OrderStatus::PROGRESSION
        .iter()
        .enumerate()
        .map(|(index, step)| {
            let (title, description) = step.describe();
            TimelineEntry {
                step: *step,
                title: title.to_string(),
                description: description.to_string(),
                state: state_of(index),
            }
        })
        .collect()
}

// =============================================================================
// Order
// =============================================================================

/// One purchased product, frozen at order time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct OrderLine {
    pub product_id: String,
    pub name: String,
    pub image: String,
    pub quantity: i64,
    pub price: Money,
}

impl OrderLine {
    /// Unit price × quantity.
    pub fn line_total(&self) -> Money {
        self.price.multiply_quantity(self.quantity)
    }
}

impl From<&CartItem> for OrderLine {
    fn from(item: &CartItem) -> Self {
        OrderLine {
            product_id: item.id.clone(),
            name: item.name.clone(),
            image: item.image.clone(),
            quantity: item.quantity,
            price: item.price,
        }
    }
}

/// A placed order.
///
/// Only the masked payment label is stored; card details never outlive the
/// checkout draft.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Order {
    pub id: String,
    #[ts(as = "String")]
    pub placed_at: DateTime<Utc>,
    pub status: OrderStatus,
    pub lines: Vec<OrderLine>,
    pub totals: OrderTotals,
    pub shipping_address: Address,
    pub payment_label: String,
}

impl Order {
    /// Σ quantity over the lines.
    pub fn item_count(&self) -> i64 {
        self.lines.iter().map(|l| l.quantity).sum()
    }
}

/// Order-history filter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct OrderFilter {
    /// `None` means all statuses.
    #[serde(default)]
    pub status: Option<OrderStatus>,
    /// Case-insensitive order-id substring.
    #[serde(default)]
    pub query: Option<String>,
}

impl OrderFilter {
    /// Checks if `order` passes the filter.
    pub fn matches(&self, order: &Order) -> bool {
        if let Some(status) = self.status {
            if order.status != status {
                return false;
            }
        }

        match self.query.as_deref().map(str::trim) {
            Some(query) if !query.is_empty() => order
                .id
                .to_ascii_lowercase()
                .contains(&query.to_ascii_lowercase()),
            _ => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::PricingPolicy;
    use chrono::TimeZone;

    fn order(id: &str, status: OrderStatus) -> Order {
        let line = OrderLine {
            product_id: "1".to_string(),
            name: "Mahindra 575 DI XP Plus".to_string(),
            image: "/images/1.jpg".to_string(),
            quantity: 1,
            price: Money::from_rupees(895_000),
        };
        Order {
            id: id.to_string(),
            placed_at: Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap(),
            status,
            totals: PricingPolicy::default().quote(line.line_total(), None),
            lines: vec![line],
            shipping_address: Address {
                id: "a1".to_string(),
                name: "Rajesh Patel".to_string(),
                phone: "+91 98765 43210".to_string(),
                address_line1: "Farm House, Village Kheda".to_string(),
                address_line2: None,
                city: "Anand".to_string(),
                state: "Gujarat".to_string(),
                pincode: "388001".to_string(),
                is_default: true,
            },
            payment_label: "UPI (rajesh@okhdfc)".to_string(),
        }
    }

    fn states(status: OrderStatus) -> Vec<StepState> {
        timeline(status).into_iter().map(|e| e.state).collect()
    }

    #[test]
    fn test_timeline_shipped() {
        use StepState::*;
        assert_eq!(
            states(OrderStatus::Shipped),
            vec![Completed, Completed, Current, Pending, Pending]
        );
    }

    #[test]
    fn test_timeline_edges() {
        use StepState::*;
        assert_eq!(
            states(OrderStatus::Confirmed),
            vec![Current, Pending, Pending, Pending, Pending]
        );
        assert_eq!(states(OrderStatus::Delivered), vec![Completed; 5]);
        assert_eq!(
            states(OrderStatus::Cancelled),
            vec![Completed, Pending, Pending, Pending, Pending]
        );
    }

    #[test]
    fn test_timeline_titles() {
        let entries = timeline(OrderStatus::OutForDelivery);
        assert_eq!(entries[0].title, "Order Confirmed");
        assert_eq!(entries[3].title, "Out for Delivery");
        assert_eq!(entries[3].state, StepState::Current);
    }

    #[test]
    fn test_filter() {
        let delivered = order("ORD123456", OrderStatus::Delivered);
        let shipped = order("ORD123457", OrderStatus::Shipped);

        let all = OrderFilter::default();
        assert!(all.matches(&delivered) && all.matches(&shipped));

        let only_shipped = OrderFilter {
            status: Some(OrderStatus::Shipped),
            query: None,
        };
        assert!(!only_shipped.matches(&delivered));
        assert!(only_shipped.matches(&shipped));

        let search = OrderFilter {
            status: None,
            query: Some("ord123456".to_string()),
        };
        assert!(search.matches(&delivered));
        assert!(!search.matches(&shipped));
    }

    #[test]
    fn test_order_id() {
        let at = Utc.timestamp_millis_opt(1_735_142_400_000).unwrap();
        assert_eq!(order_id_at(at), "ORD1735142400000");
    }

    #[test]
    fn test_status_wire_format() {
        assert_eq!(
            serde_json::to_string(&OrderStatus::OutForDelivery).unwrap(),
            "\"out_for_delivery\""
        );
    }
}
