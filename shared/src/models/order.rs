//! Order and order item models, with their state machines
//!
//! The order lifecycle is `pending → confirmed → completed`, with an explicit
//! `cancelled` status for pending orders whose items are all cancelled.
//! Items move forward-only along
//! `queued → preparing → almost_ready → ready → delivered` and may skip
//! intermediate stages; `queued → cancelled` is the only side exit.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Order status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(type_name = "order_status", rename_all = "snake_case"))]
pub enum OrderStatus {
    /// Submitted by a customer, not yet visible to the kitchen
    Pending,
    /// Approved by a waiter — the kitchen hand-off point
    Confirmed,
    /// Fully settled
    Completed,
    /// All items cancelled before confirmation
    Cancelled,
}

impl OrderStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }

    /// Items progress through the kitchen only after the waiter hand-off;
    /// a pending order is not visible to the kitchen yet.
    pub fn allows_item_progress(&self) -> bool {
        matches!(self, Self::Confirmed)
    }
}

/// Order item status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(
    feature = "db",
    sqlx(type_name = "order_item_status", rename_all = "snake_case")
)]
pub enum OrderItemStatus {
    Queued,
    Preparing,
    AlmostReady,
    Ready,
    Delivered,
    Cancelled,
}

impl OrderItemStatus {
    /// Position in the preparation chain; `None` for cancelled items
    fn rank(&self) -> Option<u8> {
        match self {
            Self::Queued => Some(0),
            Self::Preparing => Some(1),
            Self::AlmostReady => Some(2),
            Self::Ready => Some(3),
            Self::Delivered => Some(4),
            Self::Cancelled => None,
        }
    }

    /// Whether `next` is a legal forward move on the preparation chain.
    ///
    /// Stages may be skipped (a waiter may mark a queued item delivered
    /// directly) but never revisited, and cancelled items never move.
    pub fn can_advance_to(&self, next: OrderItemStatus) -> bool {
        match (self.rank(), next.rank()) {
            (Some(cur), Some(nxt)) => nxt > cur,
            _ => false,
        }
    }

    /// Staff may cancel an item only before the kitchen picks it up
    pub fn is_cancellable(&self) -> bool {
        matches!(self, Self::Queued)
    }

    /// Whether this item counts as finished for the "order ready" check
    pub fn is_settled(&self) -> bool {
        matches!(self, Self::Ready | Self::Delivered | Self::Cancelled)
    }
}

/// Order entity — one customer visit's aggregate
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Order {
    pub id: i64,
    pub organization_id: i64,
    pub table_id: i64,
    pub status: OrderStatus,
    /// Derived: sum over non-cancelled items of quantity × snapshot price.
    /// Recomputed on every item mutation, never taken from client input.
    pub total: Decimal,
    pub created_at: i64,
}

/// Order item — one line of an order
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct OrderItem {
    pub id: i64,
    pub order_id: i64,
    pub menu_item_id: i64,
    pub quantity: i32,
    pub notes: Option<String>,
    pub status: OrderItemStatus,
    /// Snapshot of the menu price at order time, immutable thereafter
    pub price: Decimal,
    /// Stamped once on first entry into `preparing`
    pub started_preparing_at: Option<i64>,
}

/// One cart line of an order submission
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderLineInput {
    pub menu_item_id: i64,
    pub quantity: i32,
    pub notes: Option<String>,
}

/// Full order with nested items, the shape handlers return
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderWithItems {
    #[serde(flatten)]
    pub order: Order,
    pub items: Vec<OrderItem>,
}

/// Authoritative order total: quantity × snapshot price over all
/// non-cancelled items.
pub fn order_total(items: &[OrderItem]) -> Decimal {
    items
        .iter()
        .filter(|i| i.status != OrderItemStatus::Cancelled)
        .map(|i| i.price * Decimal::from(i.quantity))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn item(status: OrderItemStatus, quantity: i32, price: Decimal) -> OrderItem {
        OrderItem {
            id: 1,
            order_id: 1,
            menu_item_id: 1,
            quantity,
            notes: None,
            status,
            price,
            started_preparing_at: None,
        }
    }

    #[test]
    fn item_status_moves_forward_only() {
        use OrderItemStatus::*;
        assert!(Queued.can_advance_to(Preparing));
        assert!(Preparing.can_advance_to(AlmostReady));
        assert!(AlmostReady.can_advance_to(Ready));
        assert!(Ready.can_advance_to(Delivered));
        // Skipping stages is allowed
        assert!(Queued.can_advance_to(Delivered));
        assert!(Preparing.can_advance_to(Ready));
        // Backwards and self moves are not
        assert!(!Preparing.can_advance_to(Queued));
        assert!(!Ready.can_advance_to(Preparing));
        assert!(!Delivered.can_advance_to(Delivered));
        // Cancellation is not an advance, and cancelled items never move
        assert!(!Queued.can_advance_to(Cancelled));
        assert!(!Cancelled.can_advance_to(Preparing));
    }

    #[test]
    fn item_progress_requires_confirmed_order() {
        use OrderStatus::*;
        assert!(Confirmed.allows_item_progress());
        assert!(!Pending.allows_item_progress());
        assert!(!Completed.allows_item_progress());
        assert!(!Cancelled.allows_item_progress());
    }

    #[test]
    fn only_queued_items_are_cancellable() {
        use OrderItemStatus::*;
        assert!(Queued.is_cancellable());
        assert!(!Preparing.is_cancellable());
        assert!(!AlmostReady.is_cancellable());
        assert!(!Ready.is_cancellable());
        assert!(!Delivered.is_cancellable());
        assert!(!Cancelled.is_cancellable());
    }

    #[test]
    fn settled_states_for_order_ready_check() {
        use OrderItemStatus::*;
        assert!(Ready.is_settled());
        assert!(Delivered.is_settled());
        assert!(Cancelled.is_settled());
        assert!(!Queued.is_settled());
        assert!(!Preparing.is_settled());
        assert!(!AlmostReady.is_settled());
    }

    #[test]
    fn total_sums_non_cancelled_items() {
        let items = vec![
            item(OrderItemStatus::Queued, 2, d("5.00")),
            item(OrderItemStatus::Queued, 1, d("3.50")),
        ];
        assert_eq!(order_total(&items), d("13.50"));
    }

    #[test]
    fn total_excludes_cancelled_items() {
        let items = vec![
            item(OrderItemStatus::Delivered, 2, d("5.00")),
            item(OrderItemStatus::Cancelled, 1, d("3.50")),
        ];
        assert_eq!(order_total(&items), d("10.00"));
    }

    #[test]
    fn total_of_no_surviving_items_is_zero() {
        let items = vec![item(OrderItemStatus::Cancelled, 3, d("9.99"))];
        assert_eq!(order_total(&items), Decimal::ZERO);
    }

    #[test]
    fn order_status_terminality() {
        assert!(!OrderStatus::Pending.is_terminal());
        assert!(!OrderStatus::Confirmed.is_terminal());
        assert!(OrderStatus::Completed.is_terminal());
        assert!(OrderStatus::Cancelled.is_terminal());
    }

    #[test]
    fn status_wire_names_are_snake_case() {
        assert_eq!(
            serde_json::to_string(&OrderItemStatus::AlmostReady).unwrap(),
            "\"almost_ready\""
        );
        assert_eq!(
            serde_json::to_string(&OrderStatus::Pending).unwrap(),
            "\"pending\""
        );
    }
}
