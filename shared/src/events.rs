//! Real-time event payloads
//!
//! Every state-mutating operation publishes exactly one typed event after its
//! write commits. Events are advisory: the contract is "something in this
//! category changed, re-fetch it", so `data` carries identifiers, not full
//! state, and consumers must ignore types they do not recognize.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Event type discriminator, the only field consumers key behavior off
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    OrderCreated,
    OrderConfirmed,
    OrderItemUpdated,
    OrderItemCancelled,
    OrderReady,
    OrderCancelled,
    PaymentProcessed,
    ShareUpdated,
    SplitBillCompleted,
    TicketCreated,
    TicketCalled,
    TicketUpdated,
    TicketCancelled,
    QueueUpdated,
}

/// Broadcast envelope, `{type, data}` on the wire
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    #[serde(rename = "type")]
    pub kind: EventKind,
    pub data: Value,
}

impl Event {
    pub fn new(kind: EventKind, data: Value) -> Self {
        Self { kind, data }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn event_wire_shape() {
        let event = Event::new(
            EventKind::SplitBillCompleted,
            json!({"payment_id": 7, "order_id": 3, "table_id": 1}),
        );
        let wire = serde_json::to_value(&event).unwrap();
        assert_eq!(wire["type"], "split_bill_completed");
        assert_eq!(wire["data"]["payment_id"], 7);
    }

    #[test]
    fn kind_round_trips_snake_case() {
        let kind: EventKind = serde_json::from_str("\"ticket_called\"").unwrap();
        assert_eq!(kind, EventKind::TicketCalled);
        assert_eq!(
            serde_json::to_string(&EventKind::OrderItemUpdated).unwrap(),
            "\"order_item_updated\""
        );
    }
}
