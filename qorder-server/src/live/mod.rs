//! EventHub — per-organization real-time event fan-out
//!
//! ```text
//! Engine (after commit)
//!       │ publish(org_id, Event)
//!       ▼
//! EventHub
//!   └── orgs: org_id → broadcast::Sender<Event> (fan-out to dashboards)
//!             │
//!             ▼
//!   WebSocket handler (subscribe → forward as JSON)
//! ```
//!
//! Events are advisory signals, not state: there is no replay for late
//! subscribers, and a lagged receiver simply drops old events. Consumers
//! re-fetch state when they see an event or reconnect.

use dashmap::DashMap;
use shared::events::Event;
use std::sync::Arc;
use tokio::sync::broadcast;

/// Broadcast channel capacity — enough to buffer connection-time bursts
const BROADCAST_CAPACITY: usize = 256;

/// Per-organization event fan-out, strictly tenant-isolated
#[derive(Clone, Default)]
pub struct EventHub {
    /// org_id → broadcast sender for that organization's subscribers
    orgs: Arc<DashMap<i64, broadcast::Sender<Event>>>,
}

impl EventHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish an event to every subscriber of the organization.
    ///
    /// Callers must only invoke this after the corresponding write has
    /// committed, so subscribers re-querying on receipt observe the
    /// post-write state. With no subscribers the send fails; that is fine.
    pub fn publish(&self, org_id: i64, event: Event) {
        if let Some(tx) = self.orgs.get(&org_id) {
            let _ = tx.send(event);
        }
    }

    /// Subscribe to one organization's event stream
    pub fn subscribe(&self, org_id: i64) -> broadcast::Receiver<Event> {
        self.orgs
            .entry(org_id)
            .or_insert_with(|| broadcast::channel(BROADCAST_CAPACITY).0)
            .subscribe()
    }

    /// Drop the organization's channel once its last subscriber is gone.
    /// Called by WebSocket handlers on disconnect.
    pub fn release(&self, org_id: i64) {
        self.orgs
            .remove_if(&org_id, |_, tx| tx.receiver_count() == 0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::events::EventKind;
    use serde_json::json;

    fn event(kind: EventKind, order_id: i64) -> Event {
        Event::new(kind, json!({"order_id": order_id}))
    }

    #[tokio::test]
    async fn subscriber_receives_published_events() {
        let hub = EventHub::new();
        let mut rx = hub.subscribe(1);

        hub.publish(1, event(EventKind::OrderCreated, 42));

        let received = rx.recv().await.unwrap();
        assert_eq!(received.kind, EventKind::OrderCreated);
        assert_eq!(received.data["order_id"], 42);
    }

    #[tokio::test]
    async fn organizations_are_isolated() {
        let hub = EventHub::new();
        let mut rx_a = hub.subscribe(1);
        let mut rx_b = hub.subscribe(2);

        hub.publish(1, event(EventKind::OrderConfirmed, 7));
        hub.publish(2, event(EventKind::TicketCalled, 8));

        assert_eq!(rx_a.recv().await.unwrap().kind, EventKind::OrderConfirmed);
        assert_eq!(rx_b.recv().await.unwrap().kind, EventKind::TicketCalled);
        // No cross-delivery pending
        assert!(rx_a.try_recv().is_err());
        assert!(rx_b.try_recv().is_err());
    }

    #[test]
    fn publish_without_subscribers_is_a_no_op() {
        let hub = EventHub::new();
        hub.publish(99, event(EventKind::OrderReady, 1));
    }

    #[tokio::test]
    async fn fan_out_reaches_all_subscribers() {
        let hub = EventHub::new();
        let mut rx1 = hub.subscribe(1);
        let mut rx2 = hub.subscribe(1);

        hub.publish(1, event(EventKind::SplitBillCompleted, 5));

        assert_eq!(rx1.recv().await.unwrap().data["order_id"], 5);
        assert_eq!(rx2.recv().await.unwrap().data["order_id"], 5);
    }

    #[test]
    fn release_cleans_up_idle_channels() {
        let hub = EventHub::new();
        {
            let _rx = hub.subscribe(1);
            // Still subscribed: release keeps the channel
            hub.release(1);
            assert_eq!(hub.orgs.len(), 1);
        }
        hub.release(1);
        assert!(hub.orgs.is_empty());
    }
}
