//! Queue and ticket models, with the ticket state machine
//!
//! Tickets move strictly forward, `waiting → called → serving → completed`,
//! one step at a time. Skipping a no-show forces `no_show` from any state;
//! cancellation is a hard delete and only legal from `waiting` or `called`.

use serde::{Deserialize, Serialize};

/// Queue availability
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(type_name = "queue_status", rename_all = "snake_case"))]
pub enum QueueStatus {
    Active,
    Paused,
    Closed,
}

/// Virtual waiting line
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Queue {
    pub id: i64,
    pub organization_id: i64,
    pub name: String,
    pub status: QueueStatus,
    /// Last ticket number called, 0 before the first call
    pub current_ticket: i32,
    /// Next ticket number to assign, monotonic per queue
    pub next_ticket: i32,
    /// Per-party service estimate used for wait projections
    pub avg_service_minutes: i32,
    /// Opaque token embedded in the queue's printed QR code
    pub qr_token: String,
}

/// Create queue payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueueCreate {
    pub name: String,
    pub avg_service_minutes: Option<i32>,
}

/// Update queue settings payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueueUpdate {
    pub name: Option<String>,
    pub status: Option<QueueStatus>,
    pub avg_service_minutes: Option<i32>,
}

/// Ticket status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(type_name = "ticket_status", rename_all = "snake_case"))]
pub enum TicketStatus {
    Waiting,
    Called,
    Serving,
    Completed,
    NoShow,
}

impl TicketStatus {
    /// Whether `next` is a legal single step forward from this status.
    ///
    /// `no_show` is reachable only through the skip operation, which
    /// bypasses this check.
    pub fn can_transition_to(&self, next: TicketStatus) -> bool {
        matches!(
            (self, next),
            (Self::Waiting, Self::Called)
                | (Self::Called, Self::Serving)
                | (Self::Serving, Self::Completed)
        )
    }

    /// A ticket may be withdrawn only before service starts
    pub fn is_cancellable(&self) -> bool {
        matches!(self, Self::Waiting | Self::Called)
    }
}

/// One customer's place in line
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct QueueTicket {
    pub id: i64,
    pub queue_id: i64,
    /// Assigned from the queue's `next_ticket` at join time
    pub ticket_number: i32,
    pub customer_name: Option<String>,
    pub customer_phone: Option<String>,
    pub party_size: i32,
    pub status: TicketStatus,
    pub created_at: i64,
    /// Stamped once on first entry into `called`
    pub called_at: Option<i64>,
    /// Stamped once on first entry into `serving`
    pub served_at: Option<i64>,
    /// Stamped once on first entry into `completed`
    pub completed_at: Option<i64>,
}

/// Join queue payload, submitted by a customer via the queue's QR token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JoinQueueRequest {
    pub customer_name: Option<String>,
    pub customer_phone: Option<String>,
    pub party_size: i32,
}

/// Live view of one ticket: the stored row plus position and wait
/// projection recomputed on every read.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TicketStatusView {
    #[serde(flatten)]
    pub ticket: QueueTicket,
    pub queue_name: String,
    /// 1-based place among `waiting` tickets; 0 once no longer waiting
    pub position: i64,
    pub estimated_wait_minutes: i64,
}

/// Wait projection: place in line times the queue's per-party estimate
pub fn estimated_wait_minutes(position: i64, avg_service_minutes: i32) -> i64 {
    position * i64::from(avg_service_minutes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ticket_transitions_are_single_step_forward() {
        use TicketStatus::*;
        assert!(Waiting.can_transition_to(Called));
        assert!(Called.can_transition_to(Serving));
        assert!(Serving.can_transition_to(Completed));
        // No skipping
        assert!(!Waiting.can_transition_to(Serving));
        assert!(!Waiting.can_transition_to(Completed));
        assert!(!Called.can_transition_to(Completed));
        // No going back, no self loops
        assert!(!Called.can_transition_to(Waiting));
        assert!(!Serving.can_transition_to(Called));
        assert!(!Waiting.can_transition_to(Waiting));
        // no_show is skip-only, completed is terminal
        assert!(!Waiting.can_transition_to(NoShow));
        assert!(!Called.can_transition_to(NoShow));
        assert!(!NoShow.can_transition_to(Waiting));
        assert!(!Completed.can_transition_to(Serving));
    }

    #[test]
    fn cancellable_before_service_only() {
        use TicketStatus::*;
        assert!(Waiting.is_cancellable());
        assert!(Called.is_cancellable());
        assert!(!Serving.is_cancellable());
        assert!(!Completed.is_cancellable());
        assert!(!NoShow.is_cancellable());
    }

    #[test]
    fn wait_projection_scales_with_position() {
        // Third in line at five minutes per party
        assert_eq!(estimated_wait_minutes(3, 5), 15);
        assert_eq!(estimated_wait_minutes(1, 5), 5);
        assert_eq!(estimated_wait_minutes(0, 5), 0);
    }

    #[test]
    fn status_wire_names_are_snake_case() {
        assert_eq!(
            serde_json::to_string(&TicketStatus::NoShow).unwrap(),
            "\"no_show\""
        );
        assert_eq!(
            serde_json::to_string(&QueueStatus::Paused).unwrap(),
            "\"paused\""
        );
    }
}
