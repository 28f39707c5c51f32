//! Queue ticketing engine
//!
//! Ticket numbers come from an atomic `next_ticket` increment on the queue
//! row, so concurrent joins can never mint duplicates. Position and wait
//! estimates are recomputed on every read, never stored.

use shared::error::{AppError, ErrorCode};
use shared::models::{
    JoinQueueRequest, Queue, QueueCreate, QueueStatus, QueueTicket, QueueUpdate, TicketStatus,
    TicketStatusView, estimated_wait_minutes,
};
use shared::util::{now_millis, qr_token, snowflake_id};
use sqlx::{PgConnection, PgPool};

use crate::error::{ServiceError, ServiceResult};

const DEFAULT_AVG_SERVICE_MINUTES: i32 = 5;

pub async fn create(pool: &PgPool, organization_id: i64, data: &QueueCreate) -> ServiceResult<Queue> {
    let queue = sqlx::query_as(
        "INSERT INTO queues (id, organization_id, name, avg_service_minutes, qr_token)
         VALUES ($1, $2, $3, $4, $5)
         RETURNING *",
    )
    .bind(snowflake_id())
    .bind(organization_id)
    .bind(&data.name)
    .bind(data.avg_service_minutes.unwrap_or(DEFAULT_AVG_SERVICE_MINUTES))
    .bind(qr_token())
    .fetch_one(pool)
    .await?;
    Ok(queue)
}

/// Partial settings update: absent fields keep their stored value
pub async fn update(
    pool: &PgPool,
    organization_id: i64,
    queue_id: i64,
    data: &QueueUpdate,
) -> ServiceResult<Queue> {
    sqlx::query_as(
        "UPDATE queues SET
            name = COALESCE($1, name),
            status = COALESCE($2, status),
            avg_service_minutes = COALESCE($3, avg_service_minutes)
         WHERE organization_id = $4 AND id = $5
         RETURNING *",
    )
    .bind(&data.name)
    .bind(data.status)
    .bind(data.avg_service_minutes)
    .bind(organization_id)
    .bind(queue_id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| ServiceError::App(ErrorCode::QueueNotFound.into()))
}

pub async fn list(pool: &PgPool, organization_id: i64) -> Result<Vec<Queue>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM queues WHERE organization_id = $1 ORDER BY name")
        .bind(organization_id)
        .fetch_all(pool)
        .await
}

/// Resolve a queue from its QR token — the customer-facing entry point,
/// so no organization scope is required.
pub async fn find_by_qr_token(pool: &PgPool, token: &str) -> ServiceResult<Queue> {
    sqlx::query_as("SELECT * FROM queues WHERE qr_token = $1")
        .bind(token)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| ServiceError::App(ErrorCode::QueueNotFound.into()))
}

pub async fn find(pool: &PgPool, organization_id: i64, queue_id: i64) -> ServiceResult<Queue> {
    sqlx::query_as("SELECT * FROM queues WHERE organization_id = $1 AND id = $2")
        .bind(organization_id)
        .bind(queue_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| ServiceError::App(ErrorCode::QueueNotFound.into()))
}

/// Customer joins a queue via its QR token.
///
/// The ticket number comes from an atomic increment of the queue row's
/// counter inside the transaction — two concurrent joins get distinct,
/// strictly increasing numbers.
pub async fn join(
    pool: &PgPool,
    token: &str,
    req: &JoinQueueRequest,
) -> ServiceResult<(TicketStatusView, i64)> {
    if req.party_size < 1 {
        return Err(ServiceError::App(AppError::validation(
            "party_size must be at least 1",
        )));
    }

    let mut tx = pool.begin().await?;

    let queue: Queue = sqlx::query_as("SELECT * FROM queues WHERE qr_token = $1 FOR UPDATE")
        .bind(token)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| ServiceError::App(ErrorCode::QueueNotFound.into()))?;

    match queue.status {
        QueueStatus::Active => {}
        QueueStatus::Paused => return Err(ServiceError::App(ErrorCode::QueuePaused.into())),
        QueueStatus::Closed => return Err(ServiceError::App(ErrorCode::QueueClosed.into())),
    }

    let (ticket_number,): (i32,) = sqlx::query_as(
        "UPDATE queues SET next_ticket = next_ticket + 1
         WHERE id = $1
         RETURNING next_ticket - 1",
    )
    .bind(queue.id)
    .fetch_one(&mut *tx)
    .await?;

    let ticket: QueueTicket = sqlx::query_as(
        "INSERT INTO queue_tickets
            (id, queue_id, ticket_number, customer_name, customer_phone, party_size, created_at)
         VALUES ($1, $2, $3, $4, $5, $6, $7)
         RETURNING *",
    )
    .bind(snowflake_id())
    .bind(queue.id)
    .bind(ticket_number)
    .bind(&req.customer_name)
    .bind(&req.customer_phone)
    .bind(req.party_size)
    .bind(now_millis())
    .fetch_one(&mut *tx)
    .await?;

    let position = waiting_position(&mut tx, queue.id, ticket_number).await?;

    tx.commit().await?;

    let view = TicketStatusView {
        estimated_wait_minutes: estimated_wait_minutes(position, queue.avg_service_minutes),
        queue_name: queue.name,
        position,
        ticket,
    };
    Ok((view, queue.organization_id))
}

/// Call the lowest-numbered waiting ticket
pub async fn call_next(
    pool: &PgPool,
    organization_id: i64,
    queue_id: i64,
) -> ServiceResult<QueueTicket> {
    let mut tx = pool.begin().await?;

    lock_queue(&mut tx, organization_id, queue_id).await?;

    let next: Option<QueueTicket> = sqlx::query_as(
        "SELECT * FROM queue_tickets
         WHERE queue_id = $1 AND status = 'waiting'
         ORDER BY ticket_number
         LIMIT 1
         FOR UPDATE",
    )
    .bind(queue_id)
    .fetch_optional(&mut *tx)
    .await?;
    let Some(next) = next else {
        return Err(ServiceError::App(ErrorCode::QueueEmpty.into()));
    };

    let ticket: QueueTicket = sqlx::query_as(
        "UPDATE queue_tickets SET status = $1, called_at = $2 WHERE id = $3 RETURNING *",
    )
    .bind(TicketStatus::Called)
    .bind(now_millis())
    .bind(next.id)
    .fetch_one(&mut *tx)
    .await?;

    sqlx::query("UPDATE queues SET current_ticket = $1 WHERE id = $2")
        .bind(ticket.ticket_number)
        .bind(queue_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    Ok(ticket)
}

/// Advance a ticket one step forward, stamping the timestamp for the
/// state being entered exactly once.
pub async fn advance(
    pool: &PgPool,
    organization_id: i64,
    queue_id: i64,
    ticket_id: i64,
    next: TicketStatus,
) -> ServiceResult<QueueTicket> {
    let mut tx = pool.begin().await?;

    lock_queue(&mut tx, organization_id, queue_id).await?;
    let ticket = lock_ticket(&mut tx, queue_id, ticket_id).await?;

    if !ticket.status.can_transition_to(next) {
        return Err(ServiceError::App(
            AppError::new(ErrorCode::TicketTransitionInvalid)
                .with_detail("from", format!("{:?}", ticket.status))
                .with_detail("to", format!("{next:?}")),
        ));
    }

    let now = now_millis();
    let ticket: QueueTicket = sqlx::query_as(
        "UPDATE queue_tickets SET
            status = $1,
            called_at = CASE WHEN $1 = 'called'::ticket_status THEN COALESCE(called_at, $2) ELSE called_at END,
            served_at = CASE WHEN $1 = 'serving'::ticket_status THEN COALESCE(served_at, $2) ELSE served_at END,
            completed_at = CASE WHEN $1 = 'completed'::ticket_status THEN COALESCE(completed_at, $2) ELSE completed_at END
         WHERE id = $3
         RETURNING *",
    )
    .bind(next)
    .bind(now)
    .bind(ticket.id)
    .fetch_one(&mut *tx)
    .await?;

    // Calling out of order (e.g. a staff pick) still moves the counter
    if next == TicketStatus::Called {
        sqlx::query("UPDATE queues SET current_ticket = $1 WHERE id = $2")
            .bind(ticket.ticket_number)
            .bind(queue_id)
            .execute(&mut *tx)
            .await?;
    }

    tx.commit().await?;
    Ok(ticket)
}

/// Force a no-show, regardless of the ticket's current state
pub async fn skip(
    pool: &PgPool,
    organization_id: i64,
    queue_id: i64,
    ticket_id: i64,
) -> ServiceResult<QueueTicket> {
    let mut tx = pool.begin().await?;

    lock_queue(&mut tx, organization_id, queue_id).await?;
    let ticket = lock_ticket(&mut tx, queue_id, ticket_id).await?;

    let ticket: QueueTicket =
        sqlx::query_as("UPDATE queue_tickets SET status = $1 WHERE id = $2 RETURNING *")
            .bind(TicketStatus::NoShow)
            .bind(ticket.id)
            .fetch_one(&mut *tx)
            .await?;

    tx.commit().await?;
    Ok(ticket)
}

/// Withdraw a ticket before service starts. This is a hard delete, not a
/// status change.
pub async fn cancel(
    pool: &PgPool,
    organization_id: i64,
    queue_id: i64,
    ticket_id: i64,
) -> ServiceResult<QueueTicket> {
    let mut tx = pool.begin().await?;

    lock_queue(&mut tx, organization_id, queue_id).await?;
    let ticket = lock_ticket(&mut tx, queue_id, ticket_id).await?;

    if !ticket.status.is_cancellable() {
        return Err(ServiceError::App(ErrorCode::TicketNotCancellable.into()));
    }

    sqlx::query("DELETE FROM queue_tickets WHERE id = $1")
        .bind(ticket.id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    Ok(ticket)
}

/// Live view of one ticket for the customer status page. Position and
/// wait estimate are recomputed from the waiting set on every call.
pub async fn ticket_view(pool: &PgPool, ticket_id: i64) -> ServiceResult<TicketStatusView> {
    let ticket: QueueTicket = sqlx::query_as("SELECT * FROM queue_tickets WHERE id = $1")
        .bind(ticket_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| ServiceError::App(ErrorCode::TicketNotFound.into()))?;

    let (queue_name, avg_service_minutes): (String, i32) =
        sqlx::query_as("SELECT name, avg_service_minutes FROM queues WHERE id = $1")
            .bind(ticket.queue_id)
            .fetch_one(pool)
            .await?;

    let position = if ticket.status == TicketStatus::Waiting {
        let ahead: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM queue_tickets
             WHERE queue_id = $1 AND status = 'waiting' AND ticket_number < $2",
        )
        .bind(ticket.queue_id)
        .bind(ticket.ticket_number)
        .fetch_one(pool)
        .await?;
        ahead.0 + 1
    } else {
        0
    };

    Ok(TicketStatusView {
        estimated_wait_minutes: estimated_wait_minutes(position, avg_service_minutes),
        queue_name,
        position,
        ticket,
    })
}

// ── transaction-scoped helpers ──

async fn lock_queue(
    conn: &mut PgConnection,
    organization_id: i64,
    queue_id: i64,
) -> ServiceResult<Queue> {
    sqlx::query_as("SELECT * FROM queues WHERE organization_id = $1 AND id = $2 FOR UPDATE")
        .bind(organization_id)
        .bind(queue_id)
        .fetch_optional(conn)
        .await?
        .ok_or_else(|| ServiceError::App(ErrorCode::QueueNotFound.into()))
}

async fn lock_ticket(
    conn: &mut PgConnection,
    queue_id: i64,
    ticket_id: i64,
) -> ServiceResult<QueueTicket> {
    sqlx::query_as("SELECT * FROM queue_tickets WHERE queue_id = $1 AND id = $2 FOR UPDATE")
        .bind(queue_id)
        .bind(ticket_id)
        .fetch_optional(conn)
        .await?
        .ok_or_else(|| ServiceError::App(ErrorCode::TicketNotFound.into()))
}

async fn waiting_position(
    conn: &mut PgConnection,
    queue_id: i64,
    ticket_number: i32,
) -> Result<i64, sqlx::Error> {
    let ahead: (i64,) = sqlx::query_as(
        "SELECT COUNT(*) FROM queue_tickets
         WHERE queue_id = $1 AND status = 'waiting' AND ticket_number < $2",
    )
    .bind(queue_id)
    .bind(ticket_number)
    .fetch_one(conn)
    .await?;
    Ok(ahead.0 + 1)
}
