//! Queue management and ticketing endpoints (staff side)

use axum::extract::{Path, State};
use axum::{Extension, Json};
use serde::Deserialize;
use serde_json::json;
use shared::error::{AppError, ErrorCode};
use shared::events::EventKind;
use shared::models::{Queue, QueueCreate, QueueTicket, QueueUpdate, TicketStatus};

use crate::auth::StaffIdentity;
use crate::db;
use crate::state::AppState;

use super::{ApiResult, publish};

/// GET /api/queues
pub async fn list(
    State(state): State<AppState>,
    Extension(identity): Extension<StaffIdentity>,
) -> ApiResult<Vec<Queue>> {
    let queues = db::queues::list(&state.pool, identity.organization_id)
        .await
        .map_err(|e| {
            tracing::error!("DB error listing queues: {e}");
            AppError::new(ErrorCode::InternalError)
        })?;
    Ok(Json(queues))
}

/// POST /api/queues
pub async fn create(
    State(state): State<AppState>,
    Extension(identity): Extension<StaffIdentity>,
    Json(req): Json<QueueCreate>,
) -> ApiResult<Queue> {
    identity.require_admin()?;
    if req.name.trim().is_empty() {
        return Err(AppError::validation("Queue name must not be empty"));
    }
    if req.avg_service_minutes.is_some_and(|m| m < 1) {
        return Err(AppError::validation("avg_service_minutes must be positive"));
    }
    let queue = db::queues::create(&state.pool, identity.organization_id, &req).await?;
    Ok(Json(queue))
}

/// PATCH /api/queues/{queue_id} — settings and open/pause/close
pub async fn update(
    State(state): State<AppState>,
    Extension(identity): Extension<StaffIdentity>,
    Path(queue_id): Path<i64>,
    Json(req): Json<QueueUpdate>,
) -> ApiResult<Queue> {
    identity.require_admin()?;
    if req.avg_service_minutes.is_some_and(|m| m < 1) {
        return Err(AppError::validation("avg_service_minutes must be positive"));
    }
    let queue = db::queues::update(&state.pool, identity.organization_id, queue_id, &req).await?;

    publish(
        &state,
        identity.organization_id,
        EventKind::QueueUpdated,
        json!({ "queue_id": queue.id }),
    );
    Ok(Json(queue))
}

/// POST /api/queues/{queue_id}/call-next
pub async fn call_next(
    State(state): State<AppState>,
    Extension(identity): Extension<StaffIdentity>,
    Path(queue_id): Path<i64>,
) -> ApiResult<QueueTicket> {
    let ticket = db::queues::call_next(&state.pool, identity.organization_id, queue_id).await?;

    publish(
        &state,
        identity.organization_id,
        EventKind::TicketCalled,
        json!({
            "queue_id": queue_id,
            "ticket_id": ticket.id,
            "ticket_number": ticket.ticket_number,
        }),
    );
    Ok(Json(ticket))
}

#[derive(Deserialize)]
pub struct AdvanceTicketRequest {
    pub status: TicketStatus,
}

/// PATCH /api/queues/{queue_id}/tickets/{ticket_id}
pub async fn advance_ticket(
    State(state): State<AppState>,
    Extension(identity): Extension<StaffIdentity>,
    Path((queue_id, ticket_id)): Path<(i64, i64)>,
    Json(req): Json<AdvanceTicketRequest>,
) -> ApiResult<QueueTicket> {
    let ticket = db::queues::advance(
        &state.pool,
        identity.organization_id,
        queue_id,
        ticket_id,
        req.status,
    )
    .await?;

    publish(
        &state,
        identity.organization_id,
        EventKind::TicketUpdated,
        json!({
            "queue_id": queue_id,
            "ticket_id": ticket.id,
            "status": ticket.status,
        }),
    );
    Ok(Json(ticket))
}

/// POST /api/queues/{queue_id}/tickets/{ticket_id}/skip — force no-show
pub async fn skip_ticket(
    State(state): State<AppState>,
    Extension(identity): Extension<StaffIdentity>,
    Path((queue_id, ticket_id)): Path<(i64, i64)>,
) -> ApiResult<QueueTicket> {
    let ticket =
        db::queues::skip(&state.pool, identity.organization_id, queue_id, ticket_id).await?;

    publish(
        &state,
        identity.organization_id,
        EventKind::TicketUpdated,
        json!({
            "queue_id": queue_id,
            "ticket_id": ticket.id,
            "status": ticket.status,
        }),
    );
    Ok(Json(ticket))
}

/// DELETE /api/queues/{queue_id}/tickets/{ticket_id} — withdraw (hard delete)
pub async fn cancel_ticket(
    State(state): State<AppState>,
    Extension(identity): Extension<StaffIdentity>,
    Path((queue_id, ticket_id)): Path<(i64, i64)>,
) -> ApiResult<serde_json::Value> {
    let ticket =
        db::queues::cancel(&state.pool, identity.organization_id, queue_id, ticket_id).await?;

    publish(
        &state,
        identity.organization_id,
        EventKind::TicketCancelled,
        json!({ "queue_id": queue_id, "ticket_id": ticket.id }),
    );
    Ok(Json(json!({ "cancelled": ticket.id })))
}
