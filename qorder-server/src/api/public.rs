//! Customer-facing endpoints, reached by scanning a QR code
//!
//! No authentication: the opaque QR token is the capability. Every lookup
//! resolves the token first and inherits its organization scope.

use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;
use serde_json::json;
use shared::error::{AppError, ErrorCode};
use shared::events::EventKind;
use shared::models::{JoinQueueRequest, MenuItem, OrderLineInput, OrderWithItems, TicketStatusView};

use crate::db;
use crate::state::AppState;

use super::{ApiResult, publish};

/// A table's organization must still be active for customer flows
async fn require_active_org(state: &AppState, organization_id: i64) -> Result<(), AppError> {
    let org = db::organizations::find_by_id(&state.pool, organization_id)
        .await
        .map_err(|e| {
            tracing::error!("DB error resolving organization: {e}");
            AppError::new(ErrorCode::InternalError)
        })?
        .ok_or_else(|| AppError::new(ErrorCode::OrganizationNotFound))?;
    if !org.is_active {
        return Err(AppError::new(ErrorCode::OrganizationInactive));
    }
    Ok(())
}

/// GET /api/public/tables/{qr_token}/menu
pub async fn table_menu(
    State(state): State<AppState>,
    Path(qr_token): Path<String>,
) -> ApiResult<Vec<MenuItem>> {
    let table = db::tables::find_by_qr_token(&state.pool, &qr_token).await?;
    require_active_org(&state, table.organization_id).await?;

    let menu = db::menu_items::list_available(&state.pool, table.organization_id)
        .await
        .map_err(|e| {
            tracing::error!("DB error listing menu: {e}");
            AppError::new(ErrorCode::InternalError)
        })?;
    Ok(Json(menu))
}

#[derive(Deserialize)]
pub struct PublicOrderRequest {
    pub items: Vec<OrderLineInput>,
}

/// POST /api/public/tables/{qr_token}/orders
pub async fn submit_order(
    State(state): State<AppState>,
    Path(qr_token): Path<String>,
    Json(req): Json<PublicOrderRequest>,
) -> ApiResult<OrderWithItems> {
    let table = db::tables::find_by_qr_token(&state.pool, &qr_token).await?;
    require_active_org(&state, table.organization_id).await?;

    let order =
        db::orders::submit(&state.pool, table.organization_id, table.id, &req.items).await?;

    publish(
        &state,
        table.organization_id,
        EventKind::OrderCreated,
        json!({ "order_id": order.order.id, "table_id": order.order.table_id }),
    );
    Ok(Json(order))
}

/// POST /api/public/queues/{qr_token}/join
pub async fn join_queue(
    State(state): State<AppState>,
    Path(qr_token): Path<String>,
    Json(req): Json<JoinQueueRequest>,
) -> ApiResult<TicketStatusView> {
    let queue = db::queues::find_by_qr_token(&state.pool, &qr_token).await?;
    require_active_org(&state, queue.organization_id).await?;

    let (view, organization_id) = db::queues::join(&state.pool, &qr_token, &req).await?;

    publish(
        &state,
        organization_id,
        EventKind::TicketCreated,
        json!({
            "queue_id": view.ticket.queue_id,
            "ticket_id": view.ticket.id,
            "ticket_number": view.ticket.ticket_number,
        }),
    );
    Ok(Json(view))
}

/// GET /api/public/tickets/{ticket_id} — position and wait, recomputed live
pub async fn ticket_status(
    State(state): State<AppState>,
    Path(ticket_id): Path<i64>,
) -> ApiResult<TicketStatusView> {
    let view = db::queues::ticket_view(&state.pool, ticket_id).await?;
    Ok(Json(view))
}
