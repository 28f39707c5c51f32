//! API routes
//!
//! Three surfaces:
//! - `/api/public/*` — customer-facing, reached via QR tokens, no auth
//! - `/api/*` — staff endpoints behind JWT middleware, organization-scoped
//! - `/api/ws` — staff WebSocket carrying the organization's event stream

pub mod auth;
pub mod health;
pub mod menu;
pub mod orders;
pub mod organizations;
pub mod public;
pub mod queues;
pub mod tables;
pub mod ws;

use axum::routing::{get, patch, post};
use axum::{Router, middleware};
use serde_json::Value;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::auth::staff_auth_middleware;
use crate::state::AppState;
use shared::error::AppError;
use shared::events::{Event, EventKind};

pub type ApiResult<T> = Result<axum::Json<T>, AppError>;

/// Publish an event for one organization. Must only be called after the
/// corresponding write has committed.
pub(crate) fn publish(state: &AppState, organization_id: i64, kind: EventKind, data: Value) {
    state.events.publish(organization_id, Event::new(kind, data));
}

/// Create the combined router
pub fn create_router(state: AppState) -> Router {
    // Customer-facing, no auth — entered via QR tokens
    let public = Router::new()
        .route("/api/public/tables/{qr_token}/menu", get(public::table_menu))
        .route(
            "/api/public/tables/{qr_token}/orders",
            post(public::submit_order),
        )
        .route(
            "/api/public/queues/{qr_token}/join",
            post(public::join_queue),
        )
        .route("/api/public/tickets/{ticket_id}", get(public::ticket_status));

    // Staff endpoints (JWT authenticated, organization-scoped)
    let staff = Router::new()
        .route("/api/tables", get(tables::list).post(tables::create))
        .route("/api/tables/{table_id}/status", patch(tables::set_status))
        .route("/api/menu", get(menu::list).post(menu::create))
        .route(
            "/api/menu/{item_id}",
            patch(menu::update).delete(menu::delete),
        )
        .route("/api/orders", get(orders::list).post(orders::submit))
        .route("/api/orders/{order_id}", get(orders::get))
        .route("/api/orders/{order_id}/confirm", post(orders::confirm))
        .route(
            "/api/orders/{order_id}/items/{item_id}",
            patch(orders::advance_item).delete(orders::cancel_item),
        )
        .route("/api/orders/{order_id}/payment", post(orders::record_payment))
        .route(
            "/api/orders/{order_id}/split-bill",
            get(orders::get_split_bill).post(orders::create_split_bill),
        )
        .route("/api/shares/{share_id}/pay", post(orders::mark_share_paid))
        .route("/api/queues", get(queues::list).post(queues::create))
        .route("/api/queues/{queue_id}", patch(queues::update))
        .route("/api/queues/{queue_id}/call-next", post(queues::call_next))
        .route(
            "/api/queues/{queue_id}/tickets/{ticket_id}",
            patch(queues::advance_ticket).delete(queues::cancel_ticket),
        )
        .route(
            "/api/queues/{queue_id}/tickets/{ticket_id}/skip",
            post(queues::skip_ticket),
        )
        .route("/api/staff", get(auth::list_staff).post(auth::create_staff))
        .route(
            "/api/organizations",
            get(organizations::list).post(organizations::create),
        )
        .route(
            "/api/organizations/{org_id}/active",
            patch(organizations::set_active),
        )
        .route("/api/ws", get(ws::handle_staff_ws))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            staff_auth_middleware,
        ));

    Router::new()
        .route("/health", get(health::health_check))
        .route("/api/auth/login", post(auth::login))
        .merge(public)
        .merge(staff)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
