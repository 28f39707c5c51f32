//! Order lifecycle, payment and split-bill endpoints
//!
//! Handlers call the engine, then publish the corresponding event — the
//! engine has already committed, so subscribers re-querying on receipt see
//! the new state.

use axum::extract::{Path, Query, State};
use axum::{Extension, Json};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use shared::error::{AppError, ErrorCode};
use shared::events::EventKind;
use shared::models::{
    Order, OrderItem, OrderItemStatus, OrderLineInput, OrderStatus, OrderWithItems, Payment,
    PaymentMethod, ShareInput, SplitBill,
};

use crate::auth::StaffIdentity;
use crate::db;
use crate::state::AppState;

use super::{ApiResult, publish};

#[derive(Deserialize)]
pub struct ListQuery {
    pub status: Option<OrderStatus>,
}

/// GET /api/orders?status=
pub async fn list(
    State(state): State<AppState>,
    Extension(identity): Extension<StaffIdentity>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Vec<Order>> {
    let orders = db::orders::list(&state.pool, identity.organization_id, query.status)
        .await
        .map_err(|e| {
            tracing::error!("DB error listing orders: {e}");
            AppError::new(ErrorCode::InternalError)
        })?;
    Ok(Json(orders))
}

/// GET /api/orders/{order_id}
pub async fn get(
    State(state): State<AppState>,
    Extension(identity): Extension<StaffIdentity>,
    Path(order_id): Path<i64>,
) -> ApiResult<OrderWithItems> {
    let order = db::orders::get(&state.pool, identity.organization_id, order_id).await?;
    Ok(Json(order))
}

#[derive(Deserialize)]
pub struct SubmitOrderRequest {
    pub table_id: i64,
    pub items: Vec<OrderLineInput>,
}

/// POST /api/orders — staff submits on a customer's behalf
pub async fn submit(
    State(state): State<AppState>,
    Extension(identity): Extension<StaffIdentity>,
    Json(req): Json<SubmitOrderRequest>,
) -> ApiResult<OrderWithItems> {
    let order = db::orders::submit(
        &state.pool,
        identity.organization_id,
        req.table_id,
        &req.items,
    )
    .await?;

    publish(
        &state,
        identity.organization_id,
        EventKind::OrderCreated,
        json!({ "order_id": order.order.id, "table_id": order.order.table_id }),
    );
    Ok(Json(order))
}

/// POST /api/orders/{order_id}/confirm — the kitchen hand-off
pub async fn confirm(
    State(state): State<AppState>,
    Extension(identity): Extension<StaffIdentity>,
    Path(order_id): Path<i64>,
) -> ApiResult<OrderWithItems> {
    let order = db::orders::confirm(&state.pool, identity.organization_id, order_id).await?;

    publish(
        &state,
        identity.organization_id,
        EventKind::OrderConfirmed,
        json!({ "order_id": order.order.id, "table_id": order.order.table_id }),
    );
    Ok(Json(order))
}

#[derive(Deserialize)]
pub struct AdvanceItemRequest {
    pub status: OrderItemStatus,
}

/// PATCH /api/orders/{order_id}/items/{item_id}
pub async fn advance_item(
    State(state): State<AppState>,
    Extension(identity): Extension<StaffIdentity>,
    Path((order_id, item_id)): Path<(i64, i64)>,
    Json(req): Json<AdvanceItemRequest>,
) -> ApiResult<OrderItem> {
    let advance = db::orders::advance_item(
        &state.pool,
        identity.organization_id,
        order_id,
        item_id,
        req.status,
    )
    .await?;

    publish(
        &state,
        identity.organization_id,
        EventKind::OrderItemUpdated,
        json!({
            "order_id": order_id,
            "item_id": advance.item.id,
            "status": advance.item.status,
        }),
    );
    if advance.order_ready {
        publish(
            &state,
            identity.organization_id,
            EventKind::OrderReady,
            json!({ "order_id": order_id }),
        );
    }
    Ok(Json(advance.item))
}

/// DELETE /api/orders/{order_id}/items/{item_id} — cancel a queued item
pub async fn cancel_item(
    State(state): State<AppState>,
    Extension(identity): Extension<StaffIdentity>,
    Path((order_id, item_id)): Path<(i64, i64)>,
) -> ApiResult<OrderWithItems> {
    let cancel =
        db::orders::cancel_item(&state.pool, identity.organization_id, order_id, item_id).await?;

    publish(
        &state,
        identity.organization_id,
        EventKind::OrderItemCancelled,
        json!({ "order_id": order_id, "item_id": cancel.item.id }),
    );
    if cancel.order_cancelled {
        publish(
            &state,
            identity.organization_id,
            EventKind::OrderCancelled,
            json!({ "order_id": order_id, "table_id": cancel.order.table_id }),
        );
    }

    let order = db::orders::get(&state.pool, identity.organization_id, order_id).await?;
    Ok(Json(order))
}

#[derive(Deserialize)]
pub struct PaymentRequest {
    pub table_id: i64,
    pub amount: Decimal,
    pub method: PaymentMethod,
}

/// POST /api/orders/{order_id}/payment — full settlement
pub async fn record_payment(
    State(state): State<AppState>,
    Extension(identity): Extension<StaffIdentity>,
    Path(order_id): Path<i64>,
    Json(req): Json<PaymentRequest>,
) -> ApiResult<Payment> {
    let payment = db::payments::record(
        &state.pool,
        identity.organization_id,
        order_id,
        req.table_id,
        req.amount,
        req.method,
    )
    .await?;

    publish(
        &state,
        identity.organization_id,
        EventKind::PaymentProcessed,
        json!({
            "payment_id": payment.id,
            "order_id": payment.order_id,
            "table_id": payment.table_id,
        }),
    );
    Ok(Json(payment))
}

#[derive(Deserialize)]
pub struct SplitBillRequest {
    pub table_id: i64,
    pub method: PaymentMethod,
    pub shares: Vec<ShareInput>,
}

/// POST /api/orders/{order_id}/split-bill — all-or-nothing
pub async fn create_split_bill(
    State(state): State<AppState>,
    Extension(identity): Extension<StaffIdentity>,
    Path(order_id): Path<i64>,
    Json(req): Json<SplitBillRequest>,
) -> ApiResult<SplitBill> {
    let split = db::payments::create_split_bill(
        &state.pool,
        identity.organization_id,
        order_id,
        req.table_id,
        req.method,
        &req.shares,
    )
    .await?;
    Ok(Json(split))
}

/// GET /api/orders/{order_id}/split-bill
pub async fn get_split_bill(
    State(state): State<AppState>,
    Extension(identity): Extension<StaffIdentity>,
    Path(order_id): Path<i64>,
) -> ApiResult<SplitBill> {
    let split = db::payments::get_split_bill(&state.pool, identity.organization_id, order_id).await?;
    Ok(Json(split))
}

/// POST /api/shares/{share_id}/pay
///
/// Paying the last share silently completes the order and frees the table;
/// the `split_bill_completed` event is the signal dashboards react to.
pub async fn mark_share_paid(
    State(state): State<AppState>,
    Extension(identity): Extension<StaffIdentity>,
    Path(share_id): Path<i64>,
) -> ApiResult<serde_json::Value> {
    let settlement =
        db::payments::mark_share_paid(&state.pool, identity.organization_id, share_id).await?;

    if settlement.completed {
        publish(
            &state,
            identity.organization_id,
            EventKind::SplitBillCompleted,
            json!({
                "payment_id": settlement.payment_id,
                "order_id": settlement.order_id,
                "table_id": settlement.table_id,
            }),
        );
    } else {
        publish(
            &state,
            identity.organization_id,
            EventKind::ShareUpdated,
            json!({
                "payment_id": settlement.payment_id,
                "share_id": settlement.share.id,
            }),
        );
    }

    Ok(Json(json!({
        "share": settlement.share,
        "order_completed": settlement.completed,
    })))
}
