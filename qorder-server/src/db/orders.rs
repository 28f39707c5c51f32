//! Order lifecycle engine
//!
//! All multi-step writes here run in a single transaction: the caller sees
//! either the fully-applied mutation or the original state, never a partial
//! one. Event broadcasting happens in the API layer after these functions
//! return, so subscribers always observe committed state.

use rust_decimal::Decimal;
use shared::error::{AppError, ErrorCode};
use shared::models::{
    MenuItem, Order, OrderItem, OrderItemStatus, OrderLineInput, OrderStatus, OrderWithItems,
    TableStatus, order_total,
};
use shared::util::{now_millis, snowflake_id};
use sqlx::{PgConnection, PgPool};

use crate::error::{ServiceError, ServiceResult};

/// Result of advancing one item
pub struct ItemAdvance {
    pub item: OrderItem,
    /// True when this advance brought every item in the order to a
    /// settled state, meaning waiters should be alerted.
    pub order_ready: bool,
}

/// Result of cancelling one item
pub struct ItemCancel {
    pub item: OrderItem,
    /// Order row with the recomputed total (and possibly cancelled status)
    pub order: Order,
    /// True when this cancellation cancelled the whole pending order
    pub order_cancelled: bool,
}

/// Create a pending order from a customer cart.
///
/// Lines referencing unknown or unavailable menu items are silently
/// skipped; the order fails only if no valid line remains. Each surviving
/// line snapshots the menu price at this moment.
pub async fn submit(
    pool: &PgPool,
    organization_id: i64,
    table_id: i64,
    lines: &[OrderLineInput],
) -> ServiceResult<OrderWithItems> {
    let mut tx = pool.begin().await?;

    let table_exists: Option<(i64,)> = sqlx::query_as(
        "SELECT id FROM dining_tables WHERE organization_id = $1 AND id = $2 FOR UPDATE",
    )
    .bind(organization_id)
    .bind(table_id)
    .fetch_optional(&mut *tx)
    .await?;
    if table_exists.is_none() {
        return Err(ServiceError::App(ErrorCode::TableNotFound.into()));
    }

    let ids: Vec<i64> = lines.iter().map(|l| l.menu_item_id).collect();
    let menu_items: Vec<MenuItem> = sqlx::query_as(
        "SELECT * FROM menu_items
         WHERE organization_id = $1 AND id = ANY($2) AND is_available",
    )
    .bind(organization_id)
    .bind(&ids)
    .fetch_all(&mut *tx)
    .await?;

    let order_id = snowflake_id();
    let mut items = Vec::new();
    for line in lines {
        if line.quantity <= 0 {
            continue;
        }
        let Some(menu_item) = menu_items.iter().find(|m| m.id == line.menu_item_id) else {
            tracing::warn!(
                menu_item_id = line.menu_item_id,
                "Skipping unknown or unavailable menu item in order submission"
            );
            continue;
        };
        items.push(OrderItem {
            id: snowflake_id(),
            order_id,
            menu_item_id: menu_item.id,
            quantity: line.quantity,
            notes: line.notes.clone(),
            status: OrderItemStatus::Queued,
            price: menu_item.price,
            started_preparing_at: None,
        });
    }

    if items.is_empty() {
        return Err(ServiceError::App(ErrorCode::OrderEmpty.into()));
    }

    let total = order_total(&items);
    let order: Order = sqlx::query_as(
        "INSERT INTO orders (id, organization_id, table_id, status, total, created_at)
         VALUES ($1, $2, $3, 'pending', $4, $5)
         RETURNING *",
    )
    .bind(order_id)
    .bind(organization_id)
    .bind(table_id)
    .bind(total)
    .bind(now_millis())
    .fetch_one(&mut *tx)
    .await?;

    for item in &items {
        sqlx::query(
            "INSERT INTO order_items (id, order_id, menu_item_id, quantity, notes, status, price)
             VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(item.id)
        .bind(item.order_id)
        .bind(item.menu_item_id)
        .bind(item.quantity)
        .bind(&item.notes)
        .bind(item.status)
        .bind(item.price)
        .execute(&mut *tx)
        .await?;
    }

    sqlx::query("UPDATE dining_tables SET status = $1 WHERE id = $2")
        .bind(TableStatus::Occupied)
        .bind(table_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    Ok(OrderWithItems { order, items })
}

/// Hand the order off to the kitchen: `pending → confirmed`
pub async fn confirm(
    pool: &PgPool,
    organization_id: i64,
    order_id: i64,
) -> ServiceResult<OrderWithItems> {
    let mut tx = pool.begin().await?;

    let order = lock_order(&mut tx, organization_id, order_id).await?;
    match order.status {
        OrderStatus::Pending => {}
        OrderStatus::Completed => {
            return Err(ServiceError::App(ErrorCode::OrderAlreadyCompleted.into()));
        }
        OrderStatus::Cancelled => {
            return Err(ServiceError::App(ErrorCode::OrderAlreadyCancelled.into()));
        }
        OrderStatus::Confirmed => {
            return Err(ServiceError::App(ErrorCode::OrderNotPending.into()));
        }
    }

    let order: Order = sqlx::query_as("UPDATE orders SET status = $1 WHERE id = $2 RETURNING *")
        .bind(OrderStatus::Confirmed)
        .bind(order_id)
        .fetch_one(&mut *tx)
        .await?;

    let items = fetch_items(&mut tx, order_id).await?;
    tx.commit().await?;
    Ok(OrderWithItems { order, items })
}

/// Move one item forward on the preparation chain.
///
/// First entry into `preparing` stamps `started_preparing_at`; re-entering
/// is impossible since transitions are forward-only, so the stamp is never
/// overwritten. After an advance to `ready` the whole order is checked for
/// readiness.
pub async fn advance_item(
    pool: &PgPool,
    organization_id: i64,
    order_id: i64,
    item_id: i64,
    next: OrderItemStatus,
) -> ServiceResult<ItemAdvance> {
    let mut tx = pool.begin().await?;

    let order = lock_order(&mut tx, organization_id, order_id).await?;
    if order.status.is_terminal() {
        return Err(terminal_order_error(order.status));
    }
    if !order.status.allows_item_progress() {
        return Err(ServiceError::App(ErrorCode::OrderNotConfirmed.into()));
    }

    let item = lock_item(&mut tx, order_id, item_id).await?;
    if !item.status.can_advance_to(next) {
        return Err(ServiceError::App(
            AppError::new(ErrorCode::ItemTransitionInvalid)
                .with_detail("from", format!("{:?}", item.status))
                .with_detail("to", format!("{next:?}")),
        ));
    }

    let started_preparing_at = if next == OrderItemStatus::Preparing {
        item.started_preparing_at.or(Some(now_millis()))
    } else {
        item.started_preparing_at
    };

    let item: OrderItem = sqlx::query_as(
        "UPDATE order_items SET status = $1, started_preparing_at = $2
         WHERE id = $3
         RETURNING *",
    )
    .bind(next)
    .bind(started_preparing_at)
    .bind(item_id)
    .fetch_one(&mut *tx)
    .await?;

    let order_ready = if next == OrderItemStatus::Ready {
        all_items_settled(&mut tx, order_id).await?
    } else {
        false
    };

    tx.commit().await?;
    Ok(ItemAdvance { item, order_ready })
}

/// Cancel a queued item and recompute the order total.
///
/// Cancelling the last surviving item of a pending order cancels the whole
/// order and frees the table.
pub async fn cancel_item(
    pool: &PgPool,
    organization_id: i64,
    order_id: i64,
    item_id: i64,
) -> ServiceResult<ItemCancel> {
    let mut tx = pool.begin().await?;

    let order = lock_order(&mut tx, organization_id, order_id).await?;
    if order.status.is_terminal() {
        return Err(terminal_order_error(order.status));
    }

    let item = lock_item(&mut tx, order_id, item_id).await?;
    if !item.status.is_cancellable() {
        return Err(ServiceError::App(ErrorCode::ItemNotCancellable.into()));
    }

    let item: OrderItem =
        sqlx::query_as("UPDATE order_items SET status = $1 WHERE id = $2 RETURNING *")
            .bind(OrderItemStatus::Cancelled)
            .bind(item_id)
            .fetch_one(&mut *tx)
            .await?;

    let (total, surviving): (Decimal, i64) = sqlx::query_as(
        "SELECT COALESCE(SUM(quantity * price), 0), COUNT(*)
         FROM order_items WHERE order_id = $1 AND status != 'cancelled'",
    )
    .bind(order_id)
    .fetch_one(&mut *tx)
    .await?;

    let order_cancelled = surviving == 0 && order.status == OrderStatus::Pending;
    let order: Order = if order_cancelled {
        let order: Order = sqlx::query_as(
            "UPDATE orders SET total = $1, status = $2 WHERE id = $3 RETURNING *",
        )
        .bind(total)
        .bind(OrderStatus::Cancelled)
        .bind(order_id)
        .fetch_one(&mut *tx)
        .await?;
        sqlx::query("UPDATE dining_tables SET status = $1 WHERE id = $2")
            .bind(TableStatus::Free)
            .bind(order.table_id)
            .execute(&mut *tx)
            .await?;
        order
    } else {
        sqlx::query_as("UPDATE orders SET total = $1 WHERE id = $2 RETURNING *")
            .bind(total)
            .bind(order_id)
            .fetch_one(&mut *tx)
            .await?
    };

    tx.commit().await?;
    Ok(ItemCancel {
        item,
        order,
        order_cancelled,
    })
}

pub async fn get(
    pool: &PgPool,
    organization_id: i64,
    order_id: i64,
) -> ServiceResult<OrderWithItems> {
    let order: Order = sqlx::query_as("SELECT * FROM orders WHERE organization_id = $1 AND id = $2")
        .bind(organization_id)
        .bind(order_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| ServiceError::App(ErrorCode::OrderNotFound.into()))?;

    let items: Vec<OrderItem> =
        sqlx::query_as("SELECT * FROM order_items WHERE order_id = $1 ORDER BY id")
            .bind(order_id)
            .fetch_all(pool)
            .await?;

    Ok(OrderWithItems { order, items })
}

pub async fn list(
    pool: &PgPool,
    organization_id: i64,
    status: Option<OrderStatus>,
) -> Result<Vec<Order>, sqlx::Error> {
    match status {
        Some(status) => {
            sqlx::query_as(
                "SELECT * FROM orders WHERE organization_id = $1 AND status = $2
                 ORDER BY created_at DESC",
            )
            .bind(organization_id)
            .bind(status)
            .fetch_all(pool)
            .await
        }
        None => {
            sqlx::query_as(
                "SELECT * FROM orders WHERE organization_id = $1 ORDER BY created_at DESC",
            )
            .bind(organization_id)
            .fetch_all(pool)
            .await
        }
    }
}

// ── transaction-scoped helpers ──

pub(crate) async fn lock_order(
    conn: &mut PgConnection,
    organization_id: i64,
    order_id: i64,
) -> ServiceResult<Order> {
    sqlx::query_as("SELECT * FROM orders WHERE organization_id = $1 AND id = $2 FOR UPDATE")
        .bind(organization_id)
        .bind(order_id)
        .fetch_optional(conn)
        .await?
        .ok_or_else(|| ServiceError::App(ErrorCode::OrderNotFound.into()))
}

async fn lock_item(
    conn: &mut PgConnection,
    order_id: i64,
    item_id: i64,
) -> ServiceResult<OrderItem> {
    sqlx::query_as("SELECT * FROM order_items WHERE order_id = $1 AND id = $2 FOR UPDATE")
        .bind(order_id)
        .bind(item_id)
        .fetch_optional(conn)
        .await?
        .ok_or_else(|| ServiceError::App(ErrorCode::OrderItemNotFound.into()))
}

async fn fetch_items(conn: &mut PgConnection, order_id: i64) -> Result<Vec<OrderItem>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM order_items WHERE order_id = $1 ORDER BY id")
        .bind(order_id)
        .fetch_all(conn)
        .await
}

async fn all_items_settled(conn: &mut PgConnection, order_id: i64) -> Result<bool, sqlx::Error> {
    let unsettled: (i64,) = sqlx::query_as(
        "SELECT COUNT(*) FROM order_items
         WHERE order_id = $1 AND status NOT IN ('ready', 'delivered', 'cancelled')",
    )
    .bind(order_id)
    .fetch_one(conn)
    .await?;
    Ok(unsettled.0 == 0)
}

fn terminal_order_error(status: OrderStatus) -> ServiceError {
    let code = match status {
        OrderStatus::Completed => ErrorCode::OrderAlreadyCompleted,
        _ => ErrorCode::OrderAlreadyCancelled,
    };
    ServiceError::App(code.into())
}
