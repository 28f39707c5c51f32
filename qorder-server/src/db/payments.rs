//! Settlement: direct payments and the split-bill protocol
//!
//! Every path here is a single transaction. The critical property is that
//! "last share paid → order completed → table freed" is never observable
//! half-done; any failure rolls the whole step back and the caller may
//! retry with the same input.

use shared::error::ErrorCode;
use shared::models::{
    BillShare, Order, OrderStatus, Payment, PaymentMethod, ShareInput, SplitBill, TableStatus,
    validate_shares,
};
use shared::util::{now_millis, snowflake_id};
use sqlx::{PgConnection, PgPool};

use crate::error::{ServiceError, ServiceResult, map_unique_violation};

use super::orders::lock_order;

/// Result of marking one bill share paid
pub struct ShareSettlement {
    pub share: BillShare,
    pub payment_id: i64,
    pub order_id: i64,
    pub table_id: i64,
    /// True when this share was the last unpaid one: the order is now
    /// completed and the table freed.
    pub completed: bool,
}

/// Record a full (non-split) payment, completing the order and freeing
/// the table in the same transaction.
///
/// The stored order total is authoritative: a mismatching client amount is
/// rejected rather than trusted.
pub async fn record(
    pool: &PgPool,
    organization_id: i64,
    order_id: i64,
    table_id: i64,
    amount: rust_decimal::Decimal,
    method: PaymentMethod,
) -> ServiceResult<Payment> {
    let mut tx = pool.begin().await?;

    let order = lock_order(&mut tx, organization_id, order_id).await?;
    require_payable(&order, table_id)?;

    if amount != order.total {
        return Err(ServiceError::App(
            shared::error::AppError::new(ErrorCode::PaymentAmountMismatch)
                .with_detail("expected", order.total.to_string())
                .with_detail("received", amount.to_string()),
        ));
    }

    let payment = insert_payment(&mut tx, &order, method, false).await?;
    complete_order(&mut tx, &order).await?;

    tx.commit().await?;
    Ok(payment)
}

/// Create a split bill: one payment fronting one share per named customer,
/// all inserted atomically. Shares are validated against the stored order
/// total before anything is written.
pub async fn create_split_bill(
    pool: &PgPool,
    organization_id: i64,
    order_id: i64,
    table_id: i64,
    method: PaymentMethod,
    shares: &[ShareInput],
) -> ServiceResult<SplitBill> {
    let mut tx = pool.begin().await?;

    let order = lock_order(&mut tx, organization_id, order_id).await?;
    require_payable(&order, table_id)?;
    validate_shares(order.total, shares)?;

    let payment = insert_payment(&mut tx, &order, method, true).await?;

    let mut rows = Vec::with_capacity(shares.len());
    for share in shares {
        let row: BillShare = sqlx::query_as(
            "INSERT INTO bill_shares (id, payment_id, customer_name, amount)
             VALUES ($1, $2, $3, $4)
             RETURNING *",
        )
        .bind(snowflake_id())
        .bind(payment.id)
        .bind(share.customer_name.trim())
        .bind(share.amount)
        .fetch_one(&mut *tx)
        .await?;
        rows.push(row);
    }

    tx.commit().await?;
    Ok(SplitBill {
        payment,
        shares: rows,
    })
}

/// Mark one bill share paid. When it was the last unpaid share, the order
/// is completed and the table freed within the same transaction.
pub async fn mark_share_paid(
    pool: &PgPool,
    organization_id: i64,
    share_id: i64,
) -> ServiceResult<ShareSettlement> {
    let mut tx = pool.begin().await?;

    // Resolve the share's order, then lock the order row so concurrent
    // share payments on the same bill serialize.
    let target: Option<(i64, i64)> = sqlx::query_as(
        "SELECT p.id, p.order_id
         FROM bill_shares bs
         JOIN payments p ON p.id = bs.payment_id
         JOIN orders o ON o.id = p.order_id
         WHERE bs.id = $1 AND o.organization_id = $2",
    )
    .bind(share_id)
    .bind(organization_id)
    .fetch_optional(&mut *tx)
    .await?;
    let Some((payment_id, order_id)) = target else {
        return Err(ServiceError::App(ErrorCode::ShareNotFound.into()));
    };

    let order = lock_order(&mut tx, organization_id, order_id).await?;

    let share: BillShare =
        sqlx::query_as("UPDATE bill_shares SET paid = TRUE WHERE id = $1 RETURNING *")
            .bind(share_id)
            .fetch_one(&mut *tx)
            .await?;

    let unpaid: (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM bill_shares WHERE payment_id = $1 AND NOT paid")
            .bind(payment_id)
            .fetch_one(&mut *tx)
            .await?;

    let completed = unpaid.0 == 0 && order.status == OrderStatus::Confirmed;
    if completed {
        complete_order(&mut tx, &order).await?;
    }

    tx.commit().await?;
    Ok(ShareSettlement {
        share,
        payment_id,
        order_id,
        table_id: order.table_id,
        completed,
    })
}

pub async fn get_split_bill(
    pool: &PgPool,
    organization_id: i64,
    order_id: i64,
) -> ServiceResult<SplitBill> {
    let payment: Payment = sqlx::query_as(
        "SELECT p.* FROM payments p
         JOIN orders o ON o.id = p.order_id
         WHERE p.order_id = $1 AND o.organization_id = $2",
    )
    .bind(order_id)
    .bind(organization_id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| ServiceError::App(ErrorCode::PaymentNotFound.into()))?;

    let shares: Vec<BillShare> =
        sqlx::query_as("SELECT * FROM bill_shares WHERE payment_id = $1 ORDER BY id")
            .bind(payment.id)
            .fetch_all(pool)
            .await?;

    Ok(SplitBill { payment, shares })
}

// ── transaction-scoped helpers ──

/// An order can only be settled while confirmed, against its own table
fn require_payable(order: &Order, table_id: i64) -> Result<(), ServiceError> {
    match order.status {
        OrderStatus::Confirmed => {}
        OrderStatus::Pending => {
            return Err(ServiceError::App(ErrorCode::OrderNotConfirmed.into()));
        }
        OrderStatus::Completed => {
            return Err(ServiceError::App(ErrorCode::OrderAlreadyPaid.into()));
        }
        OrderStatus::Cancelled => {
            return Err(ServiceError::App(ErrorCode::OrderAlreadyCancelled.into()));
        }
    }
    if order.table_id != table_id {
        return Err(ServiceError::App(ErrorCode::TableNotFound.into()));
    }
    Ok(())
}

async fn insert_payment(
    conn: &mut PgConnection,
    order: &Order,
    method: PaymentMethod,
    is_split: bool,
) -> ServiceResult<Payment> {
    sqlx::query_as(
        "INSERT INTO payments (id, order_id, table_id, amount, method, is_split, created_at)
         VALUES ($1, $2, $3, $4, $5, $6, $7)
         RETURNING *",
    )
    .bind(snowflake_id())
    .bind(order.id)
    .bind(order.table_id)
    .bind(order.total)
    .bind(method)
    .bind(is_split)
    .bind(now_millis())
    .fetch_one(conn)
    .await
    .map_err(|e| map_unique_violation(e, ErrorCode::OrderAlreadyPaid))
}

async fn complete_order(conn: &mut PgConnection, order: &Order) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE orders SET status = $1 WHERE id = $2")
        .bind(OrderStatus::Completed)
        .bind(order.id)
        .execute(&mut *conn)
        .await?;
    sqlx::query("UPDATE dining_tables SET status = $1 WHERE id = $2")
        .bind(TableStatus::Free)
        .bind(order.table_id)
        .execute(conn)
        .await?;
    Ok(())
}
