//! Payment and split-bill models

use crate::error::{AppError, ErrorCode};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Deviations of a full cent or more between the order total and the sum of
/// bill shares are rejected; anything smaller is treated as rounding noise.
pub const SHARE_TOLERANCE_CENTS: i64 = 1;

/// Payment method. Payments are recorded, not processed externally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(type_name = "payment_method", rename_all = "snake_case"))]
pub enum PaymentMethod {
    Cash,
    Card,
}

/// Settlement record, exactly one per order (unique on `order_id`).
///
/// A split payment is a single Payment fronting multiple [`BillShare`]s;
/// "pending settlement" is represented by the existence of unpaid shares,
/// not by a status field.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Payment {
    pub id: i64,
    pub order_id: i64,
    pub table_id: i64,
    pub amount: Decimal,
    pub method: PaymentMethod,
    pub is_split: bool,
    pub created_at: i64,
}

/// One customer's claim within a split payment
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct BillShare {
    pub id: i64,
    pub payment_id: i64,
    pub customer_name: String,
    pub amount: Decimal,
    pub paid: bool,
}

/// One entry of a split-bill request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShareInput {
    pub customer_name: String,
    pub amount: Decimal,
}

/// Result of creating a split bill
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SplitBill {
    pub payment: Payment,
    pub shares: Vec<BillShare>,
}

/// Validate a split-bill share list against the authoritative order total.
///
/// Rules:
/// - at least one share
/// - every share has a non-empty customer name and a positive amount
/// - the share amounts sum to the order total (sub-cent rounding tolerated)
pub fn validate_shares(order_total: Decimal, shares: &[ShareInput]) -> Result<(), AppError> {
    if shares.is_empty() {
        return Err(AppError::new(ErrorCode::SharesRequired));
    }

    let mut sum = Decimal::ZERO;
    for share in shares {
        if share.customer_name.trim().is_empty() {
            return Err(AppError::new(ErrorCode::ShareNameRequired));
        }
        if share.amount <= Decimal::ZERO {
            return Err(AppError::new(ErrorCode::ShareInvalidAmount)
                .with_detail("customer_name", share.customer_name.clone()));
        }
        sum += share.amount;
    }

    let tolerance = Decimal::new(SHARE_TOLERANCE_CENTS, 2);
    if (sum - order_total).abs() >= tolerance {
        return Err(AppError::new(ErrorCode::ShareTotalMismatch)
            .with_detail("expected", order_total.to_string())
            .with_detail("received", sum.to_string()));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn share(name: &str, amount: &str) -> ShareInput {
        ShareInput {
            customer_name: name.to_string(),
            amount: d(amount),
        }
    }

    #[test]
    fn accepts_exact_split() {
        let shares = vec![share("Alice", "12.00"), share("Bob", "8.00")];
        assert!(validate_shares(d("20.00"), &shares).is_ok());
    }

    #[test]
    fn accepts_sub_cent_rounding() {
        // 10.00 three ways with fractional cents: off by a third of a cent
        let shares = vec![
            share("A", "3.333"),
            share("B", "3.333"),
            share("C", "3.333"),
        ];
        assert!(validate_shares(d("10.00"), &shares).is_ok());
    }

    #[test]
    fn rejects_one_cent_short() {
        let shares = vec![share("Solo", "19.99")];
        let err = validate_shares(d("20.00"), &shares).unwrap_err();
        assert_eq!(err.code, ErrorCode::ShareTotalMismatch);
    }

    #[test]
    fn rejects_empty_share_list() {
        let err = validate_shares(d("20.00"), &[]).unwrap_err();
        assert_eq!(err.code, ErrorCode::SharesRequired);
    }

    #[test]
    fn rejects_blank_customer_name() {
        let shares = vec![share("  ", "20.00")];
        let err = validate_shares(d("20.00"), &shares).unwrap_err();
        assert_eq!(err.code, ErrorCode::ShareNameRequired);
    }

    #[test]
    fn rejects_non_positive_amounts() {
        let shares = vec![share("Alice", "0.00"), share("Bob", "20.00")];
        let err = validate_shares(d("20.00"), &shares).unwrap_err();
        assert_eq!(err.code, ErrorCode::ShareInvalidAmount);

        let shares = vec![share("Alice", "-1.00"), share("Bob", "21.00")];
        let err = validate_shares(d("20.00"), &shares).unwrap_err();
        assert_eq!(err.code, ErrorCode::ShareInvalidAmount);
    }

    #[test]
    fn overshoot_is_rejected_too() {
        let shares = vec![share("Alice", "12.00"), share("Bob", "8.50")];
        let err = validate_shares(d("20.00"), &shares).unwrap_err();
        assert_eq!(err.code, ErrorCode::ShareTotalMismatch);
    }
}
