use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::core::{DbContext, DbError};

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum VerificationStatus {
    Pending,
    Verified,
    Rejected,
}

impl VerificationStatus {
    /// A pending payment may be verified or rejected; verified and rejected
    /// are terminal. Re-asserting the current status is a no-op, not an error.
    #[must_use]
    pub fn can_transition_to(self, next: Self) -> bool {
        self == next || self == Self::Pending
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Verified => "verified",
            Self::Rejected => "rejected",
        }
    }
}

#[derive(Debug, Deserialize, FromRow, Serialize)]
pub struct Payment {
    pub id: String,
    pub tenant_id: String,
    pub room_id: String,
    pub amount: f64,
    pub payment_date: NaiveDate,
    pub payment_screenshot_url: Option<String>,
    pub verification_status: VerificationStatus,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct NewPayment {
    pub tenant_id: String,
    pub room_id: String,
    pub amount: f64,
    pub payment_date: NaiveDate,
    pub payment_screenshot_url: Option<String>,
}

/// Payment expanded with the paying tenant and the room, for the owner's
/// management list.
#[derive(Debug, Deserialize, FromRow, Serialize)]
pub struct PaymentDetails {
    pub id: String,
    pub tenant_id: String,
    pub room_id: String,
    pub amount: f64,
    pub payment_date: NaiveDate,
    pub payment_screenshot_url: Option<String>,
    pub verification_status: VerificationStatus,
    pub tenant_name: Option<String>,
    pub room_number: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// New payments always start in `pending` verification.
pub async fn create_payment(db: &DbContext, new_payment: NewPayment) -> Result<Payment, DbError> {
    let id = Uuid::new_v4().to_string();
    let payment = sqlx::query_as::<_, Payment>(
        r#"
        INSERT INTO payments (id, tenant_id, room_id, amount, payment_date, payment_screenshot_url, verification_status, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, 'pending', CURRENT_TIMESTAMP, CURRENT_TIMESTAMP)
        RETURNING id, tenant_id, room_id, amount, payment_date, payment_screenshot_url, verification_status, created_at, updated_at
        "#,
    )
    .bind(&id)
    .bind(&new_payment.tenant_id)
    .bind(&new_payment.room_id)
    .bind(new_payment.amount)
    .bind(new_payment.payment_date)
    .bind(&new_payment.payment_screenshot_url)
    .fetch_one(db)
    .await?;
    Ok(payment)
}

pub async fn get_payment_by_id(db: &DbContext, id: &str) -> Result<Payment, DbError> {
    let payment = sqlx::query_as::<_, Payment>(
        r#"
        SELECT id, tenant_id, room_id, amount, payment_date, payment_screenshot_url, verification_status, created_at, updated_at
        FROM payments
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_one(db)
    .await?;
    Ok(payment)
}

pub async fn list_payment_details(db: &DbContext) -> Result<Vec<PaymentDetails>, DbError> {
    let payments = sqlx::query_as::<_, PaymentDetails>(
        r#"
        SELECT
            y.id, y.tenant_id, y.room_id, y.amount, y.payment_date, y.payment_screenshot_url,
            y.verification_status,
            p.full_name AS tenant_name,
            r.room_number,
            y.created_at, y.updated_at
        FROM payments y
        JOIN profiles p ON p.id = y.tenant_id
        JOIN rooms r ON r.id = y.room_id
        ORDER BY y.payment_date DESC, y.created_at DESC
        "#,
    )
    .fetch_all(db)
    .await?;
    Ok(payments)
}

pub async fn list_payments_for_tenant(db: &DbContext, tenant_id: &str) -> Result<Vec<Payment>, DbError> {
    let payments = sqlx::query_as::<_, Payment>(
        r#"
        SELECT id, tenant_id, room_id, amount, payment_date, payment_screenshot_url, verification_status, created_at, updated_at
        FROM payments
        WHERE tenant_id = ?
        ORDER BY payment_date DESC, created_at DESC
        "#,
    )
    .bind(tenant_id)
    .fetch_all(db)
    .await?;
    Ok(payments)
}

pub async fn set_payment_verification(
    db: &DbContext,
    id: &str,
    status: VerificationStatus,
) -> Result<Payment, DbError> {
    let payment = sqlx::query_as::<_, Payment>(
        r#"
        UPDATE payments
        SET verification_status = ?, updated_at = CURRENT_TIMESTAMP
        WHERE id = ?
        RETURNING id, tenant_id, room_id, amount, payment_date, payment_screenshot_url, verification_status, created_at, updated_at
        "#,
    )
    .bind(status)
    .bind(id)
    .fetch_one(db)
    .await?;
    Ok(payment)
}

/// Sum of all verified payment amounts, for the owner's payment overview.
pub async fn verified_payment_total(db: &DbContext) -> Result<f64, DbError> {
    let total = sqlx::query_scalar::<_, f64>(
        "SELECT COALESCE(SUM(amount), 0.0) FROM payments WHERE verification_status = 'verified'",
    )
    .fetch_one(db)
    .await?;
    Ok(total)
}

pub async fn count_payments_by_status(db: &DbContext, status: VerificationStatus) -> Result<i64, DbError> {
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM payments WHERE verification_status = ?")
        .bind(status)
        .fetch_one(db)
        .await?;
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::VerificationStatus::{Pending, Rejected, Verified};

    #[test]
    fn test_pending_can_be_resolved_either_way() {
        assert!(Pending.can_transition_to(Verified));
        assert!(Pending.can_transition_to(Rejected));
    }

    #[test]
    fn test_resolved_payments_are_terminal() {
        assert!(!Verified.can_transition_to(Rejected));
        assert!(!Rejected.can_transition_to(Verified));
        assert!(!Verified.can_transition_to(Pending));
        assert!(!Rejected.can_transition_to(Pending));
    }

    #[test]
    fn test_reasserting_the_same_status_is_allowed() {
        for status in [Pending, Verified, Rejected] {
            assert!(status.can_transition_to(status));
        }
    }
}
