use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::core::{DbContext, DbError};

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum MaintenanceStatus {
    Pending,
    InProgress,
    Completed,
    Cancelled,
}

impl MaintenanceStatus {
    /// Allowed owner-initiated transitions. `completed` and `cancelled` are
    /// terminal; re-asserting the current status is a no-op, not an error.
    #[must_use]
    pub fn can_transition_to(self, next: Self) -> bool {
        self == next
            || matches!(
                (self, next),
                (Self::Pending, Self::InProgress)
                    | (Self::Pending, Self::Cancelled)
                    | (Self::InProgress, Self::Completed)
                    | (Self::InProgress, Self::Cancelled)
            )
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }
}

#[derive(Debug, Deserialize, FromRow, Serialize)]
pub struct MaintenanceRequest {
    pub id: String,
    pub tenant_id: String,
    pub room_id: String,
    pub request_type: String,
    pub description: Option<String>,
    pub status: MaintenanceStatus,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct NewMaintenanceRequest {
    pub tenant_id: String,
    pub room_id: String,
    pub request_type: String,
    pub description: Option<String>,
}

/// Request expanded with the submitting tenant and the room, for the
/// owner's management list.
#[derive(Debug, Deserialize, FromRow, Serialize)]
pub struct MaintenanceRequestDetails {
    pub id: String,
    pub tenant_id: String,
    pub room_id: String,
    pub request_type: String,
    pub description: Option<String>,
    pub status: MaintenanceStatus,
    pub tenant_name: Option<String>,
    pub room_number: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// New requests always start in `pending`.
pub async fn create_maintenance_request(
    db: &DbContext,
    new_request: NewMaintenanceRequest,
) -> Result<MaintenanceRequest, DbError> {
    let id = Uuid::new_v4().to_string();
    let request = sqlx::query_as::<_, MaintenanceRequest>(
        r#"
        INSERT INTO maintenance_requests (id, tenant_id, room_id, request_type, description, status, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, 'pending', CURRENT_TIMESTAMP, CURRENT_TIMESTAMP)
        RETURNING id, tenant_id, room_id, request_type, description, status, created_at, updated_at
        "#,
    )
    .bind(&id)
    .bind(&new_request.tenant_id)
    .bind(&new_request.room_id)
    .bind(&new_request.request_type)
    .bind(&new_request.description)
    .fetch_one(db)
    .await?;
    Ok(request)
}

pub async fn get_maintenance_request_by_id(db: &DbContext, id: &str) -> Result<MaintenanceRequest, DbError> {
    let request = sqlx::query_as::<_, MaintenanceRequest>(
        r#"
        SELECT id, tenant_id, room_id, request_type, description, status, created_at, updated_at
        FROM maintenance_requests
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_one(db)
    .await?;
    Ok(request)
}

pub async fn list_maintenance_requests(
    db: &DbContext,
    status: Option<MaintenanceStatus>,
) -> Result<Vec<MaintenanceRequestDetails>, DbError> {
    let requests = sqlx::query_as::<_, MaintenanceRequestDetails>(
        r#"
        SELECT
            m.id, m.tenant_id, m.room_id, m.request_type, m.description, m.status,
            p.full_name AS tenant_name,
            r.room_number,
            m.created_at, m.updated_at
        FROM maintenance_requests m
        JOIN profiles p ON p.id = m.tenant_id
        JOIN rooms r ON r.id = m.room_id
        WHERE ? IS NULL OR m.status = ?
        ORDER BY m.created_at DESC
        "#,
    )
    .bind(status)
    .bind(status)
    .fetch_all(db)
    .await?;
    Ok(requests)
}

pub async fn list_maintenance_requests_for_tenant(
    db: &DbContext,
    tenant_id: &str,
) -> Result<Vec<MaintenanceRequest>, DbError> {
    let requests = sqlx::query_as::<_, MaintenanceRequest>(
        r#"
        SELECT id, tenant_id, room_id, request_type, description, status, created_at, updated_at
        FROM maintenance_requests
        WHERE tenant_id = ?
        ORDER BY created_at DESC
        "#,
    )
    .bind(tenant_id)
    .fetch_all(db)
    .await?;
    Ok(requests)
}

pub async fn set_maintenance_status(
    db: &DbContext,
    id: &str,
    status: MaintenanceStatus,
) -> Result<MaintenanceRequest, DbError> {
    let request = sqlx::query_as::<_, MaintenanceRequest>(
        r#"
        UPDATE maintenance_requests
        SET status = ?, updated_at = CURRENT_TIMESTAMP
        WHERE id = ?
        RETURNING id, tenant_id, room_id, request_type, description, status, created_at, updated_at
        "#,
    )
    .bind(status)
    .bind(id)
    .fetch_one(db)
    .await?;
    Ok(request)
}

pub async fn count_maintenance_requests_by_status(
    db: &DbContext,
    status: MaintenanceStatus,
) -> Result<i64, DbError> {
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM maintenance_requests WHERE status = ?")
        .bind(status)
        .fetch_one(db)
        .await?;
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::MaintenanceStatus::{Cancelled, Completed, InProgress, Pending};

    #[test]
    fn test_allowed_transitions() {
        assert!(Pending.can_transition_to(InProgress));
        assert!(Pending.can_transition_to(Cancelled));
        assert!(InProgress.can_transition_to(Completed));
        assert!(InProgress.can_transition_to(Cancelled));
    }

    #[test]
    fn test_self_transitions_are_allowed() {
        for status in [Pending, InProgress, Completed, Cancelled] {
            assert!(status.can_transition_to(status));
        }
    }

    #[test]
    fn test_terminal_states_stick() {
        for next in [Pending, InProgress, Cancelled] {
            assert!(!Completed.can_transition_to(next));
        }
        for next in [Pending, InProgress, Completed] {
            assert!(!Cancelled.can_transition_to(next));
        }
    }

    #[test]
    fn test_no_skipping_pending_to_completed() {
        assert!(!Pending.can_transition_to(Completed));
        assert!(!InProgress.can_transition_to(Pending));
    }
}
