use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::core::{DbContext, DbError};

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum NotificationKind {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Deserialize, FromRow, Serialize)]
pub struct Notification {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub message: String,
    pub kind: NotificationKind,
    pub is_read: bool,
    pub link: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct NewNotification {
    pub user_id: String,
    pub title: String,
    pub message: String,
    pub kind: NotificationKind,
    pub link: Option<String>,
}

pub async fn create_notification(db: &DbContext, new_notification: NewNotification) -> Result<Notification, DbError> {
    let id = Uuid::new_v4().to_string();
    let notification = sqlx::query_as::<_, Notification>(
        r#"
        INSERT INTO notifications (id, user_id, title, message, kind, is_read, link, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, 0, ?, CURRENT_TIMESTAMP, CURRENT_TIMESTAMP)
        RETURNING id, user_id, title, message, kind, is_read, link, created_at, updated_at
        "#,
    )
    .bind(&id)
    .bind(&new_notification.user_id)
    .bind(&new_notification.title)
    .bind(&new_notification.message)
    .bind(new_notification.kind)
    .bind(&new_notification.link)
    .fetch_one(db)
    .await?;
    Ok(notification)
}

/// Newest first, the display order of the feed.
pub async fn list_notifications_for_user(db: &DbContext, user_id: &str) -> Result<Vec<Notification>, DbError> {
    let notifications = sqlx::query_as::<_, Notification>(
        r#"
        SELECT id, user_id, title, message, kind, is_read, link, created_at, updated_at
        FROM notifications
        WHERE user_id = ?
        ORDER BY created_at DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(db)
    .await?;
    Ok(notifications)
}

pub async fn unread_notification_count(db: &DbContext, user_id: &str) -> Result<i64, DbError> {
    let count = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM notifications WHERE user_id = ? AND is_read = 0",
    )
    .bind(user_id)
    .fetch_one(db)
    .await?;
    Ok(count)
}

/// Scoped to the owning user; returns the number of rows touched so callers
/// can distinguish "not yours / missing" from success.
pub async fn mark_notification_read(db: &DbContext, id: &str, user_id: &str) -> Result<u64, DbError> {
    let result = sqlx::query(
        r#"
        UPDATE notifications
        SET is_read = 1, updated_at = CURRENT_TIMESTAMP
        WHERE id = ? AND user_id = ?
        "#,
    )
    .bind(id)
    .bind(user_id)
    .execute(db)
    .await?;
    Ok(result.rows_affected())
}

/// Idempotent: marking an already-read feed again is a successful no-op.
pub async fn mark_all_notifications_read(db: &DbContext, user_id: &str) -> Result<u64, DbError> {
    let result = sqlx::query(
        r#"
        UPDATE notifications
        SET is_read = 1, updated_at = CURRENT_TIMESTAMP
        WHERE user_id = ? AND is_read = 0
        "#,
    )
    .bind(user_id)
    .execute(db)
    .await?;
    Ok(result.rows_affected())
}

pub async fn delete_notification(db: &DbContext, id: &str, user_id: &str) -> Result<u64, DbError> {
    let result = sqlx::query("DELETE FROM notifications WHERE id = ? AND user_id = ?")
        .bind(id)
        .bind(user_id)
        .execute(db)
        .await?;
    Ok(result.rows_affected())
}
