use axum::Extension;
use axum::Json;
use axum::extract::{Path, State};
use axum::response::IntoResponse;
use serde_json::json;

use crate::auth;
use crate::core;
use crate::db;
use crate::routes::api::ApiError;

/// Lists the caller's notifications, newest first. A failed read degrades to
/// an empty feed rather than an error; the feed is not worth an error banner.
pub async fn list(
    State(context): State<core::ArcContext>,
    Extension(claims): Extension<auth::AccessTokenClaims>,
) -> impl IntoResponse {
    let notifications = match db::list_notifications_for_user(&context.db, &claims.sub).await {
        Ok(notifications) => notifications,
        Err(e) => {
            tracing::warn!(user_id = claims.sub, "Failed to fetch notifications: {}", e);
            Vec::new()
        }
    };

    Json(json!({"result": "ok", "notifications": notifications}))
}

pub async fn unread_count(
    State(context): State<core::ArcContext>,
    Extension(claims): Extension<auth::AccessTokenClaims>,
) -> Result<impl IntoResponse, ApiError> {
    let count = db::unread_notification_count(&context.db, &claims.sub).await?;
    Ok(Json(json!({"result": "ok", "unread_count": count})))
}

pub async fn mark_read(
    State(context): State<core::ArcContext>,
    Extension(claims): Extension<auth::AccessTokenClaims>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let updated = db::mark_notification_read(&context.db, &id, &claims.sub).await?;
    if updated == 0 {
        return Err(ApiError::NotFound("Notification"));
    }
    Ok(Json(json!({"result": "ok"})))
}

/// Idempotent: a second call finds nothing unread and still succeeds.
pub async fn mark_all_read(
    State(context): State<core::ArcContext>,
    Extension(claims): Extension<auth::AccessTokenClaims>,
) -> Result<impl IntoResponse, ApiError> {
    let updated = db::mark_all_notifications_read(&context.db, &claims.sub).await?;
    Ok(Json(json!({"result": "ok", "updated": updated})))
}

pub async fn delete(
    State(context): State<core::ArcContext>,
    Extension(claims): Extension<auth::AccessTokenClaims>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let deleted = db::delete_notification(&context.db, &id, &claims.sub).await?;
    if deleted == 0 {
        return Err(ApiError::NotFound("Notification"));
    }
    Ok(Json(json!({"result": "ok"})))
}
