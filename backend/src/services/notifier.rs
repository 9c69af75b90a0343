use crate::core;
use crate::db;

/// Best-effort notification fan-out for system events.
///
/// Notifications are a side channel of the triggering mutation, not part of
/// it: a failure here is logged and never fails the caller, so a verified
/// payment whose notification insert fails stays verified (the two remote
/// calls are independent and non-atomic).
pub async fn notify_user(
    db: &core::DbContext,
    user_id: &str,
    kind: db::NotificationKind,
    title: &str,
    message: &str,
    link: Option<&str>,
) {
    let new_notification = db::NewNotification {
        user_id: user_id.to_string(),
        title: title.to_string(),
        message: message.to_string(),
        kind,
        link: link.map(ToString::to_string),
    };

    if let Err(e) = db::create_notification(db, new_notification).await {
        tracing::warn!(user_id, title, "Failed to create notification: {}", e);
    }
}

/// Notifies every owner account. Used for tenant-initiated events such as new
/// maintenance requests and submitted payments.
pub async fn notify_owners(
    db: &core::DbContext,
    kind: db::NotificationKind,
    title: &str,
    message: &str,
    link: Option<&str>,
) {
    let owners = match db::list_profiles_by_role(db, core::Role::Owner).await {
        Ok(owners) => owners,
        Err(e) => {
            tracing::warn!(title, "Failed to list owners for notification: {}", e);
            return;
        }
    };

    for owner in owners {
        notify_user(db, &owner.id, kind, title, message, link).await;
    }
}
