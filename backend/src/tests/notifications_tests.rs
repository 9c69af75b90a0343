use axum::http::StatusCode;
use axum::http::header;
use serde_json::Value;

use crate::db;
use crate::tests::support;
use crate::tests::support::{OWNER_EMAIL, TENANT_EMAIL};

async fn seed_notification(app: &support::TestApp, user_id: &str, title: &str) -> String {
    let notification = db::create_notification(
        &app.context.db,
        db::NewNotification {
            user_id: user_id.to_string(),
            title: title.to_string(),
            message: "message body".to_string(),
            kind: db::NotificationKind::Info,
            link: None,
        },
    )
    .await
    .unwrap();
    notification.id
}

#[tokio::test]
async fn test_feed_is_scoped_to_the_caller() {
    let app = support::create_test_app().await;
    seed_notification(&app, &app.tenant_id, "Rent due reminder").await;
    seed_notification(&app, &app.tenant_id, "Maintenance update").await;
    seed_notification(&app, &app.owner_id, "New maintenance request").await;

    let tenant_token = support::login(&app.server, TENANT_EMAIL).await;
    let response = app
        .server
        .get("/api/notifications")
        .add_header(header::AUTHORIZATION, support::bearer(&tenant_token))
        .await;

    response.assert_status(StatusCode::OK);
    let body: Value = response.json();
    let titles: Vec<&str> = body["notifications"]
        .as_array()
        .unwrap()
        .iter()
        .map(|n| n["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles.len(), 2);
    assert!(!titles.contains(&"New maintenance request"));
}

#[tokio::test]
async fn test_unread_count_tracks_mark_read() {
    let app = support::create_test_app().await;
    let first = seed_notification(&app, &app.tenant_id, "First").await;
    seed_notification(&app, &app.tenant_id, "Second").await;

    let token = support::login(&app.server, TENANT_EMAIL).await;

    let count_response = app
        .server
        .get("/api/notifications/unread-count")
        .add_header(header::AUTHORIZATION, support::bearer(&token))
        .await;
    assert_eq!(count_response.json::<Value>()["unread_count"], 2);

    app.server
        .put(&format!("/api/notifications/{first}/read"))
        .add_header(header::AUTHORIZATION, support::bearer(&token))
        .await
        .assert_status(StatusCode::OK);

    let count_response = app
        .server
        .get("/api/notifications/unread-count")
        .add_header(header::AUTHORIZATION, support::bearer(&token))
        .await;
    assert_eq!(count_response.json::<Value>()["unread_count"], 1);
}

#[tokio::test]
async fn test_mark_all_read_is_idempotent() {
    let app = support::create_test_app().await;
    seed_notification(&app, &app.tenant_id, "First").await;
    seed_notification(&app, &app.tenant_id, "Second").await;
    seed_notification(&app, &app.tenant_id, "Third").await;

    let token = support::login(&app.server, TENANT_EMAIL).await;

    // First call marks everything read
    let first_call = app
        .server
        .put("/api/notifications/read-all")
        .add_header(header::AUTHORIZATION, support::bearer(&token))
        .await;
    first_call.assert_status(StatusCode::OK);
    assert_eq!(first_call.json::<Value>()["updated"], 3);

    // Second call finds nothing unread and still succeeds
    let second_call = app
        .server
        .put("/api/notifications/read-all")
        .add_header(header::AUTHORIZATION, support::bearer(&token))
        .await;
    second_call.assert_status(StatusCode::OK);
    assert_eq!(second_call.json::<Value>()["updated"], 0);

    let list_response = app
        .server
        .get("/api/notifications")
        .add_header(header::AUTHORIZATION, support::bearer(&token))
        .await;
    let body: Value = list_response.json();
    assert!(
        body["notifications"]
            .as_array()
            .unwrap()
            .iter()
            .all(|n| n["is_read"] == true)
    );
}

#[tokio::test]
async fn test_cannot_touch_another_users_notification() {
    let app = support::create_test_app().await;
    let owner_notification = seed_notification(&app, &app.owner_id, "Owner only").await;

    let tenant_token = support::login(&app.server, TENANT_EMAIL).await;

    app.server
        .put(&format!("/api/notifications/{owner_notification}/read"))
        .add_header(header::AUTHORIZATION, support::bearer(&tenant_token))
        .await
        .assert_status(StatusCode::NOT_FOUND);

    app.server
        .delete(&format!("/api/notifications/{owner_notification}"))
        .add_header(header::AUTHORIZATION, support::bearer(&tenant_token))
        .await
        .assert_status(StatusCode::NOT_FOUND);

    // The owner still sees it
    let owner_token = support::login(&app.server, OWNER_EMAIL).await;
    let response = app
        .server
        .get("/api/notifications")
        .add_header(header::AUTHORIZATION, support::bearer(&owner_token))
        .await;
    assert_eq!(response.json::<Value>()["notifications"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_delete_removes_own_notification() {
    let app = support::create_test_app().await;
    let id = seed_notification(&app, &app.tenant_id, "Disposable").await;

    let token = support::login(&app.server, TENANT_EMAIL).await;

    app.server
        .delete(&format!("/api/notifications/{id}"))
        .add_header(header::AUTHORIZATION, support::bearer(&token))
        .await
        .assert_status(StatusCode::OK);

    let response = app
        .server
        .get("/api/notifications")
        .add_header(header::AUTHORIZATION, support::bearer(&token))
        .await;
    assert!(response.json::<Value>()["notifications"].as_array().unwrap().is_empty());
}
