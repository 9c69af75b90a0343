use axum::http::StatusCode;
use axum::http::header;
use serde_json::Value;
use serde_json::json;

use crate::auth;
use crate::core;
use crate::db;
use crate::tests::support;
use crate::tests::support::{OWNER_EMAIL, TENANT_EMAIL, TEST_PASSWORD};

async fn submit_request(app: &support::TestApp, tenant_token: &str) -> String {
    let response = app
        .server
        .post("/api/tenant/maintenance")
        .add_header(header::AUTHORIZATION, support::bearer(tenant_token))
        .json(&json!({
            "request_type": "plumbing",
            "description": "The kitchen tap is leaking."
        }))
        .await;

    response.assert_status(StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["request"]["status"], "pending");
    body["request"]["id"].as_str().unwrap().to_string()
}

async fn set_status(app: &support::TestApp, owner_token: &str, id: &str, status: &str) -> axum_test::TestResponse {
    app.server
        .put(&format!("/api/owner/maintenance/{id}/status"))
        .add_header(header::AUTHORIZATION, support::bearer(owner_token))
        .json(&json!({ "status": status }))
        .await
}

#[tokio::test]
async fn test_new_requests_start_pending_and_appear_in_owner_list() {
    let app = support::create_test_app().await;
    let tenant_token = support::login(&app.server, TENANT_EMAIL).await;
    let owner_token = support::login(&app.server, OWNER_EMAIL).await;

    submit_request(&app, &tenant_token).await;

    let list_response = app
        .server
        .get("/api/owner/maintenance")
        .add_header(header::AUTHORIZATION, support::bearer(&owner_token))
        .await;

    list_response.assert_status(StatusCode::OK);
    let body: Value = list_response.json();
    let requests = body["requests"].as_array().unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0]["status"], "pending");
    assert_eq!(requests[0]["tenant_name"], "Ravi Kumar");
    assert_eq!(requests[0]["room_number"], "101");
}

#[tokio::test]
async fn test_owner_walks_a_request_through_its_lifecycle() {
    let app = support::create_test_app().await;
    let tenant_token = support::login(&app.server, TENANT_EMAIL).await;
    let owner_token = support::login(&app.server, OWNER_EMAIL).await;

    let id = submit_request(&app, &tenant_token).await;

    let response = set_status(&app, &owner_token, &id, "in_progress").await;
    response.assert_status(StatusCode::OK);
    assert_eq!(response.json::<Value>()["request"]["status"], "in_progress");

    let response = set_status(&app, &owner_token, &id, "completed").await;
    response.assert_status(StatusCode::OK);
    assert_eq!(response.json::<Value>()["request"]["status"], "completed");
}

#[tokio::test]
async fn test_pending_cannot_jump_straight_to_completed() {
    let app = support::create_test_app().await;
    let tenant_token = support::login(&app.server, TENANT_EMAIL).await;
    let owner_token = support::login(&app.server, OWNER_EMAIL).await;

    let id = submit_request(&app, &tenant_token).await;

    let response = set_status(&app, &owner_token, &id, "completed").await;
    response.assert_status(StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_completed_requests_are_terminal() {
    let app = support::create_test_app().await;
    let tenant_token = support::login(&app.server, TENANT_EMAIL).await;
    let owner_token = support::login(&app.server, OWNER_EMAIL).await;

    let id = submit_request(&app, &tenant_token).await;
    set_status(&app, &owner_token, &id, "in_progress").await.assert_status(StatusCode::OK);
    set_status(&app, &owner_token, &id, "completed").await.assert_status(StatusCode::OK);

    for next in ["pending", "in_progress", "cancelled"] {
        let response = set_status(&app, &owner_token, &id, next).await;
        response.assert_status(StatusCode::CONFLICT);
    }
}

#[tokio::test]
async fn test_cancelled_requests_are_terminal() {
    let app = support::create_test_app().await;
    let tenant_token = support::login(&app.server, TENANT_EMAIL).await;
    let owner_token = support::login(&app.server, OWNER_EMAIL).await;

    let id = submit_request(&app, &tenant_token).await;
    set_status(&app, &owner_token, &id, "cancelled").await.assert_status(StatusCode::OK);

    let response = set_status(&app, &owner_token, &id, "in_progress").await;
    response.assert_status(StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_reasserting_the_current_status_is_accepted() {
    let app = support::create_test_app().await;
    let tenant_token = support::login(&app.server, TENANT_EMAIL).await;
    let owner_token = support::login(&app.server, OWNER_EMAIL).await;

    let id = submit_request(&app, &tenant_token).await;

    let response = set_status(&app, &owner_token, &id, "pending").await;
    response.assert_status(StatusCode::OK);
}

#[tokio::test]
async fn test_tenant_cannot_change_request_status() {
    let app = support::create_test_app().await;
    let tenant_token = support::login(&app.server, TENANT_EMAIL).await;

    let id = submit_request(&app, &tenant_token).await;

    let response = app
        .server
        .put(&format!("/api/owner/maintenance/{id}/status"))
        .add_header(header::AUTHORIZATION, support::bearer(&tenant_token))
        .json(&json!({ "status": "completed" }))
        .await;

    response.assert_status(StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_status_change_notifies_the_tenant() {
    let app = support::create_test_app().await;
    let tenant_token = support::login(&app.server, TENANT_EMAIL).await;
    let owner_token = support::login(&app.server, OWNER_EMAIL).await;

    let id = submit_request(&app, &tenant_token).await;
    set_status(&app, &owner_token, &id, "in_progress").await.assert_status(StatusCode::OK);

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
    assert!(titles.contains(&"Maintenance update"));
}

#[tokio::test]
async fn test_tenant_without_lease_cannot_submit_requests() {
    let app = support::create_test_app().await;

    // A tenant account that has no lease yet
    let password_hash = auth::hash_password(TEST_PASSWORD).unwrap();
    let user = db::create_user(
        &app.context.db,
        db::NewUser {
            email: "newcomer@example.com".to_string(),
            password_hash,
        },
    )
    .await
    .unwrap();
    db::create_profile(
        &app.context.db,
        db::NewProfile {
            id: user.id,
            full_name: Some("Meera Singh".to_string()),
            role: core::Role::Tenant,
        },
    )
    .await
    .unwrap();

    let token = support::login(&app.server, "newcomer@example.com").await;
    let response = app
        .server
        .post("/api/tenant/maintenance")
        .add_header(header::AUTHORIZATION, support::bearer(&token))
        .json(&json!({
            "request_type": "electrical"
        }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}
