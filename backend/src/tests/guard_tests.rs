use axum::http::StatusCode;
use axum::http::header;
use serde_json::Value;

use crate::tests::support;
use crate::tests::support::{OWNER_EMAIL, TENANT_EMAIL};

fn location(response: &axum_test::TestResponse) -> String {
    response.header(header::LOCATION).to_str().unwrap().to_string()
}

#[tokio::test]
async fn test_unauthenticated_page_request_redirects_to_login() {
    let app = support::create_test_app().await;

    let response = app.server.get("/owner/rooms").await;

    response.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/login");
}

#[tokio::test]
async fn test_tenant_requesting_owner_page_redirects_to_tenant_dashboard() {
    let app = support::create_test_app().await;
    let token = support::login(&app.server, TENANT_EMAIL).await;

    let response = app
        .server
        .get("/owner/rooms")
        .add_header(header::COOKIE, support::cookie(&token))
        .await;

    response.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/tenant");
}

#[tokio::test]
async fn test_owner_requesting_tenant_page_redirects_to_owner_dashboard() {
    let app = support::create_test_app().await;
    let token = support::login(&app.server, OWNER_EMAIL).await;

    let response = app
        .server
        .get("/tenant/payments")
        .add_header(header::COOKIE, support::cookie(&token))
        .await;

    response.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/owner");
}

#[tokio::test]
async fn test_matching_role_page_renders_the_shell() {
    let app = support::create_test_app().await;
    let token = support::login(&app.server, OWNER_EMAIL).await;

    let response = app
        .server
        .get("/owner/rooms")
        .add_header(header::COOKIE, support::cookie(&token))
        .await;

    response.assert_status(StatusCode::OK);
    assert!(response.text().contains("<div id=\"root\">"));
}

#[tokio::test]
async fn test_root_redirects_to_role_dashboard() {
    let app = support::create_test_app().await;

    let owner_token = support::login(&app.server, OWNER_EMAIL).await;
    let response = app
        .server
        .get("/")
        .add_header(header::COOKIE, support::cookie(&owner_token))
        .await;
    response.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/owner");

    let tenant_token = support::login(&app.server, TENANT_EMAIL).await;
    let response = app
        .server
        .get("/")
        .add_header(header::COOKIE, support::cookie(&tenant_token))
        .await;
    response.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/tenant");
}

#[tokio::test]
async fn test_login_page_renders_without_session() {
    let app = support::create_test_app().await;

    let response = app.server.get("/login").await;

    response.assert_status(StatusCode::OK);
    assert!(response.text().contains("<div id=\"root\">"));
}

#[tokio::test]
async fn test_unmatched_path_redirects_to_owner_dashboard() {
    let app = support::create_test_app().await;

    let response = app.server.get("/definitely/not/a/page").await;

    response.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/owner");
}

#[tokio::test]
async fn test_api_gate_rejects_unauthenticated_with_login_location() {
    let app = support::create_test_app().await;

    let response = app.server.get("/api/owner/rooms").await;

    response.assert_status(StatusCode::UNAUTHORIZED);
    let body: Value = response.json();
    assert_eq!(body["result"], "error");
    assert_eq!(body["location"], "/login");
}

#[tokio::test]
async fn test_api_gate_rejects_wrong_role_with_dashboard_location() {
    let app = support::create_test_app().await;
    let token = support::login(&app.server, TENANT_EMAIL).await;

    let response = app
        .server
        .get("/api/owner/rooms")
        .add_header(header::AUTHORIZATION, support::bearer(&token))
        .await;

    response.assert_status(StatusCode::FORBIDDEN);
    let body: Value = response.json();
    assert_eq!(body["location"], "/tenant");
}

#[tokio::test]
async fn test_static_asset_is_served_by_the_fallback() {
    let app = support::create_test_app().await;

    let response = app.server.get("/app.js").await;

    response.assert_status(StatusCode::OK);
    assert!(
        response
            .header(header::CONTENT_TYPE)
            .to_str()
            .unwrap()
            .contains("javascript")
    );
}
