use axum::http::StatusCode;
use axum::http::header;
use serde_json::Value;
use serde_json::json;

use crate::tests::support;
use crate::tests::support::{OWNER_EMAIL, TENANT_EMAIL};

#[tokio::test]
async fn test_tenant_reads_own_profile_with_lease() {
    let app = support::create_test_app().await;
    let token = support::login(&app.server, TENANT_EMAIL).await;

    let response = app
        .server
        .get("/api/tenant/profile")
        .add_header(header::AUTHORIZATION, support::bearer(&token))
        .await;

    response.assert_status(StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["profile"]["full_name"], "Ravi Kumar");
    assert_eq!(body["email"], TENANT_EMAIL);
    assert_eq!(body["lease"]["room_id"], app.room_id.as_str());
    assert_eq!(body["lease"]["rent_due_day"], 5);
    assert_eq!(body["lease"]["aadhaar_verified"], false);
}

#[tokio::test]
async fn test_tenant_updates_contact_details() {
    let app = support::create_test_app().await;
    let token = support::login(&app.server, TENANT_EMAIL).await;

    let response = app
        .server
        .put("/api/tenant/profile")
        .add_header(header::AUTHORIZATION, support::bearer(&token))
        .json(&json!({
            "phone_number": "+91 98765 43210",
            "date_of_birth": "1994-07-15"
        }))
        .await;

    response.assert_status(StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["profile"]["phone_number"], "+91 98765 43210");
    assert_eq!(body["profile"]["date_of_birth"], "1994-07-15");
    // Untouched fields keep their values
    assert_eq!(body["profile"]["full_name"], "Ravi Kumar");
}

#[tokio::test]
async fn test_verification_submission_stores_documents_and_notifies_the_owner() {
    let app = support::create_test_app().await;
    let tenant_token = support::login(&app.server, TENANT_EMAIL).await;

    let response = app
        .server
        .post("/api/tenant/verification")
        .add_header(header::AUTHORIZATION, support::bearer(&tenant_token))
        .json(&json!({
            "aadhaar_number": "123412341234",
            "document_photo_url": "/files/tenant-photos/doc.jpg"
        }))
        .await;

    response.assert_status(StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["profile"]["aadhaar_number"], "123412341234");

    let owner_token = support::login(&app.server, OWNER_EMAIL).await;
    let notifications = app
        .server
        .get("/api/notifications")
        .add_header(header::AUTHORIZATION, support::bearer(&owner_token))
        .await;
    let titles: Vec<String> = notifications.json::<Value>()["notifications"]
        .as_array()
        .unwrap()
        .iter()
        .map(|n| n["title"].as_str().unwrap().to_string())
        .collect();
    assert!(titles.contains(&"Verification submitted".to_string()));
}

#[tokio::test]
async fn test_aadhaar_number_must_be_twelve_digits() {
    let app = support::create_test_app().await;
    let token = support::login(&app.server, TENANT_EMAIL).await;

    for bad_number in ["12345", "12341234123412", "12341234123a"] {
        let response = app
            .server
            .post("/api/tenant/verification")
            .add_header(header::AUTHORIZATION, support::bearer(&token))
            .json(&json!({ "aadhaar_number": bad_number }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
    }
}

#[tokio::test]
async fn test_owner_verification_flags_reach_the_lease() {
    let app = support::create_test_app().await;
    let owner_token = support::login(&app.server, OWNER_EMAIL).await;

    let response = app
        .server
        .put(&format!("/api/owner/tenants/{}/verification", app.tenant_id))
        .add_header(header::AUTHORIZATION, support::bearer(&owner_token))
        .json(&json!({ "aadhaar_verified": true }))
        .await;

    response.assert_status(StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["tenant"]["aadhaar_verified"], true);
    assert_eq!(body["tenant"]["contract_signed"], false);

    // The tenant is told about the verification
    let tenant_token = support::login(&app.server, TENANT_EMAIL).await;
    let notifications = app
        .server
        .get("/api/notifications")
        .add_header(header::AUTHORIZATION, support::bearer(&tenant_token))
        .await;
    let titles: Vec<String> = notifications.json::<Value>()["notifications"]
        .as_array()
        .unwrap()
        .iter()
        .map(|n| n["title"].as_str().unwrap().to_string())
        .collect();
    assert!(titles.contains(&"Identity verified".to_string()));
}

#[tokio::test]
async fn test_owner_tenant_list_is_expanded_with_profile_and_room() {
    let app = support::create_test_app().await;
    let owner_token = support::login(&app.server, OWNER_EMAIL).await;

    let response = app
        .server
        .get("/api/owner/tenants")
        .add_header(header::AUTHORIZATION, support::bearer(&owner_token))
        .await;

    response.assert_status(StatusCode::OK);
    let body: Value = response.json();
    let tenants = body["tenants"].as_array().unwrap();
    assert_eq!(tenants.len(), 1);
    assert_eq!(tenants[0]["full_name"], "Ravi Kumar");
    assert_eq!(tenants[0]["room_number"], "101");
}
