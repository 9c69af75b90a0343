use axum::http::StatusCode;
use axum_test::TestServer;
use chrono::NaiveDate;
use serde_json::{Value, json};
use uuid::Uuid;

use crate::app;
use crate::auth;
use crate::cfg;
use crate::core;
use crate::db;

pub const OWNER_EMAIL: &str = "owner@example.com";
pub const TENANT_EMAIL: &str = "tenant@example.com";
pub const TEST_PASSWORD: &str = "abcdefghijklmnopqrstuvwxyz";
pub const JWT_SECRET: &str = "test__secret__key__for__jwt__testing";

pub struct TestApp {
    pub server: TestServer,
    pub context: core::ArcContext,
    pub owner_id: String,
    pub tenant_id: String,
    pub room_id: String,
}

pub fn default_settings() -> cfg::AppSettings {
    cfg::AppSettings {
        jwt: cfg::JwtSettings {
            access_token_expiry: 3600,
            refresh_token_expiry: 86400,
        },
        database: cfg::DatabaseSettings {
            url: "sqlite::memory:".to_string(),
            // A pooled in-memory SQLite database is per-connection; a single
            // connection keeps every query on the same database.
            max_connections: 1,
        },
        storage: cfg::StorageSettings {
            root: std::env::temp_dir()
                .join(format!("rentdesk-test-{}", Uuid::new_v4()))
                .to_string_lossy()
                .into_owned(),
            max_upload_bytes: 5 * 1024 * 1024,
        },
        ..Default::default()
    }
}

/// Builds a test server over a migrated in-memory database seeded with an
/// owner account and a tenant account that has a room and an active lease.
pub async fn create_test_app() -> TestApp {
    let settings = default_settings();
    let db = core::create_db_context(&settings.database).await.unwrap();
    db::migrations::run_embedded(&db).await.unwrap();

    let password_hash = auth::hash_password(TEST_PASSWORD).unwrap();

    let owner = db::create_user(
        &db,
        db::NewUser {
            email: OWNER_EMAIL.to_string(),
            password_hash: password_hash.clone(),
        },
    )
    .await
    .unwrap();
    db::create_profile(
        &db,
        db::NewProfile {
            id: owner.id.clone(),
            full_name: Some("Asha Patel".to_string()),
            role: core::Role::Owner,
        },
    )
    .await
    .unwrap();

    let tenant = db::create_user(
        &db,
        db::NewUser {
            email: TENANT_EMAIL.to_string(),
            password_hash,
        },
    )
    .await
    .unwrap();
    db::create_profile(
        &db,
        db::NewProfile {
            id: tenant.id.clone(),
            full_name: Some("Ravi Kumar".to_string()),
            role: core::Role::Tenant,
        },
    )
    .await
    .unwrap();

    let room = db::create_room(
        &db,
        db::NewRoom {
            room_number: "101".to_string(),
            floor_number: 1,
            monthly_rent: 750.0,
            is_occupied: false,
            current_tenant_id: None,
        },
    )
    .await
    .unwrap();
    db::create_tenant_lease(
        &db,
        db::NewTenantLease {
            id: tenant.id.clone(),
            room_id: room.id.clone(),
            lease_start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            lease_end_date: NaiveDate::from_ymd_opt(2024, 12, 31).unwrap(),
            rent_due_day: 5,
        },
    )
    .await
    .unwrap();
    db::set_room_occupancy(&db, &room.id, true, Some(&tenant.id)).await.unwrap();

    let jwt = auth::JwtContext::new(&settings.jwt, JWT_SECRET);
    let context = core::Context::new(db, jwt, settings);
    let server = TestServer::new(app::create_router(context.clone())).unwrap();

    TestApp {
        server,
        context,
        owner_id: owner.id,
        tenant_id: tenant.id,
        room_id: room.id,
    }
}

/// Logs in and returns the access token.
pub async fn login(server: &TestServer, email: &str) -> String {
    let response = server
        .post("/auth/login")
        .json(&json!({
            "email": email,
            "password": TEST_PASSWORD
        }))
        .await;

    response.assert_status(StatusCode::OK);
    let body: Value = response.json();
    body["tokens"]["access_token"].as_str().unwrap().to_string()
}

pub fn bearer(token: &str) -> String {
    format!("Bearer {token}")
}

pub fn cookie(token: &str) -> String {
    format!("{}={token}", auth::AUTH_COOKIE)
}
