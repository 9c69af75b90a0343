use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::middleware;
use axum::routing::{delete, get, post, put};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::core;
use crate::middleware::access;
use crate::middleware::rate_limit;
use crate::routes;

/// Builds the full application router: role-gated API groups, auth routes,
/// the guarded page table for the SPA, and the file-serving route backing the
/// object store.
pub fn create_router(context: core::ArcContext) -> Router {
    // Owner-scoped API: rooms, tenants, maintenance, payments, meter readings
    let owner_api = Router::new()
        .route("/dashboard", get(routes::owner::dashboard))
        .route("/rooms", get(routes::owner::list_rooms).post(routes::owner::create_room))
        .route("/rooms/{id}", put(routes::owner::update_room).delete(routes::owner::delete_room))
        .route(
            "/rooms/{id}/readings",
            get(routes::owner::list_meter_readings).post(routes::owner::create_meter_reading),
        )
        .route("/tenants", get(routes::owner::list_tenants).post(routes::owner::create_tenant))
        .route("/tenants/{id}", put(routes::owner::update_tenant).delete(routes::owner::delete_tenant))
        .route("/tenants/{id}/verification", put(routes::owner::verify_tenant))
        .route("/maintenance", get(routes::owner::list_maintenance))
        .route("/maintenance/{id}/status", put(routes::owner::update_maintenance_status))
        .route("/payments", get(routes::owner::list_payments))
        .route("/payments/{id}/verify", put(routes::owner::verify_payment))
        .layer(middleware::from_fn_with_state(context.clone(), access::require_owner))
        .with_state(context.clone());

    // Tenant-scoped API: own profile, verification, payments, maintenance
    let tenant_api = Router::new()
        .route("/dashboard", get(routes::tenant::dashboard))
        .route("/profile", get(routes::tenant::get_profile).put(routes::tenant::update_profile))
        .route("/verification", post(routes::tenant::submit_verification))
        .route("/payments", get(routes::tenant::list_payments).post(routes::tenant::create_payment))
        .route(
            "/maintenance",
            get(routes::tenant::list_maintenance).post(routes::tenant::create_maintenance),
        )
        .layer(middleware::from_fn_with_state(context.clone(), access::require_tenant))
        .with_state(context.clone());

    // Routes shared by both roles, scoped to the caller's identity
    let shared_api = Router::new()
        .route("/notifications", get(routes::notifications::list))
        .route("/notifications/unread-count", get(routes::notifications::unread_count))
        .route("/notifications/read-all", put(routes::notifications::mark_all_read))
        .route("/notifications/{id}/read", put(routes::notifications::mark_read))
        .route("/notifications/{id}", delete(routes::notifications::delete))
        .route("/uploads/{bucket}", post(routes::uploads::upload))
        .layer(DefaultBodyLimit::max(context.settings.storage.max_upload_bytes + 64 * 1024))
        .layer(middleware::from_fn_with_state(context.clone(), access::require_authenticated))
        .with_state(context.clone());

    // Auth routes with rate limiting on the login endpoint
    let auth_routes = Router::new()
        .route("/auth/login", post(routes::auth::login)) // verifies credentials, returns tokens and the role redirect
        .route("/auth/logout", get(routes::auth::logout)) // revokes refresh tokens and clears the session cookie
        .route("/auth/session", get(routes::auth::session)) // resolves a persisted session to the current identity
        .route("/auth/refresh", post(routes::auth::refresh_access_token)) // refresh access token
        .route("/auth/revoke", post(routes::auth::revoke_token)) // revoke refresh token
        .layer(middleware::from_fn_with_state(context.clone(), rate_limit::login_rate_limit_middleware))
        .with_state(context.clone());

    let public_routes = Router::new()
        .route("/health", get(routes::health::health_check)) // Health check endpoint
        .with_state(context.clone());

    // Every page surfaced to the user goes through the access decision
    let page_routes = Router::new()
        .route("/", get(routes::pages::page_handler))
        .route("/login", get(routes::pages::page_handler))
        .route("/verify", get(routes::pages::page_handler))
        .route("/owner", get(routes::pages::page_handler))
        .route("/owner/rooms", get(routes::pages::page_handler))
        .route("/owner/tenants", get(routes::pages::page_handler))
        .route("/owner/maintenance", get(routes::pages::page_handler))
        .route("/owner/payments", get(routes::pages::page_handler))
        .route("/owner/notifications", get(routes::pages::page_handler))
        .route("/tenant", get(routes::pages::page_handler))
        .route("/tenant/profile", get(routes::pages::page_handler))
        .route("/tenant/payments", get(routes::pages::page_handler))
        .route("/tenant/payments/new", get(routes::pages::page_handler))
        .route("/tenant/maintenance", get(routes::pages::page_handler))
        .route("/tenant/notifications", get(routes::pages::page_handler))
        .with_state(context.clone());

    // Combine all routes
    Router::new()
        .nest("/api/owner", owner_api)
        .nest("/api/tenant", tenant_api)
        .nest("/api", shared_api)
        .merge(auth_routes)
        .merge(public_routes)
        .merge(page_routes)
        .nest_service("/files", ServeDir::new(&context.settings.storage.root))
        .fallback(routes::pages::fallback_handler) // Static assets; unmatched paths land on the owner dashboard
        .layer(TraceLayer::new_for_http())
}
