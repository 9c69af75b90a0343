use axum::Json;
use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use crate::auth;
use crate::core;

/// Gate for the owner-scoped API route group.
pub async fn require_owner(State(context): State<core::ArcContext>, req: Request, next: Next) -> Response {
    gate(&context, Some(core::Role::Owner), req, next).await
}

/// Gate for the tenant-scoped API route group.
pub async fn require_tenant(State(context): State<core::ArcContext>, req: Request, next: Next) -> Response {
    gate(&context, Some(core::Role::Tenant), req, next).await
}

/// Gate for API routes any authenticated user may call (notifications, uploads).
pub async fn require_authenticated(State(context): State<core::ArcContext>, req: Request, next: Next) -> Response {
    gate(&context, None, req, next).await
}

/// Decodes the access token once, checks the capability set, and injects the
/// claims into request extensions for the handlers. Non-grants carry the same
/// redirect target the page router would use, so API callers and page
/// navigation follow one access decision.
async fn gate(context: &core::Context, required_role: Option<core::Role>, mut req: Request, next: Next) -> Response {
    let claims = match auth::decode_access_token_from_req(&context.jwt, &req) {
        Ok(claims) => claims,
        Err(e) => {
            tracing::warn!("Unauthorized API access attempt: {}", e);
            return denied(StatusCode::UNAUTHORIZED, "Authentication required", "/login");
        }
    };

    if let Some(required_role) = required_role {
        if claims.role != required_role {
            tracing::warn!(
                user_id = claims.sub,
                role = claims.role.path_segment(),
                required = required_role.path_segment(),
                "Role mismatch on API access"
            );
            return denied(
                StatusCode::FORBIDDEN,
                "This area is not available for your role",
                claims.role.dashboard_path(),
            );
        }
    }

    req.extensions_mut().insert(claims);
    next.run(req).await
}

fn denied(status: StatusCode, message: &str, location: &str) -> Response {
    let body = Json(json!({
        "result": "error",
        "message": message,
        "location": location,
    }));
    (status, body).into_response()
}
