use axum::Json;
use axum::body::Body;
use axum::extract::State;
use axum::http::{Request, StatusCode, header};
use axum::response::IntoResponse;
use chrono::DateTime;
use serde::Deserialize;
use serde_json::json;
use sha2::Digest;
use thiserror::Error;

use crate::auth;
use crate::auth::jwt;
use crate::auth::jwt::JwtError;
use crate::core;
use crate::db;

#[derive(Deserialize)]
pub struct Login {
    pub email: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct RefreshTokenRequest {
    refresh_token: String,
}

#[derive(Deserialize)]
pub struct RevokeTokenRequest {
    refresh_token: String,
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("User profile not found")]
    ProfileMissing,

    #[error("JWT error: {0}")]
    JwtError(#[from] JwtError),

    #[error("Password error: {0}")]
    PasswordHashingError(#[from] argon2::password_hash::Error),

    #[error("Database error: {0}")]
    DatabaseError(#[from] core::DbError),

    #[error("Token expired or invalid")]
    TokenInvalid,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> axum::response::Response {
        tracing::error!(
            error_type = %std::any::type_name::<Self>(),
            error_subtype = %std::any::type_name_of_val(&self),
            error_message = %self);

        let (status, error_message) = match self {
            Self::InvalidCredentials => (StatusCode::UNAUTHORIZED, self.to_string()),
            Self::ProfileMissing => (StatusCode::UNAUTHORIZED, self.to_string()),
            Self::JwtError(_) => (StatusCode::UNAUTHORIZED, self.to_string()),
            Self::PasswordHashingError(_) => (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()),
            Self::DatabaseError(_) => (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()),
            Self::TokenInvalid => (StatusCode::UNAUTHORIZED, self.to_string()),
        };

        let body = Json(json!({
            "result": "error",
            "message": error_message
        }));

        (status, body).into_response()
    }
}

/// Login route: authenticates the account, then loads the matching profile.
/// An authenticated account without a profile row fails like bad credentials,
/// with its own message.
pub async fn login(
    State(context): State<core::ArcContext>,
    Json(login): Json<Login>,
) -> Result<impl IntoResponse, AuthError> {
    tracing::info!("Logging in user: {}", login.email);

    let user = match db::get_user_by_email(&context.db, &login.email).await {
        Ok(user) => user,
        Err(core::DbError::RowNotFound) => return Err(AuthError::InvalidCredentials),
        Err(e) => return Err(e.into()),
    };

    if !auth::verify_password(&login.password, &user.password_hash)? {
        tracing::warn!("Invalid password for user: {}", login.email);
        return Err(AuthError::InvalidCredentials);
    }

    let profile = match db::get_profile_by_id(&context.db, &user.id).await {
        Ok(profile) => profile,
        Err(core::DbError::RowNotFound) => return Err(AuthError::ProfileMissing),
        Err(e) => return Err(e.into()),
    };

    let display_name = profile.full_name.clone().unwrap_or_else(|| user.email.clone());
    let access_token = jwt::generate_access_token(&context.jwt, &user.id, &display_name, profile.role)?;
    let refresh_token = jwt::generate_refresh_token(&context.jwt, &user.id)?;
    persist_refresh_token(&context, &user.id, &refresh_token).await?;

    let cookie = jwt::auth_cookie(&access_token, context.jwt.access_token_expiry);
    let token_response = jwt::TokenResponse::new(&context.jwt, access_token, refresh_token);
    let body = Json(json!({
        "result": "ok",
        "tokens": token_response,
        "user": {
            "id": user.id,
            "name": display_name,
            "email": user.email,
            "role": profile.role,
            "redirect_to": profile.role.dashboard_path(),
        }
    }));

    Ok(([(header::SET_COOKIE, cookie)], body))
}

/// Logout route: revokes the refresh tokens and clears the session cookie.
/// Succeeds from the caller's perspective even without a decodable session.
pub async fn logout(State(context): State<core::ArcContext>, req: Request<Body>) -> impl IntoResponse {
    if let Ok(claims) = jwt::decode_access_token_from_req(&context.jwt, &req) {
        tracing::info!(user_id = claims.sub, name = claims.name, "Logout");
        if let Err(e) = db::revoke_all_refresh_tokens_for_user(&context.db, &claims.sub).await {
            tracing::warn!(user_id = claims.sub, "Failed to revoke refresh tokens on logout: {}", e);
        }
    }

    (
        [(header::SET_COOKIE, jwt::clear_auth_cookie())],
        Json(json!({"result": "ok"})),
    )
}

/// Session route: resolves the persisted session to the current identity.
/// An absent or invalid token is not an error, just an unauthenticated state.
pub async fn session(
    State(context): State<core::ArcContext>,
    req: Request<Body>,
) -> Result<impl IntoResponse, AuthError> {
    let Ok(claims) = jwt::decode_access_token_from_req(&context.jwt, &req) else {
        return Ok(Json(json!({"result": "ok", "authenticated": false})));
    };

    let user = match db::get_user_by_id(&context.db, &claims.sub).await {
        Ok(user) => user,
        Err(core::DbError::RowNotFound) => {
            return Ok(Json(json!({"result": "ok", "authenticated": false})));
        }
        Err(e) => return Err(e.into()),
    };
    let profile = match db::get_profile_by_id(&context.db, &claims.sub).await {
        Ok(profile) => profile,
        Err(core::DbError::RowNotFound) => {
            return Ok(Json(json!({"result": "ok", "authenticated": false})));
        }
        Err(e) => return Err(e.into()),
    };

    Ok(Json(json!({
        "result": "ok",
        "authenticated": true,
        "user": {
            "id": profile.id,
            "name": profile.full_name,
            "email": user.email,
            "role": profile.role,
            "aadhaar_number": profile.aadhaar_number,
            "phone_number": profile.phone_number,
            "date_of_birth": profile.date_of_birth,
            "profile_photo_url": profile.profile_photo_url,
        }
    })))
}

/// Route to refresh access token using refresh token
pub async fn refresh_access_token(
    State(context): State<core::ArcContext>,
    Json(request): Json<RefreshTokenRequest>,
) -> Result<impl IntoResponse, AuthError> {
    tracing::info!("Refreshing access token");

    // Decode and validate refresh token
    let refresh_claims = jwt::decode_refresh_token(&context.jwt, &request.refresh_token)
        .map_err(|_| AuthError::TokenInvalid)?;

    // Check if refresh token exists in database and is not revoked
    let stored_token = db::get_refresh_token_by_jti(&context.db, &refresh_claims.jti)
        .await
        .map_err(|_| AuthError::TokenInvalid)?;

    // Verify token hash
    if stored_token.token_hash != token_hash(&request.refresh_token) {
        return Err(AuthError::TokenInvalid);
    }

    // Generate new access token for the user
    let user = db::get_user_by_id(&context.db, &stored_token.user_id).await?;
    let profile = db::get_profile_by_id(&context.db, &user.id)
        .await
        .map_err(|_| AuthError::ProfileMissing)?;
    let display_name = profile.full_name.clone().unwrap_or_else(|| user.email.clone());
    let new_access_token = jwt::generate_access_token(&context.jwt, &user.id, &display_name, profile.role)?;

    let cookie = jwt::auth_cookie(&new_access_token, context.jwt.access_token_expiry);
    let body = Json(json!({
        "result": "ok",
        "access_token": new_access_token,
        "expires_in": context.jwt.access_token_expiry,
        "user": {
            "id": user.id,
            "name": display_name,
            "email": user.email,
            "role": profile.role,
        }
    }));

    Ok(([(header::SET_COOKIE, cookie)], body))
}

/// Route to revoke a refresh token
pub async fn revoke_token(
    State(context): State<core::ArcContext>,
    Json(request): Json<RevokeTokenRequest>,
) -> Result<impl IntoResponse, AuthError> {
    tracing::info!("Revoking refresh token");

    // Decode refresh token to get JTI
    let refresh_claims = jwt::decode_refresh_token(&context.jwt, &request.refresh_token)
        .map_err(|_| AuthError::TokenInvalid)?;

    // Revoke the token
    db::revoke_refresh_token(&context.db, &refresh_claims.jti).await?;
    Ok(Json(json!({"result": "ok"})))
}

/// Stores the hash of a freshly issued refresh token.
async fn persist_refresh_token(context: &core::Context, user_id: &str, refresh_token: &str) -> Result<(), AuthError> {
    let refresh_claims = jwt::decode_refresh_token(&context.jwt, refresh_token)?;
    let expires_at = DateTime::from_timestamp(refresh_claims.exp, 0).ok_or(AuthError::TokenInvalid)?;
    let new_refresh_token = db::NewRefreshToken {
        jti: refresh_claims.jti,
        user_id: user_id.to_string(),
        token_hash: token_hash(refresh_token),
        expires_at: expires_at.naive_utc(),
    };
    db::create_refresh_token(&context.db, new_refresh_token).await?;
    Ok(())
}

fn token_hash(token: &str) -> String {
    let mut hasher = sha2::Sha256::new();
    hasher.update(token);
    format!("{:x}", hasher.finalize())
}
