use axum::body::Body;
use axum::extract::State;
use axum::http;
use axum::http::Uri;
use axum::http::header;
use axum::http::response::Builder as ResponseBuilder;
use axum::response::IntoResponse;
use axum::response::Redirect;
use axum::response::Response;
use chrono::{TimeZone, Utc};
use rust_embed::EmbeddedFile;
use rust_embed::RustEmbed;
use thiserror::Error;

use crate::auth;
use crate::core;
use crate::core::AccessDecision;

/// The built SPA shell and its hashed assets, embedded into the binary.
#[derive(RustEmbed)]
#[folder = "assets"]
pub struct Assets;

#[derive(Debug, Error)]
pub enum PageError {
    #[error("Failed to build response: {0}")]
    ResponseBuildError(#[from] http::Error),

    #[error("Asset not found: {0}")]
    NotFound(String),
}

impl IntoResponse for PageError {
    fn into_response(self) -> axum::response::Response {
        tracing::error!("{}", &self);

        let status = match self {
            Self::ResponseBuildError(_) => http::StatusCode::INTERNAL_SERVER_ERROR,
            Self::NotFound(_) => http::StatusCode::NOT_FOUND,
        };

        let body = match self {
            Self::ResponseBuildError(_) => "Internal server error".to_string(),
            Self::NotFound(path) => format!("Asset not found: {path}"),
        };

        (status, body).into_response()
    }
}

/// Handler for every registered page path. Evaluates the access decision for
/// the request's session and either serves the SPA shell or redirects.
pub async fn page_handler(
    State(context): State<core::ArcContext>,
    req: http::Request<Body>,
) -> Result<Response, PageError> {
    let role = auth::decode_access_token_from_req(&context.jwt, &req)
        .ok()
        .map(|claims| claims.role);

    match core::decide(req.uri().path(), role) {
        AccessDecision::Render => serve_shell(),
        AccessDecision::RedirectToLogin => Ok(Redirect::to("/login").into_response()),
        AccessDecision::RedirectToDashboard(role) => Ok(Redirect::to(role.dashboard_path()).into_response()),
    }
}

/// Fallback for everything outside the page and API tables: embedded static
/// assets are served directly, anything else lands on the owner dashboard
/// (where the access decision applies again).
pub async fn fallback_handler(uri: Uri) -> Result<Response, PageError> {
    let path_str = uri.path().trim_start_matches('/');
    if !path_str.is_empty() && path_str != "index.html" {
        if let Some(asset) = Assets::get(path_str) {
            let builder = create_asset_response_builder(&asset, path_str);
            return Ok(builder.body(Body::from(asset.data.to_vec()))?.into_response());
        }
    }

    Ok(Redirect::to("/owner").into_response())
}

fn serve_shell() -> Result<Response, PageError> {
    let asset = Assets::get("index.html").ok_or_else(|| PageError::NotFound("index.html".to_string()))?;
    let response = create_no_cache_response_builder().body(Body::from(asset.data.to_vec()))?;
    Ok(response.into_response())
}

fn create_no_cache_response_builder() -> ResponseBuilder {
    Response::builder()
        .header(header::CONTENT_TYPE, "text/html")
        .header(header::CACHE_CONTROL, "no-cache, no-store, must-revalidate")
}

fn create_asset_response_builder(asset: &EmbeddedFile, path: &str) -> ResponseBuilder {
    let mime_type = mime_guess::from_path(path).first_or_octet_stream();
    let etag = hex::encode(asset.metadata.sha256_hash());
    let builder = Response::builder()
        .header(header::CONTENT_TYPE, mime_type.as_ref())
        .header(header::CACHE_CONTROL, "public, max-age=31536000, immutable")
        .header(header::ETAG, etag);
    match get_asset_last_modified_date(asset) {
        Some(last_modified) => builder.header(header::LAST_MODIFIED, last_modified),
        None => builder,
    }
}

#[allow(clippy::cast_possible_wrap)] // the timestamp will be in the range of i64 for quite some time
fn get_asset_last_modified_date(asset: &EmbeddedFile) -> Option<String> {
    asset
        .metadata
        .last_modified()
        .and_then(|ts| Utc.timestamp_opt(ts as i64, 0).single())
        .map(|dt| dt.to_rfc2822())
}
