use axum::Extension;
use axum::Json;
use axum::extract::{Multipart, Path, State};
use axum::response::IntoResponse;
use serde_json::json;

use crate::auth;
use crate::core;
use crate::routes::api::ApiError;
use crate::services::storage;

/// Accepts a multipart upload into one of the named buckets and returns the
/// public URL of the stored file. Persisting that URL into a row (payment,
/// profile) is the caller's separate second step.
pub async fn upload(
    State(context): State<core::ArcContext>,
    Extension(claims): Extension<auth::AccessTokenClaims>,
    Path(bucket): Path<String>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    let bucket = storage::Bucket::from_name(&bucket)
        .ok_or_else(|| storage::StorageError::UnknownBucket(bucket.clone()))?;

    let field = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::Upload(e.to_string()))?
        .ok_or_else(|| ApiError::Upload("Missing file field".to_string()))?;

    let extension = field
        .file_name()
        .and_then(|name| name.rsplit('.').next())
        .unwrap_or("bin")
        .to_ascii_lowercase();
    let bytes = field.bytes().await.map_err(|e| ApiError::Upload(e.to_string()))?;

    if bytes.is_empty() {
        return Err(ApiError::Upload("Uploaded file is empty".to_string()));
    }

    let url = storage::store(&context.settings.storage, bucket, &claims.sub, &extension, &bytes).await?;

    Ok(Json(json!({"result": "ok", "url": url})))
}
