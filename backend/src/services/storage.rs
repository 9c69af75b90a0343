use std::path::{Path, PathBuf};

use thiserror::Error;
use uuid::Uuid;

use crate::cfg;

/// The named buckets accepted for uploads. Anything else is rejected before
/// touching the filesystem.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Bucket {
    TenantPhotos,
    PaymentProofs,
    ProfilePhotos,
}

impl Bucket {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::TenantPhotos => "tenant-photos",
            Self::PaymentProofs => "payment-proofs",
            Self::ProfilePhotos => "profile-photos",
        }
    }

    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "tenant-photos" => Some(Self::TenantPhotos),
            "payment-proofs" => Some(Self::PaymentProofs),
            "profile-photos" => Some(Self::ProfilePhotos),
            _ => None,
        }
    }
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Unknown bucket: {0}")]
    UnknownBucket(String),

    #[error("Upload exceeds the maximum allowed size of {0} bytes")]
    TooLarge(usize),

    #[error("File system operation failed")]
    FileSystemOperationFailed { #[from] source: std::io::Error },
}

/// Stores an uploaded file under `{root}/{bucket}/{owner_id}/{uuid}.{ext}` and
/// returns the public URL for the stored object.
///
/// Persisting the returned reference into a row is the caller's second step;
/// a failure there leaves the stored file orphaned, which is accepted.
pub async fn store(
    settings: &cfg::StorageSettings,
    bucket: Bucket,
    owner_id: &str,
    extension: &str,
    bytes: &[u8],
) -> Result<String, StorageError> {
    if bytes.len() > settings.max_upload_bytes {
        return Err(StorageError::TooLarge(settings.max_upload_bytes));
    }

    let key = format!("{owner_id}/{}.{extension}", Uuid::new_v4());
    let path = object_path(settings, bucket, &key);
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(&path, bytes).await?;

    tracing::info!(bucket = bucket.as_str(), key = %key, size = bytes.len(), "Stored uploaded file");
    Ok(public_url(bucket, &key))
}

/// Publicly resolvable URL for an object, served by the `/files` route.
#[must_use]
pub fn public_url(bucket: Bucket, key: &str) -> String {
    format!("/files/{}/{key}", bucket.as_str())
}

fn object_path(settings: &cfg::StorageSettings, bucket: Bucket, key: &str) -> PathBuf {
    Path::new(&settings.root).join(bucket.as_str()).join(key)
}
