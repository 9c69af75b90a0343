use serde::{Deserialize, Serialize};

/// Settings for the bucketed object store backing file uploads
/// (payment proofs, tenant documents, profile photos).
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct StorageSettings {
    /// Directory that holds one subdirectory per bucket.
    #[serde(default)]
    pub root: String,

    /// Maximum accepted upload size in bytes.
    #[serde(default)]
    pub max_upload_bytes: usize,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            root: "data/uploads".to_string(),
            max_upload_bytes: 5 * 1024 * 1024, // 5 MB
        }
    }
}
