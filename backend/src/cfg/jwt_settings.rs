use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct JwtSettings {
    #[serde(default)]
    pub access_token_expiry: i64, // In seconds (e.g., 15 minutes = 900)

    #[serde(default)]
    pub refresh_token_expiry: i64, // In seconds (e.g., 7 days = 604800)
}

impl Default for JwtSettings {
    fn default() -> Self {
        Self {
            access_token_expiry: 15 * 60,           // 15 minutes
            refresh_token_expiry: 7 * 24 * 60 * 60, // 7 days
        }
    }
}
