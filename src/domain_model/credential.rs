use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Access credential issued by the provider's token endpoint. Replaced as a
/// whole; readers never observe a partially written credential.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credential {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
}
