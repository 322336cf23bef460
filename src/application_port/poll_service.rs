use crate::domain_model::{SearchFilters, SearchItem, SessionId, SiteId};
use crate::domain_port::GatewayError;
use serde::Serialize;

#[derive(Debug, Clone)]
pub struct PollInput {
    /// Absent on a session's first poll; the service mints one and echoes it
    /// back so the client can reuse it.
    pub session_id: Option<SessionId>,
    pub query: String,
    pub site: Option<SiteId>,
    pub filters: SearchFilters,
}

#[derive(Debug, Clone, Serialize)]
pub struct DeltaResult {
    pub session_id: SessionId,
    pub new_items: Vec<SearchItem>,
    pub new_count: usize,
    pub total_seen: usize,
}

#[derive(Debug, thiserror::Error)]
pub enum PollError {
    #[error("no live credential; authorize first")]
    Unauthenticated,
    #[error("malformed input: {0}")]
    MalformedInput(String),
    #[error("upstream returned {status}: {body}")]
    Upstream { status: u16, body: String },
    #[error("upstream unreachable: {0}")]
    Unreachable(String),
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<GatewayError> for PollError {
    fn from(error: GatewayError) -> Self {
        match error {
            GatewayError::Upstream { status, body } => PollError::Upstream { status, body },
            GatewayError::Network(e) => PollError::Unreachable(e),
            GatewayError::Malformed(e) => PollError::Internal(e),
        }
    }
}

/// The sole entry point the API layer calls for delta polls. A failed poll
/// leaves the session's delta state untouched.
#[async_trait::async_trait]
pub trait PollService: Send + Sync {
    async fn poll(&self, input: PollInput) -> Result<DeltaResult, PollError>;
}
