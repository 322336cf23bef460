use crate::domain_model::{CodeVerifier, StateToken};
use chrono::{DateTime, Utc};

/// Pending PKCE authorization attempt, keyed in the store by its state token.
#[derive(Debug, Clone)]
pub struct AuthAttempt {
    pub verifier: CodeVerifier,
    pub created_at: DateTime<Utc>,
}

#[async_trait::async_trait]
pub trait AuthAttemptStore: Send + Sync {
    /// Register a pending attempt with a creation timestamp.
    async fn put(
        &self,
        state: StateToken,
        verifier: CodeVerifier,
    ) -> Result<(), AttemptStoreError>;

    /// Look up and delete in one step. Never succeeds twice for one state,
    /// and never honors an entry older than the TTL.
    async fn consume(&self, state: &StateToken) -> Result<CodeVerifier, AttemptStoreError>;

    /// Drop entries past the TTL.
    async fn sweep_expired(&self);
}

#[derive(Debug, thiserror::Error)]
pub enum AttemptStoreError {
    #[error("authorization state is unknown, already used or expired")]
    InvalidState,
    #[error("store error: {0}")]
    Store(String),
}
