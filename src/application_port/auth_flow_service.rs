use crate::domain_port::{AttemptStoreError, TokenClientError};

#[derive(Debug, thiserror::Error)]
pub enum AuthFlowError {
    /// The provider sent `error=` back on the callback. No store or token
    /// endpoint interaction happens in this case.
    #[error("provider denied authorization: {error}")]
    ProviderDenied {
        error: String,
        description: Option<String>,
    },
    #[error("authorization state is unknown, already used or expired")]
    InvalidState,
    #[error("missing callback parameter '{0}'")]
    MissingParam(&'static str),
    #[error("token exchange failed with {status}: {body}")]
    TokenExchange { status: u16, body: String },
    #[error("token endpoint unreachable: {0}")]
    Unreachable(String),
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<AttemptStoreError> for AuthFlowError {
    fn from(error: AttemptStoreError) -> Self {
        match error {
            AttemptStoreError::InvalidState => AuthFlowError::InvalidState,
            AttemptStoreError::Store(e) => AuthFlowError::Internal(e),
        }
    }
}

impl From<TokenClientError> for AuthFlowError {
    fn from(error: TokenClientError) -> Self {
        match error {
            TokenClientError::Upstream { status, body } => {
                AuthFlowError::TokenExchange { status, body }
            }
            TokenClientError::Network(e) => AuthFlowError::Unreachable(e),
            TokenClientError::Malformed(e) => AuthFlowError::Internal(e),
        }
    }
}

/// Where to send the browser to authorize.
#[derive(Debug, Clone)]
pub struct AuthorizeRedirect {
    pub location: String,
}

/// Query parameters the provider redirects back with.
#[derive(Debug, Clone, Default)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
    pub error_description: Option<String>,
}

#[async_trait::async_trait]
pub trait AuthFlowService: Send + Sync {
    /// Generate a PKCE triple, register the pending attempt and build the
    /// authorization redirect.
    async fn begin(&self) -> Result<AuthorizeRedirect, AuthFlowError>;

    /// Validate the callback, consume the state (exactly once, regardless of
    /// what happens downstream), exchange the code and store the credential.
    async fn complete(&self, params: CallbackParams) -> Result<(), AuthFlowError>;

    /// Whether a live credential is held.
    async fn authenticated(&self) -> bool;
}
