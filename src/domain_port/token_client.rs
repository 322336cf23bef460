use crate::domain_model::{CodeVerifier, Credential};

/// Exchanges an authorization code plus its PKCE verifier for a credential
/// at the provider's token endpoint.
#[async_trait::async_trait]
pub trait TokenClient: Send + Sync {
    async fn exchange_code(
        &self,
        code: &str,
        verifier: &CodeVerifier,
    ) -> Result<Credential, TokenClientError>;
}

#[derive(Debug, thiserror::Error)]
pub enum TokenClientError {
    #[error("token endpoint returned {status}: {body}")]
    Upstream { status: u16, body: String },
    #[error("token endpoint unreachable: {0}")]
    Network(String),
    #[error("malformed token response: {0}")]
    Malformed(String),
}
