use crate::domain_model::{Credential, SearchFilters, SearchItem, SiteId};

/// One keyword search against the upstream provider: a single outbound
/// request (first page only), normalized to `SearchItem` with the requested
/// post-filters applied. Upstream order is preserved.
#[async_trait::async_trait]
pub trait SearchGateway: Send + Sync {
    async fn search(
        &self,
        query: &str,
        site: &SiteId,
        filters: &SearchFilters,
        credential: &Credential,
    ) -> Result<Vec<SearchItem>, GatewayError>;
}

#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// Non-success upstream response, surfaced as-is. Retrying is the
    /// caller's decision.
    #[error("upstream returned {status}: {body}")]
    Upstream { status: u16, body: String },
    #[error("upstream unreachable: {0}")]
    Network(String),
    #[error("malformed upstream payload: {0}")]
    Malformed(String),
}
