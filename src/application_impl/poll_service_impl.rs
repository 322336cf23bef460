use crate::application_port::{DeltaResult, PollError, PollInput, PollService};
use crate::domain_model::{SessionId, SiteId};
use crate::domain_port::{DeltaOutcome, DeltaTracker, SearchGateway, TokenHolder};
use std::sync::Arc;
use tracing::debug;

/// Composes gateway and tracker into the externally observable poll. Owns no
/// state of its own beyond delegation.
pub struct RealPollService {
    tokens: Arc<dyn TokenHolder>,
    gateway: Arc<dyn SearchGateway>,
    tracker: Arc<dyn DeltaTracker>,
    default_site: SiteId,
}

impl RealPollService {
    pub fn new(
        tokens: Arc<dyn TokenHolder>,
        gateway: Arc<dyn SearchGateway>,
        tracker: Arc<dyn DeltaTracker>,
        default_site: SiteId,
    ) -> Self {
        RealPollService {
            tokens,
            gateway,
            tracker,
            default_site,
        }
    }
}

#[async_trait::async_trait]
impl PollService for RealPollService {
    async fn poll(&self, input: PollInput) -> Result<DeltaResult, PollError> {
        if input.query.trim().is_empty() {
            return Err(PollError::MalformedInput(
                "query must not be empty".to_string(),
            ));
        }
        // Fail before any network call when no credential is held.
        let credential = self.tokens.get().await.ok_or(PollError::Unauthenticated)?;

        let session_id = input.session_id.unwrap_or_else(SessionId::mint);
        let site = input.site.unwrap_or_else(|| self.default_site.clone());

        let gateway = self.gateway.clone();
        let tracker = self.tracker.clone();
        let session = session_id.clone();
        let query = input.query;
        let filters = input.filters;
        // Detached from the request future: if the client disconnects
        // mid-poll, a completed fetch is still merged into the seen-set, so
        // the next poll does not re-surface its items.
        let merge = tokio::spawn(async move {
            let batch = gateway.search(&query, &site, &filters, &credential).await?;
            let outcome = tracker.diff(&session, batch).await;
            Ok::<DeltaOutcome, PollError>(outcome)
        });

        let outcome = merge
            .await
            .map_err(|e| PollError::Internal(format!("poll task failed: {e}")))??;
        debug!(
            "session {}: {} new, {} seen",
            session_id, outcome.new_count, outcome.total_seen
        );

        Ok(DeltaResult {
            session_id,
            new_items: outcome.new_items,
            new_count: outcome.new_count,
            total_seen: outcome.total_seen,
        })
    }
}
