use crate::domain_model::{SearchItem, SessionId};

/// What one poll surfaced: the not-yet-seen items of the fresh batch in
/// batch order, plus the session's updated seen-set cardinality.
#[derive(Debug, Clone)]
pub struct DeltaOutcome {
    pub new_items: Vec<SearchItem>,
    pub new_count: usize,
    pub total_seen: usize,
}

#[async_trait::async_trait]
pub trait DeltaTracker: Send + Sync {
    /// Set-difference of the fresh batch against the session's seen-set,
    /// recording every surfaced id. Append-only: ids are never forgotten for
    /// the session's lifetime, so an id is reported new at most once.
    /// Concurrent calls for the same session are serialized; distinct
    /// sessions do not contend.
    async fn diff(&self, session: &SessionId, fresh_batch: Vec<SearchItem>) -> DeltaOutcome;

    /// Evict sessions with no poll within the idle TTL.
    async fn sweep_idle(&self);
}
