use crate::domain_model::{ItemId, SearchItem, SessionId};
use crate::domain_port::{DeltaOutcome, DeltaTracker};
use chrono::Utc;
use dashmap::DashMap;
use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::debug;

struct SeenSlot {
    /// Unix millis of the newest poll activity. Kept outside the mutex and
    /// stamped while the shard guard is held, so a racing sweep cannot
    /// misread a poll that has not yet acquired the mutex as idle.
    last_polled_at_ms: AtomicI64,
    seen: Mutex<HashSet<ItemId>>,
}

/// Per-session seen-set registry. Each session gets its own mutex, so
/// overlapping polls for one session are serialized while polls for
/// different sessions never contend.
pub struct MemDeltaTracker {
    sessions: DashMap<SessionId, Arc<SeenSlot>>,
    idle_ttl: chrono::Duration,
}

impl MemDeltaTracker {
    pub fn new(idle_ttl: Duration) -> Self {
        MemDeltaTracker {
            sessions: DashMap::new(),
            idle_ttl: chrono::Duration::from_std(idle_ttl).unwrap_or(chrono::Duration::MAX),
        }
    }
}

#[async_trait::async_trait]
impl DeltaTracker for MemDeltaTracker {
    async fn diff(&self, session: &SessionId, fresh_batch: Vec<SearchItem>) -> DeltaOutcome {
        let now_ms = Utc::now().timestamp_millis();
        // Stamp under the shard guard, then clone the Arc out so the guard
        // is released before awaiting the session mutex.
        let slot = {
            let entry = self.sessions.entry(session.clone()).or_insert_with(|| {
                Arc::new(SeenSlot {
                    last_polled_at_ms: AtomicI64::new(now_ms),
                    seen: Mutex::new(HashSet::new()),
                })
            });
            entry.last_polled_at_ms.store(now_ms, Ordering::Relaxed);
            entry.clone()
        };

        let mut seen = slot.seen.lock().await;
        let mut new_items = Vec::new();
        for item in fresh_batch {
            if seen.insert(item.id.clone()) {
                new_items.push(item);
            }
        }
        slot.last_polled_at_ms
            .store(Utc::now().timestamp_millis(), Ordering::Relaxed);

        DeltaOutcome {
            new_count: new_items.len(),
            total_seen: seen.len(),
            new_items,
        }
    }

    async fn sweep_idle(&self) {
        let cutoff_ms = (Utc::now() - self.idle_ttl).timestamp_millis();
        // counted inside retain: concurrent polls can grow the map mid-sweep,
        // so before/after len arithmetic is unreliable
        let mut swept = 0usize;
        self.sessions.retain(|_, slot| {
            // a locked seen-set means a poll is mid-merge; never idle
            if slot.seen.try_lock().is_err() {
                return true;
            }
            let keep = slot.last_polled_at_ms.load(Ordering::Relaxed) > cutoff_ms;
            if !keep {
                swept += 1;
            }
            keep
        });
        if swept > 0 {
            debug!("evicted {} idle session(s)", swept);
        }
    }
}
