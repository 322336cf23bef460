use crate::domain_model::{CodeVerifier, StateToken};
use crate::domain_port::{AttemptStoreError, AuthAttempt, AuthAttemptStore};
use chrono::Utc;
use dashmap::DashMap;
use std::time::Duration;
use tracing::debug;

/// Memory-only pending-attempt store. A process restart invalidates every
/// pending attempt; clients simply re-initiate login.
pub struct MemAuthAttemptStore {
    attempts: DashMap<StateToken, AuthAttempt>,
    ttl: chrono::Duration,
}

impl MemAuthAttemptStore {
    pub fn new(ttl: Duration) -> Self {
        MemAuthAttemptStore {
            attempts: DashMap::new(),
            ttl: chrono::Duration::from_std(ttl).unwrap_or(chrono::Duration::MAX),
        }
    }
}

#[async_trait::async_trait]
impl AuthAttemptStore for MemAuthAttemptStore {
    async fn put(
        &self,
        state: StateToken,
        verifier: CodeVerifier,
    ) -> Result<(), AttemptStoreError> {
        self.attempts.insert(
            state,
            AuthAttempt {
                verifier,
                created_at: Utc::now(),
            },
        );
        Ok(())
    }

    async fn consume(&self, state: &StateToken) -> Result<CodeVerifier, AttemptStoreError> {
        // remove() is the atomic step: of two racing callbacks carrying the
        // same state, only one gets the entry.
        let (_, attempt) = self
            .attempts
            .remove(state)
            .ok_or(AttemptStoreError::InvalidState)?;
        if Utc::now() - attempt.created_at > self.ttl {
            return Err(AttemptStoreError::InvalidState);
        }
        Ok(attempt.verifier)
    }

    async fn sweep_expired(&self) {
        let cutoff = Utc::now() - self.ttl;
        // counted inside retain: concurrent puts can grow the map mid-sweep,
        // so before/after len arithmetic is unreliable
        let mut swept = 0usize;
        self.attempts.retain(|_, attempt| {
            let keep = attempt.created_at > cutoff;
            if !keep {
                swept += 1;
            }
            keep
        });
        if swept > 0 {
            debug!("swept {} expired authorization attempt(s)", swept);
        }
    }
}
