use crate::domain_model::Credential;

/// Holds the process-wide access credential. `set` replaces the whole value
/// atomically so a concurrent `get` sees either the old or the new
/// credential, never a mix.
#[async_trait::async_trait]
pub trait TokenHolder: Send + Sync {
    async fn set(&self, credential: Credential);
    async fn get(&self) -> Option<Credential>;
}
