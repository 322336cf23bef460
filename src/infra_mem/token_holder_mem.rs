use crate::domain_model::Credential;
use crate::domain_port::TokenHolder;
use std::sync::RwLock;

/// Single in-process credential slot. The lock wraps the whole option so
/// replacement is all-or-nothing.
pub struct MemTokenHolder {
    current: RwLock<Option<Credential>>,
}

impl MemTokenHolder {
    pub fn new() -> Self {
        MemTokenHolder {
            current: RwLock::new(None),
        }
    }
}

impl Default for MemTokenHolder {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl TokenHolder for MemTokenHolder {
    async fn set(&self, credential: Credential) {
        if let Ok(mut slot) = self.current.write() {
            *slot = Some(credential);
        }
    }

    async fn get(&self) -> Option<Credential> {
        match self.current.read() {
            Ok(slot) => slot.clone(),
            Err(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn credential(token: &str) -> Credential {
        Credential {
            access_token: token.to_string(),
            refresh_token: None,
            expires_at: None,
        }
    }

    #[tokio::test]
    async fn starts_unauthenticated() {
        let holder = MemTokenHolder::new();
        assert!(holder.get().await.is_none());
    }

    #[tokio::test]
    async fn set_replaces_the_whole_credential() {
        let holder = MemTokenHolder::new();
        holder.set(credential("first")).await;
        holder
            .set(Credential {
                refresh_token: Some("r".to_string()),
                ..credential("second")
            })
            .await;

        let current = holder.get().await.unwrap();
        assert_eq!(current.access_token, "second");
        assert_eq!(current.refresh_token.as_deref(), Some("r"));
    }
}
