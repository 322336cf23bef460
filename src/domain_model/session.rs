use nanoid::nanoid;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Client-defined polling lifetime identifier. Scopes novelty tracking only;
/// it is unrelated to authentication identity.
#[derive(Debug, Clone, Ord, PartialOrd, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub String);

impl SessionId {
    /// Minted server-side when a client polls without one.
    pub fn mint() -> Self {
        SessionId(nanoid!(21))
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
