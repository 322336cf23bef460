use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use sha2::{Digest, Sha256};
use std::fmt;

// 64 random bytes encode to 86 chars, inside the 43..=128 window RFC 7636
// allows for a code verifier.
const VERIFIER_BYTES: usize = 64;
const STATE_BYTES: usize = 24;

/// Client-held PKCE secret. The authorization code is useless to an
/// interceptor without it.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct CodeVerifier(pub String);

impl CodeVerifier {
    pub fn generate() -> Result<Self, getrandom::Error> {
        let mut buf = [0u8; VERIFIER_BYTES];
        getrandom::getrandom(&mut buf)?;
        Ok(CodeVerifier(URL_SAFE_NO_PAD.encode(buf)))
    }

    /// S256 challenge sent with the authorization request. Pure.
    pub fn challenge(&self) -> CodeChallenge {
        let digest = Sha256::digest(self.0.as_bytes());
        CodeChallenge(URL_SAFE_NO_PAD.encode(digest))
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct CodeChallenge(pub String);

/// CSRF binding token for one authorization round trip. Independent of the
/// verifier, never derived from it.
#[derive(Debug, Clone, Ord, PartialOrd, Eq, PartialEq, Hash)]
pub struct StateToken(pub String);

impl StateToken {
    pub fn generate() -> Result<Self, getrandom::Error> {
        let mut buf = [0u8; STATE_BYTES];
        getrandom::getrandom(&mut buf)?;
        Ok(StateToken(URL_SAFE_NO_PAD.encode(buf)))
    }
}

impl fmt::Display for StateToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
