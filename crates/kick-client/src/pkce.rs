//! PKCE (RFC 7636) verifier/challenge pairs and OAuth state values.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use ring::rand::{SecureRandom, SystemRandom};
use sha2::{Digest, Sha256};

use crate::KickError;

const VERIFIER_BYTES: usize = 32;
const STATE_BYTES: usize = 16;

/// A code verifier and its S256 challenge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PkceChallenge {
    pub verifier: String,
    pub challenge: String,
    pub method: &'static str,
}

impl PkceChallenge {
    /// Generate a fresh verifier from 32 random bytes.
    pub fn generate() -> Result<Self, KickError> {
        let verifier = URL_SAFE_NO_PAD.encode(random_bytes::<VERIFIER_BYTES>()?);
        Ok(Self::from_verifier(verifier))
    }

    /// Derive the challenge for an existing verifier.
    pub fn from_verifier(verifier: impl Into<String>) -> Self {
        let verifier = verifier.into();
        let challenge = URL_SAFE_NO_PAD.encode(Sha256::digest(verifier.as_bytes()));
        Self {
            verifier,
            challenge,
            method: "S256",
        }
    }
}

/// Random opaque value for the OAuth `state` parameter.
pub fn generate_state() -> Result<String, KickError> {
    Ok(URL_SAFE_NO_PAD.encode(random_bytes::<STATE_BYTES>()?))
}

fn random_bytes<const N: usize>() -> Result<[u8; N], KickError> {
    let mut buf = [0u8; N];
    SystemRandom::new()
        .fill(&mut buf)
        .map_err(|_| KickError::RequestConstruction("failed to generate random bytes".into()))?;
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rfc7636_appendix_b_vector() {
        let pkce = PkceChallenge::from_verifier("dBjftJeZ4CVP-mB92K27uhbUJU1p1r_wW1gFWFOEjXk");
        assert_eq!(pkce.challenge, "E9Melhoa2OwvFrEMTJguCHaoeK1t8URWbuGJSstw-cM");
        assert_eq!(pkce.method, "S256");
    }

    #[test]
    fn generated_pairs_are_unique_and_url_safe() {
        let a = PkceChallenge::generate().unwrap();
        let b = PkceChallenge::generate().unwrap();
        assert_ne!(a.verifier, b.verifier);
        assert_eq!(a.verifier.len(), 43);
        assert_eq!(a.challenge.len(), 43);
        assert!(
            a.verifier
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        );
        assert_eq!(PkceChallenge::from_verifier(a.verifier.clone()), a);
    }

    #[test]
    fn state_values_differ() {
        let state = generate_state().unwrap();
        assert_eq!(state.len(), 22);
        assert_ne!(state, generate_state().unwrap());
    }
}
