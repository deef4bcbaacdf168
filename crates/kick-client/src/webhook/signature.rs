//! RSA PKCS#1 v1.5 / SHA-256 verification of webhook signatures.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use ring::signature::{RSA_PKCS1_2048_8192_SHA256, UnparsedPublicKey};
use rsa::pkcs1::{DecodeRsaPublicKey, EncodeRsaPublicKey};
use rsa::pkcs8::DecodePublicKey;

use crate::KickError;

/// RSA public key held as a DER `RSAPublicKey`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct WebhookPublicKey {
    pkcs1: Vec<u8>,
}

impl WebhookPublicKey {
    /// Parse the first `PUBLIC KEY` (SubjectPublicKeyInfo) or `RSA PUBLIC KEY`
    /// block in `input`. Text around the block is ignored.
    pub(crate) fn from_pem(input: &str) -> Result<Self, KickError> {
        let block = pem::parse(input).map_err(|e| malformed_key(e.to_string()))?;
        let key = match block.tag() {
            "PUBLIC KEY" => rsa::RsaPublicKey::from_public_key_der(block.contents())
                .map_err(|e| malformed_key(e.to_string()))?,
            "RSA PUBLIC KEY" => rsa::RsaPublicKey::from_pkcs1_der(block.contents())
                .map_err(|e| malformed_key(e.to_string()))?,
            other => return Err(malformed_key(format!("unexpected PEM label {other:?}"))),
        };

        let pkcs1 = key
            .to_pkcs1_der()
            .map_err(|e| malformed_key(e.to_string()))?
            .as_bytes()
            .to_vec();
        Ok(Self { pkcs1 })
    }

    /// Check a base64 signature over `message`.
    pub(crate) fn verify(&self, message: &[u8], signature: &str) -> Result<(), KickError> {
        let signature = STANDARD.decode(signature.trim()).map_err(|e| {
            KickError::SignatureInvalid(format!("failed to decode signature: {e}"))
        })?;

        UnparsedPublicKey::new(&RSA_PKCS1_2048_8192_SHA256, &self.pkcs1)
            .verify(message, &signature)
            .map_err(|_| KickError::SignatureInvalid("signature does not match".into()))
    }
}

fn malformed_key(detail: impl Into<String>) -> KickError {
    KickError::SignatureInvalid(format!("malformed public key: {}", detail.into()))
}
