//! HMAC-SHA256 resume-URL signer.
//!
//! Tokens are lowercase hex HMAC-SHA256 digests of the signed data under a
//! server-held secret. Verification goes through `Mac::verify_slice`, which
//! compares in constant time.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use uuid::Uuid;
use waypost_core::webhook::signature::UrlSigner;

type HmacSha256 = Hmac<Sha256>;

/// Errors building a signer.
#[derive(Debug, thiserror::Error)]
pub enum SignerError {
    #[error("signature secret must not be empty")]
    EmptySecret,

    #[error("invalid HMAC key: {0}")]
    InvalidKey(String),
}

/// [`UrlSigner`] keyed with a shared secret.
#[derive(Clone)]
pub struct HmacUrlSigner {
    mac: HmacSha256,
}

impl HmacUrlSigner {
    pub fn new(secret: &[u8]) -> Result<Self, SignerError> {
        if secret.is_empty() {
            return Err(SignerError::EmptySecret);
        }
        let mac =
            HmacSha256::new_from_slice(secret).map_err(|e| SignerError::InvalidKey(e.to_string()))?;
        Ok(Self { mac })
    }

    /// Signer with a random per-process secret.
    ///
    /// Tokens issued by it stop verifying after a restart.
    pub fn ephemeral() -> Result<Self, SignerError> {
        let secret = format!("{}{}", Uuid::new_v4().simple(), Uuid::new_v4().simple());
        Self::new(secret.as_bytes())
    }
}

impl std::fmt::Debug for HmacUrlSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("HmacUrlSigner { .. }")
    }
}

impl UrlSigner for HmacUrlSigner {
    fn sign(&self, data: &str) -> String {
        let mut mac = self.mac.clone();
        mac.update(data.as_bytes());
        hex_encode(&mac.finalize().into_bytes())
    }

    fn verify(&self, data: &str, token: &str) -> bool {
        let Ok(expected) = hex_decode(token) else {
            return false;
        };
        let mut mac = self.mac.clone();
        mac.update(data.as_bytes());
        mac.verify_slice(&expected).is_ok()
    }
}

/// Decode a hex string to bytes.
fn hex_decode(hex: &str) -> Result<Vec<u8>, ()> {
    if !hex.is_ascii() || hex.len() % 2 != 0 {
        return Err(());
    }
    (0..hex.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| ()))
        .collect()
}

/// Encode bytes to a lowercase hex string.
fn hex_encode(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}
