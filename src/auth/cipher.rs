use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chacha20poly1305::aead::{Aead, KeyInit};
use chacha20poly1305::{Key, XChaCha20Poly1305, XNonce};
use rand::RngCore;
use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;
use tracing::warn;

use super::utils::derive_key;

const ENVELOPE_PREFIX: &str = "v1.";
const SALT_LEN: usize = 16;
const NONCE_LEN: usize = 24;

#[derive(Debug, Error)]
pub enum CipherError {
    #[error("ciphertext is not a v1 envelope")]
    Envelope,
    #[error("key derivation failed: {0}")]
    Kdf(String),
    #[error("encryption failed")]
    Seal,
    #[error("ciphertext authentication failed")]
    Authentication,
    #[error("payload json: {0}")]
    Json(#[from] serde_json::Error),
}

/// Reversible JSON cipher keyed by a passphrase.
///
/// Envelope: `v1.` + base64(salt[16] ‖ nonce[24] ‖ XChaCha20-Poly1305 ciphertext),
/// key = Argon2id(passphrase, salt). A wrong passphrase fails authentication
/// instead of producing garbage.
#[derive(Clone)]
pub struct SessionCipher {
    passphrase: String,
}

impl SessionCipher {
    pub fn new(passphrase: impl Into<String>) -> Self {
        Self {
            passphrase: passphrase.into(),
        }
    }

    fn cipher(&self, salt: &[u8]) -> Result<XChaCha20Poly1305, CipherError> {
        let key = derive_key(&self.passphrase, salt).map_err(|e| CipherError::Kdf(e.to_string()))?;
        Ok(XChaCha20Poly1305::new(Key::from_slice(&key)))
    }

    pub fn encrypt<T: Serialize>(&self, value: &T) -> Result<String, CipherError> {
        let plaintext = serde_json::to_vec(value)?;

        let mut salt = [0u8; SALT_LEN];
        let mut nonce = [0u8; NONCE_LEN];
        let mut rng = rand::thread_rng();
        rng.fill_bytes(&mut salt);
        rng.fill_bytes(&mut nonce);

        let sealed = self
            .cipher(&salt)?
            .encrypt(XNonce::from_slice(&nonce), plaintext.as_slice())
            .map_err(|_| CipherError::Seal)?;

        let mut envelope = Vec::with_capacity(SALT_LEN + NONCE_LEN + sealed.len());
        envelope.extend_from_slice(&salt);
        envelope.extend_from_slice(&nonce);
        envelope.extend_from_slice(&sealed);

        Ok(format!("{ENVELOPE_PREFIX}{}", STANDARD.encode(envelope)))
    }

    pub fn decrypt<T: DeserializeOwned>(&self, ciphertext: &str) -> Result<T, CipherError> {
        let body = ciphertext
            .trim()
            .strip_prefix(ENVELOPE_PREFIX)
            .ok_or(CipherError::Envelope)?;
        let raw = STANDARD.decode(body).map_err(|_| CipherError::Envelope)?;
        if raw.len() <= SALT_LEN + NONCE_LEN {
            return Err(CipherError::Envelope);
        }

        let (salt, rest) = raw.split_at(SALT_LEN);
        let (nonce, sealed) = rest.split_at(NONCE_LEN);

        let plaintext = self
            .cipher(salt)?
            .decrypt(XNonce::from_slice(nonce), sealed)
            .map_err(|_| CipherError::Authentication)?;

        Ok(serde_json::from_slice(&plaintext)?)
    }

    /// Like [`decrypt`](Self::decrypt) but logs and swallows the failure.
    pub fn decrypt_or_none<T: DeserializeOwned>(&self, ciphertext: &str) -> Option<T> {
        match self.decrypt(ciphertext) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(error = %e, "decryption error");
                None
            }
        }
    }
}
