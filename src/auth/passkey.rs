use anyhow::Result;
use tracing::warn;

use super::utils::{hash_passkey, verify_passkey};

/// Compares submitted passkeys against the configured one. Only the Argon2
/// hash is kept in memory.
#[derive(Clone)]
pub struct PasskeyGate {
    hash: String,
}

impl PasskeyGate {
    pub fn new(passkey: &str) -> Result<Self> {
        Ok(Self {
            hash: hash_passkey(passkey)?,
        })
    }

    pub fn accepts(&self, candidate: &str) -> bool {
        if candidate.is_empty() {
            return false;
        }
        verify_passkey(&self.hash, candidate).unwrap_or_else(|e| {
            warn!(error = %e, "passkey verification failed");
            false
        })
    }
}
