use anyhow::{anyhow, Result};
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};

/// Memory cost in KiB. Kept small: the passkey is not a real credential and
/// the cipher derives a key on every session write.
const ARGON2_M_COST: u32 = 1024;
const ARGON2_T_COST: u32 = 1;
pub const DERIVED_KEY_LEN: usize = 32;

fn argon2() -> Result<Argon2<'static>> {
    let params = Params::new(ARGON2_M_COST, ARGON2_T_COST, 1, Some(DERIVED_KEY_LEN))
        .map_err(|e| anyhow!("invalid argon2 params: {e}"))?;
    Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
}

pub fn hash_passkey(passkey: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = argon2()?
        .hash_password(passkey.as_bytes(), &salt)
        .map_err(|e| anyhow!("passkey hashing failed: {e}"))?
        .to_string();
    Ok(hash)
}

pub fn verify_passkey(hash: &str, passkey: &str) -> Result<bool> {
    let parsed = PasswordHash::new(hash).map_err(|e| anyhow!("bad passkey hash: {e}"))?;
    Ok(argon2()?
        .verify_password(passkey.as_bytes(), &parsed)
        .is_ok())
}

pub fn derive_key(passkey: &str, salt: &[u8]) -> Result<[u8; DERIVED_KEY_LEN]> {
    let mut key = [0u8; DERIVED_KEY_LEN];
    argon2()?
        .hash_password_into(passkey.as_bytes(), salt, &mut key)
        .map_err(|e| anyhow!("key derivation failed: {e}"))?;
    Ok(key)
}
