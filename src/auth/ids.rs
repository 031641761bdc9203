use rand::Rng;
use sha2::{Digest, Sha256};

const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// `ceo_<millis>_<9 base-36 chars>`
pub fn session_id<R: Rng + ?Sized>(now_ms: i64, rng: &mut R) -> String {
    let suffix: String = (0..9)
        .map(|_| BASE36[rng.gen_range(0..BASE36.len())] as char)
        .collect();
    format!("ceo_{now_ms}_{suffix}")
}

/// `device_<digest>` over user agent and login time.
pub fn device_id(user_agent: &str, now_ms: i64) -> String {
    let digest = Sha256::digest(format!("{user_agent}{now_ms}").as_bytes());
    format!("device_{}", hex::encode(&digest[..16]))
}
