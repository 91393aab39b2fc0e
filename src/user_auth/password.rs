//! Password digests: PBKDF2-HMAC-SHA256 with a random per-password salt.
//!
//! Digest layout is `base64(salt[16] || key[32])` (standard alphabet, padded),
//! 64 characters in total.

use base64::{Engine, engine::general_purpose::STANDARD};
use pbkdf2::pbkdf2_hmac_array;
use rand::{RngCore, rngs::OsRng};
use sha2::Sha256;

pub const SALT_LEN: usize = 16;
pub const KEY_LEN: usize = 32;
pub const ITERATIONS: u32 = 10_000;

const DIGEST_LEN: usize = SALT_LEN + KEY_LEN;

/// Hash a password with a fresh random salt.
///
/// Accepts any input, including empty and very long passwords (no truncation).
pub fn hash(password: &str) -> String {
    let mut salt = [0u8; SALT_LEN];
    OsRng.fill_bytes(&mut salt);
    let key = derive_key(password, &salt);

    let mut digest = [0u8; DIGEST_LEN];
    digest[..SALT_LEN].copy_from_slice(&salt);
    digest[SALT_LEN..].copy_from_slice(&key);
    STANDARD.encode(digest)
}

/// Check a password against a stored digest.
///
/// Returns `false` for an empty password, an empty digest, or a digest that
/// does not decode to `salt || key`. Never panics.
pub fn verify(password: &str, digest: &str) -> bool {
    if password.is_empty() || digest.is_empty() {
        return false;
    }

    let bytes = match STANDARD.decode(digest) {
        Ok(b) => b,
        Err(_) => return false,
    };
    if bytes.len() != DIGEST_LEN {
        return false;
    }

    let (salt, stored_key) = bytes.split_at(SALT_LEN);
    let attempted = derive_key(password, salt);
    constant_time_eq(stored_key, &attempted)
}

fn derive_key(password: &str, salt: &[u8]) -> [u8; KEY_LEN] {
    pbkdf2_hmac_array::<Sha256, KEY_LEN>(password.as_bytes(), salt, ITERATIONS)
}

/// Constant-time byte comparison
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        result |= x ^ y;
    }

    result == 0
}
