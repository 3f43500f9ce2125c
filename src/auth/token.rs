// src/auth/token.rs
use base64::Engine;
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::{Digest, Sha256};

/// Session and magic-link tokens are 32 random bytes.
pub const SESSION_TOKEN_BYTES: usize = 32;

/// Suffix appended to object-store keys so re-uploads of the same
/// filename never collide. 8 bytes -> 11 url-safe chars.
pub const KEY_SUFFIX_BYTES: usize = 8;

/// Generate a secure random token using the OS RNG.
pub fn generate_token_default() -> String {
    generate_token(&mut OsRng, SESSION_TOKEN_BYTES)
}

/// Short random suffix for storage keys.
pub fn generate_key_suffix() -> String {
    generate_token(&mut OsRng, KEY_SUFFIX_BYTES)
}

/// Generate a URL-safe token from random bytes (Base64, no padding).
pub fn generate_token<R: RngCore>(rng: &mut R, nbytes: usize) -> String {
    let mut buf = vec![0u8; nbytes];
    rng.fill_bytes(&mut buf);
    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(buf)
}

/// Hash a token with SHA-256. Only the hash is stored in the DB.
pub fn hash_token(token: &str) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    let out = hasher.finalize();
    let mut arr = [0u8; 32];
    arr.copy_from_slice(&out);
    arr
}
