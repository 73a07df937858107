//! Password hashing and opaque token generation.

use rand::Rng;
use sha2::{Digest, Sha256};

/// Prefix for session and reset tokens.
const TOKEN_PREFIX: &str = "cs_";

/// Length of the random portion of a token (in bytes, hex-encoded = 2x chars).
const TOKEN_RANDOM_BYTES: usize = 24;

/// Length of a password salt in bytes.
const SALT_BYTES: usize = 16;

pub fn generate_salt() -> String {
    let mut rng = rand::thread_rng();
    let bytes: Vec<u8> = (0..SALT_BYTES).map(|_| rng.gen()).collect();
    hex::encode(&bytes)
}

/// Hash a password with its per-user salt for storage.
pub fn hash_password(salt: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

pub fn verify_password(salt: &str, stored_hash: &str, password: &str) -> bool {
    hash_password(salt, password) == stored_hash
}

/// Generate a new opaque token.
///
/// Returns (full_token, token_hash) where:
/// - full_token: The complete token held client-side (e.g., "cs_abc123...")
/// - token_hash: SHA-256 hash for storage
pub fn generate_token() -> (String, String) {
    let mut rng = rand::thread_rng();
    let random_bytes: Vec<u8> = (0..TOKEN_RANDOM_BYTES).map(|_| rng.gen()).collect();
    let random_hex = hex::encode(&random_bytes);

    let full_token = format!("{}{}", TOKEN_PREFIX, random_hex);
    let token_hash = hash_token(&full_token);

    (full_token, token_hash)
}

/// Hash a token for storage.
pub fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_token() {
        let (full_token, hash) = generate_token();

        assert!(full_token.starts_with("cs_"));
        assert_eq!(full_token.len(), 3 + 48); // "cs_" + 48 hex chars

        assert_ne!(full_token, hash);
        assert_eq!(hash.len(), 64); // SHA-256 = 64 hex chars
        assert_eq!(hash, hash_token(&full_token));
    }

    #[test]
    fn test_tokens_are_unique() {
        let (a, _) = generate_token();
        let (b, _) = generate_token();
        assert_ne!(a, b);
    }

    #[test]
    fn test_password_verify() {
        let salt = generate_salt();
        let hash = hash_password(&salt, "hunter22");

        assert!(verify_password(&salt, &hash, "hunter22"));
        assert!(!verify_password(&salt, &hash, "hunter2"));
        assert!(!verify_password("othersalt", &hash, "hunter22"));
    }

    #[test]
    fn test_salts_are_unique() {
        assert_ne!(generate_salt(), generate_salt());
    }
}
