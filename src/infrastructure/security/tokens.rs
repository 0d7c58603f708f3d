use crate::domain::error::{AppError, Result};
use argon2::password_hash::rand_core::{OsRng, RngCore};
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use sha2::{Digest, Sha256};

pub const TOKEN_PREFIX: &str = "rbk_";

const TOKEN_BYTES: usize = 32;
const FINGERPRINT_CHARS: usize = 16;

/// Generates a raw ingest token: `rbk_` + 256 bits from the OS RNG,
/// hex-encoded. Returned to the caller exactly once and never stored.
pub fn generate_raw_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    OsRng.fill_bytes(&mut bytes);
    format!("{}{}", TOKEN_PREFIX, hex::encode(bytes))
}

/// Non-secret lookup key: first 16 hex chars of sha256(raw token). Bounds
/// candidate lookup; a fingerprint match alone never authenticates.
pub fn token_fingerprint(raw_token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(raw_token.as_bytes());
    hex::encode(hasher.finalize())[..FINGERPRINT_CHARS].to_string()
}

/// Argon2id hash with a fresh random salt, rendered as a PHC string.
/// CPU-bound; callers run this off the request path.
pub fn hash_token(raw_token: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(raw_token.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::SecurityError(format!("Failed to hash token: {}", e)))
}

/// Verifies a presented token against a stored PHC string. The argon2
/// comparison is constant-time; an unparseable stored hash verifies false.
pub fn verify_token(raw_token: &str, stored_hash: &str) -> bool {
    match PasswordHash::new(stored_hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(raw_token.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_token_shape() {
        let token = generate_raw_token();
        assert!(token.starts_with(TOKEN_PREFIX));
        assert_eq!(token.len(), TOKEN_PREFIX.len() + TOKEN_BYTES * 2);
        assert_ne!(token, generate_raw_token());
    }

    #[test]
    fn test_fingerprint_is_stable_and_short() {
        let token = "rbk_abc123";
        assert_eq!(token_fingerprint(token), token_fingerprint(token));
        assert_eq!(token_fingerprint(token).len(), FINGERPRINT_CHARS);
        assert_ne!(token_fingerprint(token), token_fingerprint("rbk_abc124"));
    }

    #[test]
    fn test_hash_round_trip() {
        let token = generate_raw_token();
        let hash = hash_token(&token).unwrap();
        assert!(verify_token(&token, &hash));
        assert!(!hash.contains(&token));
    }

    #[test]
    fn test_single_character_difference_fails() {
        let token = generate_raw_token();
        let hash = hash_token(&token).unwrap();
        let mut flipped = token.clone();
        let last = flipped.pop().unwrap();
        flipped.push(if last == '0' { '1' } else { '0' });
        assert!(!verify_token(&flipped, &hash));
    }

    #[test]
    fn test_garbage_stored_hash_verifies_false() {
        assert!(!verify_token("rbk_whatever", "not-a-phc-string"));
    }
}
