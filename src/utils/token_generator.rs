//! Short token generation and custom alias validation.
//!
//! Random tokens are drawn from an injected random source rather than a
//! process-global seed, so tests can pin the sequence and collisions stay
//! within the birthday bound of the 36^8 address space.

use crate::error::AppError;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Mutex;

/// Alphabet used for generated tokens. Lowercase plus digits keeps tokens
/// case-insensitive-safe in URLs.
const TOKEN_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// Length of generated tokens.
const TOKEN_LENGTH: usize = 8;

/// Aliases that collide with routing or system endpoints.
const RESERVED_ALIASES: &[&str] = &["health", "api", "v1", "auth", "users", "urls", "static"];

/// Generator for collision-resistant short tokens.
///
/// Wraps a seeded [`StdRng`] behind a mutex so a single instance can be
/// shared across request handlers.
pub struct TokenGenerator {
    rng: Mutex<StdRng>,
}

impl TokenGenerator {
    /// Creates a generator seeded from OS entropy.
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_os_rng()),
        }
    }

    /// Creates a generator with a fixed seed. Deterministic, for tests.
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    /// Generates a random 8-character token over `[a-z0-9]`.
    pub fn generate(&self) -> String {
        // A poisoned lock still holds a usable generator; recover it rather
        // than panicking on every request after an unrelated panic.
        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
        (0..TOKEN_LENGTH)
            .map(|_| TOKEN_ALPHABET[rng.random_range(0..TOKEN_ALPHABET.len())] as char)
            .collect()
    }

    /// Generates a 6-digit registration verification code.
    pub fn generate_verification_code(&self) -> String {
        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
        format!("{:06}", rng.random_range(0..1_000_000u32))
    }
}

impl Default for TokenGenerator {
    fn default() -> Self {
        Self::new()
    }
}

/// Validates a user-provided custom alias.
///
/// # Rules
///
/// - Length: 4-32 characters
/// - Allowed characters: letters, digits, hyphens, underscores
/// - Cannot start or end with a hyphen
/// - Cannot be a reserved system word
///
/// # Errors
///
/// Returns [`AppError::Validation`] if any rule is violated.
pub fn validate_custom_alias(alias: &str) -> Result<(), AppError> {
    if alias.len() < 4 || alias.len() > 32 {
        return Err(AppError::bad_request(
            "Custom alias must be 4-32 characters",
        ));
    }

    if !alias
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(AppError::bad_request(
            "Custom alias can only contain letters, digits, hyphens, and underscores",
        ));
    }

    if alias.starts_with('-') || alias.ends_with('-') {
        return Err(AppError::bad_request(
            "Custom alias cannot start or end with a hyphen",
        ));
    }

    if RESERVED_ALIASES.contains(&alias) {
        return Err(AppError::bad_request("This alias is reserved"));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_generate_has_expected_length() {
        let generator = TokenGenerator::new();
        assert_eq!(generator.generate().len(), TOKEN_LENGTH);
    }

    #[test]
    fn test_generate_uses_alphabet() {
        let generator = TokenGenerator::new();
        let token = generator.generate();
        assert!(token
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit()));
    }

    #[test]
    fn test_generate_produces_unique_tokens() {
        let generator = TokenGenerator::new();
        let mut tokens = HashSet::new();

        for _ in 0..1000 {
            tokens.insert(generator.generate());
        }

        assert_eq!(tokens.len(), 1000);
    }

    #[test]
    fn test_verification_code_is_six_digits() {
        let generator = TokenGenerator::new();
        for _ in 0..100 {
            let code = generator.generate_verification_code();
            assert_eq!(code.len(), 6);
            assert!(code.chars().all(|c| c.is_ascii_digit()));
        }
    }

    #[test]
    fn test_seeded_generator_is_deterministic() {
        let a = TokenGenerator::from_seed(42);
        let b = TokenGenerator::from_seed(42);
        assert_eq!(a.generate(), b.generate());
    }

    #[test]
    fn test_generator_survives_a_poisoned_lock() {
        let generator = std::sync::Arc::new(TokenGenerator::from_seed(7));

        let poisoner = std::sync::Arc::clone(&generator);
        let _ = std::thread::spawn(move || {
            let _guard = poisoner.rng.lock().unwrap();
            panic!("poison the lock");
        })
        .join();

        let token = generator.generate();
        assert_eq!(token.len(), TOKEN_LENGTH);
        assert_eq!(generator.generate_verification_code().len(), 6);
    }

    #[test]
    fn test_validate_accepts_valid_aliases() {
        for alias in ["promo2025", "my-link", "My_Link_42", "abcd"] {
            assert!(validate_custom_alias(alias).is_ok(), "failed for {alias}");
        }
    }

    #[test]
    fn test_validate_too_short() {
        assert!(validate_custom_alias("abc").is_err());
    }

    #[test]
    fn test_validate_too_long() {
        let alias = "a".repeat(33);
        assert!(validate_custom_alias(&alias).is_err());
    }

    #[test]
    fn test_validate_rejects_special_characters() {
        assert!(validate_custom_alias("my code").is_err());
        assert!(validate_custom_alias("my@code").is_err());
    }

    #[test]
    fn test_validate_rejects_edge_hyphens() {
        assert!(validate_custom_alias("-mylink").is_err());
        assert!(validate_custom_alias("mylink-").is_err());
    }

    #[test]
    fn test_validate_rejects_reserved_words() {
        for &reserved in RESERVED_ALIASES {
            if reserved.len() >= 4 {
                assert!(
                    validate_custom_alias(reserved).is_err(),
                    "reserved alias '{reserved}' should be invalid"
                );
            }
        }
    }
}
