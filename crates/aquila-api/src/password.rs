//! Password hashing collaborator.
//!
//! The auth service depends only on the [`PasswordVerifier`] trait. The
//! default implementation uses Argon2id through the `argon2` crate.

use anyhow::Result;
use argon2::password_hash::{rand_core::OsRng, SaltString};
use argon2::{Argon2, PasswordHash, PasswordHasher as _, PasswordVerifier as _};

/// Checks a plaintext password against a stored hash.
pub trait PasswordVerifier: Send + Sync {
    /// Returns true when the plaintext matches the hash. Unparseable hashes
    /// are treated as a mismatch, never as an error the caller must handle.
    fn verify(&self, hash: &str, plaintext: &str) -> bool;
}

/// Argon2id verifier with default parameters.
#[derive(Debug, Clone, Copy, Default)]
pub struct Argon2PasswordVerifier;

impl PasswordVerifier for Argon2PasswordVerifier {
    fn verify(&self, hash: &str, plaintext: &str) -> bool {
        PasswordHash::new(hash)
            .map(|parsed| {
                Argon2::default()
                    .verify_password(plaintext.as_bytes(), &parsed)
                    .is_ok()
            })
            .unwrap_or(false)
    }
}

/// Hashes a plaintext password with Argon2id and a fresh random salt.
///
/// Used when seeding users; the service itself only verifies.
pub fn hash_password(plaintext: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(plaintext.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|err| anyhow::anyhow!("failed to hash password: {err}"))
}
