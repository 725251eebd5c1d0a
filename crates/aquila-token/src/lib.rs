//! Signed, time-limited session tokens.
//!
//! A [`TokenSigner`] encodes a claims mapping into an HS256-signed token
//! carrying issued-at and expiration timestamps; a [`TokenVerifier`] checks
//! signature and expiry and returns the decoded claims. Tokens are opaque
//! strings to every other component.
//!
//! Verification failures are classified three ways — bad signature, expired,
//! malformed — so callers can decide how much detail to surface.
//!
//! # Example
//!
//! ```
//! use aquila_token::{TokenSigner, TokenVerifier};
//! use std::time::Duration;
//!
//! let signer = TokenSigner::new("access-secret", Duration::from_secs(300));
//! let verifier = TokenVerifier::new("access-secret");
//!
//! let mut claims = serde_json::Map::new();
//! claims.insert("userId".into(), "u1".into());
//!
//! let token = signer.issue(&claims).unwrap();
//! let decoded = verifier.verify(&token).unwrap();
//! assert_eq!(decoded["userId"], "u1");
//! ```

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde_json::{Map, Value};
use thiserror::Error;

/// A decoded claims mapping (`userId` plus `iat`/`exp` issuance metadata).
pub type Claims = Map<String, Value>;

/// Classified token failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    /// The signature does not match the verification secret.
    #[error("token signature verification failed")]
    Signature,

    /// The token's expiration time has passed.
    #[error("token expired")]
    Expired,

    /// The token is not a well-formed signed token.
    #[error("token malformed")]
    Malformed,

    /// Signing failed. Does not occur with valid HMAC configuration.
    #[error("token signing failed: {0}")]
    Signing(String),
}

/// Current Unix time in seconds.
fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs())
        .unwrap_or(0)
}

/// Issues HS256-signed tokens with a fixed lifetime.
#[derive(Clone)]
pub struct TokenSigner {
    key: EncodingKey,
    lifetime: Duration,
}

impl TokenSigner {
    /// Creates a signer from a secret and a token lifetime.
    #[must_use]
    pub fn new(secret: &str, lifetime: Duration) -> Self {
        Self {
            key: EncodingKey::from_secret(secret.as_bytes()),
            lifetime,
        }
    }

    /// Returns the configured token lifetime.
    #[must_use]
    pub fn lifetime(&self) -> Duration {
        self.lifetime
    }

    /// Issues a token for the given claims, stamped with the current time.
    pub fn issue(&self, claims: &Claims) -> Result<String, TokenError> {
        self.issue_at(claims, unix_now())
    }

    /// Issues a token as if signed at `issued_at` (Unix seconds).
    ///
    /// Expiration is `issued_at` plus the configured lifetime. Useful for
    /// deterministic issuance in tests; `issue` is the production path.
    pub fn issue_at(&self, claims: &Claims, issued_at: u64) -> Result<String, TokenError> {
        let mut payload = claims.clone();
        payload.insert("iat".to_string(), Value::from(issued_at));
        payload.insert(
            "exp".to_string(),
            Value::from(issued_at + self.lifetime.as_secs()),
        );

        jsonwebtoken::encode(&Header::new(Algorithm::HS256), &payload, &self.key)
            .map_err(|err| TokenError::Signing(err.to_string()))
    }
}

impl std::fmt::Debug for TokenSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenSigner")
            .field("lifetime", &self.lifetime)
            .finish_non_exhaustive()
    }
}

/// Verifies HS256-signed tokens and decodes their claims.
#[derive(Clone)]
pub struct TokenVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl TokenVerifier {
    /// Creates a verifier for the given secret.
    ///
    /// Expiry is checked with zero leeway: a token expired by one second is
    /// already rejected.
    #[must_use]
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.validate_exp = true;

        Self {
            key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// Verifies signature and expiry, returning the decoded claims.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        jsonwebtoken::decode::<Claims>(token, &self.key, &self.validation)
            .map(|data| data.claims)
            .map_err(|err| match err.kind() {
                ErrorKind::InvalidSignature => TokenError::Signature,
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Malformed,
            })
    }
}

impl std::fmt::Debug for TokenVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenVerifier").finish_non_exhaustive()
    }
}
