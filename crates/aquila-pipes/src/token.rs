//! Token-decoding pipe.

use async_trait::async_trait;
use http::StatusCode;
use serde_json::Value;

use aquila_core::{HttpError, Pipe};
use aquila_token::{TokenError, TokenVerifier};

/// Pipe that treats its input as a signed session token, verifies signature
/// and expiry, and outputs the decoded claims object.
///
/// Failures answer 401 with a single generic message by default, so the
/// client learns nothing about why the token was rejected. Cause-specific
/// messages can be configured per classification when a route wants to be
/// more talkative.
///
/// # Example
///
/// ```
/// use aquila_pipes::TokenPipe;
/// use aquila_core::Pipe;
/// use aquila_token::{TokenSigner, TokenVerifier};
/// use std::time::Duration;
///
/// # tokio_test::block_on(async {
/// let signer = TokenSigner::new("secret", Duration::from_secs(300));
/// let mut claims = serde_json::Map::new();
/// claims.insert("userId".into(), "u1".into());
/// let token = signer.issue(&claims).unwrap();
///
/// let pipe = TokenPipe::new(TokenVerifier::new("secret"));
/// let decoded = pipe.transform(serde_json::json!(token)).await.unwrap();
/// assert_eq!(decoded["userId"], "u1");
/// # });
/// ```
#[derive(Debug, Clone)]
pub struct TokenPipe {
    verifier: TokenVerifier,
    status: StatusCode,
    message: String,
    signature_message: Option<String>,
    expired_message: Option<String>,
    malformed_message: Option<String>,
}

impl TokenPipe {
    /// Creates a token pipe failing at 401 with a generic message.
    #[must_use]
    pub fn new(verifier: TokenVerifier) -> Self {
        Self {
            verifier,
            status: StatusCode::UNAUTHORIZED,
            message: "unauthorized".to_string(),
            signature_message: None,
            expired_message: None,
            malformed_message: None,
        }
    }

    /// Overrides the failure status.
    #[must_use]
    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }

    /// Overrides the generic failure message.
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Message surfaced when the signature does not verify.
    #[must_use]
    pub fn on_signature(mut self, message: impl Into<String>) -> Self {
        self.signature_message = Some(message.into());
        self
    }

    /// Message surfaced when the token is expired.
    #[must_use]
    pub fn on_expired(mut self, message: impl Into<String>) -> Self {
        self.expired_message = Some(message.into());
        self
    }

    /// Message surfaced when the token is malformed.
    #[must_use]
    pub fn on_malformed(mut self, message: impl Into<String>) -> Self {
        self.malformed_message = Some(message.into());
        self
    }

    fn failure(&self, cause: &TokenError) -> HttpError {
        let specific = match cause {
            TokenError::Signature => self.signature_message.as_ref(),
            TokenError::Expired => self.expired_message.as_ref(),
            _ => self.malformed_message.as_ref(),
        };
        HttpError::new(self.status, specific.unwrap_or(&self.message).clone())
    }
}

#[async_trait]
impl Pipe for TokenPipe {
    async fn transform(&self, value: Value) -> Result<Value, HttpError> {
        let Some(token) = value.as_str() else {
            return Err(self.failure(&TokenError::Malformed));
        };

        match self.verifier.verify(token) {
            Ok(claims) => Ok(Value::Object(claims)),
            Err(cause) => Err(self.failure(&cause)),
        }
    }
}
