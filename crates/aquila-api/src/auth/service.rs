//! Token issuance and refresh.

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use aquila_token::{Claims, TokenError, TokenSigner, TokenVerifier};

use crate::config::{ACCESS_TOKEN_LIFETIME, REFRESH_TOKEN_LIFETIME};
use crate::password::PasswordVerifier;
use crate::store::UserStore;

/// Auth failures. The first two are recoverable domain outcomes the routes
/// map to 400; verification failures map to 401; internal failures bubble to
/// the adapter's generic 500.
#[derive(Debug, Error)]
pub enum AuthError {
    /// No user with the given username.
    #[error("user not found")]
    UserNotFound,

    /// The password does not match the stored hash.
    #[error("invalid password")]
    InvalidPassword,

    /// The refresh token failed verification (classified).
    #[error(transparent)]
    Verification(#[from] TokenError),

    /// Unexpected failure from a collaborator.
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

/// Both tokens issued on a successful login.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    /// Short-lived credential sent with every request.
    pub access_token: String,
    /// Long-lived credential used only to mint new access tokens.
    pub refresh_token: String,
}

/// The fresh access token minted by a refresh.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshedSession {
    /// The newly issued access token.
    pub access_token: String,
}

/// Issues and refreshes session token pairs.
///
/// Access and refresh tokens share the claims payload but are signed with
/// distinct secrets and lifetimes (5 minutes and 1 day).
pub struct AuthService {
    users: Arc<dyn UserStore>,
    passwords: Arc<dyn PasswordVerifier>,
    access_signer: TokenSigner,
    refresh_signer: TokenSigner,
    refresh_verifier: TokenVerifier,
}

impl AuthService {
    /// Creates the service over its collaborators and the two secrets.
    #[must_use]
    pub fn new(
        users: Arc<dyn UserStore>,
        passwords: Arc<dyn PasswordVerifier>,
        access_secret: &str,
        refresh_secret: &str,
    ) -> Self {
        Self {
            users,
            passwords,
            access_signer: TokenSigner::new(access_secret, ACCESS_TOKEN_LIFETIME),
            refresh_signer: TokenSigner::new(refresh_secret, REFRESH_TOKEN_LIFETIME),
            refresh_verifier: TokenVerifier::new(refresh_secret),
        }
    }

    /// Checks credentials and issues an access/refresh token pair.
    pub async fn login(&self, username: &str, password: &str) -> Result<TokenPair, AuthError> {
        let user = self
            .users
            .find_by_username(username)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        if !self.passwords.verify(&user.password_hash, password) {
            return Err(AuthError::InvalidPassword);
        }

        let claims = session_claims(&user.id);
        let access_token = self
            .access_signer
            .issue(&claims)
            .map_err(|err| AuthError::Internal(err.into()))?;
        let refresh_token = self
            .refresh_signer
            .issue(&claims)
            .map_err(|err| AuthError::Internal(err.into()))?;

        Ok(TokenPair {
            access_token,
            refresh_token,
        })
    }

    /// Verifies a refresh token and re-issues an access token.
    ///
    /// The refresh token itself is not rotated. Claims are only trusted
    /// after verification; a verified token without a string `userId` claim
    /// counts as malformed.
    pub async fn refresh(&self, refresh_token: &str) -> Result<RefreshedSession, AuthError> {
        let claims = self.refresh_verifier.verify(refresh_token)?;

        let user_id = claims
            .get("userId")
            .and_then(Value::as_str)
            .ok_or(AuthError::Verification(TokenError::Malformed))?;

        let access_token = self
            .access_signer
            .issue(&session_claims(user_id))
            .map_err(|err| AuthError::Internal(err.into()))?;

        Ok(RefreshedSession { access_token })
    }
}

fn session_claims(user_id: &str) -> Claims {
    let mut claims = Claims::new();
    claims.insert("userId".to_string(), Value::from(user_id));
    claims
}
