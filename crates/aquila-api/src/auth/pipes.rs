//! The bearer-auth pipe chain.

use async_trait::async_trait;
use http::StatusCode;
use serde::Deserialize;
use serde_json::Value;

use aquila_core::{pipe, HttpError, Pipe};
use aquila_pipes::{ObjectSchema, Schema, SchemaPipe, TokenPipe};
use aquila_token::TokenVerifier;

/// The claims a verified session yields.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Session {
    /// The authenticated user's identifier.
    #[serde(rename = "userId")]
    pub user_id: String,
}

/// Shape of the claims payload embedded in session tokens.
fn session_schema() -> ObjectSchema {
    Schema::object().field("userId", Schema::string())
}

/// Authorization-header pipe: bearer-scheme extraction, token verification,
/// claims-shape validation. Every failure is a generic 401 so callers learn
/// nothing about which stage rejected them.
///
/// Output is the validated claims object, deserializable into [`Session`].
#[derive(Debug, Clone)]
pub struct AuthPipe {
    bearer: SchemaPipe,
    token: TokenPipe,
    session: SchemaPipe,
}

impl AuthPipe {
    /// Creates the pipe over an access-token verifier.
    #[must_use]
    pub fn new(verifier: TokenVerifier) -> Self {
        Self {
            bearer: SchemaPipe::new(
                Schema::string()
                    .starts_with("Bearer ", "unauthorized")
                    .strip_prefix(),
            )
            .with_status(StatusCode::UNAUTHORIZED)
            .with_message("unauthorized"),
            token: TokenPipe::new(verifier),
            session: SchemaPipe::new(session_schema())
                .with_status(StatusCode::UNAUTHORIZED)
                .with_message("unauthorized"),
        }
    }
}

#[async_trait]
impl Pipe for AuthPipe {
    async fn transform(&self, value: Value) -> Result<Value, HttpError> {
        pipe::run(value, &[&self.bearer, &self.token, &self.session]).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aquila_token::TokenSigner;
    use serde_json::json;
    use std::time::Duration;

    fn token_for(user_id: &str, secret: &str) -> String {
        let mut claims = serde_json::Map::new();
        claims.insert("userId".to_string(), json!(user_id));
        TokenSigner::new(secret, Duration::from_secs(300))
            .issue(&claims)
            .unwrap()
    }

    fn auth_pipe() -> AuthPipe {
        AuthPipe::new(TokenVerifier::new("access-secret"))
    }

    #[tokio::test]
    async fn valid_bearer_token_yields_session() {
        let header = format!("Bearer {}", token_for("u1", "access-secret"));
        let claims = auth_pipe().transform(json!(header)).await.unwrap();

        let session: Session = serde_json::from_value(claims).unwrap();
        assert_eq!(session.user_id, "u1");
    }

    #[tokio::test]
    async fn missing_header_is_unauthorized() {
        let err = auth_pipe().transform(Value::Null).await.unwrap_err();
        assert_eq!(err.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(err.body()["message"], "unauthorized");
    }

    #[tokio::test]
    async fn non_bearer_scheme_is_unauthorized() {
        let err = auth_pipe()
            .transform(json!("Basic dXNlcjpwYXNz"))
            .await
            .unwrap_err();
        assert_eq!(err.body()["message"], "unauthorized");
    }

    #[tokio::test]
    async fn wrong_secret_is_unauthorized() {
        let header = format!("Bearer {}", token_for("u1", "other-secret"));
        let err = auth_pipe().transform(json!(header)).await.unwrap_err();
        assert_eq!(err.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(err.body()["message"], "unauthorized");
    }

    #[tokio::test]
    async fn claims_without_user_id_are_unauthorized() {
        let claims = serde_json::Map::new();
        let token = TokenSigner::new("access-secret", Duration::from_secs(300))
            .issue(&claims)
            .unwrap();

        let err = auth_pipe()
            .transform(json!(format!("Bearer {token}")))
            .await
            .unwrap_err();
        assert_eq!(err.body()["message"], "unauthorized");
    }
}
