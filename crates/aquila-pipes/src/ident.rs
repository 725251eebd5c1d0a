//! Identifier-format pipe.

use async_trait::async_trait;
use http::StatusCode;
use serde_json::Value;

use aquila_core::{HttpError, Pipe};

use crate::schema::{Schema, SchemaPipe};

/// Pipe that validates a string is present, of string type and in the
/// canonical UUID textual form. Each check has its own message derived from
/// the field name this pipe is constructed with.
///
/// # Example
///
/// ```
/// use aquila_pipes::UuidPipe;
/// use aquila_core::Pipe;
///
/// # tokio_test::block_on(async {
/// let pipe = UuidPipe::new("id");
///
/// let err = pipe.transform(serde_json::json!("not-a-uuid")).await.unwrap_err();
/// assert_eq!(err.body()["message"], "id must be a valid UUID");
/// # });
/// ```
#[derive(Debug, Clone)]
pub struct UuidPipe {
    inner: SchemaPipe,
}

impl UuidPipe {
    /// Creates an identifier pipe for the named field, failing at 400.
    #[must_use]
    pub fn new(key: &str) -> Self {
        let schema = Schema::string()
            .required_error(format!("{key} is a required field"))
            .type_error(format!("{key} must be a string type"))
            .uuid(format!("{key} must be a valid UUID"));

        Self {
            inner: SchemaPipe::new(schema),
        }
    }

    /// Overrides the failure status.
    #[must_use]
    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.inner = self.inner.with_status(status);
        self
    }
}

#[async_trait]
impl Pipe for UuidPipe {
    async fn transform(&self, value: Value) -> Result<Value, HttpError> {
        self.inner.transform(value).await
    }
}
