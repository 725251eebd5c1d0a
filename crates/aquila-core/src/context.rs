//! Per-request context: raw fields wired to pipe chains.

use serde_json::Value;

use crate::error::HttpError;
use crate::pipe::{self, Pipe};
use crate::request::RawRequest;

/// Per-request wrapper exposing header, param and body extraction through
/// pipe chains.
///
/// The context performs no validation of its own: it looks up the raw field
/// and threads it through the supplied chain, so each route declares its
/// required inputs purely as pipe lists.
///
/// # Example
///
/// ```
/// use aquila_core::{Context, RawRequest};
/// use serde_json::json;
///
/// # tokio_test::block_on(async {
/// let ctx = Context::new(RawRequest::builder().param("id", "42").build());
/// let id = ctx.param("id", &[]).await.unwrap();
/// assert_eq!(id, json!("42"));
/// # });
/// ```
#[derive(Debug)]
pub struct Context {
    request: RawRequest,
}

impl Context {
    /// Wraps a raw request.
    #[must_use]
    pub fn new(request: RawRequest) -> Self {
        Self { request }
    }

    /// Runs the pipe chain over a header value (null when absent).
    pub async fn header(&self, key: &str, pipes: &[&dyn Pipe]) -> Result<Value, HttpError> {
        pipe::run(self.request.header(key), pipes).await
    }

    /// Runs the pipe chain over a path parameter (null when absent).
    pub async fn param(&self, key: &str, pipes: &[&dyn Pipe]) -> Result<Value, HttpError> {
        pipe::run(self.request.param(key), pipes).await
    }

    /// Runs the pipe chain over the body value (null when absent).
    pub async fn body(&self, pipes: &[&dyn Pipe]) -> Result<Value, HttpError> {
        pipe::run(self.request.body(), pipes).await
    }
}
