//! The pipe abstraction: composable, asynchronous, fallible transforms.
//!
//! Any type implementing [`Pipe`] can participate in a chain. Composition is
//! strict left-to-right sequential threading: each stage receives the
//! previous stage's output, and the first failure short-circuits the rest.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::HttpError;

/// A unary, asynchronous, fallible transform over JSON values.
///
/// Pipes own only their configuration and must be safe to run concurrently
/// for different requests. A failure is an [`HttpError`] describing exactly
/// what the client should see.
#[async_trait]
pub trait Pipe: Send + Sync {
    /// Transforms the input value or fails with a client-facing error.
    async fn transform(&self, value: Value) -> Result<Value, HttpError>;
}

/// Runs a value through an ordered pipe chain.
///
/// Each stage receives the previous stage's output, not the original value.
/// An empty chain is the identity transform.
///
/// # Example
///
/// ```
/// use aquila_core::pipe;
///
/// # tokio_test::block_on(async {
/// let value = pipe::run(serde_json::json!("unchanged"), &[]).await.unwrap();
/// assert_eq!(value, serde_json::json!("unchanged"));
/// # });
/// ```
pub async fn run(value: Value, pipes: &[&dyn Pipe]) -> Result<Value, HttpError> {
    let mut current = value;
    for pipe in pipes {
        current = pipe.transform(current).await?;
    }
    Ok(current)
}
