//! Declarative route descriptions.
//!
//! A [`Route`] is a record of method, path template and handler, plus
//! optional API documentation metadata. Routes are immutable once built and
//! registered exactly once with a route adapter.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use aquila_docs::OperationDocs;
use http::Method;
use serde_json::Value;

use crate::context::Context;
use crate::error::RouteError;

/// What a handler resolves to: a JSON value to serialize at 200, or nothing
/// (an empty 200 body).
pub type RouteResult = Result<Option<Value>, RouteError>;

/// Boxed handler future.
pub type HandlerFuture = Pin<Box<dyn Future<Output = RouteResult> + Send>>;

/// Type-erased route handler.
pub type BoxedHandler = Arc<dyn Fn(Context) -> HandlerFuture + Send + Sync>;

/// A declarative route: method, path template, handler and optional docs.
///
/// Path templates may use either `{name}` or `:name` placeholders; the
/// adapter normalizes them at registration time.
///
/// # Example
///
/// ```
/// use aquila_core::Route;
///
/// let route = Route::get("/api/v1/ratings", |_ctx| async { Ok(None) });
/// assert_eq!(route.method(), &http::Method::GET);
/// assert_eq!(route.path(), "/api/v1/ratings");
/// ```
#[derive(Clone)]
pub struct Route {
    method: Method,
    path: String,
    handler: BoxedHandler,
    docs: Option<OperationDocs>,
}

impl Route {
    /// Creates a route from a method, path template and handler.
    pub fn new<F, Fut>(method: Method, path: impl Into<String>, handler: F) -> Self
    where
        F: Fn(Context) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = RouteResult> + Send + 'static,
    {
        Self {
            method,
            path: path.into(),
            handler: Arc::new(move |ctx| -> HandlerFuture { Box::pin(handler(ctx)) }),
            docs: None,
        }
    }

    /// Creates a GET route.
    pub fn get<F, Fut>(path: impl Into<String>, handler: F) -> Self
    where
        F: Fn(Context) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = RouteResult> + Send + 'static,
    {
        Self::new(Method::GET, path, handler)
    }

    /// Creates a POST route.
    pub fn post<F, Fut>(path: impl Into<String>, handler: F) -> Self
    where
        F: Fn(Context) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = RouteResult> + Send + 'static,
    {
        Self::new(Method::POST, path, handler)
    }

    /// Creates a PUT route.
    pub fn put<F, Fut>(path: impl Into<String>, handler: F) -> Self
    where
        F: Fn(Context) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = RouteResult> + Send + 'static,
    {
        Self::new(Method::PUT, path, handler)
    }

    /// Creates a DELETE route.
    pub fn delete<F, Fut>(path: impl Into<String>, handler: F) -> Self
    where
        F: Fn(Context) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = RouteResult> + Send + 'static,
    {
        Self::new(Method::DELETE, path, handler)
    }

    /// Attaches API documentation metadata.
    #[must_use]
    pub fn docs(mut self, docs: OperationDocs) -> Self {
        self.docs = Some(docs);
        self
    }

    /// Replaces the path template, e.g. with its normalized form.
    #[must_use]
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    /// Returns the HTTP method.
    #[must_use]
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Returns the path template as declared.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns the documentation metadata, if any.
    #[must_use]
    pub fn operation_docs(&self) -> Option<&OperationDocs> {
        self.docs.as_ref()
    }

    /// Invokes the handler with a context.
    pub fn invoke(&self, ctx: Context) -> HandlerFuture {
        (self.handler)(ctx)
    }
}

impl std::fmt::Debug for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Route")
            .field("method", &self.method)
            .field("path", &self.path)
            .field("has_docs", &self.docs.is_some())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HttpError;
    use crate::request::RawRequest;
    use http::StatusCode;
    use serde_json::json;

    fn empty_context() -> Context {
        Context::new(RawRequest::builder().build())
    }

    #[tokio::test]
    async fn handler_returning_value() {
        let route = Route::get("/ratings", |_ctx| async { Ok(Some(json!([]))) });
        let outcome = route.invoke(empty_context()).await.unwrap();
        assert_eq!(outcome, Some(json!([])));
    }

    #[tokio::test]
    async fn handler_returning_void() {
        let route = Route::post("/ratings", |_ctx| async { Ok(None) });
        let outcome = route.invoke(empty_context()).await.unwrap();
        assert!(outcome.is_none());
    }

    #[tokio::test]
    async fn handler_failing_with_http_error() {
        let route = Route::delete("/ratings/{id}", |_ctx| async {
            Err(HttpError::new(StatusCode::BAD_REQUEST, "forbidden").into())
        });
        let err = route.invoke(empty_context()).await.unwrap_err();
        assert!(matches!(err, RouteError::Http(_)));
    }

    #[test]
    fn method_helpers() {
        let get = Route::get("/a", |_ctx| async { Ok(None) });
        let post = Route::post("/a", |_ctx| async { Ok(None) });
        let put = Route::put("/a", |_ctx| async { Ok(None) });
        let delete = Route::delete("/a", |_ctx| async { Ok(None) });

        assert_eq!(get.method(), &Method::GET);
        assert_eq!(post.method(), &Method::POST);
        assert_eq!(put.method(), &Method::PUT);
        assert_eq!(delete.method(), &Method::DELETE);
    }

    #[test]
    fn docs_attachment() {
        let route = Route::get("/a", |_ctx| async { Ok(None) });
        assert!(route.operation_docs().is_none());

        let route = route.docs(aquila_docs::OperationDocs::new().tag("rating"));
        assert_eq!(route.operation_docs().unwrap().tags, vec!["rating"]);
    }
}
