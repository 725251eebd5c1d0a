//! The route-to-transport adapter.
//!
//! [`RouteAdapter`] owns the route table and the doc accumulator. Routes are
//! registered during single-threaded startup; afterwards the adapter only
//! serves [`dispatch`](RouteAdapter::dispatch) calls, which assemble the raw
//! request, invoke the matched handler and translate every possible outcome
//! into a uniform JSON reply.

use std::collections::HashMap;

use aquila_core::{Context, RawRequest, Route, RouteError};
use aquila_docs::ApiDocs;
use http::{HeaderMap, Method, StatusCode};
use serde_json::{json, Value};

use crate::routes::{normalize_template, RouteTable};

/// A transport-agnostic response: status plus optional JSON body.
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    status: StatusCode,
    body: Option<Value>,
}

impl Reply {
    /// Success reply carrying an optional body.
    #[must_use]
    pub fn ok(body: Option<Value>) -> Self {
        Self {
            status: StatusCode::OK,
            body,
        }
    }

    /// The fixed catch-all reply for unmatched requests.
    #[must_use]
    pub fn not_found() -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            body: Some(json!({ "message": "Route not found" })),
        }
    }

    /// The fixed reply for unexpected failures. Detail never leaves the server.
    #[must_use]
    pub fn internal() -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            body: Some(json!({ "message": "Internal Server Error" })),
        }
    }

    /// Returns the status code.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Returns the body, if any.
    #[must_use]
    pub fn body(&self) -> Option<&Value> {
        self.body.as_ref()
    }

    /// Splits the reply into its parts.
    #[must_use]
    pub fn into_parts(self) -> (StatusCode, Option<Value>) {
        (self.status, self.body)
    }
}

/// Binds declarative routes to the transport layer.
///
/// # Example
///
/// ```
/// use aquila_core::Route;
/// use aquila_server::RouteAdapter;
/// use http::{HeaderMap, Method, StatusCode};
///
/// # tokio_test::block_on(async {
/// let mut adapter = RouteAdapter::new();
/// adapter.register(Route::get("/ping", |_ctx| async { Ok(Some(serde_json::json!("pong"))) }));
///
/// let reply = adapter.dispatch(&Method::GET, "/ping", &HeaderMap::new(), b"").await;
/// assert_eq!(reply.status(), StatusCode::OK);
/// # });
/// ```
#[derive(Debug, Default)]
pub struct RouteAdapter {
    table: RouteTable,
    docs: ApiDocs,
}

impl RouteAdapter {
    /// Creates an adapter with no routes.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a route: normalizes its path template and records its doc
    /// metadata under the normalized path and method.
    pub fn register(&mut self, route: Route) {
        let normalized = normalize_template(route.path());

        if let Some(operation) = route.operation_docs() {
            self.docs.insert(&normalized, route.method(), operation.clone());
        }

        let route = rebind_path(route, normalized);
        self.table.add(route);
    }

    /// Returns the accumulated doc metadata.
    #[must_use]
    pub fn docs(&self) -> &ApiDocs {
        &self.docs
    }

    /// Returns the number of registered routes.
    #[must_use]
    pub fn route_count(&self) -> usize {
        self.table.len()
    }

    /// Handles one inbound call.
    ///
    /// The body is expected to be raw JSON bytes (or empty). Header entries
    /// that are not valid UTF-8 are dropped rather than surfaced as nulls.
    pub async fn dispatch(
        &self,
        method: &Method,
        path: &str,
        headers: &HeaderMap,
        body: &[u8],
    ) -> Reply {
        let Some((route, params)) = self.table.find(method, path) else {
            return Reply::not_found();
        };

        let body = match parse_body(body) {
            Ok(value) => value,
            Err(reply) => return reply,
        };

        let request = RawRequest::new(collect_headers(headers), params, body);

        match route.invoke(Context::new(request)).await {
            Ok(value) => Reply::ok(value),
            Err(RouteError::Http(err)) => Reply {
                status: err.status(),
                body: Some(err.body()),
            },
            Err(RouteError::Unexpected(err)) => {
                tracing::error!(method = %method, path = %path, error = %err, "unhandled failure");
                Reply::internal()
            }
        }
    }
}

/// Swaps a route's declared path for its normalized form, keeping handler and
/// docs intact.
fn rebind_path(route: Route, normalized: String) -> Route {
    if route.path() == normalized {
        route
    } else {
        route.with_path(normalized)
    }
}

/// Copies defined header entries into the raw request mapping.
///
/// Single-valued headers become JSON strings, repeated headers become string
/// arrays. Entries that fail UTF-8 decoding are skipped entirely: absence,
/// not null.
fn collect_headers(headers: &HeaderMap) -> HashMap<String, Value> {
    let mut collected = HashMap::new();

    for name in headers.keys() {
        let mut values: Vec<String> = headers
            .get_all(name)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .map(ToString::to_string)
            .collect();

        let entry = match values.len() {
            0 => continue,
            1 => Value::String(values.remove(0)),
            _ => Value::Array(values.into_iter().map(Value::String).collect()),
        };

        collected.insert(name.as_str().to_string(), entry);
    }

    collected
}

/// Deserializes the body bytes. Empty bodies enter the pipe layer as null;
/// syntactically invalid JSON is a transport-level 400.
fn parse_body(body: &[u8]) -> Result<Value, Reply> {
    if body.is_empty() {
        return Ok(Value::Null);
    }

    serde_json::from_slice(body).map_err(|_| Reply {
        status: StatusCode::BAD_REQUEST,
        body: Some(json!({ "message": "invalid json body" })),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use aquila_core::HttpError;
    use aquila_docs::{OperationDocs, ResponseDocs};
    use serde_json::json;

    fn header_map(entries: &[(&str, &str)]) -> HeaderMap {
        let mut headers = HeaderMap::new();
        for (name, value) in entries {
            headers.append(
                http::header::HeaderName::from_bytes(name.as_bytes()).unwrap(),
                value.parse().unwrap(),
            );
        }
        headers
    }

    #[tokio::test]
    async fn success_with_value_is_200() {
        let mut adapter = RouteAdapter::new();
        adapter.register(Route::get("/ratings", |_ctx| async {
            Ok(Some(json!([{"rating": 5}])))
        }));

        let reply = adapter
            .dispatch(&Method::GET, "/ratings", &HeaderMap::new(), b"")
            .await;
        assert_eq!(reply.status(), StatusCode::OK);
        assert_eq!(reply.body().unwrap()[0]["rating"], 5);
    }

    #[tokio::test]
    async fn void_success_has_empty_body() {
        let mut adapter = RouteAdapter::new();
        adapter.register(Route::post("/ratings", |_ctx| async { Ok(None) }));

        let reply = adapter
            .dispatch(&Method::POST, "/ratings", &HeaderMap::new(), b"{}")
            .await;
        assert_eq!(reply.status(), StatusCode::OK);
        assert!(reply.body().is_none());
    }

    #[tokio::test]
    async fn structured_error_is_surfaced_verbatim() {
        let mut adapter = RouteAdapter::new();
        adapter.register(Route::put("/ratings/{id}", |_ctx| async {
            Err(HttpError::bad_request("forbidden").into())
        }));

        let reply = adapter
            .dispatch(&Method::PUT, "/ratings/1", &HeaderMap::new(), b"{}")
            .await;
        assert_eq!(reply.status(), StatusCode::BAD_REQUEST);
        assert_eq!(reply.body().unwrap()["message"], "forbidden");
    }

    #[tokio::test]
    async fn unexpected_error_is_a_generic_500() {
        let mut adapter = RouteAdapter::new();
        adapter.register(Route::get("/boom", |_ctx| async {
            Err(anyhow::anyhow!("connection reset by repository").into())
        }));

        let reply = adapter
            .dispatch(&Method::GET, "/boom", &HeaderMap::new(), b"")
            .await;
        assert_eq!(reply.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(reply.body().unwrap()["message"], "Internal Server Error");
    }

    #[tokio::test]
    async fn unmatched_request_is_404() {
        let adapter = RouteAdapter::new();
        let reply = adapter
            .dispatch(&Method::GET, "/nowhere", &HeaderMap::new(), b"")
            .await;
        assert_eq!(reply.status(), StatusCode::NOT_FOUND);
        assert_eq!(reply.body().unwrap()["message"], "Route not found");
    }

    #[tokio::test]
    async fn invalid_json_body_is_400() {
        let mut adapter = RouteAdapter::new();
        adapter.register(Route::post("/ratings", |_ctx| async { Ok(None) }));

        let reply = adapter
            .dispatch(&Method::POST, "/ratings", &HeaderMap::new(), b"{not json")
            .await;
        assert_eq!(reply.status(), StatusCode::BAD_REQUEST);
        assert_eq!(reply.body().unwrap()["message"], "invalid json body");
    }

    #[tokio::test]
    async fn path_params_reach_the_context() {
        let mut adapter = RouteAdapter::new();
        adapter.register(Route::get("/ratings/:id", |ctx| async move {
            let id = ctx.param("id", &[]).await?;
            Ok(Some(id))
        }));

        let reply = adapter
            .dispatch(&Method::GET, "/ratings/42", &HeaderMap::new(), b"")
            .await;
        assert_eq!(reply.body().unwrap(), &json!("42"));
    }

    #[tokio::test]
    async fn headers_reach_the_context() {
        let mut adapter = RouteAdapter::new();
        adapter.register(Route::get("/echo", |ctx| async move {
            let value = ctx.header("x-request-id", &[]).await?;
            Ok(Some(value))
        }));

        let reply = adapter
            .dispatch(
                &Method::GET,
                "/echo",
                &header_map(&[("x-request-id", "abc-123")]),
                b"",
            )
            .await;
        assert_eq!(reply.body().unwrap(), &json!("abc-123"));
    }

    #[tokio::test]
    async fn repeated_headers_become_lists() {
        let mut adapter = RouteAdapter::new();
        adapter.register(Route::get("/echo", |ctx| async move {
            Ok(Some(ctx.header("accept", &[]).await?))
        }));

        let reply = adapter
            .dispatch(
                &Method::GET,
                "/echo",
                &header_map(&[("accept", "application/json"), ("accept", "text/html")]),
                b"",
            )
            .await;
        assert_eq!(
            reply.body().unwrap(),
            &json!(["application/json", "text/html"])
        );
    }

    #[test]
    fn registration_accumulates_docs_per_method() {
        let mut adapter = RouteAdapter::new();
        let docs = || OperationDocs::new().response("200", ResponseDocs::new("OK"));

        adapter.register(Route::get("/ratings/:id", |_ctx| async { Ok(None) }).docs(docs()));
        adapter.register(Route::put("/ratings/{id}", |_ctx| async { Ok(None) }).docs(docs()));

        // Both placeholder syntaxes land under the same normalized key.
        let document = adapter.docs().to_document("aquila", "0.1.0");
        let by_method = &document.paths["/ratings/{id}"];
        assert!(by_method.contains_key("get"));
        assert!(by_method.contains_key("put"));
    }

    #[test]
    fn routes_without_docs_contribute_nothing() {
        let mut adapter = RouteAdapter::new();
        adapter.register(Route::get("/ratings", |_ctx| async { Ok(None) }));
        assert!(adapter.docs().is_empty());
        assert_eq!(adapter.route_count(), 1);
    }
}
