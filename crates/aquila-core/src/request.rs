//! The raw request model the pipe layer operates on.
//!
//! A [`RawRequest`] is assembled once per inbound call by the route adapter:
//! header entries (single values or lists), path parameters as matched by the
//! route template, and the already-deserialized JSON body. Absent entries are
//! simply not present in the mappings; lookups for them yield JSON null at
//! the pipe-chain boundary.

use std::collections::HashMap;

use serde_json::Value;

/// Raw per-request data, read-only once constructed.
///
/// # Example
///
/// ```
/// use aquila_core::RawRequest;
/// use serde_json::json;
///
/// let request = RawRequest::builder()
///     .header("authorization", "Bearer abc")
///     .param("id", "42")
///     .body(json!({"rating": 5}))
///     .build();
///
/// assert_eq!(request.header("authorization"), json!("Bearer abc"));
/// assert_eq!(request.header("missing"), json!(null));
/// ```
#[derive(Debug, Clone, Default)]
pub struct RawRequest {
    headers: HashMap<String, Value>,
    params: HashMap<String, String>,
    body: Value,
}

impl RawRequest {
    /// Creates a request from its parts.
    ///
    /// Header values must be JSON strings or arrays of strings; callers are
    /// expected to have dropped undefined entries already.
    #[must_use]
    pub fn new(headers: HashMap<String, Value>, params: HashMap<String, String>, body: Value) -> Self {
        Self { headers, params, body }
    }

    /// Creates a builder, mainly for tests and direct construction.
    #[must_use]
    pub fn builder() -> RawRequestBuilder {
        RawRequestBuilder::default()
    }

    /// Looks up a header entry. Absent headers yield JSON null.
    #[must_use]
    pub fn header(&self, key: &str) -> Value {
        self.headers.get(key).cloned().unwrap_or(Value::Null)
    }

    /// Looks up a path parameter. Absent parameters yield JSON null.
    #[must_use]
    pub fn param(&self, key: &str) -> Value {
        self.params
            .get(key)
            .map(|value| Value::String(value.clone()))
            .unwrap_or(Value::Null)
    }

    /// Returns the body value. An absent body is JSON null.
    #[must_use]
    pub fn body(&self) -> Value {
        self.body.clone()
    }
}

/// Builder for [`RawRequest`].
#[derive(Debug, Default)]
pub struct RawRequestBuilder {
    headers: HashMap<String, Value>,
    params: HashMap<String, String>,
    body: Value,
}

impl RawRequestBuilder {
    /// Adds a single-valued header.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), Value::String(value.into()));
        self
    }

    /// Adds a multi-valued header.
    #[must_use]
    pub fn header_list(mut self, name: impl Into<String>, values: Vec<String>) -> Self {
        self.headers
            .insert(name.into(), Value::Array(values.into_iter().map(Value::String).collect()));
        self
    }

    /// Adds a path parameter.
    #[must_use]
    pub fn param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }

    /// Sets the body value.
    #[must_use]
    pub fn body(mut self, body: Value) -> Self {
        self.body = body;
        self
    }

    /// Builds the request.
    #[must_use]
    pub fn build(self) -> RawRequest {
        RawRequest {
            headers: self.headers,
            params: self.params,
            body: self.body,
        }
    }
}
