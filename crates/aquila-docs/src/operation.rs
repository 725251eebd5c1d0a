//! Per-operation documentation metadata.
//!
//! These types mirror the subset of the OpenAPI operation object that Aquila
//! routes actually declare. Schemas are carried as raw JSON values; the
//! service declares them with `serde_json::json!` literals.

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;

/// Location of an operation parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterLocation {
    /// HTTP header.
    Header,
    /// URL path parameter.
    Path,
    /// Query string parameter.
    Query,
}

/// An operation parameter descriptor.
#[derive(Debug, Clone, Serialize)]
pub struct Parameter {
    /// Parameter location.
    #[serde(rename = "in")]
    pub location: ParameterLocation,
    /// Parameter name.
    pub name: String,
    /// Parameter schema as a raw JSON schema fragment.
    pub schema: Value,
    /// Whether the parameter is required.
    pub required: bool,
}

impl Parameter {
    /// Creates a header parameter descriptor.
    #[must_use]
    pub fn header(name: impl Into<String>, schema: Value, required: bool) -> Self {
        Self {
            location: ParameterLocation::Header,
            name: name.into(),
            schema,
            required,
        }
    }

    /// Creates a path parameter descriptor. Path parameters are always required.
    #[must_use]
    pub fn path(name: impl Into<String>, schema: Value) -> Self {
        Self {
            location: ParameterLocation::Path,
            name: name.into(),
            schema,
            required: true,
        }
    }
}

/// Media type content holding a schema.
#[derive(Debug, Clone, Serialize)]
pub struct MediaType {
    /// Schema for this media type.
    pub schema: Value,
}

/// Request body descriptor, keyed by media type.
#[derive(Debug, Clone, Serialize)]
pub struct RequestBody {
    /// Content by media type.
    pub content: IndexMap<String, MediaType>,
}

impl RequestBody {
    /// Creates a JSON request body with the given schema.
    #[must_use]
    pub fn json(schema: Value) -> Self {
        let mut content = IndexMap::new();
        content.insert("application/json".to_string(), MediaType { schema });
        Self { content }
    }
}

/// Response descriptor for a single status code.
#[derive(Debug, Clone, Serialize)]
pub struct ResponseDocs {
    /// Human-readable description (required by OpenAPI).
    pub description: String,
    /// Response content by media type.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<IndexMap<String, MediaType>>,
}

impl ResponseDocs {
    /// Creates a response with a description and no body schema.
    #[must_use]
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            content: None,
        }
    }

    /// Attaches a JSON body schema to the response.
    #[must_use]
    pub fn json(mut self, schema: Value) -> Self {
        let mut content = IndexMap::new();
        content.insert("application/json".to_string(), MediaType { schema });
        self.content = Some(content);
        self
    }
}

/// Documentation metadata for a single route operation.
///
/// Built with the fluent methods and attached to a route at construction
/// time; the adapter records it in the [`ApiDocs`](crate::ApiDocs)
/// accumulator during registration.
///
/// # Example
///
/// ```
/// use aquila_docs::{OperationDocs, Parameter, ResponseDocs};
/// use serde_json::json;
///
/// let docs = OperationDocs::new()
///     .tag("rating")
///     .parameter(Parameter::header("authorization", json!({"type": "string"}), true))
///     .response("200", ResponseDocs::new("OK"));
///
/// assert_eq!(docs.tags, vec!["rating"]);
/// ```
#[derive(Debug, Clone, Default, Serialize)]
pub struct OperationDocs {
    /// Tags for grouping.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    /// Parameter descriptors.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<Parameter>,
    /// Request body descriptor.
    #[serde(rename = "requestBody", skip_serializing_if = "Option::is_none")]
    pub request_body: Option<RequestBody>,
    /// Responses keyed by status code.
    pub responses: IndexMap<String, ResponseDocs>,
}

impl OperationDocs {
    /// Creates empty operation documentation.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a tag.
    #[must_use]
    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    /// Adds a parameter descriptor.
    #[must_use]
    pub fn parameter(mut self, parameter: Parameter) -> Self {
        self.parameters.push(parameter);
        self
    }

    /// Sets the request body descriptor.
    #[must_use]
    pub fn request_body(mut self, body: RequestBody) -> Self {
        self.request_body = Some(body);
        self
    }

    /// Adds a response for a status code.
    #[must_use]
    pub fn response(mut self, status: impl Into<String>, response: ResponseDocs) -> Self {
        self.responses.insert(status.into(), response);
        self
    }
}
