//! The per-route documentation accumulator and document assembly.

use http::Method;
use indexmap::IndexMap;
use serde::Serialize;

use crate::operation::OperationDocs;

/// Accumulator mapping path templates to per-method operation docs.
///
/// One accumulator is owned by the route adapter. It is populated during the
/// single-threaded registration phase and read once at server start; it is
/// never mutated afterwards. Registering several methods under the same path
/// is additive.
///
/// # Example
///
/// ```
/// use aquila_docs::{ApiDocs, OperationDocs, ResponseDocs};
/// use http::Method;
///
/// let mut docs = ApiDocs::new();
/// docs.insert("/ratings/{id}", &Method::GET, OperationDocs::new().response("200", ResponseDocs::new("OK")));
/// docs.insert("/ratings/{id}", &Method::PUT, OperationDocs::new().response("200", ResponseDocs::new("OK")));
///
/// let document = docs.to_document("aquila", "0.1.0");
/// assert_eq!(document.paths["/ratings/{id}"].len(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ApiDocs {
    paths: IndexMap<String, IndexMap<String, OperationDocs>>,
}

impl ApiDocs {
    /// Creates an empty accumulator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the docs for one operation under its path and method.
    ///
    /// The method key is lowercased, matching the OpenAPI path-item field
    /// names (`get`, `post`, ...). An existing entry for the same path and a
    /// different method is preserved; the same path and method is replaced.
    pub fn insert(&mut self, path: impl Into<String>, method: &Method, operation: OperationDocs) {
        let by_method = self.paths.entry(path.into()).or_default();
        by_method.insert(method.as_str().to_lowercase(), operation);
    }

    /// Returns true if no operations have been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Returns the number of recorded operations across all paths.
    #[must_use]
    pub fn operation_count(&self) -> usize {
        self.paths.values().map(IndexMap::len).sum()
    }

    /// Assembles the final API document.
    #[must_use]
    pub fn to_document(&self, title: impl Into<String>, version: impl Into<String>) -> ApiDocument {
        ApiDocument {
            openapi: "3.0.3".to_string(),
            info: DocumentInfo {
                title: title.into(),
                version: version.into(),
            },
            paths: self.paths.clone(),
        }
    }
}

/// API metadata for the document root.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentInfo {
    /// API title.
    pub title: String,
    /// API version.
    pub version: String,
}

/// The assembled API document: `path -> method -> operation`.
#[derive(Debug, Clone, Serialize)]
pub struct ApiDocument {
    /// OpenAPI version.
    pub openapi: String,
    /// API metadata.
    pub info: DocumentInfo,
    /// Paths and their operations.
    pub paths: IndexMap<String, IndexMap<String, OperationDocs>>,
}
