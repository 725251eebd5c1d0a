//! API documentation metadata for Aquila routes.
//!
//! Each route may declare an [`OperationDocs`] describing its tags,
//! parameters, request body and responses. During route registration the
//! adapter feeds these into a shared [`ApiDocs`] accumulator, which is read
//! once at server start to assemble the final OpenAPI document.
//!
//! The accumulator is keyed by path template and then by method, and is
//! strictly additive: registering a second method under an already-known
//! path keeps both operations.

mod accumulator;
mod operation;

pub use accumulator::{ApiDocs, ApiDocument, DocumentInfo};
pub use operation::{MediaType, OperationDocs, Parameter, ParameterLocation, RequestBody, ResponseDocs};
