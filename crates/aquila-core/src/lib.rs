//! Core types for the Aquila service.
//!
//! This crate defines the request-processing vocabulary shared by the rest
//! of the workspace:
//!
//! - [`HttpError`] / [`RouteError`] — the failure taxonomy: client-facing
//!   structured errors versus unexpected failures that must not leak.
//! - [`Pipe`] and [`pipe::run`] — composable async transforms and their
//!   strict left-to-right composition.
//! - [`RawRequest`] and [`Context`] — the raw per-request data and the
//!   accessors that wire raw fields to pipe chains.
//! - [`Route`] — the declarative route record bound to the transport layer
//!   by `aquila-server`.

pub mod context;
pub mod error;
pub mod pipe;
pub mod request;
pub mod route;

pub use context::Context;
pub use error::{ErrorMessage, HttpError, RouteError};
pub use pipe::Pipe;
pub use request::{RawRequest, RawRequestBuilder};
pub use route::{BoxedHandler, HandlerFuture, Route, RouteResult};
