//! HTTP transport binding for Aquila.
//!
//! This crate connects declarative [`aquila_core::Route`] values to a real
//! HTTP server:
//!
//! - [`RouteAdapter`] — registration (with path normalization and doc
//!   aggregation) and dispatch (raw-request assembly, handler invocation,
//!   uniform outcome translation, the 404 catch-all and the generic 500).
//! - [`Server`] — the Hyper/Tokio accept loop with signal-driven shutdown.

mod adapter;
mod routes;
mod server;

pub use adapter::{Reply, RouteAdapter};
pub use routes::{normalize_template, RouteTable};
pub use server::{Server, ServerError};
