//! Built-in pipes for Aquila routes.
//!
//! - [`SchemaPipe`] validates a value against a declarative [`Schema`].
//! - [`TokenPipe`] verifies a signed session token and yields its claims.
//! - [`UuidPipe`] validates identifier path parameters.
//!
//! Pipes compose through [`aquila_core::pipe::run`]; a typical bearer-auth
//! chain is a prefix-stripping schema pipe, then a token pipe, then a schema
//! pipe over the claims shape.

mod ident;
mod schema;
mod token;

pub use ident::UuidPipe;
pub use schema::{NumberSchema, ObjectSchema, Schema, SchemaPipe, StringSchema};
pub use token::TokenPipe;
