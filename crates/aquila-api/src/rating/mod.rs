//! Ratings: CRUD service and routes, gated by bearer auth.

pub mod routes;
pub mod service;

pub use service::{RatingError, RatingService};
