//! Service assembly.

use std::sync::Arc;

use aquila_core::Route;
use aquila_server::RouteAdapter;
use aquila_token::TokenVerifier;

use crate::auth::{self, AuthPipe, AuthService};
use crate::config::AppConfig;
use crate::password::PasswordVerifier;
use crate::rating::{self, RatingService};
use crate::store::{RatingStore, UserStore};

/// Builds the fully registered route adapter.
///
/// Registration happens here, single-threaded, before the server starts;
/// the doc accumulator is complete by the time the document route snapshots
/// it, so nothing mutates it afterwards.
#[must_use]
pub fn build_adapter(
    config: &AppConfig,
    users: Arc<dyn UserStore>,
    ratings: Arc<dyn RatingStore>,
    passwords: Arc<dyn PasswordVerifier>,
) -> RouteAdapter {
    let auth_service = Arc::new(AuthService::new(
        Arc::clone(&users),
        passwords,
        &config.access_token_secret,
        &config.refresh_token_secret,
    ));
    let rating_service = Arc::new(RatingService::new(ratings, users));
    let auth_pipe = Arc::new(AuthPipe::new(TokenVerifier::new(&config.access_token_secret)));

    let mut adapter = RouteAdapter::new();

    for route in auth::routes::routes(auth_service) {
        adapter.register(route);
    }

    for route in rating::routes::routes(rating_service, auth_pipe) {
        adapter.register(route);
    }

    adapter.register(document_route(&adapter));
    adapter
}

/// Serves the aggregated API document, snapshotted after all API routes are
/// registered.
fn document_route(adapter: &RouteAdapter) -> Route {
    let document = adapter.docs().to_document("aquila", env!("CARGO_PKG_VERSION"));
    let document = Arc::new(serde_json::to_value(document).unwrap_or_default());

    Route::get("/api/v1/docs/openapi.json", move |_ctx| {
        let document = Arc::clone(&document);
        async move { Ok(Some(document.as_ref().clone())) }
    })
}
