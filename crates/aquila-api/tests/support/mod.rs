//! Shared helpers for the route tests.
#![allow(dead_code)]

use std::sync::Arc;

use http::{HeaderMap, Method, StatusCode};
use serde_json::Value;

use aquila_api::app::build_adapter;
use aquila_api::config::{AppConfig, ACCESS_TOKEN_LIFETIME};
use aquila_api::domain::{now_millis, User};
use aquila_api::password::{hash_password, Argon2PasswordVerifier};
use aquila_api::store::{InMemoryRatingStore, InMemoryUserStore, RatingStore, UserStore};
use aquila_server::RouteAdapter;
use aquila_token::TokenSigner;

pub const ACCESS_SECRET: &str = "access-secret";
pub const REFRESH_SECRET: &str = "refresh-secret";
pub const USER_ID: &str = "2797835f-76a4-46b6-8572-10027ab06ed8";

pub struct TestApp {
    pub adapter: RouteAdapter,
    pub users: Arc<InMemoryUserStore>,
    pub ratings: Arc<InMemoryRatingStore>,
}

pub fn config() -> AppConfig {
    AppConfig {
        http_addr: "127.0.0.1:0".to_string(),
        access_token_secret: ACCESS_SECRET.to_string(),
        refresh_token_secret: REFRESH_SECRET.to_string(),
    }
}

/// Builds the service over fresh in-memory stores.
pub fn app() -> TestApp {
    let users = Arc::new(InMemoryUserStore::new());
    let ratings = Arc::new(InMemoryRatingStore::new());

    let adapter = build_adapter(
        &config(),
        Arc::clone(&users) as Arc<dyn UserStore>,
        Arc::clone(&ratings) as Arc<dyn RatingStore>,
        Arc::new(Argon2PasswordVerifier),
    );

    TestApp {
        adapter,
        users,
        ratings,
    }
}

/// Inserts a user with a real Argon2id hash and a fixed id.
pub async fn seed_user(users: &InMemoryUserStore, username: &str, password: &str) {
    let now = now_millis();
    users
        .insert(User {
            id: USER_ID.to_string(),
            username: username.to_string(),
            password_hash: hash_password(password).unwrap(),
            created_at: now,
            updated_at: now,
        })
        .await;
}

/// Issues an access token directly, bypassing login.
pub fn access_token(user_id: &str) -> String {
    let mut claims = serde_json::Map::new();
    claims.insert("userId".to_string(), Value::from(user_id));
    TokenSigner::new(ACCESS_SECRET, ACCESS_TOKEN_LIFETIME)
        .issue(&claims)
        .unwrap()
}

pub fn bearer(token: &str) -> String {
    format!("Bearer {token}")
}

/// Dispatches one request through the adapter.
pub async fn request(
    adapter: &RouteAdapter,
    method: Method,
    path: &str,
    headers: &[(&str, &str)],
    body: Option<&Value>,
) -> (StatusCode, Option<Value>) {
    let mut header_map = HeaderMap::new();
    for (name, value) in headers {
        header_map.append(
            http::header::HeaderName::from_bytes(name.as_bytes()).unwrap(),
            value.parse().unwrap(),
        );
    }

    let bytes = body
        .map(|value| serde_json::to_vec(value).unwrap())
        .unwrap_or_default();

    adapter
        .dispatch(&method, path, &header_map, &bytes)
        .await
        .into_parts()
}
