//! End-to-end tests for the auth routes.

mod support;

use http::{Method, StatusCode};
use serde_json::json;

use aquila_token::TokenVerifier;
use support::{access_token, app, bearer, request, seed_user, ACCESS_SECRET};

#[tokio::test]
async fn login_returns_both_tokens() {
    let app = app();
    seed_user(&app.users, "matheus", "12345678").await;

    let (status, body) = request(
        &app.adapter,
        Method::POST,
        "/api/v1/auth/login",
        &[],
        Some(&json!({"username": "matheus", "password": "12345678"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let body = body.unwrap();
    assert!(body["accessToken"].is_string());
    assert!(body["refreshToken"].is_string());
}

#[tokio::test]
async fn login_unknown_user_is_400() {
    let app = app();

    let (status, body) = request(
        &app.adapter,
        Method::POST,
        "/api/v1/auth/login",
        &[],
        Some(&json!({"username": "matheus", "password": "12345678"})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body.unwrap()["message"], "user not found");
}

#[tokio::test]
async fn login_wrong_password_is_400() {
    let app = app();
    seed_user(&app.users, "matheus", "12345678").await;

    let (status, body) = request(
        &app.adapter,
        Method::POST,
        "/api/v1/auth/login",
        &[],
        Some(&json!({"username": "matheus", "password": "87654321"})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body.unwrap()["message"], "invalid password");
}

#[tokio::test]
async fn login_missing_fields_lists_every_violation() {
    let app = app();

    let (status, body) = request(
        &app.adapter,
        Method::POST,
        "/api/v1/auth/login",
        &[],
        Some(&json!({})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body.unwrap()["message"],
        json!(["username is a required field", "password is a required field"])
    );
}

#[tokio::test]
async fn login_non_string_password_names_the_type() {
    let app = app();

    let (status, body) = request(
        &app.adapter,
        Method::POST,
        "/api/v1/auth/login",
        &[],
        Some(&json!({"username": "matheus", "password": 12345678})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body.unwrap()["message"], "password must be a string type");
}

#[tokio::test]
async fn refresh_reissues_an_access_token() {
    let app = app();
    seed_user(&app.users, "matheus", "12345678").await;

    let (_, login_body) = request(
        &app.adapter,
        Method::POST,
        "/api/v1/auth/login",
        &[],
        Some(&json!({"username": "matheus", "password": "12345678"})),
    )
    .await;
    let refresh_token = login_body.unwrap()["refreshToken"]
        .as_str()
        .unwrap()
        .to_string();

    let (status, body) = request(
        &app.adapter,
        Method::POST,
        "/api/v1/auth/refresh",
        &[],
        Some(&json!({"refreshToken": refresh_token})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let body = body.unwrap();
    let access_token = body["accessToken"].as_str().unwrap();

    let claims = TokenVerifier::new(ACCESS_SECRET).verify(access_token).unwrap();
    assert_eq!(claims["userId"], support::USER_ID);
}

#[tokio::test]
async fn refresh_rejects_an_access_token() {
    let app = app();

    // Signed with the access secret: the refresh verifier classifies this as
    // a signature mismatch.
    let (status, body) = request(
        &app.adapter,
        Method::POST,
        "/api/v1/auth/refresh",
        &[],
        Some(&json!({"refreshToken": access_token(support::USER_ID)})),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(
        body.unwrap()["message"],
        "token signature verification failed"
    );
}

#[tokio::test]
async fn refresh_rejects_garbage() {
    let app = app();

    let (status, body) = request(
        &app.adapter,
        Method::POST,
        "/api/v1/auth/refresh",
        &[],
        Some(&json!({"refreshToken": "garbage"})),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body.unwrap()["message"], "token malformed");
}

#[tokio::test]
async fn unknown_route_is_404() {
    let app = app();

    let (status, body) = request(&app.adapter, Method::GET, "/api/v1/nope", &[], None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body.unwrap()["message"], "Route not found");
}

#[tokio::test]
async fn login_token_works_against_a_gated_route() {
    let app = app();
    seed_user(&app.users, "matheus", "12345678").await;

    let (_, login_body) = request(
        &app.adapter,
        Method::POST,
        "/api/v1/auth/login",
        &[],
        Some(&json!({"username": "matheus", "password": "12345678"})),
    )
    .await;
    let token = login_body.unwrap()["accessToken"].as_str().unwrap().to_string();

    let (status, body) = request(
        &app.adapter,
        Method::GET,
        "/api/v1/ratings",
        &[("authorization", &bearer(&token))],
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.unwrap(), json!([]));
}
