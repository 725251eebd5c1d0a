//! Auth routes: login and refresh.

use std::sync::Arc;

use serde::Deserialize;
use serde_json::json;

use aquila_core::{HttpError, Route, RouteError};
use aquila_docs::{OperationDocs, RequestBody, ResponseDocs};
use aquila_pipes::{ObjectSchema, Schema, SchemaPipe};

use super::service::{AuthError, AuthService};

#[derive(Debug, Deserialize)]
struct LoginBody {
    username: String,
    password: String,
}

#[derive(Debug, Deserialize)]
struct RefreshBody {
    #[serde(rename = "refreshToken")]
    refresh_token: String,
}

fn login_schema() -> ObjectSchema {
    Schema::object()
        .field(
            "username",
            Schema::string()
                .required_error("username is a required field")
                .type_error("username must be a string type"),
        )
        .field(
            "password",
            Schema::string()
                .required_error("password is a required field")
                .type_error("password must be a string type"),
        )
}

fn refresh_schema() -> ObjectSchema {
    Schema::object().field(
        "refreshToken",
        Schema::string()
            .required_error("refreshToken is a required field")
            .type_error("refreshToken must be a string type"),
    )
}

fn to_route_error(err: AuthError) -> RouteError {
    match err {
        AuthError::Internal(source) => RouteError::Unexpected(source),
        AuthError::Verification(cause) => HttpError::unauthorized(cause.to_string()).into(),
        denied @ (AuthError::UserNotFound | AuthError::InvalidPassword) => {
            HttpError::bad_request(denied.to_string()).into()
        }
    }
}

/// Builds the auth routes.
pub fn routes(auth: Arc<AuthService>) -> Vec<Route> {
    vec![login_route(Arc::clone(&auth)), refresh_route(auth)]
}

fn login_route(auth: Arc<AuthService>) -> Route {
    Route::post("/api/v1/auth/login", move |ctx| {
        let auth = Arc::clone(&auth);
        async move {
            let body = ctx.body(&[&SchemaPipe::new(login_schema())]).await?;
            let body: LoginBody = serde_json::from_value(body)?;

            let pair = auth
                .login(&body.username, &body.password)
                .await
                .map_err(to_route_error)?;

            Ok(Some(serde_json::to_value(pair)?))
        }
    })
    .docs(
        OperationDocs::new()
            .tag("auth")
            .request_body(RequestBody::json(json!({
                "type": "object",
                "required": ["username", "password"],
                "properties": {
                    "username": { "type": "string" },
                    "password": { "type": "string" },
                },
            })))
            .response(
                "200",
                ResponseDocs::new("OK").json(json!({
                    "type": "object",
                    "required": ["accessToken", "refreshToken"],
                    "properties": {
                        "accessToken": { "type": "string" },
                        "refreshToken": { "type": "string" },
                    },
                })),
            )
            .response("400", ResponseDocs::new("Bad Request")),
    )
}

fn refresh_route(auth: Arc<AuthService>) -> Route {
    Route::post("/api/v1/auth/refresh", move |ctx| {
        let auth = Arc::clone(&auth);
        async move {
            let body = ctx.body(&[&SchemaPipe::new(refresh_schema())]).await?;
            let body: RefreshBody = serde_json::from_value(body)?;

            let refreshed = auth
                .refresh(&body.refresh_token)
                .await
                .map_err(to_route_error)?;

            Ok(Some(serde_json::to_value(refreshed)?))
        }
    })
    .docs(
        OperationDocs::new()
            .tag("auth")
            .request_body(RequestBody::json(json!({
                "type": "object",
                "required": ["refreshToken"],
                "properties": {
                    "refreshToken": { "type": "string" },
                },
            })))
            .response(
                "200",
                ResponseDocs::new("OK").json(json!({
                    "type": "object",
                    "required": ["accessToken"],
                    "properties": {
                        "accessToken": { "type": "string" },
                    },
                })),
            )
            .response("401", ResponseDocs::new("Unauthorized")),
    )
}
