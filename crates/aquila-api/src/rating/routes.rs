//! Rating routes.
//!
//! Every route runs the auth pipe against the `authorization` header before
//! touching the service, so unauthenticated calls never reach persistence.

use std::sync::Arc;

use serde::Deserialize;
use serde_json::{json, Value};

use aquila_core::{Context, HttpError, Route, RouteError};
use aquila_docs::{OperationDocs, Parameter, RequestBody, ResponseDocs};
use aquila_pipes::{ObjectSchema, Schema, SchemaPipe, UuidPipe};

use crate::auth::{AuthPipe, Session};

use super::service::{RatingError, RatingService};

#[derive(Debug, Deserialize)]
struct UpsertBody {
    rating: f64,
    comment: String,
}

fn upsert_schema() -> ObjectSchema {
    Schema::object()
        .field(
            "rating",
            Schema::number()
                .required_error("rating is a required field")
                .type_error("rating must be a number type")
                .min(1.0, "rating must be greater than or equal to 1")
                .max(5.0, "rating must be less than or equal to 5"),
        )
        .field(
            "comment",
            Schema::string()
                .required_error("comment is a required field")
                .type_error("comment must be a string type")
                .min(1, "comment must be at least 1 characters")
                .max(255, "comment must be at most 255 characters"),
        )
}

fn to_route_error(err: RatingError) -> RouteError {
    match err {
        RatingError::Internal(source) => RouteError::Unexpected(source),
        denied => HttpError::bad_request(denied.to_string()).into(),
    }
}

async fn authenticate(ctx: &Context, auth: &AuthPipe) -> Result<Session, RouteError> {
    let claims = ctx.header("authorization", &[auth]).await?;
    Ok(serde_json::from_value(claims)?)
}

fn rating_swagger() -> Value {
    json!({
        "type": "object",
        "required": ["id", "userId", "rating", "comment", "createdAt", "updatedAt"],
        "properties": {
            "id": { "type": "string" },
            "userId": { "type": "string" },
            "rating": { "type": "number", "example": 5 },
            "comment": { "type": "string" },
            "createdAt": { "type": "number" },
            "updatedAt": { "type": "number" },
        },
    })
}

fn upsert_swagger() -> Value {
    json!({
        "type": "object",
        "required": ["rating", "comment"],
        "properties": {
            "rating": { "type": "number", "example": 5 },
            "comment": { "type": "string" },
        },
    })
}

fn auth_parameter() -> Parameter {
    Parameter::header("authorization", json!({ "type": "string" }), true)
}

fn id_parameter() -> Parameter {
    Parameter::path("id", json!({ "type": "string" }))
}

/// Builds the rating routes.
pub fn routes(service: Arc<RatingService>, auth: Arc<AuthPipe>) -> Vec<Route> {
    vec![
        find_route(Arc::clone(&service), Arc::clone(&auth)),
        find_one_route(Arc::clone(&service), Arc::clone(&auth)),
        create_route(Arc::clone(&service), Arc::clone(&auth)),
        update_route(Arc::clone(&service), Arc::clone(&auth)),
        delete_route(service, auth),
    ]
}

fn find_route(service: Arc<RatingService>, auth: Arc<AuthPipe>) -> Route {
    Route::get("/api/v1/ratings", move |ctx| {
        let service = Arc::clone(&service);
        let auth = Arc::clone(&auth);
        async move {
            authenticate(&ctx, &auth).await?;
            let ratings = service.find().await.map_err(to_route_error)?;
            Ok(Some(serde_json::to_value(ratings)?))
        }
    })
    .docs(
        OperationDocs::new()
            .tag("rating")
            .parameter(auth_parameter())
            .response(
                "200",
                ResponseDocs::new("OK").json(json!({ "type": "array", "items": rating_swagger() })),
            )
            .response("401", ResponseDocs::new("Unauthorized")),
    )
}

fn find_one_route(service: Arc<RatingService>, auth: Arc<AuthPipe>) -> Route {
    Route::get("/api/v1/ratings/{id}", move |ctx| {
        let service = Arc::clone(&service);
        let auth = Arc::clone(&auth);
        async move {
            authenticate(&ctx, &auth).await?;

            let id = ctx.param("id", &[&UuidPipe::new("id")]).await?;
            let id = id.as_str().unwrap_or_default().to_string();

            let rating = service.find_by_id(&id).await.map_err(to_route_error)?;
            Ok(Some(serde_json::to_value(rating)?))
        }
    })
    .docs(
        OperationDocs::new()
            .tag("rating")
            .parameter(auth_parameter())
            .parameter(id_parameter())
            .response("200", ResponseDocs::new("OK").json(rating_swagger()))
            .response("400", ResponseDocs::new("Bad Request"))
            .response("401", ResponseDocs::new("Unauthorized")),
    )
}

fn create_route(service: Arc<RatingService>, auth: Arc<AuthPipe>) -> Route {
    Route::post("/api/v1/ratings", move |ctx| {
        let service = Arc::clone(&service);
        let auth = Arc::clone(&auth);
        async move {
            let session = authenticate(&ctx, &auth).await?;

            let body = ctx.body(&[&SchemaPipe::new(upsert_schema())]).await?;
            let body: UpsertBody = serde_json::from_value(body)?;

            service
                .create(&session.user_id, body.rating, &body.comment)
                .await
                .map_err(to_route_error)?;

            Ok(None)
        }
    })
    .docs(
        OperationDocs::new()
            .tag("rating")
            .parameter(auth_parameter())
            .request_body(RequestBody::json(upsert_swagger()))
            .response("200", ResponseDocs::new("OK"))
            .response("400", ResponseDocs::new("Bad Request"))
            .response("401", ResponseDocs::new("Unauthorized")),
    )
}

fn update_route(service: Arc<RatingService>, auth: Arc<AuthPipe>) -> Route {
    Route::put("/api/v1/ratings/{id}", move |ctx| {
        let service = Arc::clone(&service);
        let auth = Arc::clone(&auth);
        async move {
            let id = ctx.param("id", &[&UuidPipe::new("id")]).await?;
            let id = id.as_str().unwrap_or_default().to_string();

            let session = authenticate(&ctx, &auth).await?;

            let body = ctx.body(&[&SchemaPipe::new(upsert_schema())]).await?;
            let body: UpsertBody = serde_json::from_value(body)?;

            service
                .update_by_id_and_user_id(&id, &session.user_id, body.rating, &body.comment)
                .await
                .map_err(to_route_error)?;

            Ok(None)
        }
    })
    .docs(
        OperationDocs::new()
            .tag("rating")
            .parameter(auth_parameter())
            .parameter(id_parameter())
            .request_body(RequestBody::json(upsert_swagger()))
            .response("200", ResponseDocs::new("OK"))
            .response("400", ResponseDocs::new("Bad Request"))
            .response("401", ResponseDocs::new("Unauthorized")),
    )
}

fn delete_route(service: Arc<RatingService>, auth: Arc<AuthPipe>) -> Route {
    Route::delete("/api/v1/ratings/{id}", move |ctx| {
        let service = Arc::clone(&service);
        let auth = Arc::clone(&auth);
        async move {
            let id = ctx.param("id", &[&UuidPipe::new("id")]).await?;
            let id = id.as_str().unwrap_or_default().to_string();

            let session = authenticate(&ctx, &auth).await?;

            service
                .delete_by_id_and_user_id(&id, &session.user_id)
                .await
                .map_err(to_route_error)?;

            Ok(None)
        }
    })
    .docs(
        OperationDocs::new()
            .tag("rating")
            .parameter(auth_parameter())
            .parameter(id_parameter())
            .response("200", ResponseDocs::new("OK"))
            .response("400", ResponseDocs::new("Bad Request"))
            .response("401", ResponseDocs::new("Unauthorized")),
    )
}
