pub mod auth;
pub mod bookings;

use axum::{
    http::{header, StatusCode},
    middleware,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::OpenApi;

use common::types::Health;

use crate::errors::JsonApiError;
use crate::openapi::ApiDoc;
use auth::ServerState;

#[utoipa::path(get, path = "/health", tag = "health", responses((status = 200, description = "OK", body = crate::openapi::HealthResponse)))]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok", version: env!("CARGO_PKG_VERSION") })
}

async fn metrics() -> Result<impl IntoResponse, JsonApiError> {
    let body = service::metrics::encode_metrics().map_err(|e| {
        tracing::error!(error = %e, "metrics encoding failed");
        JsonApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "internal_error", "metrics unavailable")
    })?;
    Ok(([(header::CONTENT_TYPE, "text/plain; version=0.0.4")], body))
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Build the full application router: public auth routes, bearer-protected
/// account and booking routes, health, metrics and the OpenAPI document.
pub fn build_router(state: ServerState, cors: CorsLayer) -> Router {
    let public = Router::new()
        .route("/health", get(health))
        .route("/metrics", get(metrics))
        .route("/api-docs/openapi.json", get(openapi_json))
        .route("/api/register", post(auth::register))
        .route("/api/login", post(auth::login))
        .route("/api/token", post(auth::login))
        .route("/api/token/refresh", post(auth::refresh));

    // Everything here needs a valid access token
    let protected = Router::new()
        .route("/api/me", get(auth::me))
        .route("/api/bookings", get(bookings::list).post(bookings::create))
        .route(
            "/api/bookings/:id",
            get(bookings::get)
                .put(bookings::update)
                .patch(bookings::update)
                .delete(bookings::delete),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::require_access_token));

    public
        .merge(protected)
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
