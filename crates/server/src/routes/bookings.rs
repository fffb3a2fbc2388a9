use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    Extension, Json,
};

use serde_json::Value;
use service::auth::domain::Identity;
use service::booking::domain::{Booking, CreateBookingInput, UpdateBookingInput};
use service::errors::ServiceError;

use super::auth::{json_body, ServerState};
use crate::errors::JsonApiError;

/// An id that does not parse as `i64` cannot name a booking.
fn booking_id(path: Result<Path<i64>, PathRejection>) -> Result<i64, JsonApiError> {
    path.map(|Path(id)| id).map_err(|e| {
        tracing::debug!(error = %e, "unparsable booking id");
        JsonApiError::from(ServiceError::NotFound)
    })
}

#[utoipa::path(get, path = "/api/bookings", tag = "bookings", responses((status = 200, description = "Caller's bookings", body = [crate::openapi::BookingDoc]), (status = 401, description = "Unauthorized")))]
pub async fn list(
    State(state): State<ServerState>,
    Extension(caller): Extension<Identity>,
) -> Result<Json<Vec<Booking>>, JsonApiError> {
    Ok(Json(state.bookings.list(&caller).await?))
}

#[utoipa::path(post, path = "/api/bookings", tag = "bookings", request_body = crate::openapi::BookingRequest, responses((status = 201, description = "Created", body = crate::openapi::BookingDoc), (status = 400, description = "Bad Request", body = crate::openapi::ErrorDoc), (status = 401, description = "Unauthorized")))]
pub async fn create(
    State(state): State<ServerState>,
    Extension(caller): Extension<Identity>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<Booking>), JsonApiError> {
    let input: CreateBookingInput = json_body(payload)?;
    let booking = state.bookings.create(&caller, input).await?;
    Ok((StatusCode::CREATED, Json(booking)))
}

#[utoipa::path(get, path = "/api/bookings/{id}", tag = "bookings", params(("id" = i64, Path, description = "Booking id")), responses((status = 200, description = "OK", body = crate::openapi::BookingDoc), (status = 404, description = "Not Found")))]
pub async fn get(
    State(state): State<ServerState>,
    Extension(caller): Extension<Identity>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<Booking>, JsonApiError> {
    let id = booking_id(path)?;
    Ok(Json(state.bookings.get(&caller, id).await?))
}

#[utoipa::path(patch, path = "/api/bookings/{id}", tag = "bookings", params(("id" = i64, Path, description = "Booking id")), request_body = crate::openapi::BookingRequest, responses((status = 200, description = "Updated", body = crate::openapi::BookingDoc), (status = 400, description = "Bad Request"), (status = 404, description = "Not Found")))]
pub async fn update(
    State(state): State<ServerState>,
    Extension(caller): Extension<Identity>,
    path: Result<Path<i64>, PathRejection>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Booking>, JsonApiError> {
    let id = booking_id(path)?;
    let input: UpdateBookingInput = json_body(payload)?;
    Ok(Json(state.bookings.update(&caller, id, input).await?))
}

#[utoipa::path(delete, path = "/api/bookings/{id}", tag = "bookings", params(("id" = i64, Path, description = "Booking id")), responses((status = 204, description = "Deleted"), (status = 404, description = "Not Found")))]
pub async fn delete(
    State(state): State<ServerState>,
    Extension(caller): Extension<Identity>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<StatusCode, JsonApiError> {
    let id = booking_id(path)?;
    state.bookings.delete(&caller, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
