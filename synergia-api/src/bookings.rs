use axum::{
    extract::{rejection::JsonRejection, Json, Path, Query, State},
    routing::get,
    Router,
};
use serde::Deserialize;
use synergia_core::{Booking, BookingId, BookingPatch, CreateBookingRequest};
use tracing::{debug, info};

use crate::error::ApiError;
use crate::response::{ApiResponse, Envelope};
use crate::state::AppState;

const NOT_FOUND: &str = "Booking not found";
const MISSING_FIELDS: &str = "Please provide name, email, and event details";

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub email: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct FilterQuery {
    pub event: Option<String>,
}

/// Literal segments are registered ahead of `{id}` so `search` and
/// `filter` never reach the id handlers.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/bookings", get(list_bookings).post(create_booking))
        .route("/api/bookings/search", get(search_bookings))
        .route("/api/bookings/filter", get(filter_bookings))
        .route(
            "/api/bookings/{id}",
            get(get_booking).put(update_booking).delete(delete_booking),
        )
}

fn parse_id(raw: &str, message: &'static str) -> Result<BookingId, ApiError> {
    raw.parse::<BookingId>().map_err(ApiError::storage(message))
}

/// Query values that are absent or empty both count as missing.
fn required(value: Option<String>, message: &str) -> Result<String, ApiError> {
    value
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ApiError::bad_request(message))
}

/// GET /api/bookings
pub async fn list_bookings(
    State(state): State<AppState>,
) -> Result<ApiResponse<Vec<Booking>>, ApiError> {
    let bookings = state
        .bookings
        .list()
        .await
        .map_err(ApiError::storage("Error retrieving bookings"))?;

    Ok(ApiResponse::ok(
        Envelope::data(bookings).with_message("All event bookings retrieved successfully"),
    ))
}

/// POST /api/bookings
pub async fn create_booking(
    State(state): State<AppState>,
    payload: Result<Json<CreateBookingRequest>, JsonRejection>,
) -> Result<ApiResponse<Booking>, ApiError> {
    let Json(req) = payload.map_err(|rejection| ApiError::BadRequest {
        message: MISSING_FIELDS.to_string(),
        detail: Some(rejection.body_text()),
    })?;
    let new_booking = req.validate().map_err(|e| {
        debug!("Rejected booking: {}", e);
        ApiError::bad_request(MISSING_FIELDS)
    })?;

    let booking = state
        .bookings
        .create(new_booking)
        .await
        .map_err(ApiError::storage("Error creating booking"))?;

    info!("Booking created: {}", booking.id);

    Ok(ApiResponse::created(
        Envelope::data(booking).with_message("Booking created successfully"),
    ))
}

/// GET /api/bookings/{id}
pub async fn get_booking(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<ApiResponse<Booking>, ApiError> {
    const ERROR: &str = "Error retrieving booking";
    let id = parse_id(&id, ERROR)?;

    let booking = state
        .bookings
        .get(id)
        .await
        .map_err(ApiError::storage(ERROR))?
        .ok_or_else(|| ApiError::not_found(NOT_FOUND))?;

    Ok(ApiResponse::ok(Envelope::data(booking)))
}

/// PUT /api/bookings/{id}
/// Applies whichever fields are present without re-checking required ones.
/// A request without a JSON body leaves the booking unchanged.
pub async fn update_booking(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<BookingPatch>, JsonRejection>,
) -> Result<ApiResponse<Booking>, ApiError> {
    const ERROR: &str = "Error updating booking";
    let id = parse_id(&id, ERROR)?;
    let patch = match payload {
        Ok(Json(patch)) => patch,
        // No JSON body: nothing to change
        Err(JsonRejection::MissingJsonContentType(_)) => BookingPatch::default(),
        // Well-formed JSON whose values do not fit a booking field
        Err(JsonRejection::JsonDataError(rejection)) => {
            return Err(ApiError::Internal {
                message: ERROR,
                detail: rejection.body_text(),
            })
        }
        Err(rejection) => {
            return Err(ApiError::BadRequest {
                message: "Invalid booking update".to_string(),
                detail: Some(rejection.body_text()),
            })
        }
    };

    let booking = state
        .bookings
        .update(id, patch)
        .await
        .map_err(ApiError::storage(ERROR))?
        .ok_or_else(|| ApiError::not_found(NOT_FOUND))?;

    info!("Booking updated: {}", booking.id);

    Ok(ApiResponse::ok(
        Envelope::data(booking).with_message("Booking updated successfully"),
    ))
}

/// DELETE /api/bookings/{id}
pub async fn delete_booking(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<ApiResponse<()>, ApiError> {
    const ERROR: &str = "Error deleting booking";
    let id = parse_id(&id, ERROR)?;

    let deleted = state
        .bookings
        .delete(id)
        .await
        .map_err(ApiError::storage(ERROR))?
        .ok_or_else(|| ApiError::not_found(NOT_FOUND))?;

    info!("Booking deleted: {}", deleted.id);

    Ok(ApiResponse::ok(Envelope::message("Booking deleted successfully")))
}

/// GET /api/bookings/search?email=
pub async fn search_bookings(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<ApiResponse<Vec<Booking>>, ApiError> {
    let email = required(query.email, "Email query parameter required")?;

    let bookings = state
        .bookings
        .search_by_email(&email)
        .await
        .map_err(ApiError::storage("Error searching bookings"))?;

    if bookings.is_empty() {
        return Err(ApiError::not_found("No bookings found for this email"));
    }

    Ok(ApiResponse::ok(Envelope::data(bookings)))
}

/// GET /api/bookings/filter?event=
pub async fn filter_bookings(
    State(state): State<AppState>,
    Query(query): Query<FilterQuery>,
) -> Result<ApiResponse<Vec<Booking>>, ApiError> {
    let event = required(query.event, "Event query parameter required")?;

    let bookings = state
        .bookings
        .filter_by_event(&event)
        .await
        .map_err(ApiError::storage("Error filtering bookings"))?;

    if bookings.is_empty() {
        return Err(ApiError::not_found("No bookings found for this event"));
    }

    Ok(ApiResponse::ok(Envelope::data(bookings)))
}
