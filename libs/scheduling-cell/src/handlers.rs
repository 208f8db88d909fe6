// libs/scheduling-cell/src/handlers.rs
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use shared_models::error::AppError;

use crate::models::{
    BookingOutcome, BookingRequest, DayAvailability, TimePreference,
};
use crate::services::booking::BookingService;

// ==============================================================================
// QUERY PARAMETER STRUCTS
// ==============================================================================

#[derive(Debug, Deserialize)]
pub struct AvailabilityQuery {
    pub date: String,
    #[serde(default = "default_appointment_type")]
    pub appointment_type: String,
    pub time_preference: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct NextAvailableQuery {
    #[serde(default = "default_appointment_type")]
    pub appointment_type: String,
    #[serde(default = "default_days_to_check")]
    pub days_to_check: u32,
    #[serde(default = "default_max_dates")]
    pub max_dates: usize,
    pub time_preference: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SuggestionQuery {
    pub preferred_date: Option<String>,
    #[serde(default = "default_appointment_type")]
    pub appointment_type: String,
    pub time_preference: Option<String>,
    #[serde(default = "default_num_suggestions")]
    pub num_suggestions: usize,
}

#[derive(Debug, Deserialize)]
pub struct ValidatePatientRequest {
    pub patient_name: Option<String>,
    pub patient_email: Option<String>,
    pub patient_phone: Option<String>,
    pub reason: Option<String>,
}

fn default_appointment_type() -> String {
    "consultation".to_string()
}

fn default_days_to_check() -> u32 {
    14
}

fn default_max_dates() -> usize {
    5
}

fn default_num_suggestions() -> usize {
    5
}

/// An unrecognized preference string means "no filtering", per the external
/// contract, so parsing is lenient rather than a 400.
fn parse_preference(raw: &Option<String>) -> Option<TimePreference> {
    raw.as_deref().and_then(TimePreference::parse)
}

// ==============================================================================
// AVAILABILITY HANDLERS
// ==============================================================================

/// Full slot grid for one date, open and closed slots alike.
#[axum::debug_handler]
pub async fn get_availability(
    State(service): State<Arc<BookingService>>,
    Query(params): Query<AvailabilityQuery>,
) -> Json<DayAvailability> {
    Json(
        service
            .day_availability(&params.date, &params.appointment_type)
            .await,
    )
}

/// Open slots only, with optional time-of-day filtering.
#[axum::debug_handler]
pub async fn get_open_slots(
    State(service): State<Arc<BookingService>>,
    Query(params): Query<AvailabilityQuery>,
) -> Json<Value> {
    let preference = parse_preference(&params.time_preference);
    let slots = service
        .available_slots(&params.date, &params.appointment_type, preference)
        .await;
    let slots_count = slots.len();

    Json(json!({
        "date": params.date,
        "appointment_type": params.appointment_type,
        "time_preference": preference,
        "available_slots": slots,
        "slots_count": slots_count,
    }))
}

/// Forward scan for the next days with open slots.
#[axum::debug_handler]
pub async fn get_next_available_dates(
    State(service): State<Arc<BookingService>>,
    Query(params): Query<NextAvailableQuery>,
) -> Json<Value> {
    let dates = service
        .find_next_available_dates(
            &params.appointment_type,
            params.days_to_check,
            params.max_dates,
            parse_preference(&params.time_preference),
        )
        .await;

    Json(json!({
        "appointment_type": params.appointment_type,
        "available_dates": dates,
    }))
}

#[axum::debug_handler]
pub async fn suggest_slots(
    State(service): State<Arc<BookingService>>,
    Query(params): Query<SuggestionQuery>,
) -> Json<Value> {
    let suggestions = service
        .suggest_slots(
            params.preferred_date.as_deref(),
            &params.appointment_type,
            parse_preference(&params.time_preference),
            params.num_suggestions,
        )
        .await;

    Json(json!({
        "appointment_type": params.appointment_type,
        "suggestions": suggestions,
    }))
}

// ==============================================================================
// BOOKING HANDLERS
// ==============================================================================

/// Book an appointment. Domain failures (slot taken, malformed date) come
/// back as a failed outcome in the body; only storage trouble becomes a 500.
#[axum::debug_handler]
pub async fn book_appointment(
    State(service): State<Arc<BookingService>>,
    Json(request): Json<BookingRequest>,
) -> Result<Json<BookingOutcome>, AppError> {
    let outcome = service
        .book(request)
        .await
        .map_err(|e| AppError::Storage(e.to_string()))?;
    Ok(Json(outcome))
}

#[axum::debug_handler]
pub async fn get_booking(
    State(service): State<Arc<BookingService>>,
    Path(booking_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let booking = service
        .get_booking(&booking_id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("Booking not found: {booking_id}")))?;
    Ok(Json(json!(booking)))
}

#[axum::debug_handler]
pub async fn cancel_booking(
    State(service): State<Arc<BookingService>>,
    Path(booking_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let cancelled = service
        .cancel(&booking_id)
        .await
        .map_err(|e| AppError::Storage(e.to_string()))?;

    Ok(Json(json!({
        "booking_id": booking_id,
        "cancelled": cancelled,
    })))
}

/// Completeness check over patient fields, used by the conversational layer
/// before it attempts a booking.
#[axum::debug_handler]
pub async fn validate_booking_info(
    Json(request): Json<ValidatePatientRequest>,
) -> Json<Value> {
    let validation = BookingService::validate_patient_info(
        request.patient_name.as_deref(),
        request.patient_email.as_deref(),
        request.patient_phone.as_deref(),
        request.reason.as_deref(),
    );
    Json(json!(validation))
}
