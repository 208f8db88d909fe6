// libs/scheduling-cell/src/router.rs
use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};

use crate::handlers;
use crate::services::booking::BookingService;

pub fn scheduling_routes(service: Arc<BookingService>) -> Router {
    Router::new()
        // Availability queries (read-only, safe to run concurrently)
        .route("/availability", get(handlers::get_availability))
        .route("/availability/open", get(handlers::get_open_slots))
        .route("/availability/next", get(handlers::get_next_available_dates))
        .route("/suggestions", get(handlers::suggest_slots))
        // Booking lifecycle (serialized through the service's write lock)
        .route("/bookings", post(handlers::book_appointment))
        .route("/bookings/validate", post(handlers::validate_booking_info))
        .route("/bookings/{booking_id}", get(handlers::get_booking))
        .route("/bookings/{booking_id}/cancel", post(handlers::cancel_booking))
        .with_state(service)
}
