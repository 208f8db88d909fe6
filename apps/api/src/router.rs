use std::sync::Arc;

use axum::{
    Router,
    routing::get,
};

use scheduling_cell::BookingService;
use scheduling_cell::router::scheduling_routes;

pub fn create_router(service: Arc<BookingService>) -> Router {
    Router::new()
        .route("/", get(|| async { "Appointment scheduling API is running!" }))
        .nest("/api/v1/schedule", scheduling_routes(service))
}
