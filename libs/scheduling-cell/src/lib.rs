pub mod handlers;
pub mod router;
pub mod models;
pub mod services;

// Re-export the engine surface for the API binary and the agent layer
pub use models::*;
pub use services::availability::AvailabilityEngine;
pub use services::booking::BookingService;
pub use services::store::{BookingStore, JsonScheduleStore};
pub use services::suggestion::SuggestionSearch;
