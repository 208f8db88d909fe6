pub mod availability;
pub mod booking;
pub mod store;
pub mod suggestion;

pub use availability::AvailabilityEngine;
pub use booking::BookingService;
pub use store::{BookingStore, JsonScheduleStore};
pub use suggestion::SuggestionSearch;
