// libs/scheduling-cell/src/services/booking.rs
use std::sync::Arc;

use chrono::{Duration, NaiveDate, NaiveTime};
use tokio::sync::RwLock;
use tracing::{info, warn};
use uuid::Uuid;

use crate::models::{
    AvailableDay, Booking, BookingDetails, BookingFieldValidation, BookingOutcome,
    BookingRequest, BookingStatus, DayAvailability, ScheduleConfig, SchedulingError, Slot,
    SlotSuggestion, TimePreference,
};
use crate::services::availability::{AvailabilityEngine, DATE_FORMAT};
use crate::services::store::BookingStore;
use crate::services::suggestion::SuggestionSearch;

/// Orchestrates availability queries and the booking/cancel lifecycle. The
/// single mutator of the store: `book` re-validates the slot and commits
/// under one write lock, so the check-then-act sequence is atomic with
/// respect to other bookings on this calendar. Reads take the read lock and
/// answer from a consistent snapshot.
pub struct BookingService {
    config: Arc<ScheduleConfig>,
    store: RwLock<Box<dyn BookingStore>>,
}

impl BookingService {
    pub fn new(config: Arc<ScheduleConfig>, store: Box<dyn BookingStore>) -> Self {
        Self {
            config,
            store: RwLock::new(store),
        }
    }

    pub fn config(&self) -> &ScheduleConfig {
        &self.config
    }

    /// Full slot grid for a date, open and closed slots alike.
    pub async fn day_availability(&self, date: &str, appointment_type: &str) -> DayAvailability {
        let store = self.store.read().await;
        AvailabilityEngine::new(&self.config, store.bookings())
            .day_availability(date, appointment_type)
    }

    /// Open slots for a date, optionally narrowed to a time-of-day band.
    pub async fn available_slots(
        &self,
        date: &str,
        appointment_type: &str,
        preference: Option<TimePreference>,
    ) -> Vec<Slot> {
        let store = self.store.read().await;
        AvailabilityEngine::new(&self.config, store.bookings())
            .available_slots(date, appointment_type, preference)
    }

    pub async fn find_next_available_dates(
        &self,
        appointment_type: &str,
        days_to_check: u32,
        max_dates: usize,
        preference: Option<TimePreference>,
    ) -> Vec<AvailableDay> {
        let store = self.store.read().await;
        SuggestionSearch::new(&self.config, store.bookings()).find_next_available_dates(
            appointment_type,
            days_to_check,
            max_dates,
            preference,
        )
    }

    pub async fn suggest_slots(
        &self,
        preferred_date: Option<&str>,
        appointment_type: &str,
        preference: Option<TimePreference>,
        num_suggestions: usize,
    ) -> Vec<SlotSuggestion> {
        let store = self.store.read().await;
        SuggestionSearch::new(&self.config, store.bookings()).suggest_slots(
            preferred_date,
            appointment_type,
            preference,
            num_suggestions,
        )
    }

    /// Book an appointment. Availability is re-checked against the live
    /// store under the write lock immediately before committing; a slot that
    /// was open when the caller last looked may be gone by now, which is a
    /// failed outcome, not an error. Only persistence failure raises.
    pub async fn book(&self, request: BookingRequest) -> Result<BookingOutcome, SchedulingError> {
        info!(
            "Booking {} appointment for {} on {} at {}",
            request.appointment_type, request.patient.name, request.date, request.start_time
        );

        let (Ok(date), Ok(start_time)) = (
            NaiveDate::parse_from_str(&request.date, DATE_FORMAT),
            NaiveTime::parse_from_str(&request.start_time, "%H:%M"),
        ) else {
            warn!("Invalid date/time: {} {}", request.date, request.start_time);
            return Ok(BookingOutcome::Failed {
                error: "Invalid date or time format".to_string(),
            });
        };

        let duration = self.config.appointment_duration(&request.appointment_type);

        let mut store = self.store.write().await;

        let available = AvailabilityEngine::new(&self.config, store.bookings())
            .slot_is_available(date, start_time, duration);
        if !available {
            warn!("Slot not available: {} {}", request.date, request.start_time);
            return Ok(BookingOutcome::Failed {
                error: "Time slot is not available".to_string(),
            });
        }

        let end_time = start_time + Duration::minutes(duration);
        let now = self.config.now();

        let booking_id = format!(
            "APPT-{}-{}",
            now.format("%Y%m%d"),
            short_code(6)
        );
        let confirmation_code = short_code(8);

        let booking = Booking {
            booking_id: booking_id.clone(),
            date,
            start_time,
            end_time,
            appointment_type: request.appointment_type.clone(),
            patient_name: request.patient.name.clone(),
            patient_email: request.patient.email.clone(),
            patient_phone: request.patient.phone.clone(),
            reason: request.reason.clone(),
            status: BookingStatus::Confirmed,
            confirmation_code: confirmation_code.clone(),
            created_at: now,
        };

        store.append_and_persist(booking)?;

        info!("Booking confirmed: {}", booking_id);

        Ok(BookingOutcome::Confirmed {
            booking_id,
            confirmation_code,
            details: BookingDetails {
                date,
                start_time,
                end_time,
                appointment_type: request.appointment_type,
                duration_minutes: duration,
                patient: request.patient,
                reason: request.reason,
            },
        })
    }

    /// Cancel a booking. The record is retained with cancelled status so the
    /// slot frees up while history is preserved. Unknown ids yield false.
    pub async fn cancel(&self, booking_id: &str) -> Result<bool, SchedulingError> {
        let mut store = self.store.write().await;
        let cancelled =
            store.update_status_and_persist(booking_id, BookingStatus::Cancelled)?;
        if cancelled {
            info!("Cancelled booking: {}", booking_id);
        }
        Ok(cancelled)
    }

    pub async fn get_booking(&self, booking_id: &str) -> Option<Booking> {
        let store = self.store.read().await;
        store.find(booking_id).cloned()
    }

    /// Report which patient fields are still missing before a booking
    /// attempt. Used by the conversational layer to drive its questions.
    pub fn validate_patient_info(
        name: Option<&str>,
        email: Option<&str>,
        phone: Option<&str>,
        reason: Option<&str>,
    ) -> BookingFieldValidation {
        let mut missing_fields = Vec::new();

        if name.map_or(true, str::is_empty) {
            missing_fields.push("name".to_string());
        }
        if email.map_or(true, str::is_empty) {
            missing_fields.push("email".to_string());
        }
        if phone.map_or(true, str::is_empty) {
            missing_fields.push("phone".to_string());
        }
        if reason.map_or(true, str::is_empty) {
            missing_fields.push("reason for visit".to_string());
        }

        BookingFieldValidation {
            is_valid: missing_fields.is_empty(),
            missing_fields,
        }
    }
}

/// Uppercase hex identifier fragment, matching the booking-id and
/// confirmation-code wire format.
fn short_code(len: usize) -> String {
    Uuid::new_v4().simple().to_string()[..len].to_uppercase()
}
