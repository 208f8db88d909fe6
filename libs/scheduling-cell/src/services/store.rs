// libs/scheduling-cell/src/services/store.rs
use std::fs;
use std::path::PathBuf;

use tracing::{debug, info};

use crate::models::{Booking, BookingStatus, ScheduleConfig, ScheduleDocument, SchedulingError};

/// Persistence boundary for bookings. Implementations must not report a
/// mutation as committed until it has been durably persisted; on persistence
/// failure the in-memory state is rolled back.
pub trait BookingStore: Send + Sync {
    /// Snapshot of every booking, confirmed and cancelled.
    fn bookings(&self) -> &[Booking];

    fn find(&self, booking_id: &str) -> Option<&Booking>;

    fn append_and_persist(&mut self, booking: Booking) -> Result<(), SchedulingError>;

    /// Returns false when the booking id is unknown; that is not an error.
    fn update_status_and_persist(
        &mut self,
        booking_id: &str,
        status: BookingStatus,
    ) -> Result<bool, SchedulingError>;
}

/// Whole-file JSON store over the schedule document. Every mutation rewrites
/// the file via a temp file and rename in the same directory, so a crash
/// mid-write leaves the previous version intact.
pub struct JsonScheduleStore {
    path: PathBuf,
    document: ScheduleDocument,
}

impl JsonScheduleStore {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, SchedulingError> {
        let path = path.into();
        info!("Loading schedule from {}", path.display());

        let raw = fs::read_to_string(&path)?;
        let document: ScheduleDocument = serde_json::from_str(&raw)?;

        info!(
            "Loaded {} existing appointments",
            document.existing_appointments.len()
        );

        Ok(Self { path, document })
    }

    pub fn document(&self) -> &ScheduleDocument {
        &self.document
    }

    /// Parse the immutable schedule config out of the loaded document.
    pub fn schedule_config(&self) -> Result<ScheduleConfig, SchedulingError> {
        ScheduleConfig::from_document(&self.document)
    }

    fn persist(&self) -> Result<(), SchedulingError> {
        let json = serde_json::to_string_pretty(&self.document)?;
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        debug!("Persisted schedule to {}", self.path.display());
        Ok(())
    }
}

impl BookingStore for JsonScheduleStore {
    fn bookings(&self) -> &[Booking] {
        &self.document.existing_appointments
    }

    fn find(&self, booking_id: &str) -> Option<&Booking> {
        self.document
            .existing_appointments
            .iter()
            .find(|booking| booking.booking_id == booking_id)
    }

    fn append_and_persist(&mut self, booking: Booking) -> Result<(), SchedulingError> {
        let booking_id = booking.booking_id.clone();
        self.document.existing_appointments.push(booking);

        if let Err(e) = self.persist() {
            self.document.existing_appointments.pop();
            return Err(e);
        }

        info!("Saved booking: {}", booking_id);
        Ok(())
    }

    fn update_status_and_persist(
        &mut self,
        booking_id: &str,
        status: BookingStatus,
    ) -> Result<bool, SchedulingError> {
        let Some(index) = self
            .document
            .existing_appointments
            .iter()
            .position(|booking| booking.booking_id == booking_id)
        else {
            debug!("Booking not found: {}", booking_id);
            return Ok(false);
        };

        let previous = self.document.existing_appointments[index].status.clone();
        self.document.existing_appointments[index].status = status;

        if let Err(e) = self.persist() {
            self.document.existing_appointments[index].status = previous;
            return Err(e);
        }

        info!("Updated booking {} status", booking_id);
        Ok(true)
    }
}
