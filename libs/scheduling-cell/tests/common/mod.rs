#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use chrono::{Datelike, Duration, NaiveDate, Utc, Weekday};
use serde_json::{json, Value};
use tempfile::TempDir;

use scheduling_cell::{BookingService, JsonScheduleStore};

pub const CLINIC_TZ: chrono_tz::Tz = chrono_tz::America::New_York;

/// Mon-Fri 09:00-17:00, lunch 12:00-13:00, 15-minute granularity,
/// consultation = 30 minutes. The scenario the whole suite is built on.
pub fn schedule_document(existing_appointments: Value) -> Value {
    json!({
        "doctor_info": {
            "name": "Dr. Sarah Mitchell",
            "specialty": "Family Medicine",
            "timezone": "America/New_York"
        },
        "working_hours": {
            "monday": {"start": "09:00", "end": "17:00"},
            "tuesday": {"start": "09:00", "end": "17:00"},
            "wednesday": {"start": "09:00", "end": "17:00"},
            "thursday": {"start": "09:00", "end": "17:00"},
            "friday": {"start": "09:00", "end": "17:00"}
        },
        "lunch_break": {"start": "12:00", "end": "13:00"},
        "slot_duration_minutes": 15,
        "buffer_time_minutes": 5,
        "existing_appointments": existing_appointments
    })
}

pub fn booking_record(
    booking_id: &str,
    date: NaiveDate,
    start_time: &str,
    end_time: &str,
    status: &str,
) -> Value {
    json!({
        "booking_id": booking_id,
        "date": date.format("%Y-%m-%d").to_string(),
        "start_time": start_time,
        "end_time": end_time,
        "type": "consultation",
        "patient_name": "Alex Rivera",
        "patient_email": "alex@example.com",
        "patient_phone": "555-0134",
        "reason": "Follow-up on lab results",
        "status": status,
        "confirmation_code": "9F3A21BC",
        "created_at": "2026-01-05T10:00:00-05:00"
    })
}

pub fn today_in_clinic_tz() -> NaiveDate {
    Utc::now().with_timezone(&CLINIC_TZ).date_naive()
}

/// The next date with the given weekday that is at least a week out, so
/// past-date rules never trip regardless of when the suite runs.
pub fn upcoming(weekday: Weekday) -> NaiveDate {
    let mut date = today_in_clinic_tz() + Duration::days(7);
    while date.weekday() != weekday {
        date += Duration::days(1);
    }
    date
}

pub fn date_str(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Writes the document into a temp dir and opens a service over it. The
/// TempDir must stay alive for the duration of the test.
pub fn service_with(document: Value) -> (TempDir, PathBuf, Arc<BookingService>) {
    let dir = TempDir::new().expect("create temp dir");
    let path = dir.path().join("doctor_schedule.json");
    std::fs::write(&path, serde_json::to_string_pretty(&document).expect("serialize"))
        .expect("write schedule");

    let store = JsonScheduleStore::open(&path).expect("open store");
    let config = Arc::new(store.schedule_config().expect("parse config"));
    let service = Arc::new(BookingService::new(config, Box::new(store)));

    (dir, path, service)
}

pub fn empty_service() -> (TempDir, PathBuf, Arc<BookingService>) {
    service_with(schedule_document(json!([])))
}
