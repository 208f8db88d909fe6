// libs/scheduling-cell/src/models.rs
use serde::{Deserialize, Serialize};
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime, Utc, Weekday};
use chrono_tz::Tz;
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// Duration applied when an appointment type has no configured entry.
pub const DEFAULT_APPOINTMENT_MINUTES: i64 = 30;

/// Serde helper for wall-clock times in "HH:MM" form, the format used
/// throughout the schedule document and the HTTP surface.
pub mod hhmm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub const FORMAT: &str = "%H:%M";

    pub fn serialize<S>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&time.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        NaiveTime::parse_from_str(&raw, FORMAT).map_err(serde::de::Error::custom)
    }
}

// ==============================================================================
// SCHEDULE DOCUMENT (persisted form)
// ==============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    #[serde(with = "hhmm")]
    pub start: NaiveTime,
    #[serde(with = "hhmm")]
    pub end: NaiveTime,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DoctorInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specialty: Option<String>,
    pub timezone: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Serde mirror of the schedule file. Whole-document read at startup,
/// whole-document rewrite on every successful booking mutation. Fields this
/// core does not interpret are carried through `extra` so a rewrite never
/// drops them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleDocument {
    pub doctor_info: DoctorInfo,
    pub working_hours: BTreeMap<String, TimeRange>,
    #[serde(default = "default_lunch_break")]
    pub lunch_break: TimeRange,
    #[serde(default = "default_slot_duration")]
    pub slot_duration_minutes: i64,
    #[serde(default = "default_buffer_time")]
    pub buffer_time_minutes: i64,
    #[serde(default = "default_appointment_durations")]
    pub appointment_durations: BTreeMap<String, i64>,
    #[serde(default)]
    pub existing_appointments: Vec<Booking>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

fn default_lunch_break() -> TimeRange {
    TimeRange {
        start: NaiveTime::from_hms_opt(12, 0, 0).unwrap(),
        end: NaiveTime::from_hms_opt(13, 0, 0).unwrap(),
    }
}

fn default_slot_duration() -> i64 {
    15
}

fn default_buffer_time() -> i64 {
    5
}

fn default_appointment_durations() -> BTreeMap<String, i64> {
    BTreeMap::from([
        ("consultation".to_string(), 30),
        ("followup".to_string(), 15),
        ("physical".to_string(), 45),
        ("specialist".to_string(), 60),
    ])
}

// ==============================================================================
// SCHEDULE CONFIG (parsed, immutable)
// ==============================================================================

/// Parsed schedule description, shared read-only for the process lifetime.
/// Weekday-name and "HH:MM" string parsing happens only here, at the load
/// boundary.
#[derive(Debug, Clone)]
pub struct ScheduleConfig {
    working_hours: HashMap<Weekday, TimeRange>,
    lunch_break: TimeRange,
    slot_duration_minutes: i64,
    buffer_time_minutes: i64,
    appointment_durations: HashMap<String, i64>,
    timezone: Tz,
}

impl ScheduleConfig {
    pub fn from_document(document: &ScheduleDocument) -> Result<Self, SchedulingError> {
        let timezone: Tz = document.doctor_info.timezone.parse().map_err(|_| {
            SchedulingError::InvalidConfig(format!(
                "unknown timezone: {}",
                document.doctor_info.timezone
            ))
        })?;

        let mut working_hours = HashMap::new();
        for (day_name, range) in &document.working_hours {
            let weekday: Weekday = day_name.parse().map_err(|_| {
                SchedulingError::InvalidConfig(format!("unknown weekday: {day_name}"))
            })?;
            if range.start >= range.end {
                return Err(SchedulingError::InvalidConfig(format!(
                    "working hours for {day_name} must start before they end"
                )));
            }
            working_hours.insert(weekday, *range);
        }

        if document.lunch_break.start >= document.lunch_break.end {
            return Err(SchedulingError::InvalidConfig(
                "lunch break must start before it ends".to_string(),
            ));
        }

        if document.slot_duration_minutes <= 0 {
            return Err(SchedulingError::InvalidConfig(
                "slot_duration_minutes must be positive".to_string(),
            ));
        }

        Ok(Self {
            working_hours,
            lunch_break: document.lunch_break,
            slot_duration_minutes: document.slot_duration_minutes,
            buffer_time_minutes: document.buffer_time_minutes,
            appointment_durations: document
                .appointment_durations
                .iter()
                .map(|(k, v)| (k.clone(), *v))
                .collect(),
            timezone,
        })
    }

    /// Working hours for a weekday; `None` means a non-working day.
    pub fn working_hours(&self, weekday: Weekday) -> Option<TimeRange> {
        self.working_hours.get(&weekday).copied()
    }

    pub fn lunch_break(&self) -> TimeRange {
        self.lunch_break
    }

    pub fn slot_duration_minutes(&self) -> i64 {
        self.slot_duration_minutes
    }

    /// Spacing hint between appointments. Loaded and surfaced but not
    /// enforced in slot exclusion; overlap is decided by duration math alone.
    pub fn buffer_time_minutes(&self) -> i64 {
        self.buffer_time_minutes
    }

    /// Duration for an appointment type, falling back to 30 minutes for
    /// unknown tags. The fallback is part of the external contract.
    pub fn appointment_duration(&self, appointment_type: &str) -> i64 {
        self.appointment_durations
            .get(appointment_type)
            .copied()
            .unwrap_or(DEFAULT_APPOINTMENT_MINUTES)
    }

    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    /// Today's date in the clinic timezone. All past-date checks key off this.
    pub fn today(&self) -> NaiveDate {
        Utc::now().with_timezone(&self.timezone).date_naive()
    }

    pub fn now(&self) -> DateTime<FixedOffset> {
        Utc::now().with_timezone(&self.timezone).fixed_offset()
    }
}

// ==============================================================================
// BOOKINGS
// ==============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Confirmed,
    Cancelled,
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BookingStatus::Confirmed => write!(f, "confirmed"),
            BookingStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// A persisted appointment. Cancelled bookings are kept for history and
/// excluded from overlap checks; a booking is never re-timed in place.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    pub booking_id: String,
    pub date: NaiveDate,
    #[serde(with = "hhmm")]
    pub start_time: NaiveTime,
    #[serde(with = "hhmm")]
    pub end_time: NaiveTime,
    #[serde(rename = "type")]
    pub appointment_type: String,
    pub patient_name: String,
    pub patient_email: String,
    pub patient_phone: String,
    #[serde(default)]
    pub reason: String,
    pub status: BookingStatus,
    pub confirmation_code: String,
    pub created_at: DateTime<FixedOffset>,
}

impl Booking {
    pub fn is_confirmed(&self) -> bool {
        self.status == BookingStatus::Confirmed
    }
}

// ==============================================================================
// AVAILABILITY MODELS (computed, never stored)
// ==============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    #[serde(with = "hhmm")]
    pub start_time: NaiveTime,
    #[serde(with = "hhmm")]
    pub end_time: NaiveTime,
    pub available: bool,
}

/// The full open-and-closed slot grid for one date. `date` echoes the
/// caller's input so unparseable requests round-trip unchanged.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DayAvailability {
    pub date: String,
    pub slots: Vec<Slot>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimePreference {
    Morning,
    Afternoon,
    Evening,
}

impl TimePreference {
    /// Lenient parse: an unrecognized preference means no filtering, so this
    /// returns `None` rather than an error.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.to_ascii_lowercase().as_str() {
            "morning" => Some(TimePreference::Morning),
            "afternoon" => Some(TimePreference::Afternoon),
            "evening" => Some(TimePreference::Evening),
            _ => None,
        }
    }

    pub fn contains_hour(&self, hour: u32) -> bool {
        match self {
            TimePreference::Morning => (6..12).contains(&hour),
            TimePreference::Afternoon => (12..17).contains(&hour),
            TimePreference::Evening => (17..22).contains(&hour),
        }
    }
}

impl fmt::Display for TimePreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimePreference::Morning => write!(f, "morning"),
            TimePreference::Afternoon => write!(f, "afternoon"),
            TimePreference::Evening => write!(f, "evening"),
        }
    }
}

/// One qualifying day from a forward scan: its first few open slots plus the
/// total count for that day.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailableDay {
    pub date: NaiveDate,
    pub day_name: String,
    pub slots: Vec<Slot>,
    pub total_slots: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlotSuggestion {
    pub date: NaiveDate,
    #[serde(with = "hhmm")]
    pub start_time: NaiveTime,
    #[serde(with = "hhmm")]
    pub end_time: NaiveTime,
    pub day_name: String,
}

// ==============================================================================
// BOOKING REQUEST/RESPONSE MODELS
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatientInfo {
    pub name: String,
    pub email: String,
    pub phone: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingRequest {
    pub appointment_type: String,
    pub date: String,
    pub start_time: String,
    pub patient: PatientInfo,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingDetails {
    pub date: NaiveDate,
    #[serde(with = "hhmm")]
    pub start_time: NaiveTime,
    #[serde(with = "hhmm")]
    pub end_time: NaiveTime,
    pub appointment_type: String,
    pub duration_minutes: i64,
    pub patient: PatientInfo,
    pub reason: String,
}

/// Outcome of a booking attempt. Domain-unavailable conditions (slot taken,
/// malformed date) are failed outcomes, not errors; only persistence failure
/// raises past this boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum BookingOutcome {
    Confirmed {
        booking_id: String,
        confirmation_code: String,
        details: BookingDetails,
    },
    Failed {
        error: String,
    },
}

impl BookingOutcome {
    pub fn is_confirmed(&self) -> bool {
        matches!(self, BookingOutcome::Confirmed { .. })
    }
}

/// Completeness check over the patient fields the booking flow requires.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingFieldValidation {
    pub is_valid: bool,
    pub missing_fields: Vec<String>,
}

// ==============================================================================
// ERROR TYPES
// ==============================================================================

#[derive(Debug, thiserror::Error)]
pub enum SchedulingError {
    #[error("Invalid schedule configuration: {0}")]
    InvalidConfig(String),

    #[error("Storage error: {0}")]
    Storage(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
