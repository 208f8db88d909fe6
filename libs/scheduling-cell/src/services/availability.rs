// libs/scheduling-cell/src/services/availability.rs
use chrono::{Datelike, NaiveDate, NaiveTime, Timelike};
use tracing::{debug, warn};

use crate::models::{DayAvailability, ScheduleConfig, Slot, TimePreference, Booking};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Pure availability computation over the schedule config and a snapshot of
/// bookings. Holds no state across calls; every query sees one consistent
/// snapshot and nothing is cached.
pub struct AvailabilityEngine<'a> {
    config: &'a ScheduleConfig,
    bookings: &'a [Booking],
}

/// Half-open interval overlap: touching endpoints do not count.
fn intervals_overlap(a_start: i64, a_end: i64, b_start: i64, b_end: i64) -> bool {
    a_start < b_end && b_start < a_end
}

fn minutes_since_midnight(time: NaiveTime) -> i64 {
    i64::from(time.hour()) * 60 + i64::from(time.minute())
}

fn time_from_minutes(minutes: i64) -> Option<NaiveTime> {
    let hour = u32::try_from(minutes / 60).ok()?;
    let minute = u32::try_from(minutes % 60).ok()?;
    NaiveTime::from_hms_opt(hour, minute, 0)
}

impl<'a> AvailabilityEngine<'a> {
    pub fn new(config: &'a ScheduleConfig, bookings: &'a [Booking]) -> Self {
        Self { config, bookings }
    }

    pub fn is_working_day(&self, date: NaiveDate) -> bool {
        self.config.working_hours(date.weekday()).is_some()
    }

    /// A slot is open iff the date is a working day, the interval fits inside
    /// working hours, misses the lunch break entirely, and overlaps no
    /// confirmed booking on the same date. All arithmetic is done in
    /// minutes-since-midnight.
    pub fn slot_is_available(
        &self,
        date: NaiveDate,
        start_time: NaiveTime,
        duration_minutes: i64,
    ) -> bool {
        let Some(hours) = self.config.working_hours(date.weekday()) else {
            return false;
        };

        let slot_start = minutes_since_midnight(start_time);
        let slot_end = slot_start + duration_minutes;

        if slot_start < minutes_since_midnight(hours.start)
            || slot_end > minutes_since_midnight(hours.end)
        {
            return false;
        }

        let lunch = self.config.lunch_break();
        if intervals_overlap(
            slot_start,
            slot_end,
            minutes_since_midnight(lunch.start),
            minutes_since_midnight(lunch.end),
        ) {
            return false;
        }

        !self.bookings.iter().any(|booking| {
            booking.date == date
                && booking.is_confirmed()
                && intervals_overlap(
                    slot_start,
                    slot_end,
                    minutes_since_midnight(booking.start_time),
                    minutes_since_midnight(booking.end_time),
                )
        })
    }

    /// The full slot grid for a date, open and closed slots alike; callers
    /// filter. Unparseable dates, past dates, and non-working days yield an
    /// empty grid rather than an error.
    pub fn day_availability(&self, date: &str, appointment_type: &str) -> DayAvailability {
        debug!("Computing availability for {} ({})", date, appointment_type);

        let Ok(day) = NaiveDate::parse_from_str(date, DATE_FORMAT) else {
            warn!("Invalid date format: {}", date);
            return DayAvailability {
                date: date.to_string(),
                slots: vec![],
            };
        };

        if day < self.config.today() {
            debug!("Date {} is in the past", date);
            return DayAvailability {
                date: date.to_string(),
                slots: vec![],
            };
        }

        let Some(hours) = self.config.working_hours(day.weekday()) else {
            debug!("{} is not a working day", day.format("%A"));
            return DayAvailability {
                date: date.to_string(),
                slots: vec![],
            };
        };

        let duration = self.config.appointment_duration(appointment_type);
        let stride = self.config.slot_duration_minutes();
        let work_end = minutes_since_midnight(hours.end);

        let mut slots = Vec::new();
        let mut current = minutes_since_midnight(hours.start);
        while current + duration <= work_end {
            let (Some(start_time), Some(end_time)) =
                (time_from_minutes(current), time_from_minutes(current + duration))
            else {
                break;
            };

            slots.push(Slot {
                start_time,
                end_time,
                available: self.slot_is_available(day, start_time, duration),
            });

            current += stride;
        }

        debug!(
            "Found {} open slots out of {} on {}",
            slots.iter().filter(|s| s.available).count(),
            slots.len(),
            date
        );

        DayAvailability {
            date: date.to_string(),
            slots,
        }
    }

    /// Open slots only, optionally narrowed to a time-of-day band. An empty
    /// result is a valid "no availability" outcome.
    pub fn available_slots(
        &self,
        date: &str,
        appointment_type: &str,
        preference: Option<TimePreference>,
    ) -> Vec<Slot> {
        let grid = self.day_availability(date, appointment_type);
        grid.slots
            .into_iter()
            .filter(|slot| slot.available)
            .filter(|slot| match preference {
                Some(band) => band.contains_hour(slot.start_time.hour()),
                None => true,
            })
            .collect()
    }
}
