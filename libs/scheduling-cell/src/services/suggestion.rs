// libs/scheduling-cell/src/services/suggestion.rs
use chrono::{Duration, NaiveDate};
use tracing::debug;

use crate::models::{AvailableDay, Booking, ScheduleConfig, SlotSuggestion, TimePreference};
use crate::services::availability::{AvailabilityEngine, DATE_FORMAT};

/// Slots shown per day in a forward scan; the day also reports its total.
const SLOTS_PER_DAY: usize = 5;

/// Date-range search built on top of the availability engine. Like the
/// engine it operates over a single bookings snapshot per query.
pub struct SuggestionSearch<'a> {
    config: &'a ScheduleConfig,
    engine: AvailabilityEngine<'a>,
}

impl<'a> SuggestionSearch<'a> {
    pub fn new(config: &'a ScheduleConfig, bookings: &'a [Booking]) -> Self {
        Self {
            config,
            engine: AvailabilityEngine::new(config, bookings),
        }
    }

    /// Scan the days strictly after today, in calendar order, collecting up
    /// to `max_dates` days that have at least one matching open slot. The
    /// scan stops as soon as the cap is reached, so results depend only on
    /// calendar order.
    pub fn find_next_available_dates(
        &self,
        appointment_type: &str,
        days_to_check: u32,
        max_dates: usize,
        preference: Option<TimePreference>,
    ) -> Vec<AvailableDay> {
        debug!(
            "Scanning {} days ahead for {} appointments",
            days_to_check, appointment_type
        );

        let today = self.config.today();
        let mut available_dates = Vec::new();

        for offset in 1..=i64::from(days_to_check) {
            let day = today + Duration::days(offset);
            let date = day.format(DATE_FORMAT).to_string();

            let slots = self.engine.available_slots(&date, appointment_type, preference);
            if slots.is_empty() {
                continue;
            }

            let total_slots = slots.len();
            available_dates.push(AvailableDay {
                date: day,
                day_name: day.format("%A").to_string(),
                slots: slots.into_iter().take(SLOTS_PER_DAY).collect(),
                total_slots,
            });

            if available_dates.len() >= max_dates {
                break;
            }
        }

        available_dates
    }

    /// Suggest concrete slots. With a preferred date the suggestions come
    /// from that day alone; otherwise qualifying days are flattened
    /// day-major, exhausting one day before moving to the next, so
    /// suggestions cluster by day.
    pub fn suggest_slots(
        &self,
        preferred_date: Option<&str>,
        appointment_type: &str,
        preference: Option<TimePreference>,
        num_suggestions: usize,
    ) -> Vec<SlotSuggestion> {
        if let Some(date) = preferred_date {
            let Ok(day) = NaiveDate::parse_from_str(date, DATE_FORMAT) else {
                return vec![];
            };
            let day_name = day.format("%A").to_string();

            return self
                .engine
                .available_slots(date, appointment_type, preference)
                .into_iter()
                .take(num_suggestions)
                .map(|slot| SlotSuggestion {
                    date: day,
                    start_time: slot.start_time,
                    end_time: slot.end_time,
                    day_name: day_name.clone(),
                })
                .collect();
        }

        let mut suggestions = Vec::new();
        for day in self.find_next_available_dates(appointment_type, 14, 5, preference) {
            for slot in &day.slots {
                suggestions.push(SlotSuggestion {
                    date: day.date,
                    start_time: slot.start_time,
                    end_time: slot.end_time,
                    day_name: day.day_name.clone(),
                });
                if suggestions.len() >= num_suggestions {
                    return suggestions;
                }
            }
        }

        suggestions
    }
}
