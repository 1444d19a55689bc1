//! Availability Engine
//!
//! Turns a provider's weekly schedule plus existing bookings into:
//! - the list of upcoming working days
//! - the slot grid of one calendar date, each slot available or occupied
//!
//! Slots are fixed at [`SLOT_STEP_MINUTES`]. Times are wall-clock values in
//! the provider timezone; bookings are matched by their rendered "HH:mm".

use chrono::{Duration, NaiveDate, NaiveTime};
use chrono_tz::Tz;
use shared::models::serde_helpers::format_hhmm;
use shared::models::{ScheduleEntry, Slot, weekday_of};
use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;

use crate::clock::Clock;
use crate::store::{BookingStore, ScheduleStore};
use crate::utils::AppResult;
use crate::utils::time::{date_range, day_end_utc, day_start_utc, local_hhmm, local_today};

/// Slot granularity
pub const SLOT_STEP_MINUTES: i64 = 60;

/// Default `get_working_days` horizon
pub const DEFAULT_HORIZON_DAYS: u32 = 30;

#[derive(Debug, Clone)]
pub struct AvailabilityEngine {
    schedule: Arc<dyn ScheduleStore>,
    bookings: Arc<dyn BookingStore>,
    clock: Arc<dyn Clock>,
    /// 业务时区
    tz: Tz,
}

impl AvailabilityEngine {
    pub fn new(
        schedule: Arc<dyn ScheduleStore>,
        bookings: Arc<dyn BookingStore>,
        clock: Arc<dyn Clock>,
        tz: Tz,
    ) -> Self {
        Self {
            schedule,
            bookings,
            clock,
            tz,
        }
    }

    pub fn timezone(&self) -> Tz {
        self.tz
    }

    /// Dates in `[today, today + horizon_days)` whose weekday has an active
    /// schedule entry, ascending
    pub async fn get_working_days(
        &self,
        provider_id: i64,
        horizon_days: u32,
    ) -> AppResult<Vec<NaiveDate>> {
        let active_weekdays: BTreeSet<_> = self
            .schedule
            .entries_for_provider(provider_id)
            .await?
            .into_iter()
            .filter(|entry| entry.active)
            .map(|entry| entry.weekday)
            .collect();

        if active_weekdays.is_empty() {
            tracing::debug!(provider_id, "No active schedule entries");
            return Ok(Vec::new());
        }

        let today = local_today(self.clock.now(), self.tz);
        Ok(date_range(today, horizon_days)
            .filter(|date| active_weekdays.contains(&weekday_of(*date)))
            .collect())
    }

    /// Slot grid for one date
    ///
    /// Empty when the provider has no active entry for that weekday.
    pub async fn get_slots_for_date(&self, provider_id: i64, date: NaiveDate) -> AppResult<Vec<Slot>> {
        let Some(entry) = self
            .schedule
            .entry_for_weekday(provider_id, weekday_of(date))
            .await?
            .filter(|entry| entry.active)
        else {
            return Ok(Vec::new());
        };

        let candidates = candidate_times(&entry);
        if candidates.is_empty() {
            return Ok(Vec::new());
        }

        let booked: HashSet<String> = self
            .bookings
            .active_in_range(
                provider_id,
                day_start_utc(date, self.tz),
                day_end_utc(date, self.tz),
            )
            .await?
            .into_iter()
            .map(|appointment| local_hhmm(appointment.when_utc, self.tz))
            .collect();

        tracing::debug!(
            provider_id,
            %date,
            candidates = candidates.len(),
            booked = booked.len(),
            "Computed slot grid"
        );

        Ok(candidates
            .into_iter()
            .map(|time| {
                if booked.contains(&format_hhmm(time)) {
                    Slot::occupied(time)
                } else {
                    Slot::available(time)
                }
            })
            .collect())
    }
}

/// Candidate start times `[start, end)` at a fixed step, skipping the break
fn candidate_times(entry: &ScheduleEntry) -> Vec<NaiveTime> {
    let step = Duration::minutes(SLOT_STEP_MINUTES);
    let break_window = entry.break_window();
    let mut times = Vec::new();
    let mut current = entry.start_time;

    while current < entry.end_time {
        if let Some((break_start, break_end)) = break_window
            && current >= break_start
            && current < break_end
        {
            current = break_end;
            continue;
        }
        times.push(current);

        let (next, wrapped) = current.overflowing_add_signed(step);
        // Crossing midnight ends the day
        if wrapped != 0 {
            break;
        }
        current = next;
    }
    times
}
