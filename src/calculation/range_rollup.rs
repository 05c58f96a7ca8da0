//! Rollups over a range of days.
//!
//! Each day is rolled up independently. A day whose fetch fails, times out,
//! or returns nothing yields an all-zero rollup, so a range of N days always
//! produces N entries in ascending date order.

use std::collections::BTreeSet;
use std::time::Duration;

use chrono::{FixedOffset, NaiveDate};
use futures::future::join_all;
use tokio::time::timeout;
use tracing::{debug, warn};

use crate::config::AttendanceSettings;
use crate::error::{EngineError, EngineResult};
use crate::models::{AttendanceEvent, DayAvailability, DayRollup, PresenceSet, RosterRollup};
use crate::providers::EventProvider;
use crate::values::DateRange;

use super::presence_rollup::presence_from_summaries;
use super::session_aggregator::{aggregate_sessions, events_on_date};

/// Settings for a concurrent range rollup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeOptions {
    /// Upper bound on each per-day fetch.
    pub fetch_timeout: Duration,
    /// Offset used to check that fetched events belong to their day.
    pub utc_offset: FixedOffset,
}

impl RangeOptions {
    /// Builds options from attendance settings.
    pub fn from_settings(settings: &AttendanceSettings) -> Self {
        Self {
            fetch_timeout: settings.fetch_timeout(),
            utc_offset: settings.utc_offset(),
        }
    }

    /// The fetch timeout in whole milliseconds.
    pub fn timeout_ms(&self) -> u64 {
        u64::try_from(self.fetch_timeout.as_millis()).unwrap_or(u64::MAX)
    }
}

impl Default for RangeOptions {
    fn default() -> Self {
        Self::from_settings(&AttendanceSettings::default())
    }
}

/// Rolls up one day's pre-filtered events against a roster.
///
/// An empty event list is an `Empty` day with the zero rollup.
pub fn rollup_events(
    events: &[AttendanceEvent],
    date: NaiveDate,
    roster: &BTreeSet<String>,
) -> DayRollup {
    if events.is_empty() {
        return DayRollup::zero(date, DayAvailability::Empty);
    }

    let summaries = aggregate_sessions(events, date);
    let presence = presence_from_summaries(&summaries, roster);
    let rollup = presence.rollup(roster.len());

    DayRollup {
        date,
        availability: DayAvailability::Loaded,
        presence,
        rollup,
    }
}

fn day_from_fetch(
    date: NaiveDate,
    fetched: EngineResult<Vec<AttendanceEvent>>,
    roster: &BTreeSet<String>,
) -> DayRollup {
    match fetched {
        Ok(events) => rollup_events(&events, date, roster),
        Err(err) => {
            warn!(date = %date, error = %err, "Per-day fetch failed; substituting a zero rollup");
            DayRollup::zero(date, DayAvailability::Unavailable)
        }
    }
}

fn keep_day(
    date: NaiveDate,
    fetched: EngineResult<Vec<AttendanceEvent>>,
    utc_offset: FixedOffset,
) -> EngineResult<Vec<AttendanceEvent>> {
    fetched.map(|events| events_on_date(&events, date, utc_offset))
}

/// Fetches one day's events from `provider`.
///
/// The fetch is bounded by `options.fetch_timeout`; running out of time is a
/// `FetchTimedOut` error. Events whose check-in falls on another day at
/// `options.utc_offset` are dropped.
pub async fn fetch_day<P>(
    provider: &P,
    date: NaiveDate,
    options: RangeOptions,
) -> EngineResult<Vec<AttendanceEvent>>
where
    P: EventProvider + ?Sized,
{
    let fetched = match timeout(options.fetch_timeout, provider.events_on(date)).await {
        Ok(result) => result,
        Err(_) => Err(EngineError::FetchTimedOut {
            date,
            timeout_ms: options.timeout_ms(),
        }),
    };
    keep_day(date, fetched, options.utc_offset)
}

/// Rolls up every day in `range`, fetching each day through `fetch`.
///
/// `fetch` is called once per day, oldest first. Fetched events whose
/// check-in falls on another day at `utc_offset` are dropped. Errors never
/// escape; the day becomes `Unavailable` with the zero rollup.
///
/// # Example
///
/// ```
/// use std::collections::BTreeSet;
/// use workforce_engine::calculation::rollup_range;
/// use workforce_engine::error::EngineError;
/// use workforce_engine::values::DateRange;
/// use chrono::{FixedOffset, NaiveDate};
///
/// let end = NaiveDate::from_ymd_opt(2025, 11, 10).unwrap();
/// let roster: BTreeSet<String> = ["E1".to_string()].into();
/// let utc = FixedOffset::east_opt(0).unwrap();
/// let days = rollup_range(&DateRange::trailing(end, 7), &roster, utc, |date| {
///     Err(EngineError::FetchTimedOut { date, timeout_ms: 5000 })
/// });
/// assert_eq!(days.len(), 7);
/// assert!(days.iter().all(|d| d.rollup.is_zero()));
/// ```
pub fn rollup_range<F>(
    range: &DateRange,
    roster: &BTreeSet<String>,
    utc_offset: FixedOffset,
    mut fetch: F,
) -> Vec<DayRollup>
where
    F: FnMut(NaiveDate) -> EngineResult<Vec<AttendanceEvent>>,
{
    range
        .days()
        .map(|date| day_from_fetch(date, keep_day(date, fetch(date), utc_offset), roster))
        .collect()
}

/// Rolls up every day in `range` with all per-day fetches in flight at once.
///
/// Each day goes through [`fetch_day`] with `options`.
pub async fn rollup_range_concurrent<P>(
    range: &DateRange,
    roster: &BTreeSet<String>,
    provider: &P,
    options: RangeOptions,
) -> Vec<DayRollup>
where
    P: EventProvider + ?Sized,
{
    debug!(
        start = %range.start(),
        end = %range.end(),
        days = range.len(),
        timeout_ms = options.timeout_ms(),
        "Fetching range concurrently"
    );

    let fetches = range
        .days()
        .map(|date| async move { (date, fetch_day(provider, date, options).await) });

    let mut days: Vec<DayRollup> = join_all(fetches)
        .await
        .into_iter()
        .map(|(date, fetched)| day_from_fetch(date, fetched, roster))
        .collect();

    days.sort_by_key(|day| day.date);
    days
}

/// Rolls a range up into one period rollup over `total_employees`.
///
/// Presence is the union across days, so an employee present on several
/// days counts once. Returns the zero rollup when no day has data.
pub fn rollup_period(days: &[DayRollup], total_employees: usize) -> RosterRollup {
    if !days.iter().any(DayRollup::has_data) {
        return RosterRollup::default();
    }

    let mut presence = PresenceSet::default();
    for day in days {
        presence.merge(&day.presence);
    }
    presence.rollup(total_employees)
}
