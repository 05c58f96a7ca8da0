//! Presence service composing the provider ports.
//!
//! The service fetches from its providers, recovers every collaborator
//! failure to the empty value, and hands the data to the pure functions in
//! [`crate::calculation`].

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{info, warn};

use crate::calculation::{
    BranchRollupReport, DailyTrendRow, RangeOptions, WeeklyTrendRow, aggregate_sessions,
    daily_trend, fetch_day, rollup_by_branch, rollup_day, rollup_period, rollup_range_concurrent,
    weekly_trend,
};
use crate::config::ConfigLoader;
use crate::error::EngineResult;
use crate::models::{AttendanceEvent, Branch, DailySummary, DayRollup, Roster, RosterRollup};
use crate::providers::{BranchProvider, EventProvider, RosterProvider};
use crate::values::{DateRange, parse_date_key};

/// Everything shown for one day: per-employee summaries, the global rollup,
/// and the per-branch breakdown.
#[derive(Debug, Clone, Serialize)]
pub struct DailyOverview {
    /// The day.
    pub date: NaiveDate,
    /// Whether the day's events were fetched.
    pub events_loaded: bool,
    /// Summaries for every employee with a session on the day.
    pub summaries: BTreeMap<String, DailySummary>,
    /// Rollup over the whole roster.
    pub rollup: RosterRollup,
    /// Rollup per branch with reconciled totals.
    pub branches: BranchRollupReport,
    /// Employees with a registered face.
    pub registered_faces: usize,
}

/// Rollups and chart rows over a date range.
#[derive(Debug, Clone, Serialize)]
pub struct RangeTrend {
    /// The range covered.
    pub range: DateRange,
    /// One rollup per day, oldest first.
    pub days: Vec<DayRollup>,
    /// Distinct-employee rollup over the whole range.
    pub period: RosterRollup,
    /// Daily chart rows.
    pub daily: Vec<DailyTrendRow>,
    /// Weekly chart rows.
    pub weekly: Vec<WeeklyTrendRow>,
}

/// Presence queries over roster, event and branch providers.
///
/// Cloning is cheap; providers and configuration are shared.
#[derive(Debug)]
pub struct PresenceService<R, E, B> {
    config: Arc<ConfigLoader>,
    roster: Arc<R>,
    events: Arc<E>,
    branches: Arc<B>,
}

impl<R, E, B> Clone for PresenceService<R, E, B> {
    fn clone(&self) -> Self {
        Self {
            config: Arc::clone(&self.config),
            roster: Arc::clone(&self.roster),
            events: Arc::clone(&self.events),
            branches: Arc::clone(&self.branches),
        }
    }
}

impl<R, E, B> PresenceService<R, E, B>
where
    R: RosterProvider,
    E: EventProvider,
    B: BranchProvider,
{
    /// Creates a service over the given providers.
    pub fn new(config: ConfigLoader, roster: R, events: E, branches: B) -> Self {
        Self {
            config: Arc::new(config),
            roster: Arc::new(roster),
            events: Arc::new(events),
            branches: Arc::new(branches),
        }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &ConfigLoader {
        &self.config
    }

    /// The current roster, or an empty one if the provider fails.
    pub async fn roster(&self) -> Roster {
        match self.roster.employees().await {
            Ok(employees) => Roster::new(employees),
            Err(err) => {
                warn!(error = %err, "Roster fetch failed; using an empty roster");
                Roster::default()
            }
        }
    }

    async fn branch_labels(&self) -> Vec<Branch> {
        self.branches.branches().await.unwrap_or_else(|err| {
            warn!(error = %err, "Branch fetch failed; branches will be unlabeled");
            Vec::new()
        })
    }

    async fn events_for(&self, date: NaiveDate) -> Option<Vec<AttendanceEvent>> {
        let options = RangeOptions::from_settings(self.config.attendance());
        match fetch_day(self.events.as_ref(), date, options).await {
            Ok(events) => Some(events),
            Err(err) => {
                warn!(date = %date, error = %err, "Event fetch failed; treating the day as empty");
                None
            }
        }
    }

    /// Summaries and rollups for one day.
    pub async fn daily_overview(&self, date: NaiveDate) -> DailyOverview {
        let (roster, branches, events) =
            tokio::join!(self.roster(), self.branch_labels(), self.events_for(date));

        let events_loaded = events.is_some();
        let summaries = aggregate_sessions(&events.unwrap_or_default(), date);
        let rollup = rollup_day(&summaries, &roster.ids());
        let report = rollup_by_branch(&summaries, &roster, &branches);

        info!(
            date = %date,
            present = rollup.unique_present_count,
            late = rollup.late_count,
            total = rollup.total_employees,
            "Built daily overview"
        );

        DailyOverview {
            date,
            events_loaded,
            summaries,
            rollup,
            branches: report,
            registered_faces: roster.registered_ids().len(),
        }
    }

    /// [`Self::daily_overview`] for a `YYYY-MM-DD` date key.
    pub async fn daily_overview_for_key(&self, key: &str) -> EngineResult<DailyOverview> {
        let date = parse_date_key(key)?;
        Ok(self.daily_overview(date).await)
    }

    /// Per-day rollups, the period rollup and chart rows over `range`.
    pub async fn range_trend(&self, range: DateRange) -> RangeTrend {
        let roster = self.roster().await;
        let ids = roster.ids();
        let options = RangeOptions::from_settings(self.config.attendance());

        let days = rollup_range_concurrent(&range, &ids, self.events.as_ref(), options).await;
        let unavailable = days.iter().filter(|d| !d.has_data()).count();
        info!(
            start = %range.start(),
            end = %range.end(),
            days = days.len(),
            without_data = unavailable,
            "Built range trend"
        );

        RangeTrend {
            range,
            period: rollup_period(&days, ids.len()),
            daily: daily_trend(&days),
            weekly: weekly_trend(&days),
            days,
        }
    }

    /// [`Self::range_trend`] over the configured trailing window ending on `end`.
    pub async fn trailing_trend(&self, end: NaiveDate) -> RangeTrend {
        let window = self.config.attendance().trend_window_days;
        self.range_trend(DateRange::trailing(end, window)).await
    }
}
