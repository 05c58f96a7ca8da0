//! Roster rollup models.
//!
//! These types hold presence counts over a roster. Every presence count is a
//! distinct-employee count; sessions and days never inflate it.

use std::collections::BTreeSet;
use std::iter::Sum;
use std::ops::Add;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Presence, absence and lateness counts over a roster.
///
/// # Example
///
/// ```
/// use workforce_engine::models::RosterRollup;
///
/// let rollup = RosterRollup::from_counts(3, 1, 0);
/// assert_eq!(rollup.absent_count, 2);
/// assert_eq!(rollup.attendance_rate_percent, 33);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterRollup {
    /// Employees in scope.
    pub total_employees: usize,
    /// Distinct employees with at least one session.
    pub unique_present_count: usize,
    /// `max(0, total_employees - unique_present_count)`.
    pub absent_count: usize,
    /// Distinct present employees with any session flagged late.
    pub late_count: usize,
    /// Present employees that were never flagged late.
    pub on_time_count: usize,
    /// `round(unique_present_count / total_employees * 100)`, 0 for an empty roster.
    pub attendance_rate_percent: u32,
}

impl RosterRollup {
    /// Builds a rollup from its three independent counts.
    pub fn from_counts(
        total_employees: usize,
        unique_present_count: usize,
        late_count: usize,
    ) -> Self {
        Self {
            total_employees,
            unique_present_count,
            absent_count: total_employees.saturating_sub(unique_present_count),
            late_count,
            on_time_count: unique_present_count.saturating_sub(late_count),
            attendance_rate_percent: attendance_rate_percent(unique_present_count, total_employees),
        }
    }

    /// Returns true if every count is zero.
    pub fn is_zero(&self) -> bool {
        *self == Self::default()
    }
}

/// Elementwise sum of counts. The rate is derived again from the summed
/// present and total counts since percentages do not add.
impl Add for RosterRollup {
    type Output = RosterRollup;

    fn add(self, other: RosterRollup) -> RosterRollup {
        let total_employees = self.total_employees + other.total_employees;
        let unique_present_count = self.unique_present_count + other.unique_present_count;
        RosterRollup {
            total_employees,
            unique_present_count,
            absent_count: self.absent_count + other.absent_count,
            late_count: self.late_count + other.late_count,
            on_time_count: self.on_time_count + other.on_time_count,
            attendance_rate_percent: attendance_rate_percent(unique_present_count, total_employees),
        }
    }
}

impl Sum for RosterRollup {
    fn sum<I: Iterator<Item = RosterRollup>>(iter: I) -> RosterRollup {
        iter.fold(RosterRollup::default(), Add::add)
    }
}

/// Rounds `present / total * 100` half up; 0 when `total` is 0.
pub(crate) fn attendance_rate_percent(present: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    let present = present as u128;
    let total = total as u128;
    u32::try_from((present * 200 + total) / (total * 2)).unwrap_or(u32::MAX)
}

/// The distinct employees present, and late, within a scope.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresenceSet {
    /// Employees with at least one session.
    pub present: BTreeSet<String>,
    /// Present employees with any session flagged late.
    pub late: BTreeSet<String>,
}

impl PresenceSet {
    /// Rolls the set up against a roster of `total_employees`.
    pub fn rollup(&self, total_employees: usize) -> RosterRollup {
        RosterRollup::from_counts(total_employees, self.present.len(), self.late.len())
    }

    /// Adds every employee from `other`.
    pub fn merge(&mut self, other: &PresenceSet) {
        self.present.extend(other.present.iter().cloned());
        self.late.extend(other.late.iter().cloned());
    }
}

/// Whether a day's events could be obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayAvailability {
    /// Events were fetched and at least one was present.
    Loaded,
    /// The fetch succeeded with no events.
    Empty,
    /// The fetch failed or timed out.
    Unavailable,
}

/// One day's rollup within a date range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayRollup {
    /// The day rolled up.
    pub date: NaiveDate,
    /// Whether data was obtained for the day.
    pub availability: DayAvailability,
    /// Who was present and late.
    pub presence: PresenceSet,
    /// Counts for the day. All zero unless `availability` is `Loaded`.
    pub rollup: RosterRollup,
}

impl DayRollup {
    /// A day with no data: every count is zero.
    pub fn zero(date: NaiveDate, availability: DayAvailability) -> Self {
        Self {
            date,
            availability,
            presence: PresenceSet::default(),
            rollup: RosterRollup::default(),
        }
    }

    /// Returns true if the day's events were loaded.
    pub fn has_data(&self) -> bool {
        self.availability == DayAvailability::Loaded
    }
}
