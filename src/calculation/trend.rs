//! Daily and weekly trend rows for charting.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::models::{DayRollup, PresenceSet};
use crate::values::week_start;

/// One day of a trend chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyTrendRow {
    /// The day.
    pub date: NaiveDate,
    /// Short weekday label, e.g. `Mon`.
    pub day: String,
    /// Distinct employees present.
    pub present: usize,
    /// Distinct employees late.
    pub late: usize,
    /// Roster members not present. Zero on days without data.
    pub absent: usize,
}

/// One ISO week of a trend chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeeklyTrendRow {
    /// Monday of the week.
    pub week_start: NaiveDate,
    /// Days of the week that fell inside the range.
    pub days_covered: usize,
    /// Days of the week with loaded data.
    pub days_with_data: usize,
    /// Distinct employees present on any day of the week.
    pub unique_present: usize,
    /// Distinct employees late on any day of the week.
    pub unique_late: usize,
    /// Sum of daily present counts.
    pub present_employee_days: usize,
    /// Mean daily attendance rate over days with data, rounded half up.
    pub average_attendance_rate: u32,
}

/// Maps each day rollup to a chart row, preserving order.
pub fn daily_trend(days: &[DayRollup]) -> Vec<DailyTrendRow> {
    days.iter()
        .map(|day| DailyTrendRow {
            date: day.date,
            day: day.date.format("%a").to_string(),
            present: day.rollup.unique_present_count,
            late: day.rollup.late_count,
            absent: day.rollup.absent_count,
        })
        .collect()
}

/// Groups day rollups by ISO week, earliest week first.
pub fn weekly_trend(days: &[DayRollup]) -> Vec<WeeklyTrendRow> {
    let mut weeks: BTreeMap<NaiveDate, Vec<&DayRollup>> = BTreeMap::new();
    for day in days {
        weeks.entry(week_start(day.date)).or_default().push(day);
    }

    weeks
        .into_iter()
        .map(|(monday, week)| {
            let mut presence = PresenceSet::default();
            let mut rate_sum = 0u64;
            let mut days_with_data = 0usize;
            for day in week.iter().filter(|d| d.has_data()) {
                presence.merge(&day.presence);
                rate_sum += u64::from(day.rollup.attendance_rate_percent);
                days_with_data += 1;
            }

            let average_attendance_rate = match u64::try_from(days_with_data) {
                Ok(n) if n > 0 => u32::try_from((rate_sum * 2 + n) / (n * 2)).unwrap_or(u32::MAX),
                _ => 0,
            };

            WeeklyTrendRow {
                week_start: monday,
                days_covered: week.len(),
                days_with_data,
                unique_present: presence.present.len(),
                unique_late: presence.late.len(),
                present_employee_days: week.iter().map(|d| d.rollup.unique_present_count).sum(),
                average_attendance_rate,
            }
        })
        .collect()
}
