//! Calendar-date keys and inclusive date ranges.

use chrono::{DateTime, Datelike, Days, FixedOffset, NaiveDate, Utc};
use serde::Serialize;

use crate::error::{EngineError, EngineResult};

/// Maps a UTC instant to the calendar date observed at `offset`.
///
/// # Example
///
/// ```
/// use workforce_engine::values::calendar_date;
/// use chrono::{FixedOffset, NaiveDate, TimeZone, Utc};
///
/// let late_evening_utc = Utc.with_ymd_and_hms(2025, 11, 9, 20, 0, 0).unwrap();
/// let ist = FixedOffset::east_opt(5 * 3600 + 1800).unwrap();
/// assert_eq!(
///     calendar_date(late_evening_utc, ist),
///     NaiveDate::from_ymd_opt(2025, 11, 10).unwrap()
/// );
/// ```
pub fn calendar_date(instant: DateTime<Utc>, offset: FixedOffset) -> NaiveDate {
    instant.with_timezone(&offset).date_naive()
}

/// Parses a `YYYY-MM-DD` date key. A full ISO timestamp is accepted and
/// truncated at its `T` separator.
///
/// # Errors
///
/// `InvalidDateKey` when the key is not a calendar date.
pub fn parse_date_key(key: &str) -> EngineResult<NaiveDate> {
    let day = key.trim().split('T').next().unwrap_or_default();
    NaiveDate::parse_from_str(day, "%Y-%m-%d").map_err(|err| EngineError::InvalidDateKey {
        key: key.to_string(),
        message: err.to_string(),
    })
}

/// Returns the Monday starting the ISO week containing `date`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    let offset = u64::from(date.weekday().num_days_from_monday());
    date.checked_sub_days(Days::new(offset)).unwrap_or(date)
}

/// An inclusive range of calendar days, never empty.
///
/// # Example
///
/// ```
/// use workforce_engine::values::DateRange;
/// use chrono::NaiveDate;
///
/// let today = NaiveDate::from_ymd_opt(2025, 11, 10).unwrap();
/// let week = DateRange::trailing(today, 7);
/// assert_eq!(week.len(), 7);
/// assert_eq!(week.start(), NaiveDate::from_ymd_opt(2025, 11, 4).unwrap());
/// assert_eq!(week.days().last(), Some(today));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    /// Creates a range, rejecting an end before the start.
    pub fn new(start: NaiveDate, end: NaiveDate) -> EngineResult<Self> {
        if end < start {
            return Err(EngineError::InvalidDateRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// A range covering one day.
    pub fn single(date: NaiveDate) -> Self {
        Self {
            start: date,
            end: date,
        }
    }

    /// The `days` days ending on `end`, inclusive. A zero-day window is
    /// treated as one day.
    pub fn trailing(end: NaiveDate, days: u32) -> Self {
        let back = u64::from(days.saturating_sub(1));
        let start = end
            .checked_sub_days(Days::new(back))
            .unwrap_or(NaiveDate::MIN);
        Self { start, end }
    }

    /// First day of the range.
    pub fn start(&self) -> NaiveDate {
        self.start
    }

    /// Last day of the range.
    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Number of days in the range.
    pub fn len(&self) -> usize {
        let span = self.end.signed_duration_since(self.start).num_days();
        usize::try_from(span).unwrap_or(0) + 1
    }

    /// Always false; a range holds at least one day.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Returns true if `date` falls within the range.
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    /// Iterates the days in ascending order.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + use<> {
        let end = self.end;
        std::iter::successors(Some(self.start), |day| day.succ_opt())
            .take_while(move |day| *day <= end)
    }
}
