//! Worked-time arithmetic.

use std::fmt;
use std::iter::Sum;
use std::ops::Add;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The measured span of one check-in/check-out session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionSpan {
    /// No check-out recorded yet.
    Open,
    /// Check-out at or after check-in; whole minutes, floored.
    Closed(u32),
    /// Check-out before check-in; the magnitude of the inversion in minutes.
    Inverted(u32),
}

impl SessionSpan {
    /// Minutes this session contributes to a worked total.
    ///
    /// Open and inverted sessions contribute nothing.
    pub fn worked_minutes(self) -> u32 {
        match self {
            SessionSpan::Closed(minutes) => minutes,
            SessionSpan::Open | SessionSpan::Inverted(_) => 0,
        }
    }
}

/// Measures a session.
///
/// # Example
///
/// ```
/// use workforce_engine::values::{SessionSpan, session_minutes};
/// use chrono::{TimeZone, Utc};
///
/// let check_in = Utc.with_ymd_and_hms(2025, 11, 10, 8, 58, 0).unwrap();
/// let check_out = Utc.with_ymd_and_hms(2025, 11, 10, 13, 2, 0).unwrap();
/// assert_eq!(session_minutes(check_in, Some(check_out)), SessionSpan::Closed(244));
/// assert_eq!(session_minutes(check_in, None), SessionSpan::Open);
/// ```
pub fn session_minutes(check_in: DateTime<Utc>, check_out: Option<DateTime<Utc>>) -> SessionSpan {
    let Some(check_out) = check_out else {
        return SessionSpan::Open;
    };

    let elapsed = check_out.signed_duration_since(check_in);
    // num_minutes truncates toward zero, which floors a non-negative span.
    let minutes = elapsed.num_minutes();
    if elapsed < chrono::TimeDelta::zero() {
        SessionSpan::Inverted(clamp_minutes(minutes.saturating_neg()))
    } else {
        SessionSpan::Closed(clamp_minutes(minutes))
    }
}

fn clamp_minutes(minutes: i64) -> u32 {
    u32::try_from(minutes).unwrap_or(u32::MAX)
}

/// A non-negative amount of worked time in whole minutes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorkedDuration(u32);

impl WorkedDuration {
    /// Creates a duration from whole minutes.
    pub const fn from_minutes(minutes: u32) -> Self {
        WorkedDuration(minutes)
    }

    /// Total minutes.
    pub const fn minutes(self) -> u32 {
        self.0
    }

    /// Whole hours, discarding the remainder.
    pub const fn whole_hours(self) -> u32 {
        self.0 / 60
    }

    /// Minutes left over after whole hours.
    pub const fn remainder_minutes(self) -> u32 {
        self.0 % 60
    }
}

impl Add for WorkedDuration {
    type Output = WorkedDuration;

    fn add(self, other: WorkedDuration) -> WorkedDuration {
        WorkedDuration(self.0.saturating_add(other.0))
    }
}

impl Sum for WorkedDuration {
    fn sum<I: Iterator<Item = WorkedDuration>>(iter: I) -> WorkedDuration {
        iter.fold(WorkedDuration::default(), Add::add)
    }
}

impl fmt::Display for WorkedDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}h {}m", self.whole_hours(), self.remainder_minutes())
    }
}
