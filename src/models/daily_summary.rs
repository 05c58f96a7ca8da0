//! Daily summary model.
//!
//! A [`DailySummary`] is derived on demand from one employee's sessions on one
//! calendar date. It is never persisted by the engine.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::{AttendanceEvent, AttendanceStatus};
use crate::values::WorkedDuration;

/// A problem found in the input sessions that the aggregator tolerated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SessionDiagnostic {
    /// The session's check-out precedes its check-in; it contributes zero minutes.
    CheckOutBeforeCheckIn {
        /// The offending session.
        attendance_id: String,
        /// How far the check-out precedes the check-in.
        minutes: u32,
    },
    /// The attendance id appeared more than once in the input; only the
    /// first copy counts. Reported on the summary that kept the first copy.
    DuplicateAttendanceId {
        /// The repeated id.
        attendance_id: String,
        /// Employee the repeated copy was filed under.
        repeated_under: String,
    },
}

/// Per-employee, per-date aggregate of attendance sessions.
///
/// `sessions` is ordered newest check-in first, so `sessions[0]` is the
/// session shown as the employee's current check-in/check-out/status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailySummary {
    /// The employee summarized.
    pub employee_id: String,
    /// The calendar date summarized.
    pub date: NaiveDate,
    /// Sessions for the date, newest check-in first.
    pub sessions: Vec<AttendanceEvent>,
    /// Sum of floored minutes over sessions with both times set.
    pub total_worked_minutes: u32,
    /// Status of the most recent session.
    pub latest_status: AttendanceStatus,
    /// True whenever at least one session exists.
    pub is_present: bool,
    /// Input problems tolerated while building this summary.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<SessionDiagnostic>,
}

impl DailySummary {
    /// The most recent session.
    pub fn latest_session(&self) -> Option<&AttendanceEvent> {
        self.sessions.first()
    }

    /// Check-in time of the most recent session.
    pub fn current_check_in(&self) -> Option<DateTime<Utc>> {
        self.latest_session().map(|s| s.check_in_time)
    }

    /// Check-out time of the most recent session, if it has closed.
    pub fn current_check_out(&self) -> Option<DateTime<Utc>> {
        self.latest_session().and_then(|s| s.check_out_time)
    }

    /// Earliest check-in of the day.
    pub fn first_check_in(&self) -> Option<DateTime<Utc>> {
        self.sessions.last().map(|s| s.check_in_time)
    }

    /// Returns true if any session is still open.
    pub fn has_open_session(&self) -> bool {
        self.sessions.iter().any(AttendanceEvent::is_open)
    }

    /// Returns true if any session of the day was flagged late.
    pub fn was_late(&self) -> bool {
        self.sessions.iter().any(AttendanceEvent::is_late)
    }

    /// Total worked time.
    pub fn worked_duration(&self) -> WorkedDuration {
        WorkedDuration::from_minutes(self.total_worked_minutes)
    }
}
