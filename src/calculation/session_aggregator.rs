//! Session aggregation.
//!
//! Groups attendance events by employee into ordered sessions and derives a
//! [`DailySummary`] for each employee seen on the date.

use std::collections::BTreeMap;

use chrono::{FixedOffset, NaiveDate};
use tracing::{debug, warn};

use crate::models::{AttendanceEvent, DailySummary, SessionDiagnostic};
use crate::values::{SessionSpan, calendar_date};

/// Aggregates one date's events into per-employee daily summaries.
///
/// The input is assumed to be pre-filtered to events whose check-in falls on
/// `date` (see [`events_on_date`]). Employees with no events are absent from
/// the result; membership in the map is what marks an employee present.
///
/// Within an employee, sessions are ordered by check-in, newest first, with
/// ties broken by attendance id. Only sessions with both times set count
/// towards `total_worked_minutes`. A session whose check-out precedes its
/// check-in counts zero and is reported in `diagnostics`, as is any repeated
/// attendance id (the first copy is kept).
///
/// # Example
///
/// ```
/// use workforce_engine::calculation::aggregate_sessions;
/// use workforce_engine::models::{AttendanceEvent, AttendanceStatus};
/// use chrono::{NaiveDate, TimeZone, Utc};
///
/// let at = |h, m| Utc.with_ymd_and_hms(2025, 11, 10, h, m, 0).unwrap();
/// let events = vec![
///     AttendanceEvent {
///         employee_id: "E1".to_string(),
///         attendance_id: "A-1".to_string(),
///         check_in_time: at(8, 58),
///         check_out_time: Some(at(13, 2)),
///         status: AttendanceStatus::Present,
///     },
///     AttendanceEvent {
///         employee_id: "E1".to_string(),
///         attendance_id: "A-2".to_string(),
///         check_in_time: at(14, 0),
///         check_out_time: Some(at(18, 5)),
///         status: AttendanceStatus::Present,
///     },
/// ];
///
/// let date = NaiveDate::from_ymd_opt(2025, 11, 10).unwrap();
/// let summaries = aggregate_sessions(&events, date);
/// let e1 = &summaries["E1"];
/// assert_eq!(e1.total_worked_minutes, 489);
/// assert_eq!(e1.latest_session().unwrap().attendance_id, "A-2");
/// assert!(e1.is_present);
/// ```
pub fn aggregate_sessions(
    events: &[AttendanceEvent],
    date: NaiveDate,
) -> BTreeMap<String, DailySummary> {
    let mut owners: BTreeMap<&str, &str> = BTreeMap::new();
    let mut groups: BTreeMap<&str, Vec<&AttendanceEvent>> = BTreeMap::new();
    let mut diagnostics: BTreeMap<&str, Vec<SessionDiagnostic>> = BTreeMap::new();

    for event in events {
        let attendance_id = event.attendance_id.as_str();
        match owners.get(attendance_id).copied() {
            None => {
                owners.insert(attendance_id, event.employee_id.as_str());
                groups.entry(event.employee_id.as_str()).or_default().push(event);
            }
            Some(owner) => {
                warn!(
                    employee_id = %event.employee_id,
                    first_employee_id = %owner,
                    attendance_id,
                    "Ignoring repeated attendance id"
                );
                diagnostics
                    .entry(owner)
                    .or_default()
                    .push(SessionDiagnostic::DuplicateAttendanceId {
                        attendance_id: attendance_id.to_string(),
                        repeated_under: event.employee_id.clone(),
                    });
            }
        }
    }

    groups
        .into_iter()
        .filter_map(|(employee_id, sessions)| {
            let flagged = diagnostics.remove(employee_id).unwrap_or_default();
            summarize_employee_day(employee_id, date, sessions, flagged)
                .map(|s| (employee_id.to_string(), s))
        })
        .collect()
}

/// Builds one employee's summary. Returns `None` only for an empty group.
fn summarize_employee_day(
    employee_id: &str,
    date: NaiveDate,
    group: Vec<&AttendanceEvent>,
    mut diagnostics: Vec<SessionDiagnostic>,
) -> Option<DailySummary> {
    let mut sessions: Vec<AttendanceEvent> = group.into_iter().cloned().collect();

    sessions.sort_by(|a, b| {
        b.check_in_time
            .cmp(&a.check_in_time)
            .then_with(|| a.attendance_id.cmp(&b.attendance_id))
    });

    let mut total_worked_minutes: u32 = 0;
    for session in &sessions {
        let span = session.span();
        if let SessionSpan::Inverted(minutes) = span {
            warn!(
                employee_id,
                attendance_id = %session.attendance_id,
                minutes,
                "Check-out precedes check-in; counting zero minutes"
            );
            diagnostics.push(SessionDiagnostic::CheckOutBeforeCheckIn {
                attendance_id: session.attendance_id.clone(),
                minutes,
            });
        }
        total_worked_minutes = total_worked_minutes.saturating_add(span.worked_minutes());
    }

    let latest_status = sessions.first()?.status;

    Some(DailySummary {
        employee_id: employee_id.to_string(),
        date,
        sessions,
        total_worked_minutes,
        latest_status,
        is_present: true,
        diagnostics,
    })
}

/// Keeps the events whose check-in falls on `date` at `offset`.
///
/// This is the pre-filter callers apply before [`aggregate_sessions`].
pub fn events_on_date(
    events: &[AttendanceEvent],
    date: NaiveDate,
    offset: FixedOffset,
) -> Vec<AttendanceEvent> {
    let kept: Vec<AttendanceEvent> = events
        .iter()
        .filter(|e| calendar_date(e.check_in_time, offset) == date)
        .cloned()
        .collect();

    let dropped = events.len() - kept.len();
    if dropped > 0 {
        debug!(date = %date, dropped, "Dropped events checked in on another date");
    }
    kept
}
