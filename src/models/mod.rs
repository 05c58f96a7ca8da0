//! Core data models for the workforce engine.
//!
//! Input records (attendance events, employees, branches, payroll records)
//! mirror the camelCase shapes used by the attendance backend. Derived values
//! (daily summaries, rollups) use snake_case.

mod attendance_event;
mod daily_summary;
mod employee;
mod payroll_record;
mod roster_rollup;

pub use attendance_event::{AttendanceEvent, AttendanceStatus};
pub(crate) use attendance_event::KNOWN_EVENT_FIELDS;
pub use daily_summary::{DailySummary, SessionDiagnostic};
pub use employee::{Branch, Employee, Roster};
pub use payroll_record::{
    Deductions, Earnings, PaymentType, PayrollKey, PayrollPeriod, PayrollRecord, PayrollStatus,
    PayrollTotals,
};
pub use roster_rollup::{DayAvailability, DayRollup, PresenceSet, RosterRollup};
