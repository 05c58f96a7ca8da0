//! Calculation logic for the workforce engine.
//!
//! This module contains the pure functions behind every derived figure:
//! decoding raw attendance records, aggregating sessions into daily
//! summaries, presence rollups per roster and per branch, range rollups and
//! trend rows, and payroll totals with process and edit semantics.

mod intake;
mod payroll;
mod presence_rollup;
mod range_rollup;
mod session_aggregator;
mod trend;

pub use intake::{EventBatch, RejectedEvent, decode_events};
pub use payroll::{
    MAX_WORKING_DAYS, PayrollDefaults, PayrollInput, PayrollRegister, compute_totals, edit_salary,
    payroll_register, process_salary, validate_components,
};
pub use presence_rollup::{
    BranchRollup, BranchRollupReport, presence_from_summaries, rollup_by_branch, rollup_day,
};
pub use range_rollup::{
    RangeOptions, fetch_day, rollup_events, rollup_period, rollup_range, rollup_range_concurrent,
};
pub use session_aggregator::{aggregate_sessions, events_on_date};
pub use trend::{DailyTrendRow, WeeklyTrendRow, daily_trend, weekly_trend};
