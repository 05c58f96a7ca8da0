//! Value objects shared by the attendance and payroll calculations.
//!
//! Money is carried in integer minor units, worked time in whole minutes and
//! calendar days as `NaiveDate` keys derived from UTC instants.

mod date_key;
mod duration;
mod money;

pub use date_key::{DateRange, calendar_date, parse_date_key, week_start};
pub use duration::{SessionSpan, WorkedDuration, session_minutes};
pub use money::{MINOR_UNITS_PER_MAJOR, Money};
