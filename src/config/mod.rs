//! Configuration loading for the workforce engine.
//!
//! Settings are read from YAML files in a configuration directory:
//! `attendance.yaml` for date normalization and fetch bounds, and
//! `payroll.yaml` for processing defaults.
//!
//! # Example
//!
//! ```no_run
//! use workforce_engine::config::ConfigLoader;
//!
//! let loader = ConfigLoader::load("./config/workforce").unwrap();
//! println!("Currency: {}", loader.payroll().currency_code);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{AttendanceSettings, EngineConfig, PayrollSettings};
