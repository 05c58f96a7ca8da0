//! Configuration types.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from YAML configuration files.

use std::time::Duration;

use chrono::{FixedOffset, Offset, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::calculation::{MAX_WORKING_DAYS, PayrollDefaults};
use crate::error::{EngineError, EngineResult};
use crate::models::PaymentType;
use crate::values::Money;

/// Largest UTC offset accepted, in minutes (UTC+14:00).
const MAX_OFFSET_MINUTES: i32 = 14 * 60;

/// Attendance settings from attendance.yaml.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AttendanceSettings {
    /// Offset from UTC, in minutes, used to assign sessions to calendar dates.
    pub utc_offset_minutes: i32,
    /// Upper bound for one per-day event fetch, in milliseconds.
    pub fetch_timeout_ms: u64,
    /// Days covered by the default trend window.
    pub trend_window_days: u32,
}

impl Default for AttendanceSettings {
    fn default() -> Self {
        Self {
            utc_offset_minutes: 0,
            fetch_timeout_ms: 5000,
            trend_window_days: 7,
        }
    }
}

impl AttendanceSettings {
    /// The configured offset as a chrono `FixedOffset`.
    pub fn utc_offset(&self) -> FixedOffset {
        FixedOffset::east_opt(self.utc_offset_minutes.saturating_mul(60))
            .unwrap_or_else(|| Utc.fix())
    }

    /// The per-day fetch timeout.
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_millis(self.fetch_timeout_ms)
    }

    pub(crate) fn validate(&self) -> EngineResult<()> {
        if self.utc_offset_minutes.abs() > MAX_OFFSET_MINUTES {
            return Err(EngineError::InvalidConfig {
                field: "utc_offset_minutes".to_string(),
                message: format!("must be within ±{MAX_OFFSET_MINUTES} minutes"),
            });
        }
        if self.fetch_timeout_ms == 0 {
            return Err(EngineError::InvalidConfig {
                field: "fetch_timeout_ms".to_string(),
                message: "must be greater than zero".to_string(),
            });
        }
        if self.trend_window_days == 0 {
            return Err(EngineError::InvalidConfig {
                field: "trend_window_days".to_string(),
                message: "must be at least one day".to_string(),
            });
        }
        Ok(())
    }
}

/// Payroll settings from payroll.yaml.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PayrollSettings {
    /// Working days assumed when a submission omits them.
    pub default_working_days: u32,
    /// Payment type assumed when a submission omits it.
    pub default_payment_type: PaymentType,
    /// ISO currency code, for labeling only.
    pub currency_code: String,
    /// Largest accepted single component, in major units.
    pub max_component_amount: Decimal,
}

impl Default for PayrollSettings {
    fn default() -> Self {
        Self {
            default_working_days: 26,
            default_payment_type: PaymentType::Cash,
            currency_code: "INR".to_string(),
            max_component_amount: Decimal::from(10_000_000),
        }
    }
}

impl PayrollSettings {
    /// The component ceiling in minor units.
    pub fn max_component(&self) -> Money {
        Money::from_decimal(self.max_component_amount).unwrap_or(Money::from_minor(i64::MAX))
    }

    /// The processing defaults these settings describe.
    pub fn defaults(&self) -> PayrollDefaults {
        PayrollDefaults::from_settings(self)
    }

    pub(crate) fn validate(&self) -> EngineResult<()> {
        if self.default_working_days > MAX_WORKING_DAYS {
            return Err(EngineError::InvalidConfig {
                field: "default_working_days".to_string(),
                message: format!("must not exceed {MAX_WORKING_DAYS}"),
            });
        }
        if self.max_component_amount <= Decimal::ZERO {
            return Err(EngineError::InvalidConfig {
                field: "max_component_amount".to_string(),
                message: "must be positive".to_string(),
            });
        }
        if Money::from_decimal(self.max_component_amount).is_none() {
            return Err(EngineError::InvalidConfig {
                field: "max_component_amount".to_string(),
                message: "must have at most two decimal places".to_string(),
            });
        }
        Ok(())
    }
}

/// The complete engine configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EngineConfig {
    attendance: AttendanceSettings,
    payroll: PayrollSettings,
}

impl EngineConfig {
    /// Creates a configuration from its parts.
    pub fn new(attendance: AttendanceSettings, payroll: PayrollSettings) -> Self {
        Self {
            attendance,
            payroll,
        }
    }

    /// Returns the attendance settings.
    pub fn attendance(&self) -> &AttendanceSettings {
        &self.attendance
    }

    /// Returns the payroll settings.
    pub fn payroll(&self) -> &PayrollSettings {
        &self.payroll
    }
}
