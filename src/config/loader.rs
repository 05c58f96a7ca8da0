//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading engine
//! configuration from YAML files.

use std::fs;
use std::path::Path;

use crate::error::{EngineError, EngineResult};

use super::types::{AttendanceSettings, EngineConfig, PayrollSettings};

const ATTENDANCE_FILE: &str = "attendance.yaml";
const PAYROLL_FILE: &str = "payroll.yaml";

/// Loads and provides access to engine configuration.
///
/// # Directory Structure
///
/// ```text
/// config/workforce/
/// ├── attendance.yaml  # Date offset, fetch timeout, trend window
/// └── payroll.yaml     # Working-day and payment-type defaults, component ceiling
/// ```
///
/// # Example
///
/// ```no_run
/// use workforce_engine::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/workforce")?;
/// let timeout = loader.attendance().fetch_timeout();
/// println!("Per-day fetch timeout: {:?}", timeout);
/// # Ok::<(), workforce_engine::error::EngineError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConfigLoader {
    config: EngineConfig,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` on success, or an error if:
    /// - Either file is missing (`ConfigNotFound`)
    /// - Either file contains invalid YAML or misses a field (`ConfigParseError`)
    /// - A value is out of range (`InvalidConfig`)
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let attendance = Self::load_yaml::<AttendanceSettings>(&path.join(ATTENDANCE_FILE))?;
        let payroll = Self::load_yaml::<PayrollSettings>(&path.join(PAYROLL_FILE))?;

        Self::from_parts(attendance, payroll)
    }

    /// Builds configuration from in-memory YAML documents.
    ///
    /// # Example
    ///
    /// ```
    /// use workforce_engine::config::ConfigLoader;
    ///
    /// let loader = ConfigLoader::from_yaml_strs(
    ///     "utc_offset_minutes: 330\nfetch_timeout_ms: 2000\ntrend_window_days: 7\n",
    ///     "default_working_days: 26\ndefault_payment_type: BANK\n\
    ///      currency_code: INR\nmax_component_amount: 500000\n",
    /// )?;
    /// assert_eq!(loader.attendance().utc_offset_minutes, 330);
    /// # Ok::<(), workforce_engine::error::EngineError>(())
    /// ```
    pub fn from_yaml_strs(attendance_yaml: &str, payroll_yaml: &str) -> EngineResult<Self> {
        let attendance = Self::parse_yaml::<AttendanceSettings>(attendance_yaml, ATTENDANCE_FILE)?;
        let payroll = Self::parse_yaml::<PayrollSettings>(payroll_yaml, PAYROLL_FILE)?;

        Self::from_parts(attendance, payroll)
    }

    fn from_parts(attendance: AttendanceSettings, payroll: PayrollSettings) -> EngineResult<Self> {
        attendance.validate()?;
        payroll.validate()?;

        Ok(Self {
            config: EngineConfig::new(attendance, payroll),
        })
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        Self::parse_yaml(&content, &path_str)
    }

    fn parse_yaml<T: serde::de::DeserializeOwned>(content: &str, path: &str) -> EngineResult<T> {
        serde_yaml::from_str(content).map_err(|e| EngineError::ConfigParseError {
            path: path.to_string(),
            message: e.to_string(),
        })
    }

    /// Returns the underlying engine configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Returns the attendance settings.
    pub fn attendance(&self) -> &AttendanceSettings {
        self.config.attendance()
    }

    /// Returns the payroll settings.
    pub fn payroll(&self) -> &PayrollSettings {
        self.config.payroll()
    }
}
