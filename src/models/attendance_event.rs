//! Attendance event model.
//!
//! An [`AttendanceEvent`] is one check-in/check-out pair captured by the
//! attendance backend. The engine only ever reads events; it never merges,
//! amends, or deletes them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::values::{SessionSpan, session_minutes};

/// The status the capture side assigned to a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttendanceStatus {
    /// Checked in on time.
    #[serde(rename = "present")]
    Present,
    /// Checked in after the late threshold.
    #[serde(rename = "late")]
    Late,
    /// Counted as a half day.
    #[serde(rename = "half-day")]
    HalfDay,
}

/// One check-in/check-out session for an employee.
///
/// `check_out_time` is absent while the session is still open.
///
/// # Example
///
/// ```
/// use workforce_engine::models::{AttendanceEvent, AttendanceStatus};
///
/// let json = r#"{
///     "employeeId": "E1",
///     "attendanceId": "A-100",
///     "checkInTime": "2025-11-10T08:58:00Z",
///     "checkOutTime": null,
///     "status": "late"
/// }"#;
/// let event: AttendanceEvent = serde_json::from_str(json).unwrap();
/// assert_eq!(event.status, AttendanceStatus::Late);
/// assert!(event.is_open());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceEvent {
    /// The employee who checked in.
    pub employee_id: String,
    /// Unique identifier of this session.
    pub attendance_id: String,
    /// When the session started.
    pub check_in_time: DateTime<Utc>,
    /// When the session ended, if it has.
    #[serde(default)]
    pub check_out_time: Option<DateTime<Utc>>,
    /// The status assigned at capture time.
    pub status: AttendanceStatus,
}

impl AttendanceEvent {
    /// Returns true if no check-out has been recorded.
    pub fn is_open(&self) -> bool {
        self.check_out_time.is_none()
    }

    /// Returns true if the session is flagged late.
    pub fn is_late(&self) -> bool {
        self.status == AttendanceStatus::Late
    }

    /// Measures the session.
    pub fn span(&self) -> SessionSpan {
        session_minutes(self.check_in_time, self.check_out_time)
    }
}

/// Field names an attendance record is expected to carry.
pub(crate) const KNOWN_EVENT_FIELDS: [&str; 5] = [
    "employeeId",
    "attendanceId",
    "checkInTime",
    "checkOutTime",
    "status",
];

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_status_wire_names() {
        assert_eq!(
            serde_json::to_string(&AttendanceStatus::HalfDay).unwrap(),
            "\"half-day\""
        );
        let status: AttendanceStatus = serde_json::from_str("\"present\"").unwrap();
        assert_eq!(status, AttendanceStatus::Present);
    }

    #[test]
    fn test_unknown_status_is_rejected() {
        let result: Result<AttendanceStatus, _> = serde_json::from_str("\"absent\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_check_out_defaults_to_open() {
        let json = r#"{
            "employeeId": "E1",
            "attendanceId": "A-1",
            "checkInTime": "2025-11-10T08:58:00Z",
            "status": "present"
        }"#;
        let event: AttendanceEvent = serde_json::from_str(json).unwrap();
        assert!(event.is_open());
        assert_eq!(event.span(), SessionSpan::Open);
    }

    #[test]
    fn test_missing_employee_id_is_rejected() {
        let json = r#"{
            "attendanceId": "A-1",
            "checkInTime": "2025-11-10T08:58:00Z",
            "status": "present"
        }"#;
        let result: Result<AttendanceEvent, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }

    #[test]
    fn test_closed_span() {
        let event = AttendanceEvent {
            employee_id: "E1".to_string(),
            attendance_id: "A-1".to_string(),
            check_in_time: Utc.with_ymd_and_hms(2025, 11, 10, 14, 0, 0).unwrap(),
            check_out_time: Some(Utc.with_ymd_and_hms(2025, 11, 10, 18, 5, 0).unwrap()),
            status: AttendanceStatus::Present,
        };
        assert_eq!(event.span(), SessionSpan::Closed(245));
        assert!(!event.is_late());
    }

    #[test]
    fn test_serialization_uses_camel_case() {
        let event = AttendanceEvent {
            employee_id: "E1".to_string(),
            attendance_id: "A-1".to_string(),
            check_in_time: Utc.with_ymd_and_hms(2025, 11, 10, 14, 0, 0).unwrap(),
            check_out_time: None,
            status: AttendanceStatus::Late,
        };
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["employeeId"], "E1");
        assert_eq!(value["checkOutTime"], serde_json::Value::Null);
        assert_eq!(value["status"], "late");
    }
}
