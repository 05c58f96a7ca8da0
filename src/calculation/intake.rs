//! Boundary decoding of raw attendance records.
//!
//! Each record is decoded on its own so that one malformed record is flagged
//! without discarding the rest of the batch.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::error::EngineError;
use crate::models::{AttendanceEvent, KNOWN_EVENT_FIELDS};

/// A raw record that could not be decoded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RejectedEvent {
    /// Position of the record in the submitted batch.
    pub index: usize,
    /// The record's attendance id, if it carried a readable one.
    pub attendance_id: Option<String>,
    /// Why the record was rejected.
    pub reason: String,
}

impl From<&RejectedEvent> for EngineError {
    fn from(rejected: &RejectedEvent) -> Self {
        EngineError::InvalidEvent {
            index: rejected.index,
            message: rejected.reason.clone(),
        }
    }
}

/// The outcome of decoding a batch of raw records.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EventBatch {
    /// Records that decoded cleanly, in input order.
    pub events: Vec<AttendanceEvent>,
    /// Records that were rejected.
    pub rejected: Vec<RejectedEvent>,
    /// Keys seen on records that the engine does not read.
    pub unknown_fields: BTreeSet<String>,
}

impl EventBatch {
    /// Returns true if every record decoded and carried only known keys.
    pub fn is_clean(&self) -> bool {
        self.rejected.is_empty() && self.unknown_fields.is_empty()
    }
}

/// Decodes raw attendance records.
///
/// Missing or ill-typed required fields reject the record. Extra keys are
/// tolerated and reported in [`EventBatch::unknown_fields`].
///
/// # Example
///
/// ```
/// use workforce_engine::calculation::decode_events;
/// use serde_json::json;
///
/// let batch = decode_events(&[
///     json!({
///         "employeeId": "E1",
///         "attendanceId": "A-1",
///         "checkInTime": "2025-11-10T08:58:00Z",
///         "checkOutTime": "2025-11-10T13:02:00Z",
///         "status": "present",
///         "latitude": 12.97
///     }),
///     json!({ "employeeId": "E2", "status": "present" }),
/// ]);
///
/// assert_eq!(batch.events.len(), 1);
/// assert_eq!(batch.rejected.len(), 1);
/// assert!(batch.unknown_fields.contains("latitude"));
/// ```
pub fn decode_events(records: &[Value]) -> EventBatch {
    let mut batch = EventBatch::default();

    for (index, record) in records.iter().enumerate() {
        if let Value::Object(fields) = record {
            batch.unknown_fields.extend(
                fields
                    .keys()
                    .filter(|key| !KNOWN_EVENT_FIELDS.contains(&key.as_str()))
                    .cloned(),
            );
        }

        match AttendanceEvent::deserialize(record) {
            Ok(event) => batch.events.push(event),
            Err(err) => {
                let attendance_id = record
                    .get("attendanceId")
                    .and_then(Value::as_str)
                    .map(str::to_string);
                warn!(
                    index,
                    attendance_id = attendance_id.as_deref().unwrap_or("-"),
                    error = %err,
                    "Rejecting malformed attendance record"
                );
                batch.rejected.push(RejectedEvent {
                    index,
                    attendance_id,
                    reason: err.to_string(),
                });
            }
        }
    }

    batch
}
