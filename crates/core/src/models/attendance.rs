//! Attendance records within a slot

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::AccountSummary;
use crate::error::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(try_from = "u8", into = "u8")]
#[repr(u8)]
pub enum AttendanceStatus {
    #[default]
    NotYet = 0,
    Attended = 1,
    Absent = 2,
}

impl AttendanceStatus {
    pub fn display_name(&self) -> &'static str {
        match self {
            AttendanceStatus::NotYet => "Not yet",
            AttendanceStatus::Attended => "Attended",
            AttendanceStatus::Absent => "Absent",
        }
    }
}

impl TryFrom<u8> for AttendanceStatus {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(AttendanceStatus::NotYet),
            1 => Ok(AttendanceStatus::Attended),
            2 => Ok(AttendanceStatus::Absent),
            other => Err(Error::InvalidValue(format!("attendance status {}", other))),
        }
    }
}

impl From<AttendanceStatus> for u8 {
    fn from(status: AttendanceStatus) -> Self {
        status as u8
    }
}

/// A student's attendance entry in one slot.
///
/// Edited locally while attendance is taken, then submitted in bulk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotStudent {
    pub student_id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub student: Option<AccountSummary>,
    pub attendance_status: AttendanceStatus,
    #[serde(default)]
    pub comments: String,
    #[serde(default)]
    pub media_url: Option<String>,
}

impl SlotStudent {
    pub fn new(student_id: Uuid) -> Self {
        Self {
            student_id,
            student: None,
            attendance_status: AttendanceStatus::NotYet,
            comments: String::new(),
            media_url: None,
        }
    }

    pub fn display_name(&self) -> String {
        match &self.student {
            Some(account) => account.full_name.clone(),
            None => self.student_id.to_string(),
        }
    }
}
