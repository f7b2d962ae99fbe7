//! Slot model: one scheduled meeting of a class

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

use super::{AccountSummary, AttendanceStatus, Shift};
use crate::error::Error;
use crate::week;

/// Lifecycle state of a slot, owned by the server
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
#[repr(u8)]
pub enum SlotStatus {
    NotStarted = 0,
    Ongoing = 1,
    Finished = 2,
    Cancelled = 3,
}

impl SlotStatus {
    pub fn display_name(&self) -> &'static str {
        match self {
            SlotStatus::NotStarted => "Not started",
            SlotStatus::Ongoing => "Ongoing",
            SlotStatus::Finished => "Finished",
            SlotStatus::Cancelled => "Cancelled",
        }
    }
}

impl TryFrom<u8> for SlotStatus {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(SlotStatus::NotStarted),
            1 => Ok(SlotStatus::Ongoing),
            2 => Ok(SlotStatus::Finished),
            3 => Ok(SlotStatus::Cancelled),
            other => Err(Error::InvalidValue(format!("slot status {}", other))),
        }
    }
}

impl From<SlotStatus> for u8 {
    fn from(status: SlotStatus) -> Self {
        status as u8
    }
}

/// The class a slot belongs to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassRef {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub teacher: Option<AccountSummary>,
}

/// The room a slot takes place in
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomRef {
    pub id: i64,
    pub name: String,
}

/// One scheduled occurrence of a class at a given date, shift and room
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Slot {
    pub id: i64,
    #[serde(deserialize_with = "deserialize_wire_day")]
    pub date: NaiveDate,
    pub shift: Shift,
    pub status: SlotStatus,
    pub class: ClassRef,
    pub room: RoomRef,
    #[serde(default)]
    pub number_of_students: u32,
    /// Signed-in student's status, merged in locally after a notification
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attendance_status: Option<AttendanceStatus>,
}

impl Slot {
    pub fn teacher_name(&self) -> Option<&str> {
        self.class.teacher.as_ref().map(|t| t.full_name.as_str())
    }

    /// Attendance can only be taken for slots that were not cancelled
    pub fn accepts_attendance(&self) -> bool {
        self.status != SlotStatus::Cancelled
    }
}

/// Accepts `YYYY-MM-DD` as well as a full timestamp, keeping only the day.
fn deserialize_wire_day<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    let day = raw.get(..10).unwrap_or(&raw);
    week::parse_wire_date(day).map_err(serde::de::Error::custom)
}
