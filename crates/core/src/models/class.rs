//! Class summary model used by the class list pages

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
#[repr(u8)]
pub enum ClassStatus {
    NotStarted = 0,
    Ongoing = 1,
    Finished = 2,
}

impl ClassStatus {
    pub fn display_name(&self) -> &'static str {
        match self {
            ClassStatus::NotStarted => "Not started",
            ClassStatus::Ongoing => "Ongoing",
            ClassStatus::Finished => "Finished",
        }
    }
}

impl TryFrom<u8> for ClassStatus {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(ClassStatus::NotStarted),
            1 => Ok(ClassStatus::Ongoing),
            2 => Ok(ClassStatus::Finished),
            other => Err(Error::InvalidValue(format!("class status {}", other))),
        }
    }
}

impl From<ClassStatus> for u8 {
    fn from(status: ClassStatus) -> Self {
        status as u8
    }
}

/// A class as listed on the class management pages
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassSummary {
    pub id: i64,
    pub name: String,
    pub status: ClassStatus,
    pub level: u8,
    #[serde(default)]
    pub teacher_name: Option<String>,
    #[serde(default)]
    pub total_slots: u32,
    #[serde(default)]
    pub finished_slots: u32,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
}

impl ClassSummary {
    /// Share of finished slots, in percent
    pub fn progress(&self) -> f64 {
        if self.total_slots == 0 {
            return 0.0;
        }
        f64::from(self.finished_slots) * 100.0 / f64::from(self.total_slots)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_class(finished: u32, total: u32) -> ClassSummary {
        ClassSummary {
            id: 1,
            name: "Sight reading".to_string(),
            status: ClassStatus::Ongoing,
            level: 2,
            teacher_name: None,
            total_slots: total,
            finished_slots: finished,
            start_date: None,
        }
    }

    #[test]
    fn test_progress() {
        assert_eq!(make_class(5, 20).progress(), 25.0);
        assert_eq!(make_class(0, 0).progress(), 0.0);
    }
}
