//! School API contract
//!
//! The remote REST backend is reached through [`SchedulerApi`]. Every call
//! carries the caller's [`AuthContext`] explicitly.

use async_trait::async_trait;
use chrono::NaiveDate;
use sonatina_core::week::wire_date;
use sonatina_core::{ClassSummary, Shift, Slot, SlotStatus, SlotStudent};
use uuid::Uuid;

use crate::error::Result;

/// Request-scoped identity of the signed-in account
#[derive(Clone)]
pub struct AuthContext {
    pub account_id: Uuid,
    pub token: String,
}

impl AuthContext {
    pub fn new(account_id: Uuid, token: impl Into<String>) -> Self {
        Self {
            account_id,
            token: token.into(),
        }
    }
}

impl std::fmt::Debug for AuthContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthContext")
            .field("account_id", &self.account_id)
            .field("token", &"<redacted>")
            .finish()
    }
}

/// Server-side filters for the slot listing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SlotFilters {
    pub shifts: Vec<Shift>,
    pub statuses: Vec<SlotStatus>,
    pub class_id: Option<i64>,
    pub teacher_id: Option<Uuid>,
    pub student_id: Option<Uuid>,
}

impl SlotFilters {
    /// Slots a single student is enrolled in
    pub fn for_student(student_id: Uuid) -> Self {
        Self {
            student_id: Some(student_id),
            ..Default::default()
        }
    }

    /// Slots taught by one teacher
    pub fn for_teacher(teacher_id: Uuid) -> Self {
        Self {
            teacher_id: Some(teacher_id),
            ..Default::default()
        }
    }

    /// Query string pairs for a week's listing, dates in wire format
    pub fn query_pairs(&self, start: NaiveDate, end: NaiveDate) -> Vec<(&'static str, String)> {
        let mut pairs = vec![("startTime", wire_date(start)), ("endTime", wire_date(end))];
        pairs.extend(
            self.shifts
                .iter()
                .map(|s| ("shift", u8::from(*s).to_string())),
        );
        pairs.extend(
            self.statuses
                .iter()
                .map(|s| ("slotStatus", u8::from(*s).to_string())),
        );
        if let Some(class_id) = self.class_id {
            pairs.push(("classId", class_id.to_string()));
        }
        if let Some(teacher_id) = self.teacher_id {
            pairs.push(("teacherId", teacher_id.to_string()));
        }
        if let Some(student_id) = self.student_id {
            pairs.push(("studentId", student_id.to_string()));
        }
        pairs
    }
}

/// Calls the portals make against the school backend
#[async_trait]
pub trait SchedulerApi: Send + Sync {
    /// Slots dated within `start..=end`
    async fn fetch_slots(
        &self,
        auth: &AuthContext,
        start: NaiveDate,
        end: NaiveDate,
        filters: &SlotFilters,
    ) -> Result<Vec<Slot>>;

    async fn fetch_slot_by_id(&self, auth: &AuthContext, slot_id: i64) -> Result<Slot>;

    /// Attendance roster of one slot
    async fn fetch_attendance_status(
        &self,
        auth: &AuthContext,
        slot_id: i64,
    ) -> Result<Vec<SlotStudent>>;

    /// Replace the attendance roster of one slot
    async fn fetch_update_attendance_status(
        &self,
        auth: &AuthContext,
        slot_id: i64,
        records: &[SlotStudent],
    ) -> Result<()>;

    async fn fetch_classes(&self, auth: &AuthContext) -> Result<Vec<ClassSummary>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_pairs() {
        let teacher = Uuid::new_v4();
        let mut filters = SlotFilters::for_teacher(teacher);
        filters.shifts = vec![Shift::Shift1, Shift::Shift8];
        filters.statuses = vec![SlotStatus::Finished];

        let start = NaiveDate::from_ymd_opt(2023, 12, 31).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 1, 6).unwrap();
        let pairs = filters.query_pairs(start, end);

        assert_eq!(
            pairs,
            vec![
                ("startTime", "2023-12-31".to_string()),
                ("endTime", "2024-01-06".to_string()),
                ("shift", "0".to_string()),
                ("shift", "7".to_string()),
                ("slotStatus", "2".to_string()),
                ("teacherId", teacher.to_string()),
            ]
        );
    }

    #[test]
    fn test_token_not_in_debug_output() {
        let auth = AuthContext::new(Uuid::new_v4(), "secret-token");
        assert!(!format!("{:?}", auth).contains("secret-token"));
    }
}
