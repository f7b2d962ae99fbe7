//! Attendance view model
//!
//! Two flows live here: merging live attendance changes into the slots a
//! student is looking at, and a teacher taking attendance for one slot.

use futures::future::join_all;
use sonatina_core::invariants::assert_slots_aligned;
use sonatina_core::{AttendanceStatus, Slot, SlotStudent};
use sonatina_net::{AuthContext, Notification, SchedulerApi, SchedulerEvent};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::Result;

/// Outcome of a reconciliation pass
#[derive(Debug, Clone)]
pub struct Reconciled {
    /// Index-aligned with the input slots
    pub slots: Vec<Slot>,
    /// Slots whose roster fetch failed and kept their previous state
    pub failed: usize,
}

/// Refresh the signed-in account's attendance on every held slot.
///
/// Returns `None` for notifications that are not attendance changes; nothing
/// is fetched then. Otherwise every slot's roster is fetched concurrently and
/// all fetches are awaited. A failed fetch leaves that slot as it was.
pub async fn reconcile<A>(
    api: &A,
    auth: &AuthContext,
    slots: &[Slot],
    notification: &Notification,
) -> Option<Reconciled>
where
    A: SchedulerApi + ?Sized,
{
    if SchedulerEvent::classify(notification) != SchedulerEvent::AttendanceChanged {
        debug!(topic = %notification.topic, "Ignoring notification");
        return None;
    }

    let fetches = slots.iter().map(|slot| async move {
        match api.fetch_attendance_status(auth, slot.id).await {
            Ok(records) => (merge_status(slot, &records, auth.account_id), true),
            Err(e) => {
                warn!(slot_id = slot.id, error = %e, "Attendance refresh failed, keeping last known status");
                (slot.clone(), false)
            }
        }
    });

    let settled = join_all(fetches).await;
    let failed = settled.iter().filter(|(_, ok)| !ok).count();
    let merged: Vec<Slot> = settled.into_iter().map(|(slot, _)| slot).collect();

    assert_slots_aligned(slots, &merged);
    info!(slots = merged.len(), failed, "Reconciled attendance");

    Some(Reconciled {
        slots: merged,
        failed,
    })
}

/// Copy of `slot` carrying `account_id`'s status from `records`, if listed
fn merge_status(slot: &Slot, records: &[SlotStudent], account_id: Uuid) -> Slot {
    let mut merged = slot.clone();
    match records.iter().find(|r| r.student_id == account_id) {
        Some(record) => merged.attendance_status = Some(record.attendance_status),
        None => debug!(slot_id = slot.id, "Account not on roster, keeping status"),
    }
    merged
}

/// Counts by status for the sheet header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AttendanceSummary {
    pub attended: usize,
    pub absent: usize,
    pub not_yet: usize,
}

/// A teacher's attendance entry for one slot.
///
/// Edits stay local until [`submit`](Self::submit) sends the whole roster.
#[derive(Debug, Clone)]
pub struct AttendanceSheet {
    slot: Slot,
    students: Vec<SlotStudent>,
    dirty: bool,
}

impl AttendanceSheet {
    /// Fetch the slot and its roster
    pub async fn load<A>(api: &A, auth: &AuthContext, slot_id: i64) -> Result<Self>
    where
        A: SchedulerApi + ?Sized,
    {
        let (slot, students) = futures::try_join!(
            api.fetch_slot_by_id(auth, slot_id),
            api.fetch_attendance_status(auth, slot_id)
        )?;
        debug!(slot_id, students = students.len(), "Loaded attendance sheet");
        Ok(Self::new(slot, students))
    }

    pub fn new(slot: Slot, students: Vec<SlotStudent>) -> Self {
        Self {
            slot,
            students,
            dirty: false,
        }
    }

    pub fn slot(&self) -> &Slot {
        &self.slot
    }

    pub fn students(&self) -> &[SlotStudent] {
        &self.students
    }

    /// Unsubmitted edits exist
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark(&mut self, student_id: Uuid, status: AttendanceStatus) -> Result<()> {
        self.edit(student_id, |s| s.attendance_status = status)
    }

    pub fn comment(&mut self, student_id: Uuid, text: impl Into<String>) -> Result<()> {
        let text = text.into();
        self.edit(student_id, |s| s.comments = text)
    }

    pub fn set_media(&mut self, student_id: Uuid, url: Option<String>) -> Result<()> {
        self.edit(student_id, |s| s.media_url = url)
    }

    pub fn mark_all(&mut self, status: AttendanceStatus) -> Result<()> {
        self.ensure_editable()?;
        for student in &mut self.students {
            student.attendance_status = status;
        }
        self.dirty = true;
        Ok(())
    }

    pub fn summary(&self) -> AttendanceSummary {
        self.students
            .iter()
            .fold(AttendanceSummary::default(), |mut acc, s| {
                match s.attendance_status {
                    AttendanceStatus::Attended => acc.attended += 1,
                    AttendanceStatus::Absent => acc.absent += 1,
                    AttendanceStatus::NotYet => acc.not_yet += 1,
                }
                acc
            })
    }

    /// Send the roster in one request
    pub async fn submit<A>(&mut self, api: &A, auth: &AuthContext) -> Result<()>
    where
        A: SchedulerApi + ?Sized,
    {
        self.ensure_editable()?;
        api.fetch_update_attendance_status(auth, self.slot.id, &self.students)
            .await?;
        self.dirty = false;
        info!(slot_id = self.slot.id, students = self.students.len(), "Attendance submitted");
        Ok(())
    }

    fn edit(&mut self, student_id: Uuid, apply: impl FnOnce(&mut SlotStudent)) -> Result<()> {
        self.ensure_editable()?;
        let student = self
            .students
            .iter_mut()
            .find(|s| s.student_id == student_id)
            .ok_or_else(|| {
                sonatina_core::Error::NotFound(format!(
                    "student {} in slot {}",
                    student_id, self.slot.id
                ))
            })?;
        apply(student);
        self.dirty = true;
        Ok(())
    }

    fn ensure_editable(&self) -> Result<()> {
        if self.slot.accepts_attendance() {
            Ok(())
        } else {
            Err(sonatina_core::Error::InvalidOperation(format!(
                "slot {} was cancelled",
                self.slot.id
            ))
            .into())
        }
    }
}
