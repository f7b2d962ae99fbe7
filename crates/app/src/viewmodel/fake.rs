//! In-memory school API for view model tests

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::NaiveDate;
use sonatina_core::{ClassRef, ClassSummary, RoomRef, Shift, Slot, SlotStatus, SlotStudent};
use sonatina_net::{AuthContext, Error, Result, SchedulerApi, SlotFilters};
use tokio::sync::Barrier;

#[derive(Default)]
pub struct FakeApi {
    pub slots: Vec<Slot>,
    pub classes: Vec<ClassSummary>,
    pub rosters: HashMap<i64, Vec<SlotStudent>>,
    /// Slot ids whose roster fetch fails
    pub failing: HashSet<i64>,
    pub roster_calls: AtomicUsize,
    pub slot_calls: AtomicUsize,
    pub submitted: Mutex<Vec<(i64, Vec<SlotStudent>)>>,
    /// Roster fetches wait here until every party has arrived
    pub barrier: Option<Arc<Barrier>>,
}

impl FakeApi {
    pub fn roster_calls(&self) -> usize {
        self.roster_calls.load(Ordering::SeqCst)
    }
}

pub fn make_slot(id: i64, date: NaiveDate, shift: Shift) -> Slot {
    Slot {
        id,
        date,
        shift,
        status: SlotStatus::NotStarted,
        class: ClassRef {
            id: 100 + id,
            name: format!("Class {}", id),
            teacher: None,
        },
        room: RoomRef {
            id: 1,
            name: "Studio A".to_string(),
        },
        number_of_students: 1,
        attendance_status: None,
    }
}

#[async_trait]
impl SchedulerApi for FakeApi {
    async fn fetch_slots(
        &self,
        _auth: &AuthContext,
        start: NaiveDate,
        end: NaiveDate,
        _filters: &SlotFilters,
    ) -> Result<Vec<Slot>> {
        self.slot_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .slots
            .iter()
            .filter(|s| s.date >= start && s.date <= end)
            .cloned()
            .collect())
    }

    async fn fetch_slot_by_id(&self, _auth: &AuthContext, slot_id: i64) -> Result<Slot> {
        self.slots
            .iter()
            .find(|s| s.id == slot_id)
            .cloned()
            .ok_or(Error::Api {
                status: 404,
                message: format!("slot {}", slot_id),
            })
    }

    async fn fetch_attendance_status(
        &self,
        _auth: &AuthContext,
        slot_id: i64,
    ) -> Result<Vec<SlotStudent>> {
        self.roster_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(barrier) = &self.barrier {
            barrier.wait().await;
        }
        if self.failing.contains(&slot_id) {
            return Err(Error::Api {
                status: 503,
                message: "unavailable".to_string(),
            });
        }
        Ok(self.rosters.get(&slot_id).cloned().unwrap_or_default())
    }

    async fn fetch_update_attendance_status(
        &self,
        _auth: &AuthContext,
        slot_id: i64,
        records: &[SlotStudent],
    ) -> Result<()> {
        if self.failing.contains(&slot_id) {
            return Err(Error::Api {
                status: 500,
                message: "rejected".to_string(),
            });
        }
        self.submitted
            .lock()
            .unwrap()
            .push((slot_id, records.to_vec()));
        Ok(())
    }

    async fn fetch_classes(&self, _auth: &AuthContext) -> Result<Vec<ClassSummary>> {
        Ok(self.classes.clone())
    }
}
