//! Weekly scheduler view model

use chrono::NaiveDate;
use sonatina_core::week::{clamp_week_number, resolve_week_range, week_number_of, MAX_WEEK, MIN_WEEK};
use sonatina_core::{display_date, Slot, SlotGrid, WeekRange};
use sonatina_net::{AuthContext, Notification, SchedulerApi, SlotFilters};
use tracing::{debug, error, info};

use super::attendance::reconcile;
use crate::error::Result;

const DAY_NAMES: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// The week timetable: navigation, the held slots and their grid
pub struct SchedulerViewModel {
    year: i32,
    week_number: i32,
    week: WeekRange,
    filters: SlotFilters,
    slots: Vec<Slot>,
    grid: SlotGrid,
    loading: bool,
    last_error: Option<String>,
}

impl SchedulerViewModel {
    pub fn new(year: i32, week_number: i32) -> Result<Self> {
        let week_number = clamp_week_number(week_number);
        let week = resolve_week_range(year, week_number)?;
        Ok(Self {
            year,
            week_number,
            week,
            filters: SlotFilters::default(),
            slots: Vec::new(),
            grid: SlotGrid::project(&[], &week),
            loading: false,
            last_error: None,
        })
    }

    /// Open on the week containing `today`
    pub fn open_current_week(today: NaiveDate) -> Result<Self> {
        let (year, week_number) = week_number_of(today);
        Self::new(year, week_number)
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn week_number(&self) -> i32 {
        self.week_number
    }

    pub fn week(&self) -> &WeekRange {
        &self.week
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    pub fn grid(&self) -> &SlotGrid {
        &self.grid
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn set_filters(&mut self, filters: SlotFilters) {
        self.filters = filters;
    }

    /// Jump to a week; held slots are dropped until the next load
    pub fn go_to(&mut self, year: i32, week_number: i32) -> Result<()> {
        let week_number = clamp_week_number(week_number);
        let week = resolve_week_range(year, week_number)?;

        self.year = year;
        self.week_number = week_number;
        self.week = week;
        self.install(Vec::new());
        debug!(year, week_number, week = %self.week, "Moved to week");
        Ok(())
    }

    /// Returns false when already on the last week
    pub fn next_week(&mut self) -> Result<bool> {
        if self.week_number >= MAX_WEEK {
            return Ok(false);
        }
        self.go_to(self.year, self.week_number + 1)?;
        Ok(true)
    }

    /// Returns false when already on the first week
    pub fn previous_week(&mut self) -> Result<bool> {
        if self.week_number <= MIN_WEEK {
            return Ok(false);
        }
        self.go_to(self.year, self.week_number - 1)?;
        Ok(true)
    }

    /// Fetch the current week's slots and re-project the grid
    pub async fn load<A>(&mut self, api: &A, auth: &AuthContext) -> Result<()>
    where
        A: SchedulerApi + ?Sized,
    {
        self.loading = true;
        let result = api
            .fetch_slots(auth, self.week.start_date, self.week.end_date, &self.filters)
            .await;
        self.loading = false;

        match result {
            Ok(slots) => {
                info!(week = %self.week, count = slots.len(), "Loaded slots");
                self.last_error = None;
                self.install(slots);
                Ok(())
            }
            Err(e) => {
                error!(week = %self.week, error = %e, "Failed to load slots");
                self.last_error = Some(e.to_string());
                Err(e.into())
            }
        }
    }

    /// Run attendance reconciliation for `notification`.
    ///
    /// Returns the number of slots whose refresh failed when the held slots
    /// were replaced, or `None` when the notification was ignored.
    pub async fn apply_notification<A>(
        &mut self,
        api: &A,
        auth: &AuthContext,
        notification: &Notification,
    ) -> Option<usize>
    where
        A: SchedulerApi + ?Sized,
    {
        let reconciled = reconcile(api, auth, &self.slots, notification).await?;
        self.install(reconciled.slots);
        Some(reconciled.failed)
    }

    /// Fresh copy of one slot for the detail view
    pub async fn open_slot<A>(&self, api: &A, auth: &AuthContext, slot_id: i64) -> Result<Slot>
    where
        A: SchedulerApi + ?Sized,
    {
        Ok(api.fetch_slot_by_id(auth, slot_id).await?)
    }

    fn install(&mut self, slots: Vec<Slot>) {
        self.grid = SlotGrid::project(&slots, &self.week);
        self.slots = slots;
    }

    /// One line per occupied cell, in shift then day order
    pub fn grid_lines(&self) -> Vec<String> {
        let days = self.week.days();
        let mut lines = Vec::new();

        for (shift, row) in self.grid.rows() {
            for (offset, cell) in row.iter().enumerate() {
                for slot in cell {
                    let attendance = slot
                        .attendance_status
                        .map(|s| format!(" [{}]", s.display_name()))
                        .unwrap_or_default();
                    lines.push(format!(
                        "{} {} {}: {} @ {} ({}){}",
                        DAY_NAMES[offset],
                        display_date(days[offset]),
                        shift.label(),
                        slot.class.name,
                        slot.room.name,
                        slot.status.display_name(),
                        attendance
                    ));
                }
            }
        }

        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::viewmodel::fake::{make_slot, FakeApi};
    use chrono::Duration;
    use sonatina_core::{AttendanceStatus, Shift, SlotStudent};
    use std::sync::atomic::Ordering;
    use uuid::Uuid;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_open_current_week() {
        let vm = SchedulerViewModel::open_current_week(ymd(2024, 1, 3)).unwrap();
        assert_eq!(vm.year(), 2024);
        assert_eq!(vm.week_number(), 1);
        assert_eq!(vm.week().start_date, ymd(2023, 12, 31));
        assert!(vm.grid().is_empty());
    }

    #[test]
    fn test_navigation_clamps() {
        let mut vm = SchedulerViewModel::new(2024, 99).unwrap();
        assert_eq!(vm.week_number(), 52);
        assert!(!vm.next_week().unwrap());

        vm.go_to(2024, 1).unwrap();
        assert!(!vm.previous_week().unwrap());
        assert!(vm.next_week().unwrap());
        assert_eq!(vm.week_number(), 2);
        assert_eq!(vm.week().start_date, ymd(2024, 1, 7));
    }

    #[tokio::test]
    async fn test_load_projects_grid() {
        let auth = AuthContext::new(Uuid::new_v4(), "t");
        let mut vm = SchedulerViewModel::new(2024, 1).unwrap();
        let start = vm.week().start_date;

        let mut api = FakeApi::default();
        api.slots = vec![
            make_slot(1, start + Duration::days(1), Shift::Shift1),
            make_slot(2, start + Duration::days(1), Shift::Shift1),
            make_slot(3, start + Duration::days(5), Shift::Shift8),
            // Next week, filtered out by the fetch range
            make_slot(4, start + Duration::days(8), Shift::Shift1),
        ];

        vm.load(&api, &auth).await.unwrap();
        assert_eq!(vm.slots().len(), 3);
        assert_eq!(vm.grid().cell(Shift::Shift1, 1).len(), 2);
        assert_eq!(vm.grid().cell(Shift::Shift8, 5).len(), 1);
        assert!(!vm.is_loading());

        let lines = vm.grid_lines();
        assert_eq!(lines.len(), 3);
        assert_eq!(
            lines[0],
            "Mon 01/01/2024 07:00 - 08:30: Class 1 @ Studio A (Not started)"
        );

        let slot = vm.open_slot(&api, &auth, 3).await.unwrap();
        assert_eq!(slot.shift, Shift::Shift8);
    }

    #[tokio::test]
    async fn test_notification_updates_grid() {
        let me = Uuid::new_v4();
        let auth = AuthContext::new(me, "t");
        let mut vm = SchedulerViewModel::new(2024, 1).unwrap();
        let start = vm.week().start_date;

        let mut api = FakeApi::default();
        api.slots = vec![make_slot(1, start, Shift::Shift2)];
        api.rosters.insert(
            1,
            vec![SlotStudent {
                attendance_status: AttendanceStatus::Attended,
                ..SlotStudent::new(me)
            }],
        );
        vm.load(&api, &auth).await.unwrap();

        let ignored = Notification::new("other_topic", "changed");
        assert_eq!(vm.apply_notification(&api, &auth, &ignored).await, None);
        assert_eq!(api.roster_calls(), 0);

        let changed = Notification::new("scheduler_attendance", "changed");
        assert_eq!(vm.apply_notification(&api, &auth, &changed).await, Some(0));
        assert_eq!(
            vm.grid().cell(Shift::Shift2, 0)[0].attendance_status,
            Some(AttendanceStatus::Attended)
        );
        assert!(vm.grid_lines()[0].ends_with("[Attended]"));

        api.failing.insert(1);
        assert_eq!(vm.apply_notification(&api, &auth, &changed).await, Some(1));
        assert_eq!(vm.slots()[0].attendance_status, Some(AttendanceStatus::Attended));
    }

    #[tokio::test]
    async fn test_moving_week_clears_slots() {
        let auth = AuthContext::new(Uuid::new_v4(), "t");
        let mut vm = SchedulerViewModel::new(2024, 1).unwrap();
        let mut api = FakeApi::default();
        api.slots = vec![make_slot(1, vm.week().start_date, Shift::Shift2)];
        vm.load(&api, &auth).await.unwrap();
        assert_eq!(vm.slots().len(), 1);

        vm.next_week().unwrap();
        assert!(vm.slots().is_empty());
        vm.load(&api, &auth).await.unwrap();
        assert!(vm.grid().is_empty());
        assert_eq!(api.slot_calls.load(Ordering::SeqCst), 2);
    }
}
