//! Slot grid projection
//!
//! Lays one week's slots out as `[shift][day]` cells for the timetable view.

use tracing::debug;

use crate::invariants;
use crate::models::{Shift, Slot, SHIFT_COUNT};
use crate::week::WeekRange;

/// Days per grid row
pub const DAYS_PER_WEEK: usize = 7;

type Row = [Vec<Slot>; DAYS_PER_WEEK];

/// A week of slots indexed by shift band and day offset (0 = Sunday)
#[derive(Debug, Clone)]
pub struct SlotGrid {
    week: WeekRange,
    cells: [Row; SHIFT_COUNT],
    /// Slots dated outside the projected week
    pub outside: Vec<Slot>,
}

impl SlotGrid {
    /// Project `slots` onto `week`.
    ///
    /// A slot belongs to cell `(shift, day)` when its date is that day and its
    /// shift is that band. Several slots may share a cell (different rooms
    /// running the same shift).
    pub fn project(slots: &[Slot], week: &WeekRange) -> Self {
        let days = week.days();
        let mut cells: [Row; SHIFT_COUNT] = Default::default();

        for (shift, row) in Shift::all().iter().zip(cells.iter_mut()) {
            for (day, cell) in days.iter().zip(row.iter_mut()) {
                *cell = slots
                    .iter()
                    .filter(|s| s.date == *day && s.shift == *shift)
                    .cloned()
                    .collect();
            }
        }

        let outside: Vec<Slot> = slots
            .iter()
            .filter(|s| !week.contains(s.date))
            .cloned()
            .collect();
        if !outside.is_empty() {
            debug!(
                week = %week,
                count = outside.len(),
                "Slots outside the projected week were not placed"
            );
        }

        let grid = Self {
            week: *week,
            cells,
            outside,
        };
        invariants::assert_grid_invariants(&grid, slots);
        grid
    }

    pub fn week(&self) -> &WeekRange {
        &self.week
    }

    /// Slots in one cell; empty cells render as a placeholder
    pub fn cell(&self, shift: Shift, day: usize) -> &[Slot] {
        self.cells[shift.index()]
            .get(day)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Rows in shift order, each with its seven day cells
    pub fn rows(&self) -> impl Iterator<Item = (Shift, &Row)> + '_ {
        Shift::all().iter().copied().zip(self.cells.iter())
    }

    /// Number of placed slots
    pub fn len(&self) -> usize {
        self.cells.iter().flatten().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn find(&self, slot_id: i64) -> Option<&Slot> {
        self.cells
            .iter()
            .flatten()
            .flatten()
            .find(|s| s.id == slot_id)
    }
}
