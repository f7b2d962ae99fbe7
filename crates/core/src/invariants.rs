//! Developer guardrails and invariants
//!
//! Debug assertions for detecting impossible states during development.
//! These checks are compiled out in release builds.

use chrono::Duration;

use crate::grid::SlotGrid;
use crate::models::Slot;
use crate::week::WeekRange;

/// Validate that a week range spans exactly seven days
pub fn assert_week_range_invariants(range: &WeekRange) {
    debug_assert!(
        range.end_date - range.start_date == Duration::days(6),
        "Week range {} does not span seven days",
        range
    );
}

/// Validate that a projection placed every slot once or set it aside
pub fn assert_grid_invariants(grid: &SlotGrid, input: &[Slot]) {
    debug_assert_eq!(
        grid.len() + grid.outside.len(),
        input.len(),
        "Grid for {} lost or duplicated slots",
        grid.week()
    );
}

/// Validate that a merged slot list lines up index-for-index with its source
pub fn assert_slots_aligned(before: &[Slot], after: &[Slot]) {
    debug_assert_eq!(
        before.len(),
        after.len(),
        "Merged slot list changed length"
    );

    debug_assert!(
        before.iter().zip(after).all(|(b, a)| b.id == a.id),
        "Merged slot list is not index-aligned with its source"
    );
}
