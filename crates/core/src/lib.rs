//! Sonatina Core Library
//!
//! Scheduling models, week arithmetic, slot grid projection and list
//! filtering for the piano school portals.

pub mod error;
pub mod filter;
pub mod grid;
pub mod invariants;
pub mod models;
pub mod week;

pub use error::{Error, Result};
pub use filter::{ListQuery, Listable, Paged, SortDirection, SortValue};
pub use grid::SlotGrid;
pub use models::*;
pub use week::{
    clamp_week_number, display_date, resolve_week_range, week_number_of, wire_date, WeekRange,
};
