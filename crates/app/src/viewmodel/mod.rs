//! View models for the scheduler, attendance and class pages

pub mod attendance;
pub mod classes;
pub mod scheduler;

#[cfg(test)]
mod fake;

pub use attendance::{reconcile, AttendanceSheet, AttendanceSummary, Reconciled};
pub use classes::ClassListViewModel;
pub use scheduler::SchedulerViewModel;
