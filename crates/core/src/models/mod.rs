//! Data models for Sonatina

mod account;
mod attendance;
mod class;
mod criterion;
mod shift;
mod slot;

pub use account::*;
pub use attendance::*;
pub use class::*;
pub use criterion::*;
pub use shift::*;
pub use slot::*;
