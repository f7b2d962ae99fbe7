//! Sonatina App Library
//!
//! Configuration, shared state and the view models behind the scheduler,
//! attendance and class pages. The `sonatina` binary drives them from the
//! terminal; a UI shell links the same types.

pub mod config;
pub mod error;
pub mod state;
pub mod viewmodel;

pub use config::{AppConfig, PortalRole};
pub use error::{Error, Result};
pub use state::AppState;
