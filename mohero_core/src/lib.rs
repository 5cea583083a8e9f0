#![forbid(unsafe_code)]

//! Core domain model and business logic for the Mohero program system.
//!
//! This crate provides:
//! - Domain types (programs, rituals, exercises, enrollments, profile)
//! - Catalog management
//! - Program progression tracking
//! - Persistence (progress state, profile, completed-day journal, CSV)

pub mod types;
pub mod error;
pub mod catalog;
pub mod config;
pub mod logging;
pub mod tracker;
pub mod store;
pub mod profile;
pub mod journal;
pub mod csv_export;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use catalog::{build_default_catalog, get_default_catalog};
pub use config::Config;
pub use tracker::{DayCompletion, ProgramProgressTracker};
pub use store::UserProgressState;
pub use journal::{CompletedDay, JsonlJournal, RitualSink};
