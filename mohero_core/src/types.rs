//! Core domain types for the Mohero program system.
//!
//! This module defines the fundamental types used throughout the system:
//! - Programs, their phases and categories
//! - Exercises and daily rituals
//! - User enrollments and progression state
//! - The user profile and clans

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ============================================================================
// Clans and Profile
// ============================================================================

/// Thematic clan chosen once during onboarding.
///
/// Clans are cosmetic: they never influence program progression.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Clan {
    Onotka,
    Ekloa,
    Okwaho,
}

impl Clan {
    /// All selectable clans, in onboarding order
    pub fn all() -> [Clan; 3] {
        [Clan::Onotka, Clan::Ekloa, Clan::Okwaho]
    }

    /// Stable identifier used in storage and on the CLI
    pub fn id(&self) -> &'static str {
        match self {
            Clan::Onotka => "onotka",
            Clan::Ekloa => "ekloa",
            Clan::Okwaho => "okwaho",
        }
    }

    /// Display title
    pub fn title(&self) -> &'static str {
        match self {
            Clan::Onotka => "CLAN ONOTKA",
            Clan::Ekloa => "CLAN EKLOA",
            Clan::Okwaho => "CLAN OKWÁHO",
        }
    }

    /// Short pitch shown during onboarding
    pub fn description(&self) -> &'static str {
        match self {
            Clan::Onotka => "La force brute. La résistance mentale.",
            Clan::Ekloa => "La vitesse. L'explosivité.",
            Clan::Okwaho => "La fluidité. L'adaptabilité. L'équilibre.",
        }
    }

    /// Training objectives associated with the clan
    pub fn objectives(&self) -> &'static [&'static str] {
        match self {
            Clan::Onotka => &["puissance", "stabilité", "endurance physique"],
            Clan::Ekloa => &["explosivité", "coordination", "athlète"],
            Clan::Okwaho => &["mobilité", "posture", "agilité fonctionnelle"],
        }
    }

    /// Parse a clan identifier (case-insensitive)
    pub fn parse(s: &str) -> Option<Clan> {
        match s.to_lowercase().as_str() {
            "onotka" => Some(Clan::Onotka),
            "ekloa" => Some(Clan::Ekloa),
            "okwaho" => Some(Clan::Okwaho),
            _ => None,
        }
    }
}

/// User profile kept across sessions.
///
/// Progression through a specific program lives in [`UserProgram`]; the
/// profile only carries identity, clan membership and the lifetime
/// completed-day counter.
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct UserProfile {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub clan: Option<Clan>,
    #[serde(default)]
    pub total_days_completed: u32,
    #[serde(default)]
    pub current_program_id: Option<String>,
}

// ============================================================================
// Program Catalog Types
// ============================================================================

/// Program tier
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ProgramCategory {
    Discovery,
    Premium,
}

/// A named phase within a program (e.g., "Éveil (Jours 1-2)")
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProgramPhase {
    pub title: String,
    pub description: String,
}

/// An immutable program catalog entry
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Program {
    pub id: String,
    pub title: String,
    pub description: String,
    /// Program length in days (positive)
    pub duration: u32,
    pub category: ProgramCategory,
    pub focus: Vec<String>,
    pub benefits: Vec<String>,
    pub phases: Vec<ProgramPhase>,
}

/// One movement within a daily ritual.
///
/// `target_reps` is unit-agnostic: it may count repetitions or seconds
/// depending on the exercise (e.g., a plank hold).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Exercise {
    pub id: String,
    pub name: String,
    pub description: String,
    pub target_reps: u32,
    pub completed_reps: u32,
}

impl Exercise {
    /// Accumulate reps, saturating at the target.
    ///
    /// Monotonic: never decreases, never exceeds `target_reps`.
    pub fn add_reps(&mut self, reps: u32) {
        self.completed_reps = self.completed_reps.saturating_add(reps).min(self.target_reps);
    }

    /// Whether this exercise has reached its target
    pub fn is_done(&self) -> bool {
        self.completed_reps == self.target_reps
    }
}

/// The exercises assigned to a single day of a program.
///
/// At most one ritual exists per `(program_id, day)` pair; the catalog
/// validates this.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DailyRitual {
    pub id: String,
    pub program_id: String,
    /// 1-based day number within the program
    pub day: u32,
    pub quote: String,
    pub exercises: Vec<Exercise>,
    pub is_completed: bool,
}

impl DailyRitual {
    /// Fraction of the day's total target reps already completed.
    ///
    /// Defined as `0.0` when the ritual has no exercises.
    pub fn completion_fraction(&self) -> f64 {
        let target: u32 = self.exercises.iter().map(|e| e.target_reps).sum();
        if target == 0 {
            return 0.0;
        }
        let done: u32 = self.exercises.iter().map(|e| e.completed_reps).sum();
        f64::from(done) / f64::from(target)
    }

    /// A ritual is fully done iff every exercise has reached its target
    pub fn is_fully_done(&self) -> bool {
        !self.exercises.is_empty() && self.exercises.iter().all(Exercise::is_done)
    }
}

// ============================================================================
// Enrollment Types
// ============================================================================

/// A user's enrollment in a program.
///
/// `current_day` stays in `[1, duration]` while `completed` is false.
/// The final `complete_day` leaves `current_day` one past `duration`
/// (so the UI can show "day 8 of 7").
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UserProgram {
    pub program_id: String,
    pub start_date: DateTime<Utc>,
    pub current_day: u32,
    pub completed: bool,
}

impl UserProgram {
    /// Fresh enrollment starting at day 1
    pub fn new(program_id: impl Into<String>, start_date: DateTime<Utc>) -> Self {
        Self {
            program_id: program_id.into(),
            start_date,
            current_day: 1,
            completed: false,
        }
    }
}

/// Where the user stands for the currently selected program.
///
/// Callers must handle all three cases: `ProgramComplete` is a valid state
/// (the enrollment progressed past the last authored day), not an error.
#[derive(Clone, Debug)]
pub enum RitualStatus<'a> {
    /// No program selected, or no enrollment for the selected program
    NoProgram,
    /// The ritual for the enrollment's current day
    InProgress(&'a DailyRitual),
    /// No ritual remains for the current day
    ProgramComplete,
}

impl<'a> RitualStatus<'a> {
    /// The in-progress ritual, if any
    pub fn ritual(&self) -> Option<&'a DailyRitual> {
        match self {
            RitualStatus::InProgress(ritual) => Some(*ritual),
            _ => None,
        }
    }
}

// ============================================================================
// Catalog Type
// ============================================================================

/// The complete catalog of programs and their authored daily rituals
#[derive(Clone, Debug)]
pub struct Catalog {
    pub programs: HashMap<String, Program>,
    pub rituals: Vec<DailyRitual>,
}
