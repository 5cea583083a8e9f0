//! Program progression tracking.
//!
//! [`ProgramProgressTracker`] owns the session's mutable view of the ritual
//! catalog plus the user's enrollments, and implements the operations that
//! advance a user through a program: selecting/enrolling, looking up the
//! current day's ritual, accumulating exercise reps, and completing a day.
//!
//! The tracker is pure in-memory state: it never touches the filesystem.
//! The session boundary (the CLI) moves state in and out via
//! [`ProgramProgressTracker::restore`] and [`ProgramProgressTracker::snapshot`].

use crate::store::UserProgressState;
use crate::{Catalog, DailyRitual, Error, Program, Result, RitualStatus, UserProgram};
use chrono::{DateTime, Utc};
use std::collections::HashMap;

/// Summary of a completed day, returned by [`ProgramProgressTracker::complete_day`]
///
/// The caller uses this to journal the completion and update the profile
/// counter; the tracker itself only mutates enrollment state.
#[derive(Clone, Debug)]
pub struct DayCompletion {
    pub program_id: String,
    /// The day that was just finished (1-based)
    pub day: u32,
    /// Completion fraction of the finished ritual, 0.0 if none was authored
    pub fraction: f64,
    /// True when this completion finished the whole program
    pub program_completed: bool,
}

/// Tracks a single user's progression through the program catalog.
///
/// Owns mutable ritual copies seeded from the catalog, the enrollment
/// records, and the current program selection. Intended to be owned by one
/// logical session; no interior locking.
pub struct ProgramProgressTracker {
    programs: HashMap<String, Program>,
    rituals: Vec<DailyRitual>,
    user_programs: Vec<UserProgram>,
    current_program: Option<String>,
}

impl ProgramProgressTracker {
    /// Seed a tracker from a catalog snapshot
    pub fn new(catalog: &Catalog) -> Self {
        Self {
            programs: catalog.programs.clone(),
            rituals: catalog.rituals.clone(),
            user_programs: Vec::new(),
            current_program: None,
        }
    }

    /// Programs in the catalog, sorted by id for stable display
    pub fn programs(&self) -> Vec<&Program> {
        let mut programs: Vec<_> = self.programs.values().collect();
        programs.sort_by(|a, b| a.id.cmp(&b.id));
        programs
    }

    /// Look up a program by id
    pub fn program(&self, program_id: &str) -> Option<&Program> {
        self.programs.get(program_id)
    }

    /// All enrollment records
    pub fn user_programs(&self) -> &[UserProgram] {
        &self.user_programs
    }

    /// The currently selected program, if any
    pub fn current_program(&self) -> Option<&Program> {
        self.current_program
            .as_deref()
            .and_then(|id| self.programs.get(id))
    }

    /// Select a program, enrolling the user if needed.
    ///
    /// Re-selecting an already-enrolled program resumes it: the existing
    /// enrollment (start date, current day) is left untouched. Calling this
    /// twice never produces two enrollment records.
    pub fn select_program(&mut self, program_id: &str, now: DateTime<Utc>) -> Result<()> {
        if !self.programs.contains_key(program_id) {
            return Err(Error::NotFound(format!("program '{}'", program_id)));
        }

        self.current_program = Some(program_id.to_string());

        let already_enrolled = self
            .user_programs
            .iter()
            .any(|up| up.program_id == program_id);

        if already_enrolled {
            tracing::debug!("Resuming existing enrollment in {}", program_id);
        } else {
            self.user_programs.push(UserProgram::new(program_id, now));
            tracing::info!("Enrolled in program {}", program_id);
        }

        Ok(())
    }

    /// Enrollment record for the currently selected program
    fn current_enrollment(&self) -> Option<&UserProgram> {
        let program_id = self.current_program.as_deref()?;
        self.user_programs
            .iter()
            .find(|up| up.program_id == program_id)
    }

    /// Index of the ritual for the current program and day, if authored
    fn current_ritual_index(&self) -> Option<usize> {
        let enrollment = self.current_enrollment()?;
        self.rituals
            .iter()
            .position(|r| r.program_id == enrollment.program_id && r.day == enrollment.current_day)
    }

    /// Where the user stands today.
    ///
    /// `ProgramComplete` covers every "no ritual for the current day" case:
    /// a finished enrollment, or a day past the last authored ritual.
    pub fn current_ritual(&self) -> RitualStatus<'_> {
        let Some(enrollment) = self.current_enrollment() else {
            return RitualStatus::NoProgram;
        };

        if enrollment.completed {
            return RitualStatus::ProgramComplete;
        }

        match self.current_ritual_index() {
            Some(idx) => RitualStatus::InProgress(&self.rituals[idx]),
            None => RitualStatus::ProgramComplete,
        }
    }

    /// Accumulate reps against an exercise in today's ritual.
    ///
    /// Saturating at the exercise target: reps never decrease and never
    /// exceed the target. Silently ignores stale ids and missing rituals
    /// so a lagging UI cannot crash the session.
    pub fn record_exercise_reps(&mut self, exercise_id: &str, reps: u32) {
        let Some(idx) = self.current_ritual_index() else {
            tracing::debug!("No current ritual; ignoring reps for '{}'", exercise_id);
            return;
        };

        let ritual = &mut self.rituals[idx];
        match ritual.exercises.iter_mut().find(|e| e.id == exercise_id) {
            Some(exercise) => {
                exercise.add_reps(reps);
                tracing::debug!(
                    "Exercise {}: {}/{} reps",
                    exercise_id,
                    exercise.completed_reps,
                    exercise.target_reps
                );
            }
            None => {
                tracing::debug!(
                    "Exercise '{}' not in ritual '{}'; ignoring",
                    exercise_id,
                    ritual.id
                );
            }
        }
    }

    /// Complete the current day and advance the enrollment.
    ///
    /// Marks the finished ritual completed, then advances `current_day`.
    /// The advancement that pushes past the program duration flips
    /// `completed` and leaves `current_day` unclamped at `duration + 1`.
    /// Returns `None` (no-op) when there is no current program, no
    /// enrollment, or the enrollment already finished.
    pub fn complete_day(&mut self) -> Option<DayCompletion> {
        let program_id = self.current_program.clone()?;
        let duration = self.programs.get(&program_id)?.duration;

        let fraction = match self.current_ritual_index() {
            Some(idx) => {
                let ritual = &mut self.rituals[idx];
                ritual.is_completed = true;
                ritual.completion_fraction()
            }
            None => 0.0,
        };

        let enrollment = self
            .user_programs
            .iter_mut()
            .find(|up| up.program_id == program_id)?;

        if enrollment.completed {
            tracing::debug!("Program {} already completed; ignoring", program_id);
            return None;
        }

        let day = enrollment.current_day;
        let next_day = day + 1;
        enrollment.completed = next_day > duration;
        enrollment.current_day = next_day;

        tracing::info!(
            "Completed day {} of {} (program {}{})",
            day,
            duration,
            program_id,
            if enrollment.completed { ", finished" } else { "" }
        );

        Some(DayCompletion {
            program_id,
            day,
            fraction,
            program_completed: enrollment.completed,
        })
    }

    /// Export the session's mutable state for persistence
    pub fn snapshot(&self) -> UserProgressState {
        let mut state = UserProgressState {
            enrollments: self.user_programs.clone(),
            current_program_id: self.current_program.clone(),
            ..UserProgressState::default()
        };

        for ritual in &self.rituals {
            if ritual.is_completed {
                state.completed_rituals.push(ritual.id.clone());
            }
            let reps: HashMap<String, u32> = ritual
                .exercises
                .iter()
                .filter(|e| e.completed_reps > 0)
                .map(|e| (e.id.clone(), e.completed_reps))
                .collect();
            if !reps.is_empty() {
                state.completed_reps.insert(ritual.id.clone(), reps);
            }
        }

        state
    }

    /// Apply previously persisted state onto the catalog-seeded tracker.
    ///
    /// Restored rep counts are clamped to the current catalog targets, and
    /// selections/rituals that no longer exist in the catalog are dropped.
    pub fn restore(&mut self, state: &UserProgressState) {
        self.user_programs = state.enrollments.clone();

        self.current_program = state
            .current_program_id
            .as_ref()
            .filter(|id| self.programs.contains_key(*id))
            .cloned();

        for ritual in &mut self.rituals {
            if state.completed_rituals.contains(&ritual.id) {
                ritual.is_completed = true;
            }
            if let Some(reps) = state.completed_reps.get(&ritual.id) {
                for exercise in &mut ritual.exercises {
                    if let Some(&count) = reps.get(&exercise.id) {
                        exercise.completed_reps = count.min(exercise.target_reps);
                    }
                }
            }
        }
    }
}
