//! Progress state persistence with file locking.
//!
//! The tracker itself is pure in-memory state; this module persists its
//! snapshot between sessions, with locking and atomic replacement so a
//! crashed write can never corrupt existing progress.

use crate::Result;
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use tempfile::NamedTempFile;

/// The user's persisted progression state across sessions.
///
/// Produced by `ProgramProgressTracker::snapshot` and applied with
/// `ProgramProgressTracker::restore`. Only deltas against the immutable
/// catalog are stored: enrollments, per-ritual rep counts, and which
/// rituals were completed.
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct UserProgressState {
    #[serde(default)]
    pub enrollments: Vec<crate::UserProgram>,
    /// ritual id -> exercise id -> completed reps
    #[serde(default)]
    pub completed_reps: HashMap<String, HashMap<String, u32>>,
    #[serde(default)]
    pub completed_rituals: Vec<String>,
    #[serde(default)]
    pub current_program_id: Option<String>,
}

impl UserProgressState {
    /// Load progress state from a file with shared locking
    ///
    /// Returns default state if the file doesn't exist.
    /// If the file is corrupted, logs a warning and returns default state.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::info!("No state file found, using default state");
            return Ok(Self::default());
        }

        let file = match File::open(path) {
            Ok(f) => f,
            Err(e) => {
                tracing::warn!(
                    "Unable to open state file {:?}: {}. Using defaults.",
                    path,
                    e
                );
                return Ok(Self::default());
            }
        };

        // Acquire shared lock for reading
        if let Err(e) = file.lock_shared() {
            tracing::warn!(
                "Unable to lock state file {:?}: {}. Using defaults.",
                path,
                e
            );
            return Ok(Self::default());
        }

        let mut contents = String::new();
        let mut reader = std::io::BufReader::new(&file);
        if let Err(e) = reader.read_to_string(&mut contents) {
            let _ = file.unlock();
            tracing::warn!(
                "Failed to read state file {:?}: {}. Using defaults.",
                path,
                e
            );
            return Ok(Self::default());
        }

        file.unlock()?;

        match serde_json::from_str::<UserProgressState>(&contents) {
            Ok(state) => {
                tracing::debug!("Loaded progress state from {:?}", path);
                Ok(state)
            }
            Err(e) => {
                tracing::warn!(
                    "Failed to parse state file {:?}: {}. Using defaults.",
                    path,
                    e
                );
                Ok(Self::default())
            }
        }
    }

    /// Save progress state to a file with exclusive locking
    ///
    /// Atomically writes state by:
    /// 1. Writing to a temp file
    /// 2. Syncing to disk
    /// 3. Renaming over the original
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        // Create unique temp file in the same directory for atomic rename
        let temp = NamedTempFile::new_in(path.parent().ok_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::Other, "state path missing parent")
        })?)?;

        // Serialize concurrent writers on the temp file lock
        temp.as_file().lock_exclusive()?;

        {
            let mut writer = std::io::BufWriter::new(temp.as_file());
            let contents = serde_json::to_string(self)?;
            writer.write_all(contents.as_bytes())?;
            writer.flush()?;
        }

        temp.as_file().sync_all()?;
        temp.as_file().unlock()?;

        // Atomically replace the old state file
        temp.persist(path).map_err(|e| crate::Error::Io(e.error))?;

        tracing::debug!("Saved progress state to {:?}", path);
        Ok(())
    }

    /// Load state, modify it, and save it back atomically
    pub fn update<F>(path: &Path, f: F) -> Result<Self>
    where
        F: FnOnce(&mut UserProgressState) -> Result<()>,
    {
        let mut state = Self::load(path)?;
        f(&mut state)?;
        state.save(path)?;
        Ok(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::UserProgram;
    use chrono::Utc;

    #[test]
    fn test_save_and_load_roundtrip() {
        let temp_dir = tempfile::tempdir().unwrap();
        let state_path = temp_dir.path().join("state.json");

        let mut state = UserProgressState::default();
        state
            .enrollments
            .push(UserProgram::new("crocodile-tide", Utc::now()));
        state
            .completed_reps
            .entry("crocodile-d1".into())
            .or_default()
            .insert("squats".into(), 80);
        state.completed_rituals.push("crocodile-d1".into());
        state.current_program_id = Some("crocodile-tide".into());

        state.save(&state_path).unwrap();
        let loaded = UserProgressState::load(&state_path).unwrap();

        assert_eq!(loaded.enrollments.len(), 1);
        assert_eq!(loaded.enrollments[0].program_id, "crocodile-tide");
        assert_eq!(
            loaded.completed_reps["crocodile-d1"].get("squats"),
            Some(&80)
        );
        assert_eq!(loaded.completed_rituals, vec!["crocodile-d1".to_string()]);
        assert_eq!(loaded.current_program_id, Some("crocodile-tide".into()));
    }

    #[test]
    fn test_load_nonexistent_returns_default() {
        let temp_dir = tempfile::tempdir().unwrap();
        let state_path = temp_dir.path().join("nonexistent.json");

        let state = UserProgressState::load(&state_path).unwrap();
        assert!(state.enrollments.is_empty());
        assert!(state.current_program_id.is_none());
    }

    #[test]
    fn test_corrupted_state_returns_default() {
        let temp_dir = tempfile::tempdir().unwrap();
        let state_path = temp_dir.path().join("corrupted.json");

        std::fs::write(&state_path, "{ invalid json }").unwrap();

        let state = UserProgressState::load(&state_path).unwrap();
        assert!(state.enrollments.is_empty());
        assert!(state.completed_reps.is_empty());
    }

    #[test]
    fn test_update_pattern() {
        let temp_dir = tempfile::tempdir().unwrap();
        let state_path = temp_dir.path().join("state.json");

        UserProgressState::default().save(&state_path).unwrap();

        UserProgressState::update(&state_path, |state| {
            state.current_program_id = Some("jaguar-breath".into());
            Ok(())
        })
        .unwrap();

        let loaded = UserProgressState::load(&state_path).unwrap();
        assert_eq!(loaded.current_program_id, Some("jaguar-breath".into()));
    }

    #[test]
    fn test_atomic_save_leaves_no_temp_files() {
        let temp_dir = tempfile::tempdir().unwrap();
        let state_path = temp_dir.path().join("state.json");

        UserProgressState::default().save(&state_path).unwrap();

        assert!(state_path.exists());
        let extras: Vec<_> = std::fs::read_dir(temp_dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name() != "state.json")
            .collect();
        assert!(
            extras.is_empty(),
            "Expected only state.json, found extras: {:?}",
            extras
        );
    }
}
