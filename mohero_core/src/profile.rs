//! User profile persistence.
//!
//! The profile carries identity, the clan chosen during onboarding, and the
//! lifetime completed-day counter. A missing file reads as a fresh profile;
//! writes go through the same exclusive-lock temp-file rename discipline as
//! the progress state.

use crate::{Result, UserProfile};
use fs2::FileExt;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

impl UserProfile {
    /// Load the profile, defaulting when missing or unreadable
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!("No profile at {:?}, starting fresh", path);
            return Ok(Self::default());
        }

        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) => {
                tracing::warn!("Failed to read profile {:?}: {}. Starting fresh.", path, e);
                return Ok(Self::default());
            }
        };

        match serde_json::from_str::<UserProfile>(&contents) {
            Ok(profile) => Ok(profile),
            Err(e) => {
                tracing::warn!("Failed to parse profile {:?}: {}. Starting fresh.", path, e);
                Ok(Self::default())
            }
        }
    }

    /// Save the profile atomically
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let temp = NamedTempFile::new_in(path.parent().ok_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::Other, "profile path missing parent")
        })?)?;

        temp.as_file().lock_exclusive()?;

        {
            let mut writer = std::io::BufWriter::new(temp.as_file());
            // Pretty-printed: the profile is small and users may inspect it
            let contents = serde_json::to_string_pretty(self)?;
            writer.write_all(contents.as_bytes())?;
            writer.flush()?;
        }

        temp.as_file().sync_all()?;
        temp.as_file().unlock()?;
        temp.persist(path).map_err(|e| crate::Error::Io(e.error))?;

        tracing::debug!("Saved profile to {:?}", path);
        Ok(())
    }

    /// Load the profile, modify it, and save it back
    pub fn update<F>(path: &Path, f: F) -> Result<Self>
    where
        F: FnOnce(&mut UserProfile) -> Result<()>,
    {
        let mut profile = Self::load(path)?;
        f(&mut profile)?;
        profile.save(path)?;
        Ok(profile)
    }
}
