//! Persistence of the last known course-page timestamp.
//!
//! A single plain-text file holding exactly one fingerprint string,
//! overwritten on every successful comparison. Single writer, no schema.
//! The portal's alert count is deliberately not persisted: it resets to
//! its initial value on every process start.

use log::error;
use std::fs;
use std::path::PathBuf;

/// Loads and saves the last known timestamp fingerprint.
///
/// Both operations swallow I/O errors after logging them: a missing or
/// unreadable state file only means history is lost, and a failed save
/// must never abort the polling cycle.
#[derive(Debug, Clone)]
pub struct StateStore {
    path: PathBuf,
}

impl StateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the trimmed stored fingerprint, or `None` when the file is
    /// absent, unreadable or empty.
    pub fn load(&self) -> Option<String> {
        if !self.path.exists() {
            return None;
        }
        match fs::read_to_string(&self.path) {
            Ok(content) => {
                let trimmed = content.trim();
                if trimmed.is_empty() {
                    None
                } else {
                    Some(trimmed.to_owned())
                }
            }
            Err(e) => {
                error!("failed to read state file {}: {e}", self.path.display());
                None
            }
        }
    }

    /// Overwrites the state file with the new fingerprint. Failures are
    /// logged; in-memory state stays authoritative for this process.
    pub fn save(&self, fingerprint: &str) {
        if let Err(e) = fs::write(&self.path, fingerprint) {
            error!("failed to write state file {}: {e}", self.path.display());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_returns_none_when_file_absent() {
        let dir = tempfile::tempdir().unwrap();
        let store = StateStore::new(dir.path().join("missing.txt"));
        assert_eq!(store.load(), None);
    }

    #[test]
    fn save_then_load_round_trips_exactly() {
        let dir = tempfile::tempdir().unwrap();
        let store = StateStore::new(dir.path().join("state.txt"));
        store.save("2024-01-01 10:00:00");
        assert_eq!(store.load(), Some("2024-01-01 10:00:00".to_owned()));
    }

    #[test]
    fn load_trims_whitespace() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.txt");
        fs::write(&path, "  2024-01-01 10:00:00\n").unwrap();
        assert_eq!(
            StateStore::new(path).load(),
            Some("2024-01-01 10:00:00".to_owned())
        );
    }

    #[test]
    fn empty_file_counts_as_no_state() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.txt");
        fs::write(&path, "\n").unwrap();
        assert_eq!(StateStore::new(path).load(), None);
    }

    #[test]
    fn save_to_unwritable_path_does_not_panic() {
        let store = StateStore::new("/nonexistent-dir/state.txt");
        store.save("2024-01-01 10:00:00");
        assert_eq!(store.load(), None);
    }

    #[test]
    fn save_overwrites_previous_value() {
        let dir = tempfile::tempdir().unwrap();
        let store = StateStore::new(dir.path().join("state.txt"));
        store.save("2024-01-01 10:00:00");
        store.save("2024-01-02 11:30:00");
        assert_eq!(store.load(), Some("2024-01-02 11:30:00".to_owned()));
    }
}
