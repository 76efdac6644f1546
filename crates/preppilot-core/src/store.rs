//! Session slot holding the latest prep pack.
//!
//! Two implementations: [`SessionStore`] keeps the pack in memory for the
//! controller that owns it, [`FileStore`] keeps it under a fixed key in the
//! user cache directory so the last result can be reopened.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{LoadError, StoreError};
use crate::pack::PrepPack;

/// Fixed name of the slot.
pub const STORAGE_KEY: &str = "preppilot_result";

pub trait ResultStore {
    /// Replace whatever is stored with `pack`.
    fn save(&mut self, pack: &PrepPack) -> Result<(), StoreError>;

    /// The stored pack. `NotFound` and `Parse` both mean "send the user back
    /// to the input screen".
    fn load(&self) -> Result<PrepPack, LoadError>;

    fn clear(&mut self) -> Result<(), StoreError>;
}

#[derive(Debug, Default)]
pub struct SessionStore {
    slot: Option<PrepPack>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.slot.is_none()
    }

    /// Borrow the stored pack without cloning it.
    pub fn current(&self) -> Option<&PrepPack> {
        self.slot.as_ref()
    }
}

impl ResultStore for SessionStore {
    fn save(&mut self, pack: &PrepPack) -> Result<(), StoreError> {
        self.slot = Some(pack.clone());
        Ok(())
    }

    fn load(&self) -> Result<PrepPack, LoadError> {
        self.slot.clone().ok_or(LoadError::NotFound)
    }

    fn clear(&mut self) -> Result<(), StoreError> {
        self.slot = None;
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(dir: &Path) -> Self {
        Self {
            path: dir.join(format!("{}.json", STORAGE_KEY)),
        }
    }

    /// Store under `<cache_dir>/preppilot`, falling back to the temp dir.
    pub fn in_cache_dir() -> Self {
        let dir = dirs::cache_dir()
            .unwrap_or_else(std::env::temp_dir)
            .join("preppilot");
        Self::new(&dir)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ResultStore for FileStore {
    fn save(&mut self, pack: &PrepPack) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let json = pack.to_json()?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        tracing::debug!(path = %self.path.display(), "prep pack saved");
        Ok(())
    }

    fn load(&self) -> Result<PrepPack, LoadError> {
        let json = match fs::read_to_string(&self.path) {
            Ok(json) => json,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Err(LoadError::NotFound),
            Err(err) => return Err(err.into()),
        };
        PrepPack::from_json(&json)
    }

    fn clear(&mut self) -> Result<(), StoreError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pack::TechQuestion;

    fn sample_pack() -> PrepPack {
        PrepPack {
            role_summary: "X".to_string(),
            required_skills: vec!["A".to_string(), "B".to_string()],
            tech_questions: vec![TechQuestion {
                question: "Q1".to_string(),
                answer_outline: "O1".to_string(),
            }],
            hr_questions: vec!["H1".to_string()],
            resume_improvements: vec!["R1".to_string()],
            study_plan: vec!["Day1 plan".to_string()],
        }
    }

    #[test]
    fn test_session_store_round_trip() {
        let mut store = SessionStore::new();
        assert!(matches!(store.load(), Err(LoadError::NotFound)));

        store.save(&sample_pack()).unwrap();
        assert_eq!(store.load().unwrap(), sample_pack());

        store.clear().unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn test_session_store_last_write_wins() {
        let mut store = SessionStore::new();
        store.save(&sample_pack()).unwrap();
        let second = PrepPack { role_summary: "Y".to_string(), ..PrepPack::default() };
        store.save(&second).unwrap();
        assert_eq!(store.load().unwrap(), second);
    }

    #[test]
    fn test_file_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::new(dir.path());
        assert!(matches!(store.load(), Err(LoadError::NotFound)));

        store.save(&sample_pack()).unwrap();
        assert!(store.path().ends_with("preppilot_result.json"));
        assert_eq!(store.load().unwrap(), sample_pack());

        let empty = PrepPack::default();
        store.save(&empty).unwrap();
        assert_eq!(store.load().unwrap(), empty);
    }

    #[test]
    fn test_file_store_malformed_content() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());
        fs::write(store.path(), "{\"required_skills\": {}}").unwrap();
        assert!(matches!(store.load(), Err(LoadError::Parse(_))));
    }

    #[test]
    fn test_file_store_clear_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::new(dir.path());
        store.save(&sample_pack()).unwrap();
        store.clear().unwrap();
        store.clear().unwrap();
        assert!(matches!(store.load(), Err(LoadError::NotFound)));
    }
}
