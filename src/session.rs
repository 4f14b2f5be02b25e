//! Local session storage.
//!
//! A small JSON object on disk; the logged-in user id lives under
//! [`USER_ID_KEY`] and is read back to exclude the viewer from searches.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::SessionConfig;
use crate::error::{Result, SkillLinkError};

pub const USER_ID_KEY: &str = "skillLinkUserID";

#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Configured path, or `<data_dir>/skilllink/session.json`.
    pub fn from_config(config: &SessionConfig) -> Result<Self> {
        if let Some(path) = &config.path {
            return Ok(Self::new(path));
        }
        let data_dir = dirs::data_dir()
            .ok_or_else(|| SkillLinkError::MissingConfig("data directory not found".to_string()))?;
        Ok(Self::new(data_dir.join("skilllink/session.json")))
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn logged_in_user_id(&self) -> Result<Option<String>> {
        Ok(self.read()?.remove(USER_ID_KEY))
    }

    pub fn record_login(&self, user_id: &str) -> Result<()> {
        let mut entries = self.read()?;
        entries.insert(USER_ID_KEY.to_string(), user_id.to_string());
        self.write(&entries)?;
        debug!(path = %self.path.display(), "session recorded");
        Ok(())
    }

    /// Forget the logged-in user. Returns whether one was recorded.
    pub fn clear(&self) -> Result<bool> {
        let mut entries = self.read()?;
        let removed = entries.remove(USER_ID_KEY).is_some();
        if removed {
            self.write(&entries)?;
        }
        Ok(removed)
    }

    fn read(&self) -> Result<BTreeMap<String, String>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let raw = std::fs::read_to_string(&self.path)?;
        if raw.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        Ok(serde_json::from_str(&raw)?)
    }

    fn write(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, serde_json::to_string_pretty(entries)?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip_and_clear() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path().join("nested/session.json"));

        assert_eq!(store.logged_in_user_id().unwrap(), None);
        store.record_login("3").unwrap();
        assert_eq!(store.logged_in_user_id().unwrap().as_deref(), Some("3"));

        let raw = std::fs::read_to_string(store.path()).unwrap();
        assert!(raw.contains("skillLinkUserID"));

        assert!(store.clear().unwrap());
        assert_eq!(store.logged_in_user_id().unwrap(), None);
        assert!(!store.clear().unwrap());
    }

    #[test]
    fn test_configured_path_wins() {
        let config = SessionConfig {
            path: Some(PathBuf::from("/tmp/skilllink-test/session.json")),
        };
        let store = SessionStore::from_config(&config).unwrap();
        assert_eq!(store.path(), Path::new("/tmp/skilllink-test/session.json"));
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, "{not json").unwrap();
        let err = SessionStore::new(&path).logged_in_user_id().unwrap_err();
        assert_eq!(err.code(), "json_error");
    }
}
