use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SkillLinkError};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub render: RenderConfig,
    #[serde(default)]
    pub facets: FacetsConfig,
    #[serde(default)]
    pub session: SessionConfig,
}

impl Config {
    /// Layered load: defaults, then the global file (or the explicit one), then env.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        let mut config = Self::default();

        let explicit = explicit_path
            .map(PathBuf::from)
            .or_else(|| std::env::var("SKILLLINK_CONFIG").ok().map(PathBuf::from));

        if let Some(path) = explicit {
            // Only the global file is optional; a named one has to exist.
            let patch = Self::load_patch(&path)?.ok_or_else(|| {
                SkillLinkError::Config(format!("config file not found: {}", path.display()))
            })?;
            config.merge_patch(patch);
        } else if let Some(global) = Self::load_global()? {
            config.merge_patch(global);
        }

        config.apply_env_overrides()?;

        Ok(config)
    }

    /// Path of the global config file.
    pub fn global_path() -> Result<PathBuf> {
        Ok(dirs::config_dir()
            .ok_or_else(|| SkillLinkError::MissingConfig("config directory not found".to_string()))?
            .join("skilllink/config.toml"))
    }

    fn load_global() -> Result<Option<ConfigPatch>> {
        Self::load_patch(&Self::global_path()?)
    }

    fn load_patch(path: &Path) -> Result<Option<ConfigPatch>> {
        if !path.exists() {
            return Ok(None);
        }

        let raw = std::fs::read_to_string(path).map_err(|err| {
            SkillLinkError::Config(format!("read config {}: {err}", path.display()))
        })?;
        let patch = toml::from_str(&raw).map_err(|err| {
            SkillLinkError::Config(format!("parse config {}: {err}", path.display()))
        })?;
        Ok(Some(patch))
    }

    fn merge_patch(&mut self, patch: ConfigPatch) {
        if let Some(patch) = patch.api {
            self.api.merge(patch);
        }
        if let Some(patch) = patch.search {
            self.search.merge(patch);
        }
        if let Some(patch) = patch.render {
            self.render.merge(patch);
        }
        if let Some(patch) = patch.facets {
            self.facets.merge(patch);
        }
        if let Some(patch) = patch.session {
            self.session.merge(patch);
        }
    }

    fn apply_env_overrides(&mut self) -> Result<()> {
        if let Some(value) = env_string("SKILLLINK_API_BASE_URL") {
            self.api.base_url = value;
        }
        if let Some(value) = env_u64("SKILLLINK_API_TIMEOUT_SECS")? {
            self.api.timeout_secs = value;
        }

        if let Some(value) = env_u64("SKILLLINK_SEARCH_DEBOUNCE_MS")? {
            self.search.debounce_ms = value;
        }
        if let Some(value) = env_bool("SKILLLINK_SEARCH_EXCLUDE_SELF") {
            self.search.exclude_self = value;
        }

        if let Some(value) = env_string("SKILLLINK_RENDER_PLACEHOLDER_AVATAR") {
            self.render.placeholder_avatar = value;
        }
        if let Some(value) = env_string("SKILLLINK_RENDER_PROFILE_PAGE") {
            self.render.profile_page = value;
        }

        if let Some(values) = env_list("SKILLLINK_FACETS_YEARS") {
            self.facets.years = values;
        }

        if let Some(value) = env_string("SKILLLINK_SESSION_PATH") {
            self.session.path = Some(PathBuf::from(value));
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default)]
    pub base_url: String,
    #[serde(default)]
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000".to_string(),
            timeout_secs: 10,
        }
    }
}

impl ApiConfig {
    fn merge(&mut self, patch: ApiPatch) {
        if let Some(value) = patch.base_url {
            self.base_url = value;
        }
        if let Some(value) = patch.timeout_secs {
            self.timeout_secs = value;
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    #[serde(default)]
    pub debounce_ms: u64,
    #[serde(default)]
    pub exclude_self: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 300,
            exclude_self: true,
        }
    }
}

impl SearchConfig {
    fn merge(&mut self, patch: SearchPatch) {
        if let Some(value) = patch.debounce_ms {
            self.debounce_ms = value;
        }
        if let Some(value) = patch.exclude_self {
            self.exclude_self = value;
        }
    }

    #[must_use]
    pub const fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    #[serde(default)]
    pub placeholder_avatar: String,
    #[serde(default)]
    pub profile_page: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            placeholder_avatar: "placeholder-avatar.png".to_string(),
            profile_page: "user-profile.html".to_string(),
        }
    }
}

impl RenderConfig {
    fn merge(&mut self, patch: RenderPatch) {
        if let Some(value) = patch.placeholder_avatar {
            self.placeholder_avatar = value;
        }
        if let Some(value) = patch.profile_page {
            self.profile_page = value;
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FacetsConfig {
    /// Year options are static; institutes and branches come from the backend.
    #[serde(default)]
    pub years: Vec<String>,
}

impl Default for FacetsConfig {
    fn default() -> Self {
        Self {
            years: ["1", "2", "3", "4"].iter().map(ToString::to_string).collect(),
        }
    }
}

impl FacetsConfig {
    fn merge(&mut self, patch: FacetsPatch) {
        if let Some(values) = patch.years {
            self.years = values;
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionConfig {
    #[serde(default)]
    pub path: Option<PathBuf>,
}

impl SessionConfig {
    fn merge(&mut self, patch: SessionPatch) {
        if let Some(value) = patch.path {
            self.path = Some(value);
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
struct ConfigPatch {
    pub api: Option<ApiPatch>,
    pub search: Option<SearchPatch>,
    pub render: Option<RenderPatch>,
    pub facets: Option<FacetsPatch>,
    pub session: Option<SessionPatch>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct ApiPatch {
    pub base_url: Option<String>,
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct SearchPatch {
    pub debounce_ms: Option<u64>,
    pub exclude_self: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct RenderPatch {
    pub placeholder_avatar: Option<String>,
    pub profile_page: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct FacetsPatch {
    pub years: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct SessionPatch {
    pub path: Option<PathBuf>,
}

fn env_string(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

fn env_bool(key: &str) -> Option<bool> {
    std::env::var(key)
        .ok()
        .map(|value| matches!(value.to_lowercase().as_str(), "1" | "true" | "yes" | "on"))
}

fn env_u64(key: &str) -> Result<Option<u64>> {
    match std::env::var(key) {
        Ok(value) => value
            .parse::<u64>()
            .map(Some)
            .map_err(|err| SkillLinkError::Config(format!("invalid {key} value {value}: {err}"))),
        Err(_) => Ok(None),
    }
}

fn env_list(key: &str) -> Option<Vec<String>> {
    std::env::var(key).ok().map(|value| {
        value
            .split(',')
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .map(ToString::to_string)
            .collect()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_browser_behavior() {
        let config = Config::default();
        assert_eq!(config.search.debounce(), Duration::from_millis(300));
        assert!(config.search.exclude_self);
        assert_eq!(config.render.placeholder_avatar, "placeholder-avatar.png");
        assert_eq!(config.render.profile_page, "user-profile.html");
        assert_eq!(config.facets.years, vec!["1", "2", "3", "4"]);
        assert!(config.session.path.is_none());
    }

    #[test]
    fn test_patch_merges_only_present_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
[api]
base_url = "http://directory.local:8080"

[search]
debounce_ms = 150

[facets]
years = ["1", "2"]
"#,
        )
        .unwrap();

        let mut config = Config::default();
        let patch = Config::load_patch(&path).unwrap().unwrap();
        config.merge_patch(patch);

        assert_eq!(config.api.base_url, "http://directory.local:8080");
        assert_eq!(config.api.timeout_secs, 10);
        assert_eq!(config.search.debounce_ms, 150);
        assert!(config.search.exclude_self);
        assert_eq!(config.facets.years, vec!["1", "2"]);
        assert_eq!(config.render.placeholder_avatar, "placeholder-avatar.png");
    }

    #[test]
    fn test_missing_file_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let patch = Config::load_patch(&dir.path().join("absent.toml")).unwrap();
        assert!(patch.is_none());
    }

    #[test]
    fn test_explicit_path_must_exist() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("typo.toml");
        let err = Config::load(Some(&missing)).unwrap_err();
        assert!(matches!(err, SkillLinkError::Config(ref msg) if msg.contains("typo.toml")));
        assert_eq!(err.code(), "config_error");
    }

    #[test]
    fn test_invalid_toml_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[api\nbase_url = ").unwrap();
        let err = Config::load_patch(&path).unwrap_err();
        assert!(matches!(err, SkillLinkError::Config(ref msg) if msg.contains("config.toml")));
    }
}
