use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Environment variable that takes precedence over the stored API key.
pub const API_KEY_ENV: &str = "OPENWEATHER_API_KEY";

/// Environment variable that takes precedence over the stored endpoint.
pub const ENDPOINT_ENV: &str = "SKYCAST_ENDPOINT";

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// api_key = "..."
/// default_location = "London"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Config {
    /// OpenWeather credential.
    pub api_key: Option<String>,

    /// Location used when none is given on the command line.
    pub default_location: Option<String>,

    /// Forecast endpoint override, mostly useful for proxies and tests.
    pub endpoint: Option<String>,
}

impl Config {
    /// Load config from disk and fold in environment overrides.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        let cfg = Self::load_from(&path)?;
        Ok(cfg
            .with_env_api_key(std::env::var(API_KEY_ENV).ok())
            .with_env_endpoint(std::env::var(ENDPOINT_ENV).ok()))
    }

    /// Load config from `path`, or return an empty default if it doesn't exist yet.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to the platform config directory.
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_file_path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    /// Save config to `path`, creating parent directories as needed.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "skycast", "skycast")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// A non-empty environment key replaces whatever the file holds.
    pub fn with_env_api_key(mut self, env_key: Option<String>) -> Self {
        if let Some(key) = env_key.filter(|k| !k.trim().is_empty()) {
            self.api_key = Some(key);
        }
        self
    }

    pub fn with_env_endpoint(mut self, env_endpoint: Option<String>) -> Self {
        if let Some(endpoint) = env_endpoint.filter(|e| !e.trim().is_empty()) {
            self.endpoint = Some(endpoint);
        }
        self
    }

    /// Store a new key. Blank input keeps the current one.
    pub fn set_api_key(&mut self, api_key: String) {
        let api_key = api_key.trim();
        if !api_key.is_empty() {
            self.api_key = Some(api_key.to_string());
        }
    }

    pub fn set_default_location(&mut self, location: String) {
        self.default_location = Some(location.trim().to_string()).filter(|l| !l.is_empty());
    }

    /// The explicit location if given, else the configured default.
    pub fn location_or_default(&self, explicit: Option<String>) -> Result<String> {
        explicit
            .filter(|l| !l.trim().is_empty())
            .or_else(|| self.default_location.clone())
            .ok_or_else(|| {
                anyhow!(
                    "No location given and no default location configured.\n\
                     Hint: pass a location, e.g. `skycast show London`, or run `skycast configure`."
                )
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_loads_default() {
        let dir = tempfile::tempdir().expect("tempdir");
        let cfg = Config::load_from(&dir.path().join("absent.toml")).expect("load");
        assert_eq!(cfg, Config::default());
        assert!(cfg.api_key.is_none());
    }

    #[test]
    fn save_then_load_preserves_fields() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested").join("config.toml");

        let mut cfg = Config::default();
        cfg.set_api_key("OPEN_KEY".into());
        cfg.set_default_location("Berlin".into());
        cfg.save_to(&path).expect("save");

        let loaded = Config::load_from(&path).expect("load");
        assert_eq!(loaded, cfg);
        assert_eq!(loaded.api_key.as_deref(), Some("OPEN_KEY"));
    }

    #[test]
    fn malformed_file_reports_path() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        fs::write(&path, "api_key = [").expect("write");

        let err = Config::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }

    #[test]
    fn env_key_takes_precedence() {
        let mut cfg = Config::default();
        cfg.set_api_key("FILE_KEY".into());

        let cfg = cfg.with_env_api_key(Some("ENV_KEY".into()));
        assert_eq!(cfg.api_key.as_deref(), Some("ENV_KEY"));
    }

    #[test]
    fn blank_env_key_is_ignored() {
        let mut cfg = Config::default();
        cfg.set_api_key("FILE_KEY".into());

        let cfg = cfg.with_env_api_key(Some("  ".into())).with_env_api_key(None);
        assert_eq!(cfg.api_key.as_deref(), Some("FILE_KEY"));
    }

    #[test]
    fn env_endpoint_overrides_file() {
        let cfg = Config { endpoint: Some("http://file".into()), ..Config::default() };
        assert_eq!(
            cfg.clone().with_env_endpoint(Some("http://env".into())).endpoint.as_deref(),
            Some("http://env")
        );
        assert_eq!(cfg.with_env_endpoint(None).endpoint.as_deref(), Some("http://file"));
    }

    #[test]
    fn blank_key_keeps_stored_key() {
        let mut cfg = Config::default();
        cfg.set_api_key("   ".into());
        assert!(cfg.api_key.is_none());

        cfg.set_api_key("OPEN_KEY".into());
        cfg.set_api_key("".into());
        assert_eq!(cfg.api_key.as_deref(), Some("OPEN_KEY"));

        cfg.set_api_key(" NEW_KEY ".into());
        assert_eq!(cfg.api_key.as_deref(), Some("NEW_KEY"));
    }

    #[test]
    fn blank_location_clears_default() {
        let mut cfg = Config::default();
        cfg.set_default_location("Oslo".into());
        cfg.set_default_location("".into());
        assert!(cfg.default_location.is_none());
    }

    #[test]
    fn location_falls_back_to_default() {
        let mut cfg = Config::default();
        assert!(cfg.location_or_default(None).is_err());

        cfg.set_default_location("Oslo".into());
        assert_eq!(cfg.location_or_default(None).expect("default"), "Oslo");
        assert_eq!(cfg.location_or_default(Some("Rome".into())).expect("explicit"), "Rome");
        assert_eq!(cfg.location_or_default(Some(" ".into())).expect("default"), "Oslo");
    }
}
