use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::repository::Category;

// =============================================================================
// Time-related constants
// =============================================================================

/// Default interval between full repository scans in milliseconds (30 minutes)
pub const DEFAULT_SCAN_INTERVAL_MS: u64 = 30 * 60 * 1000;

/// Timeout for a single fetch against the source host in milliseconds (30 seconds)
pub const FETCH_TIMEOUT_MS: u64 = 30_000;

/// Upper bound for one repository's update/validate pass in milliseconds (2 minutes)
pub const REPOSITORY_TIMEOUT_MS: u64 = 120_000;

/// Upper bound for one task execution in milliseconds (10 minutes)
pub const TASK_TIMEOUT_MS: u64 = 600_000;

/// Delay between starting each repository pass to avoid rate limiting (10ms)
pub const FETCH_STAGGER_DELAY_MS: u64 = 10;

/// Number of version pairs kept by the comparison cache
pub const VERSION_CACHE_CAPACITY: usize = 1024;

/// Full name of the engine's own repository
pub const SELF_REPOSITORY: &str = "hacs/integration";

/// Engine configuration structure
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    /// Token used to authenticate against the source host
    pub token: Option<String>,
    /// Configuration directory of the host application
    pub config_path: Option<PathBuf>,
    /// Version of the running host, checked against `hacs.json` requirements
    pub homeassistant_version: Option<String>,
    pub scan: ScanConfig,
    pub categories: CategoriesConfig,
}

impl Config {
    /// Read a configuration file, falling back to defaults when it does not exist
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Host configuration directory, defaulting to the current directory
    pub fn host_config_path(&self) -> PathBuf {
        self.config_path
            .clone()
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

/// Scan timing configuration
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct ScanConfig {
    /// Interval between runtime passes in milliseconds
    pub interval_ms: u64,
    /// Per-request timeout in milliseconds
    pub fetch_timeout_ms: u64,
    /// Per-repository pass timeout in milliseconds
    pub repository_timeout_ms: u64,
    /// Per-task timeout in milliseconds
    pub task_timeout_ms: u64,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            interval_ms: DEFAULT_SCAN_INTERVAL_MS,
            fetch_timeout_ms: FETCH_TIMEOUT_MS,
            repository_timeout_ms: REPOSITORY_TIMEOUT_MS,
            task_timeout_ms: TASK_TIMEOUT_MS,
        }
    }
}

/// Category-specific configuration
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct CategoriesConfig {
    pub integration: CategoryConfig,
    pub plugin: CategoryConfig,
    pub theme: CategoryConfig,
    #[serde(rename = "pythonScript")]
    pub python_script: CategoryConfig,
    pub appdaemon: CategoryConfig,
}

impl CategoriesConfig {
    pub fn is_enabled(&self, category: Category) -> bool {
        match category {
            Category::Integration => self.integration.enabled,
            Category::Plugin => self.plugin.enabled,
            Category::Theme => self.theme.enabled,
            Category::PythonScript => self.python_script.enabled,
            Category::AppDaemon => self.appdaemon.enabled,
        }
    }
}

/// Individual category configuration
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct CategoryConfig {
    pub enabled: bool,
}

impl Default for CategoryConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Returns the path to the data directory for hacs-lifecycle.
/// Uses $XDG_DATA_HOME/hacs-lifecycle if XDG_DATA_HOME is set,
/// otherwise falls back to ~/.local/share/hacs-lifecycle,
/// or ./hacs-lifecycle if neither is available.
pub fn data_dir() -> PathBuf {
    data_dir_with_env(std::env::var("XDG_DATA_HOME").ok(), dirs::home_dir())
}

/// Returns the path to the database file.
pub fn db_path() -> PathBuf {
    data_dir().join("repositories.db")
}

/// Returns the path to the default config file.
pub fn config_path() -> PathBuf {
    data_dir().join("config.json")
}

/// Returns the directory log files are written to.
pub fn log_dir() -> PathBuf {
    data_dir()
}

fn data_dir_with_env(xdg_data_home: Option<String>, home_dir: Option<PathBuf>) -> PathBuf {
    let data_dir = xdg_data_home
        .map(PathBuf::from)
        .or_else(|| home_dir.map(|home| home.join(".local/share")))
        .unwrap_or_else(|| PathBuf::from("."));

    data_dir.join("hacs-lifecycle")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn config_from_partial_object_uses_defaults_for_missing_fields() {
        let result = serde_json::from_value::<Config>(json!({
            "scan": {
                "intervalMs": 1000
            }
        }))
        .unwrap();

        assert_eq!(result.scan.interval_ms, 1000);
        assert_eq!(result.scan.fetch_timeout_ms, FETCH_TIMEOUT_MS);
        assert_eq!(result.categories, CategoriesConfig::default());
        assert_eq!(result.token, None);
    }

    #[test]
    fn config_from_full_object_parses_all_fields() {
        let result = serde_json::from_value::<Config>(json!({
            "token": "ghp_abc",
            "configPath": "/config",
            "homeassistantVersion": "2024.1.0",
            "scan": {
                "intervalMs": 5000,
                "fetchTimeoutMs": 100,
                "repositoryTimeoutMs": 200,
                "taskTimeoutMs": 300
            },
            "categories": {
                "integration": { "enabled": true },
                "plugin": { "enabled": false },
                "theme": { "enabled": false },
                "pythonScript": { "enabled": true },
                "appdaemon": { "enabled": false }
            }
        }))
        .unwrap();

        assert_eq!(
            result,
            Config {
                token: Some("ghp_abc".to_string()),
                config_path: Some(PathBuf::from("/config")),
                homeassistant_version: Some("2024.1.0".to_string()),
                scan: ScanConfig {
                    interval_ms: 5000,
                    fetch_timeout_ms: 100,
                    repository_timeout_ms: 200,
                    task_timeout_ms: 300,
                },
                categories: CategoriesConfig {
                    integration: CategoryConfig { enabled: true },
                    plugin: CategoryConfig { enabled: false },
                    theme: CategoryConfig { enabled: false },
                    python_script: CategoryConfig { enabled: true },
                    appdaemon: CategoryConfig { enabled: false },
                }
            }
        );
        assert!(!result.categories.is_enabled(Category::Plugin));
        assert!(result.categories.is_enabled(Category::Integration));
    }

    #[test]
    fn load_returns_defaults_when_file_is_missing() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let config = Config::load(&temp_dir.path().join("missing.json")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn load_rejects_malformed_file() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();

        assert!(matches!(Config::load(&path), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn data_dir_with_env_uses_xdg_data_home_when_set() {
        let path = data_dir_with_env(
            Some("/tmp/test-data".to_string()),
            Some(PathBuf::from("/home/user")),
        );

        assert_eq!(path, PathBuf::from("/tmp/test-data/hacs-lifecycle"));
    }

    #[test]
    fn data_dir_with_env_falls_back_to_home_local_share() {
        let path = data_dir_with_env(None, Some(PathBuf::from("/home/user")));

        assert_eq!(path, PathBuf::from("/home/user/.local/share/hacs-lifecycle"));
    }

    #[test]
    fn data_dir_with_env_falls_back_to_current_dir_when_no_dirs_available() {
        let path = data_dir_with_env(None, None);
        assert_eq!(path, PathBuf::from("./hacs-lifecycle"));
    }
}
