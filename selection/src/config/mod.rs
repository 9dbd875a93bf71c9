use chrono::Duration;
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;
use tracing::info;

use crate::types::error::{Result, SelectionError};

/// Global configuration instance
static CONFIG: OnceCell<RwLock<AppConfig>> = OnceCell::new();

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub settings: Settings,
}

/// User preferences consulted by the selection action bar
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Ask before deleting conversations
    #[serde(default)]
    pub confirm_delete: bool,

    /// Ask before archiving (or otherwise removing) conversations
    #[serde(default)]
    pub confirm_archive: bool,

    /// How long an undo record stays usable
    #[serde(default = "default_undo_window_secs")]
    pub undo_window_secs: u64,
}

fn default_undo_window_secs() -> u64 {
    10
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            confirm_delete: false,
            confirm_archive: false,
            undo_window_secs: default_undo_window_secs(),
        }
    }
}

impl Settings {
    pub fn undo_window(&self) -> Duration {
        Duration::seconds(self.undo_window_secs.min(u64::from(u32::MAX)) as i64)
    }
}

/// Get default config paths
pub fn default_config_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    // XDG config path
    if let Some(config_dir) = dirs::config_dir() {
        paths.push(config_dir.join("mail-selection").join("config.toml"));
    }

    // Home directory fallback
    if let Some(home_dir) = dirs::home_dir() {
        paths.push(
            home_dir
                .join(".config")
                .join("mail-selection")
                .join("config.toml"),
        );
    }

    paths
}

/// Parse a TOML configuration document
pub fn parse_config(content: &str) -> Result<AppConfig> {
    toml::from_str(content)
        .map_err(|e| SelectionError::Config(format!("Failed to parse config: {}", e)))
}

/// Initialize configuration from default paths
pub fn init_config() -> Result<()> {
    info!("Initializing configuration from default paths");

    for path in default_config_paths() {
        if path.exists() {
            info!("Found config at: {:?}", path);
            return init_config_from_path(&path);
        }
    }

    info!("No config file found, using defaults");
    set_config(AppConfig::default())
}

/// Initialize configuration from a specific path
pub fn init_config_from_path(path: &Path) -> Result<()> {
    set_config(load_config_from_path(path)?)
}

/// Read and parse a configuration file without touching the global config
pub fn load_config_from_path(path: &Path) -> Result<AppConfig> {
    info!("Loading configuration from: {:?}", path);

    let content = fs::read_to_string(path)
        .map_err(|e| SelectionError::Config(format!("Failed to read config: {}", e)))?;

    parse_config(&content)
}

/// Set the global configuration
fn set_config(config: AppConfig) -> Result<()> {
    match CONFIG.get() {
        Some(lock) => {
            let mut guard = lock
                .write()
                .map_err(|e| SelectionError::Config(format!("Failed to lock config: {}", e)))?;
            *guard = config;
        }
        None => {
            CONFIG.set(RwLock::new(config)).ok();
        }
    }
    Ok(())
}

/// Check if configuration is initialized
pub fn is_initialized() -> bool {
    CONFIG.get().is_some()
}

/// Get a copy of the global configuration
pub fn get_config() -> Result<AppConfig> {
    let lock = CONFIG
        .get()
        .ok_or_else(|| SelectionError::Config("Configuration not initialized".into()))?;
    let guard = lock
        .read()
        .map_err(|e| SelectionError::Config(format!("Failed to lock config: {}", e)))?;
    Ok(guard.clone())
}

/// Current user preferences, defaults when no configuration was loaded
pub fn settings() -> Settings {
    get_config().map(|c| c.settings).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_defaults() {
        let config = parse_config("").unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.settings.undo_window_secs, 10);
        assert!(!config.settings.confirm_delete);
    }

    #[test]
    fn test_parse_settings() {
        let config = parse_config(
            r#"
            [settings]
            confirm_delete = true
            undo_window_secs = 4
            "#,
        )
        .unwrap();

        assert!(config.settings.confirm_delete);
        assert!(!config.settings.confirm_archive);
        assert_eq!(config.settings.undo_window(), Duration::seconds(4));
    }

    #[test]
    fn test_parse_invalid() {
        let err = parse_config("[settings]\nconfirm_delete = \"yes\"").unwrap_err();
        assert!(matches!(err, SelectionError::Config(_)));
    }

    #[test]
    fn test_load_from_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[settings]\nconfirm_archive = true").unwrap();

        let config = load_config_from_path(file.path()).unwrap();
        assert!(config.settings.confirm_archive);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_config_from_path(&dir.path().join("missing.toml")).unwrap_err();
        assert!(matches!(err, SelectionError::Config(_)));
    }

    #[test]
    fn test_init_from_path_sets_global() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[settings]\nundo_window_secs = 7").unwrap();

        init_config_from_path(file.path()).unwrap();
        assert!(is_initialized());
        assert_eq!(settings().undo_window_secs, 7);
    }
}
