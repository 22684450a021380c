//! Application configuration
//!
//! Configuration is loaded from:
//! 1. Default values
//! 2. Config file (~/.config/bukumark/config.toml)
//! 3. Environment variables (BUKUMARK_* prefix)
//!
//! Environment variables take precedence over config file values.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::store::{default_workers, StoreOptions, MAX_BOOKMARKS};

/// Environment variable prefix
const ENV_PREFIX: &str = "BUKUMARK";

/// Application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Path of the buku database file
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,

    /// Browser command used to open bookmarks (system opener when unset)
    #[serde(default)]
    pub browser: Option<String>,

    /// Worker threads for loading the full bookmark list
    #[serde(default)]
    pub workers: Option<usize>,

    /// Log file (stderr when unset)
    #[serde(default)]
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            browser: None,
            workers: None,
            log_file: None,
        }
    }
}

impl Config {
    /// Load configuration from default location and environment
    ///
    /// Order of precedence (highest to lowest):
    /// 1. Environment variables (BUKUMARK_DB_PATH, BUKUMARK_BROWSER, ...)
    /// 2. Config file (~/.config/bukumark/config.toml or BUKUMARK_CONFIG)
    /// 3. Default values
    pub fn load() -> Result<Self> {
        Self::load_from_path(&Self::config_file_path())
    }

    /// Load configuration, preferring a path given on the command line
    pub fn load_with_cli_override(path: Option<&PathBuf>) -> Result<Self> {
        match path {
            Some(p) => Self::load_from_path(p),
            None => Self::load(),
        }
    }

    /// Load configuration from a specific path
    ///
    /// Environment variables are still applied as overrides.
    /// If the file doesn't exist, defaults are used.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {:?}", path))?;
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {:?}", path))?
        } else {
            Self::default()
        };

        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Load configuration from a TOML string (useful for testing)
    pub fn load_from_str(toml_content: &str) -> Result<Self> {
        let mut config: Config =
            toml::from_str(toml_content).context("Failed to parse config TOML")?;
        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(&mut self) -> Result<()> {
        // BUKUMARK_DB_PATH
        if let Ok(val) = std::env::var(format!("{}_DB_PATH", ENV_PREFIX)) {
            if !val.is_empty() {
                self.db_path = PathBuf::from(val);
            }
        }

        // BUKUMARK_BROWSER
        if let Ok(val) = std::env::var(format!("{}_BROWSER", ENV_PREFIX)) {
            self.browser = if val.is_empty() { None } else { Some(val) };
        }

        // BUKUMARK_WORKERS
        if let Ok(val) = std::env::var(format!("{}_WORKERS", ENV_PREFIX)) {
            self.workers = if val.is_empty() {
                None
            } else {
                Some(parse_workers(&val).context("Invalid BUKUMARK_WORKERS")?)
            };
        }

        // BUKUMARK_LOG_FILE
        if let Ok(val) = std::env::var(format!("{}_LOG_FILE", ENV_PREFIX)) {
            self.log_file = if val.is_empty() {
                None
            } else {
                Some(PathBuf::from(val))
            };
        }

        Ok(())
    }

    /// Ensure the directory holding the database exists
    pub fn ensure_db_dir(&self) -> Result<()> {
        if let Some(parent) = self.db_path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create data directory: {:?}", parent))?;
            }
        }
        Ok(())
    }

    /// Options for opening the bookmark store
    pub fn store_options(&self) -> StoreOptions {
        StoreOptions {
            workers: self.workers.unwrap_or_else(default_workers),
            capacity: MAX_BOOKMARKS,
        }
    }

    /// Save configuration to the default file
    pub fn save(&self) -> Result<()> {
        self.save_to_path(&Self::config_file_path())
    }

    /// Save configuration to a specific file
    pub fn save_to_path(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(config_path, content)
            .with_context(|| format!("Failed to write config file: {:?}", config_path))?;
        Ok(())
    }

    /// Get the config file path
    ///
    /// Can be overridden with BUKUMARK_CONFIG environment variable
    pub fn config_file_path() -> PathBuf {
        if let Ok(path) = std::env::var(format!("{}_CONFIG", ENV_PREFIX)) {
            return PathBuf::from(path);
        }

        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("bukumark")
            .join("config.toml")
    }
}

/// Parse a positive worker count
pub fn parse_workers(value: &str) -> Result<usize> {
    let workers: usize = value
        .trim()
        .parse()
        .with_context(|| format!("'{}' is not a number", value))?;
    if workers == 0 {
        bail!("worker count must be at least 1");
    }
    Ok(workers)
}

/// Get the default database path
///
/// Shares buku's own location: `$XDG_DATA_HOME/buku/bookmarks.db`, which on
/// Linux falls back to `~/.local/share/buku/bookmarks.db`.
fn default_db_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("buku")
        .join("bookmarks.db")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;
    use tempfile::TempDir;

    // Mutex to serialize tests that touch environment variables
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    /// Guard that locks env access and saves/restores env vars
    struct EnvGuard<'a> {
        _lock: std::sync::MutexGuard<'a, ()>,
        saved: Vec<(String, Option<String>)>,
    }

    impl<'a> EnvGuard<'a> {
        fn new(vars: &[&str]) -> Self {
            let lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
            let saved = vars
                .iter()
                .map(|&name| (name.to_string(), env::var(name).ok()))
                .collect();
            for name in vars {
                env::remove_var(name);
            }
            Self { _lock: lock, saved }
        }
    }

    impl Drop for EnvGuard<'_> {
        fn drop(&mut self) {
            for (name, value) in &self.saved {
                match value {
                    Some(v) => env::set_var(name, v),
                    None => env::remove_var(name),
                }
            }
        }
    }

    const ENV_VARS: &[&str] = &[
        "BUKUMARK_DB_PATH",
        "BUKUMARK_BROWSER",
        "BUKUMARK_WORKERS",
        "BUKUMARK_LOG_FILE",
    ];

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.browser.is_none());
        assert!(config.workers.is_none());
        assert!(config.log_file.is_none());
        assert!(config.db_path.ends_with("buku/bookmarks.db"));
    }

    #[test]
    fn test_env_override_db_path() {
        let _guard = EnvGuard::new(ENV_VARS);

        let mut config = Config::default();
        env::set_var("BUKUMARK_DB_PATH", "/tmp/bukumark-test.db");
        config.apply_env_overrides().unwrap();

        assert_eq!(config.db_path, PathBuf::from("/tmp/bukumark-test.db"));
    }

    #[test]
    fn test_env_override_browser() {
        let _guard = EnvGuard::new(ENV_VARS);

        let mut config = Config::default();
        env::set_var("BUKUMARK_BROWSER", "firefox");
        config.apply_env_overrides().unwrap();
        assert_eq!(config.browser.as_deref(), Some("firefox"));

        // Empty string clears it
        env::set_var("BUKUMARK_BROWSER", "");
        config.apply_env_overrides().unwrap();
        assert!(config.browser.is_none());
    }

    #[test]
    fn test_env_override_workers() {
        let _guard = EnvGuard::new(ENV_VARS);

        let mut config = Config::default();
        env::set_var("BUKUMARK_WORKERS", "3");
        config.apply_env_overrides().unwrap();
        assert_eq!(config.workers, Some(3));
        assert_eq!(config.store_options().workers, 3);

        env::set_var("BUKUMARK_WORKERS", "0");
        assert!(config.apply_env_overrides().is_err());

        env::set_var("BUKUMARK_WORKERS", "many");
        assert!(config.apply_env_overrides().is_err());
    }

    #[test]
    fn test_store_options_defaults() {
        let config = Config::default();
        let options = config.store_options();
        assert!(options.workers >= 1);
        assert_eq!(options.capacity, MAX_BOOKMARKS);
    }

    #[test]
    fn test_parse_workers() {
        assert_eq!(parse_workers(" 4 ").unwrap(), 4);
        assert!(parse_workers("0").is_err());
        assert!(parse_workers("-1").is_err());
    }

    #[test]
    fn test_load_from_str() {
        let _guard = EnvGuard::new(ENV_VARS);

        let toml = r#"
            db_path = "/custom/bookmarks.db"
            browser = "qutebrowser"
            workers = 2
        "#;

        let config = Config::load_from_str(toml).unwrap();
        assert_eq!(config.db_path, PathBuf::from("/custom/bookmarks.db"));
        assert_eq!(config.browser.as_deref(), Some("qutebrowser"));
        assert_eq!(config.workers, Some(2));
        assert!(config.log_file.is_none());
    }

    #[test]
    fn test_load_from_path_missing_file() {
        let _guard = EnvGuard::new(ENV_VARS);

        let config = Config::load_from_path(Path::new("/nonexistent/config.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_save_and_reload() {
        let _guard = EnvGuard::new(ENV_VARS);
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("config.toml");

        let config = Config {
            db_path: PathBuf::from("/data/bookmarks.db"),
            browser: Some("firefox".to_string()),
            workers: Some(4),
            log_file: Some(PathBuf::from("/tmp/bukumark.log")),
        };
        config.save_to_path(&path).unwrap();

        let loaded = Config::load_from_path(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_ensure_db_dir() {
        let temp_dir = TempDir::new().unwrap();
        let config = Config {
            db_path: temp_dir.path().join("buku").join("bookmarks.db"),
            ..Config::default()
        };

        config.ensure_db_dir().unwrap();
        assert!(temp_dir.path().join("buku").is_dir());
    }
}
