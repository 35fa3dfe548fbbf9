//! Configuration management for selfeval.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::report::MissingRatings;
use crate::wizard::EntryPoint;

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default data directory name.
const DATA_DIR_NAME: &str = "selfeval";

/// Default database file name.
const DATABASE_FILE_NAME: &str = "survey.db";

/// Default receipts directory name, under the data directory.
const RECEIPTS_DIR_NAME: &str = "receipts";

/// Environment variable prefix.
const ENV_PREFIX: &str = "SELFEVAL_";

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `SELFEVAL_`, sections separated
///    by `__`, e.g. `SELFEVAL_REPORT__TOP_N=5`)
/// 2. TOML config file at `~/.config/selfeval/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Storage configuration.
    pub storage: StorageConfig,
    /// Receipt configuration.
    pub receipts: ReceiptConfig,
    /// Report configuration.
    pub report: ReportConfig,
    /// Wizard configuration.
    pub wizard: WizardConfig,
}

/// Storage-related configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Path to the database file.
    /// Defaults to `~/.local/share/selfeval/survey.db`
    pub database_path: Option<PathBuf>,
}

/// Receipt-related configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReceiptConfig {
    /// Write a receipt file for every completed submission.
    pub enabled: bool,
    /// Directory receipts are written to.
    /// Defaults to `~/.local/share/selfeval/receipts`
    pub directory: Option<PathBuf>,
}

/// Report-related configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// How unrated skills enter the summary averages.
    pub missing_ratings: MissingRatings,
    /// Length of the strengths and attention lists.
    pub top_n: usize,
    /// Show the demo report while no submission exists.
    pub demo_fallback: bool,
}

/// Wizard-related configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WizardConfig {
    /// Screen the wizard starts from.
    pub entry: EntryPoint,
}

impl Default for ReceiptConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            directory: None, // Resolved at runtime
        }
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            missing_ratings: MissingRatings::Exclude,
            top_n: 3,
            demo_fallback: true,
        }
    }
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading, parsing or validation fails.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration with an optional custom config path.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading, parsing or validation fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);
        let config = Self::figment(&config_file).extract::<Config>()?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a single TOML file over the defaults, ignoring
    /// environment overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing, unparseable or invalid.
    pub fn check_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::ConfigValidation {
                message: format!("config file not found: {}", path.display()),
            });
        }
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(path))
            .extract()?;
        config.validate()?;
        Ok(config)
    }

    fn figment(config_file: &Path) -> Figment {
        Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(config_file))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(DATA_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Get the default data directory path.
    #[must_use]
    pub fn default_data_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from(".local/share"))
            .join(DATA_DIR_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        if self.report.top_n == 0 {
            return Err(Error::ConfigValidation {
                message: "report.top_n must be greater than 0".to_string(),
            });
        }

        if let Some(dir) = &self.receipts.directory {
            if dir.as_os_str().is_empty() {
                return Err(Error::ConfigValidation {
                    message: "receipts.directory must not be empty".to_string(),
                });
            }
        }

        if let Some(path) = &self.storage.database_path {
            if path.as_os_str().is_empty() {
                return Err(Error::ConfigValidation {
                    message: "storage.database_path must not be empty".to_string(),
                });
            }
        }

        Ok(())
    }

    /// Get the database path, resolving defaults if not set.
    #[must_use]
    pub fn database_path(&self) -> PathBuf {
        self.storage
            .database_path
            .clone()
            .unwrap_or_else(|| Self::default_data_dir().join(DATABASE_FILE_NAME))
    }

    /// Get the receipts directory, resolving defaults if not set.
    #[must_use]
    pub fn receipts_dir(&self) -> PathBuf {
        self.receipts
            .directory
            .clone()
            .unwrap_or_else(|| Self::default_data_dir().join(RECEIPTS_DIR_NAME))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_temp_config(name: &str, contents: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "selfeval_config_test_{}_{}",
            name,
            std::process::id()
        ));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert!(config.storage.database_path.is_none());
        assert!(config.receipts.enabled);
        assert_eq!(config.report.missing_ratings, MissingRatings::Exclude);
        assert_eq!(config.report.top_n, 3);
        assert!(config.report.demo_fallback);
        assert_eq!(config.wizard.entry, EntryPoint::Welcome);
    }

    #[test]
    fn test_validate_valid_config() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_validate_zero_top_n() {
        let mut config = Config::default();
        config.report.top_n = 0;

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("top_n"));
    }

    #[test]
    fn test_validate_empty_receipts_dir() {
        let mut config = Config::default();
        config.receipts.directory = Some(PathBuf::new());

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("receipts.directory"));
    }

    #[test]
    fn test_database_path_default() {
        let path = Config::default().database_path();
        assert!(path.to_string_lossy().contains("survey.db"));
        assert!(path.to_string_lossy().contains("selfeval"));
    }

    #[test]
    fn test_database_path_custom() {
        let mut config = Config::default();
        config.storage.database_path = Some(PathBuf::from("/custom/path/db.sqlite"));

        assert_eq!(
            config.database_path(),
            PathBuf::from("/custom/path/db.sqlite")
        );
    }

    #[test]
    fn test_receipts_dir_default() {
        let path = Config::default().receipts_dir();
        assert!(path.ends_with("receipts"));
    }

    #[test]
    fn test_default_config_path() {
        let path = Config::default_config_path();
        assert!(path.to_string_lossy().contains("selfeval"));
        assert!(path.to_string_lossy().contains("config.toml"));
    }

    #[test]
    fn test_load_nonexistent_config() {
        let config = Config::load_from(Some(PathBuf::from("/nonexistent/config.toml"))).unwrap();
        assert_eq!(config.report.top_n, 3);
    }

    #[test]
    fn test_load_from_toml_file() {
        let path = write_temp_config(
            "load",
            r#"
[report]
missing_ratings = "neutral"
top_n = 5

[wizard]
entry = "direct"

[receipts]
enabled = false
"#,
        );

        let config = Config::load_from(Some(path.clone())).unwrap();
        assert_eq!(config.report.missing_ratings, MissingRatings::Neutral);
        assert_eq!(config.report.top_n, 5);
        assert!(config.report.demo_fallback);
        assert_eq!(config.wizard.entry, EntryPoint::Direct);
        assert!(!config.receipts.enabled);

        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_check_file_rejects_invalid_values() {
        let path = write_temp_config("invalid", "[report]\ntop_n = 0\n");

        let err = Config::check_file(&path).unwrap_err();
        assert!(matches!(err, Error::ConfigValidation { .. }));

        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_check_file_rejects_unknown_policy() {
        let path = write_temp_config("policy", "[report]\nmissing_ratings = \"zero\"\n");

        let err = Config::check_file(&path).unwrap_err();
        assert!(matches!(err, Error::ConfigLoad(_)));

        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_check_file_missing() {
        let err = Config::check_file(Path::new("/nonexistent/selfeval.toml")).unwrap_err();
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn test_config_serialize() {
        let json = serde_json::to_string(&Config::default()).unwrap();
        assert!(json.contains("missing_ratings"));
        assert!(json.contains("\"exclude\""));
        assert!(json.contains("\"welcome\""));
    }

    #[test]
    fn test_report_config_deserialize_partial() {
        let report: ReportConfig = serde_json::from_str(r#"{"top_n": 7}"#).unwrap();
        assert_eq!(report.top_n, 7);
        assert_eq!(report.missing_ratings, MissingRatings::Exclude);
    }
}
