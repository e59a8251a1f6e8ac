use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::constants::Thresholds;
use crate::error::{ConfigError, Result, WhoopError};
use crate::logging::LogConfig;
use crate::trends::TrendConfig;

/// Trend periods accepted by the analysis commands
pub const VALID_PERIODS: [u32; 3] = [7, 14, 30];

/// Main application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Application metadata
    pub metadata: ConfigMetadata,

    /// General application settings
    pub settings: AppSettings,

    /// Zone cut-points and insight thresholds
    pub thresholds: Thresholds,

    /// Trend window and dead band
    pub trend: TrendConfig,

    /// Logging preferences
    pub logging: LogConfig,
}

/// Configuration metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigMetadata {
    /// Configuration format version
    pub version: String,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last modification timestamp
    pub updated_at: DateTime<Utc>,
}

impl Default for ConfigMetadata {
    fn default() -> Self {
        let now = Utc::now();
        ConfigMetadata {
            version: "1.0".to_string(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// General application settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    /// Trend period used when `--period` is not given
    pub default_period: u32,

    /// Record export read when `--input` is not given
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_file: Option<PathBuf>,

    /// Pretty-print JSON output
    pub pretty: bool,
}

impl Default for AppSettings {
    fn default() -> Self {
        AppSettings {
            default_period: 7,
            data_file: None,
            pretty: true,
        }
    }
}

/// Configuration management implementation
impl AppConfig {
    /// Load configuration from TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: AppConfig = toml::from_str(&content).map_err(ConfigError::Parse)?;
        config.validate()?;

        Ok(config)
    }

    /// Save configuration to TOML file
    pub fn save_to_file<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        self.metadata.updated_at = Utc::now();

        if let Some(parent) = path.as_ref().parent() {
            fs::create_dir_all(parent)?;
        }

        let toml_content = toml::to_string_pretty(self).map_err(ConfigError::Serialize)?;
        fs::write(&path, toml_content)?;

        debug!("Saved config to {}", path.as_ref().display());
        Ok(())
    }

    /// Get default configuration file path
    pub fn default_config_path() -> Result<PathBuf> {
        dirs::home_dir()
            .map(|home| home.join(".whooprs").join("config.toml"))
            .ok_or_else(|| ConfigError::NoHomeDir.into())
    }

    /// Load configuration with fallback to defaults
    ///
    /// Uses `path` when given, otherwise the default location.
    pub fn load_or_default(path: Option<&Path>) -> Self {
        let config_path = match path {
            Some(p) => p.to_path_buf(),
            None => match Self::default_config_path() {
                Ok(p) => p,
                Err(_) => return Self::default(),
            },
        };

        if !config_path.exists() {
            debug!("No config at {}, using defaults", config_path.display());
            return Self::default();
        }

        match Self::load_from_file(&config_path) {
            Ok(config) => config,
            Err(e) => {
                warn!("Ignoring config {}: {}", config_path.display(), e);
                Self::default()
            }
        }
    }

    /// Reject settings the analysis cannot run with
    pub fn validate(&self) -> Result<()> {
        if !VALID_PERIODS.contains(&self.settings.default_period) {
            return Err(WhoopError::Validation(format!(
                "settings.default_period must be one of 7, 14 or 30, got {}",
                self.settings.default_period
            )));
        }
        if self.trend.recent_window == 0 {
            return Err(WhoopError::Validation(
                "trend.recent_window must be at least 1".to_string(),
            ));
        }
        if self.trend.deadband < 0.0 {
            return Err(WhoopError::Validation(
                "trend.deadband must not be negative".to_string(),
            ));
        }
        Ok(())
    }

    /// Read a setting by dotted key, e.g. `thresholds.recovery.green`
    pub fn get_value(&self, key: &str) -> Result<String> {
        let root = toml::Value::try_from(self).map_err(ConfigError::Serialize)?;
        let value = lookup(&root, key).ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;

        Ok(match value {
            toml::Value::String(s) => s.clone(),
            toml::Value::Table(_) => {
                toml::to_string_pretty(value).map_err(ConfigError::Serialize)?
            }
            other => other.to_string(),
        })
    }

    /// Set a setting by dotted key
    ///
    /// The raw string is parsed as the type the key already holds. Nothing
    /// changes unless the updated configuration is still valid.
    pub fn set_value(&mut self, key: &str, raw: &str) -> Result<()> {
        let unknown = || WhoopError::from(ConfigError::UnknownKey(key.to_string()));
        let invalid = || {
            WhoopError::from(ConfigError::InvalidValue {
                key: key.to_string(),
                value: raw.to_string(),
            })
        };

        let (parent_key, leaf) = match key.rsplit_once('.') {
            Some((parent, leaf)) if !parent.is_empty() && !leaf.is_empty() => (parent, leaf),
            _ => return Err(unknown()),
        };

        let mut root = toml::Value::try_from(&*self).map_err(ConfigError::Serialize)?;
        let table = lookup_mut(&mut root, parent_key)
            .and_then(|v| v.as_table_mut())
            .ok_or_else(unknown)?;

        let parsed = match table.get(leaf) {
            Some(toml::Value::Integer(_)) => {
                toml::Value::Integer(raw.parse().map_err(|_| invalid())?)
            }
            Some(toml::Value::Float(_)) => toml::Value::Float(raw.parse().map_err(|_| invalid())?),
            Some(toml::Value::Boolean(_)) => {
                toml::Value::Boolean(raw.parse().map_err(|_| invalid())?)
            }
            Some(toml::Value::String(_)) | None => toml::Value::String(raw.to_string()),
            Some(_) => return Err(invalid()),
        };
        table.insert(leaf.to_string(), parsed);

        let updated: AppConfig = root.try_into().map_err(|_| invalid())?;

        // Unset optional keys are absent from the table; anything serde
        // ignored on the way back in is not a real setting.
        let check = toml::Value::try_from(&updated).map_err(ConfigError::Serialize)?;
        if lookup(&check, key).is_none() {
            return Err(unknown());
        }

        updated.validate()?;
        *self = updated;
        Ok(())
    }
}

fn lookup<'a>(root: &'a toml::Value, key: &str) -> Option<&'a toml::Value> {
    key.split('.').try_fold(root, |value, part| value.get(part))
}

fn lookup_mut<'a>(root: &'a mut toml::Value, key: &str) -> Option<&'a mut toml::Value> {
    key.split('.').try_fold(root, |value, part| value.get_mut(part))
}
