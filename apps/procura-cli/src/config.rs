//! # Application Configuration
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     PROCURA_DEFAULT_CONTAINER=40HC                                     │
//! │     PROCURA_BASE_CURRENCY=CNY                                          │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     --config <path>, or                                                │
//! │     ~/.config/procura/procura.toml (Linux)                             │
//! │     ~/Library/Application Support/com.procura.procura/procura.toml     │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     20GP, CNY → USD, divisor 1, multiplier 1                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # procura.toml
//! [shipment]
//! default_container = "40HC"
//!
//! [currency]
//! base = "CNY"
//! secondary = "USD"
//! divisor = 7.1
//! multiplier = 1.0
//!
//! # Fallback table, used when no live rate is supplied
//! [currency.default_rates]
//! "USD/CNY" = 7.1
//! "EUR/CNY" = 7.8
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use procura_core::{ContainerTypeProfile, ConversionFactors};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Failed to save config: {0}")]
    SaveFailed(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

// =============================================================================
// Shipment Settings
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShipmentSettings {
    /// Catalog code used when a command does not name a container.
    #[serde(default = "default_container")]
    pub default_container: String,
}

fn default_container() -> String {
    "20GP".to_string()
}

impl Default for ShipmentSettings {
    fn default() -> Self {
        ShipmentSettings {
            default_container: default_container(),
        }
    }
}

// =============================================================================
// Currency Settings
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrencySettings {
    /// Currency quotations are priced in.
    #[serde(default = "default_base")]
    pub base: String,

    /// Currency totals are projected into.
    #[serde(default = "default_secondary")]
    pub secondary: String,

    #[serde(default = "default_factor")]
    pub divisor: f64,

    #[serde(default = "default_factor")]
    pub multiplier: f64,

    /// Fallback rates keyed "FROM/TO".
    #[serde(default)]
    pub default_rates: BTreeMap<String, f64>,
}

fn default_base() -> String {
    "CNY".to_string()
}

fn default_secondary() -> String {
    "USD".to_string()
}

fn default_factor() -> f64 {
    1.0
}

impl Default for CurrencySettings {
    fn default() -> Self {
        CurrencySettings {
            base: default_base(),
            secondary: default_secondary(),
            divisor: default_factor(),
            multiplier: default_factor(),
            default_rates: BTreeMap::new(),
        }
    }
}

impl CurrencySettings {
    pub fn factors(&self) -> ConversionFactors {
        ConversionFactors::new(self.divisor, self.multiplier)
    }
}

// =============================================================================
// App Config
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub shipment: ShipmentSettings,

    #[serde(default)]
    pub currency: CurrencySettings,
}

impl AppConfig {
    /// Loads configuration: defaults, then file, then environment.
    pub fn load(config_path: Option<PathBuf>) -> ConfigResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading config from file");
                config = Self::from_file(&path)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Like [`load`](Self::load), but falls back to defaults on any error.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load config: {}. Using defaults.", e);
            Self::default()
        })
    }

    fn from_file(path: &Path) -> ConfigResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }

    pub fn save(&self, config_path: Option<PathBuf>) -> ConfigResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| ConfigError::SaveFailed("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents)?;

        info!(?path, "Config saved");
        Ok(())
    }

    pub fn validate(&self) -> ConfigResult<()> {
        ContainerTypeProfile::by_code(&self.shipment.default_container)
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;

        if self.currency.base.trim().is_empty() || self.currency.secondary.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "currency codes must not be empty".into(),
            ));
        }

        self.currency
            .factors()
            .validate()
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;

        for (pair, rate) in &self.currency.default_rates {
            if split_pair(pair).is_none() {
                return Err(ConfigError::Invalid(format!(
                    "rate key must look like FROM/TO, got: {}",
                    pair
                )));
            }
            if !rate.is_finite() || *rate <= 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "rate for {} must be positive",
                    pair
                )));
            }
        }

        Ok(())
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(code) = std::env::var("PROCURA_DEFAULT_CONTAINER") {
            debug!(container = %code, "Overriding default container from environment");
            self.shipment.default_container = code;
        }

        if let Ok(base) = std::env::var("PROCURA_BASE_CURRENCY") {
            self.currency.base = base.to_uppercase();
        }

        if let Ok(secondary) = std::env::var("PROCURA_SECONDARY_CURRENCY") {
            self.currency.secondary = secondary.to_uppercase();
        }

        if let Ok(divisor) = std::env::var("PROCURA_DIVISOR") {
            match divisor.parse::<f64>() {
                Ok(d) => self.currency.divisor = d,
                Err(_) => warn!(value = %divisor, "Ignoring unparsable PROCURA_DIVISOR"),
            }
        }

        if let Ok(multiplier) = std::env::var("PROCURA_MULTIPLIER") {
            match multiplier.parse::<f64>() {
                Ok(m) => self.currency.multiplier = m,
                Err(_) => warn!(value = %multiplier, "Ignoring unparsable PROCURA_MULTIPLIER"),
            }
        }
    }

    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "procura", "procura")
            .map(|dirs| dirs.config_dir().join("procura.toml"))
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    /// Profile for `code`, or the configured default when `None`.
    pub fn container_profile(&self, code: Option<&str>) -> Result<ContainerTypeProfile, procura_core::CoreError> {
        ContainerTypeProfile::by_code(code.unwrap_or(&self.shipment.default_container))
    }
}

/// Splits a "FROM/TO" rate key.
pub(crate) fn split_pair(pair: &str) -> Option<(&str, &str)> {
    let (from, to) = pair.split_once('/')?;
    let (from, to) = (from.trim(), to.trim());
    if from.is_empty() || to.is_empty() {
        return None;
    }
    Some((from, to))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.shipment.default_container, "20GP");
        assert_eq!(config.currency.base, "CNY");
        assert_eq!(config.currency.factors(), ConversionFactors::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = AppConfig::default();

        config.shipment.default_container = "45FT".to_string();
        assert!(config.validate().is_err());

        config.shipment.default_container = "40hc".to_string();
        assert!(config.validate().is_ok());

        config.currency.divisor = 0.0;
        assert!(config.validate().is_err());

        config.currency.divisor = 7.1;
        config.currency.default_rates.insert("USDCNY".to_string(), 7.1);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            [currency]
            divisor = 7.1

            [currency.default_rates]
            "USD/CNY" = 7.1
            "#,
        )
        .unwrap();

        assert_eq!(config.shipment.default_container, "20GP");
        assert_eq!(config.currency.divisor, 7.1);
        assert_eq!(config.currency.multiplier, 1.0);
        assert_eq!(config.currency.default_rates["USD/CNY"], 7.1);
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("procura.toml");

        let mut config = AppConfig::default();
        config.shipment.default_container = "40GP".to_string();
        config.currency.default_rates.insert("EUR/CNY".to_string(), 7.8);
        config.save(Some(path.clone())).unwrap();

        let reloaded = AppConfig::from_file(&path).unwrap();
        assert_eq!(reloaded, config);
    }

    #[test]
    fn test_invalid_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("procura.toml");
        std::fs::write(&path, "[shipment]\ndefault_container = \"NOPE\"\n").unwrap();

        assert!(matches!(
            AppConfig::from_file(&path).map(|c| c.validate()),
            Ok(Err(ConfigError::Invalid(_)))
        ));
        let config = AppConfig::load_or_default(Some(path));
        assert_eq!(config.shipment.default_container, default_container());
    }

    #[test]
    fn test_split_pair() {
        assert_eq!(split_pair("USD/CNY"), Some(("USD", "CNY")));
        assert_eq!(split_pair(" usd / cny "), Some(("usd", "cny")));
        assert_eq!(split_pair("USD/"), None);
        assert_eq!(split_pair("USDCNY"), None);
    }
}
