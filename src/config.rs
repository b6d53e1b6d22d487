//! Application configuration
//!
//! Loaded from a TOML file (default `~/.config/utility-billing/config.toml`).
//! Every section and key is optional; missing values fall back to defaults.

use std::path::{Path, PathBuf};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::Department;
use crate::support::money::RATE_SCALE;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Default config location: `<config dir>/utility-billing/config.toml`
pub fn default_config_path() -> PathBuf {
    dirs_next::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("utility-billing")
        .join("config.toml")
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseSection,
    pub logging: LoggingConfig,
    pub billing: BillingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Seconds allowed for graceful shutdown
    pub shutdown_timeout: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            shutdown_timeout: 30,
        }
    }
}

impl ServerConfig {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseSection {
    pub url: String,
    pub max_connections: u32,
}

impl Default for DatabaseSection {
    fn default() -> Self {
        Self {
            url: "sqlite://./billing.db?mode=rwc".to_string(),
            max_connections: 10,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `trace`, `debug`, `info`, `warn` or `error`; `RUST_LOG` wins when set
    pub level: String,
    /// `text` or `json`
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "text".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BillingConfig {
    /// Days between the reading date and the bill due date
    pub due_days: u32,
    /// Batch items processed concurrently
    pub batch_concurrency: usize,
    pub max_batch_size: usize,
    pub fallback_rates: FallbackRates,
}

impl Default for BillingConfig {
    fn default() -> Self {
        Self {
            due_days: 15,
            batch_concurrency: 4,
            max_batch_size: 500,
            fallback_rates: FallbackRates::default(),
        }
    }
}

/// Flat per-unit prices used when no tariff is configured for an account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FallbackRates {
    pub electricity: Decimal,
    pub gas: Decimal,
    pub water: Decimal,
}

impl Default for FallbackRates {
    fn default() -> Self {
        Self {
            electricity: Decimal::new(500, 2),
            gas: Decimal::new(350, 2),
            water: Decimal::new(200, 2),
        }
    }
}

impl FallbackRates {
    /// Rate for `department`, normalised to the storage precision of rates.
    pub fn rate_for(&self, department: Department) -> Decimal {
        let rate = match department {
            Department::Electricity => self.electricity,
            Department::Gas => self.gas,
            Department::Water => self.water,
        };
        rate.round_dp(RATE_SCALE)
    }
}

impl AppConfig {
    /// Load from `path`. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&contents).map_err(|e| match e {
            ConfigError::Parse { source, .. } => ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            },
            other => other,
        })?;
        Ok(config)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = toml::from_str(contents).map_err(|source| ConfigError::Parse {
            path: PathBuf::new(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.billing.batch_concurrency == 0 {
            return Err(ConfigError::Invalid(
                "billing.batch_concurrency must be at least 1".into(),
            ));
        }
        if self.billing.max_batch_size == 0 {
            return Err(ConfigError::Invalid(
                "billing.max_batch_size must be at least 1".into(),
            ));
        }
        for department in Department::ALL {
            if self.billing.fallback_rates.rate_for(department).is_sign_negative() {
                return Err(ConfigError::Invalid(format!(
                    "billing.fallback_rates.{} must not be negative",
                    department
                )));
            }
        }
        if self.database.max_connections == 0 {
            return Err(ConfigError::Invalid(
                "database.max_connections must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn empty_file_gives_defaults() {
        let cfg = AppConfig::from_toml_str("").unwrap();
        assert_eq!(cfg.server.port, 8080);
        assert_eq!(cfg.billing.due_days, 15);
        assert_eq!(cfg.billing.batch_concurrency, 4);
        assert_eq!(cfg.billing.fallback_rates.rate_for(Department::Gas), dec!(3.50));
        assert_eq!(cfg.logging.level, "info");
    }

    #[test]
    fn partial_sections_override_defaults() {
        let cfg = AppConfig::from_toml_str(
            r#"
            [server]
            port = 9090

            [billing]
            batch_concurrency = 8

            [billing.fallback_rates]
            electricity = "6.42"
            water = 1.25
            "#,
        )
        .unwrap();
        assert_eq!(cfg.server.port, 9090);
        assert_eq!(cfg.server.host, "0.0.0.0");
        assert_eq!(cfg.billing.batch_concurrency, 8);
        assert_eq!(
            cfg.billing.fallback_rates.rate_for(Department::Electricity),
            dec!(6.42)
        );
        assert_eq!(cfg.billing.fallback_rates.rate_for(Department::Water), dec!(1.25));
        assert_eq!(cfg.billing.fallback_rates.rate_for(Department::Gas), dec!(3.50));
    }

    #[test]
    fn zero_concurrency_is_rejected() {
        let err = AppConfig::from_toml_str("[billing]\nbatch_concurrency = 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn negative_fallback_rate_is_rejected() {
        let err =
            AppConfig::from_toml_str("[billing.fallback_rates]\ngas = \"-1\"\n").unwrap_err();
        assert!(err.to_string().contains("gas"));
    }

    #[test]
    fn missing_file_gives_defaults() {
        let cfg = AppConfig::load(Path::new("/nonexistent/utility-billing.toml")).unwrap();
        assert_eq!(cfg.database.max_connections, 10);
    }
}
