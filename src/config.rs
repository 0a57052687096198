//! Configuration loading from TOML with environment overrides.
//!
//! Reads `wagerlog.toml` and deserializes into strongly-typed structs.
//! Every section is optional; a missing file means all defaults. The
//! database path can be overridden with the `WAGERLOG_DB` environment
//! variable (loaded from `.env` by the binary).

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::net::{IpAddr, SocketAddr};
use std::path::Path;

use crate::storage::DEFAULT_DATABASE_FILE;
use crate::types::{BetType, Sport};

/// Default config file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "wagerlog.toml";

/// Environment variable overriding `storage.database_path`.
pub const DATABASE_ENV: &str = "WAGERLOG_DB";

/// Top-level application configuration.
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct AppConfig {
    pub storage: StorageConfig,
    pub form: FormConfig,
    pub dashboard: DashboardConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct StorageConfig {
    pub database_path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: DEFAULT_DATABASE_FILE.to_string(),
        }
    }
}

/// Entry-form defaults. The form resets to these after each submission.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct FormConfig {
    pub default_sport: String,
    pub default_bet_type: String,
    pub currency_symbol: String,
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            default_sport: "Football".to_string(),
            default_bet_type: "Moneyline".to_string(),
            currency_symbol: "$".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct DashboardConfig {
    pub bind_address: String,
    pub port: u16,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct LoggingConfig {
    /// Level for this crate's targets when `RUST_LOG` is unset.
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {path}"))?;
        Self::from_toml_str(&contents)
            .with_context(|| format!("Failed to parse config file: {path}"))
    }

    /// Load `path` if it exists, otherwise fall back to defaults.
    pub fn load_or_default(path: &str) -> Result<Self> {
        if Path::new(path).exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Parse and validate configuration text.
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: AppConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the form could never submit.
    pub fn validate(&self) -> Result<()> {
        self.form
            .default_sport
            .parse::<Sport>()
            .context("form.default_sport")?;
        self.form
            .default_bet_type
            .parse::<BetType>()
            .context("form.default_bet_type")?;
        self.dashboard_addr()?;
        Ok(())
    }

    /// Database path after applying the `WAGERLOG_DB` override.
    pub fn database_path(&self) -> String {
        std::env::var(DATABASE_ENV)
            .ok()
            .filter(|p| !p.trim().is_empty())
            .unwrap_or_else(|| self.storage.database_path.clone())
    }

    /// Socket address the local web form binds to.
    pub fn dashboard_addr(&self) -> Result<SocketAddr> {
        let ip: IpAddr = self
            .dashboard
            .bind_address
            .parse()
            .with_context(|| format!("Invalid dashboard.bind_address: {}", self.dashboard.bind_address))?;
        Ok(SocketAddr::new(ip, self.dashboard.port))
    }
}
