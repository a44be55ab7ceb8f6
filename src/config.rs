//! Configuration loading and management
//!
//! Handles parsing of `.tempo.toml` configuration files.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Config file name looked up in the working directory
pub const CONFIG_FILE: &str = ".tempo.toml";

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Quota and ordering rules
    #[serde(default)]
    pub quota: QuotaConfig,

    /// Ledger storage configuration
    #[serde(default)]
    pub ledger: LedgerConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            quota: QuotaConfig::default(),
            ledger: LedgerConfig::default(),
        }
    }
}

/// Quota and price-sort rules for the ordering engine
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct QuotaConfig {
    /// Daily hours cap per subscription project; projects at or over the
    /// cap are deferred for the rest of the day
    #[serde(default = "default_daily_hours_cap")]
    pub daily_hours_cap: f64,

    /// Minimum days of deadline headroom before same-day tasks may be
    /// reordered by price
    #[serde(default = "default_price_sort_lead_days")]
    pub price_sort_lead_days: i64,
}

fn default_daily_hours_cap() -> f64 {
    3.0
}

fn default_price_sort_lead_days() -> i64 {
    2
}

impl Default for QuotaConfig {
    fn default() -> Self {
        Self {
            daily_hours_cap: default_daily_hours_cap(),
            price_sort_lead_days: default_price_sort_lead_days(),
        }
    }
}

/// Ledger storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerConfig {
    /// File name of the daily-hours ledger, relative to the working
    /// directory unless absolute
    #[serde(default = "default_ledger_file")]
    pub file: PathBuf,
}

fn default_ledger_file() -> PathBuf {
    PathBuf::from("tempo-ledger.json")
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            file: default_ledger_file(),
        }
    }
}

impl Config {
    /// Load configuration from a `.tempo.toml` file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a directory, or return defaults
    pub fn load_from_dir(dir: &Path) -> Self {
        let config_path = dir.join(CONFIG_FILE);
        if config_path.exists() {
            Self::load(&config_path).unwrap_or_default()
        } else {
            Self::default()
        }
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        self.quota.validate()
    }
}

impl QuotaConfig {
    fn validate(&self) -> Result<()> {
        if !self.daily_hours_cap.is_finite() || self.daily_hours_cap <= 0.0 {
            return Err(Error::InvalidConfig(
                "quota.daily_hours_cap must be positive".to_string(),
            ));
        }
        if self.price_sort_lead_days < 0 {
            return Err(Error::InvalidConfig(
                "quota.price_sort_lead_days cannot be negative".to_string(),
            ));
        }
        Ok(())
    }
}
