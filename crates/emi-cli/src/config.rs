//! Configuration for the `emi` CLI.
//!
//! Loaded with the following priority (highest to lowest):
//! 1. CLI flags (`--currency`, `--limit`)
//! 2. Environment variables (`EMI_DEFAULT_CURRENCY`, `EMI_DATA_DIR`, `EMI_HISTORY_LIMIT`)
//! 3. Config file (`--config <path>` or `<config dir>/emi/config.toml`)
//! 4. Built-in defaults
//!
//! # Example config file
//!
//! ```toml
//! default_currency = "USD"
//! data_dir = "/var/lib/emi"
//! history_limit = 50
//!
//! [limits]
//! max_rate_percent = 36
//! min_tenure_years = 1
//! max_tenure_years = 25
//! ```

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{CliError, CliResult};

const APP_DIR: &str = "emi";
const CONFIG_FILE: &str = "config.toml";

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CliConfig {
    /// Currency used when neither a flag nor a saved preference selects one.
    #[serde(default = "default_currency")]
    pub default_currency: String,

    /// Directory holding `history.json` and `preferences.json`.
    #[serde(default)]
    pub data_dir: Option<PathBuf>,

    /// How many recent calculations `history list` shows.
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,

    #[serde(default)]
    pub limits: InputLimits,
}

/// Presentation-layer bounds applied before calling the engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputLimits {
    #[serde(default = "default_max_rate_percent")]
    pub max_rate_percent: Decimal,

    #[serde(default = "default_min_tenure_years")]
    pub min_tenure_years: u32,

    #[serde(default = "default_max_tenure_years")]
    pub max_tenure_years: u32,
}

fn default_currency() -> String {
    emi_core::currency::DEFAULT_CURRENCY.code.to_string()
}
fn default_history_limit() -> usize {
    20
}
fn default_max_rate_percent() -> Decimal {
    dec!(100)
}
fn default_min_tenure_years() -> u32 {
    1
}
fn default_max_tenure_years() -> u32 {
    30
}

impl Default for InputLimits {
    fn default() -> Self {
        Self {
            max_rate_percent: default_max_rate_percent(),
            min_tenure_years: default_min_tenure_years(),
            max_tenure_years: default_max_tenure_years(),
        }
    }
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            default_currency: default_currency(),
            data_dir: None,
            history_limit: default_history_limit(),
            limits: InputLimits::default(),
        }
    }
}

impl CliConfig {
    /// Load from an explicit file, or the default location if it exists,
    /// then overlay environment variables.
    pub fn load(path: Option<&Path>) -> CliResult<Self> {
        let mut config = match path {
            Some(p) => Self::from_file(p)?,
            None => match default_config_path().filter(|p| p.is_file()) {
                Some(p) => Self::from_file(&p)?,
                None => Self::default(),
            },
        };
        config.apply_env(|key| env::var(key).ok())?;
        config.validate()?;
        debug!(?config, "configuration loaded");
        Ok(config)
    }

    /// Parse a TOML config file.
    pub fn from_file(path: &Path) -> CliResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            CliError::Config(format!("Failed to read '{}': {}", path.display(), e))
        })?;
        toml::from_str(&contents)
            .map_err(|e| CliError::Config(format!("Failed to parse '{}': {}", path.display(), e)))
    }

    /// Directory for persisted history and preferences.
    pub fn data_dir(&self) -> CliResult<PathBuf> {
        if let Some(dir) = &self.data_dir {
            return Ok(dir.clone());
        }
        dirs::data_dir()
            .or_else(dirs::home_dir)
            .map(|d| d.join(APP_DIR))
            .ok_or_else(|| CliError::Config("Could not determine data directory".into()))
    }

    fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) -> CliResult<()> {
        if let Some(code) = lookup("EMI_DEFAULT_CURRENCY") {
            self.default_currency = code;
        }
        if let Some(dir) = lookup("EMI_DATA_DIR") {
            self.data_dir = Some(PathBuf::from(dir));
        }
        if let Some(limit) = lookup("EMI_HISTORY_LIMIT") {
            self.history_limit = limit.trim().parse().map_err(|_| {
                CliError::Config(format!("EMI_HISTORY_LIMIT must be a whole number, got '{limit}'"))
            })?;
        }
        Ok(())
    }

    fn validate(&self) -> CliResult<()> {
        let limits = &self.limits;
        if limits.max_rate_percent < Decimal::ZERO {
            return Err(CliError::Config("limits.max_rate_percent cannot be negative".into()));
        }
        if limits.min_tenure_years == 0 || limits.min_tenure_years > limits.max_tenure_years {
            return Err(CliError::Config(
                "limits.min_tenure_years must be between 1 and limits.max_tenure_years".into(),
            ));
        }
        Ok(())
    }
}

fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(APP_DIR).join(CONFIG_FILE))
}
