//! # Configuration State
//!
//! Application configuration loaded at startup.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     SALESYS_STORE_NAME="Sucursal Centro"                               │
//! │     SALESYS_CALL_TIMEOUT_MS=5000                                       │
//! │     SALESYS_BACKEND_URL=https://pos.example.com/rpc                    │
//! │     SALESYS_API_TOKEN=...                                              │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/salesys/salesys.toml (Linux)                             │
//! │     ~/Library/Application Support/com.salesys.pos/salesys.toml (macOS) │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! store_name = "SaleSys"
//! currency_symbol = "$"
//! currency_decimals = 2
//!
//! [client]
//! endpoint = "https://pos.example.com/rpc"
//! call_timeout_ms = 15000
//! ```
//!
//! Read-only after startup, so no lock.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use salesys_client::ClientConfig;
use salesys_core::Money;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{ConfigError, ConfigResult};

const MAX_CURRENCY_DECIMALS: u8 = 4;

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Shown in the window title and on notifications.
    #[serde(default = "default_store_name")]
    pub store_name: String,

    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,

    /// Decimal places shown for amounts. Amounts are kept in cents, so
    /// anything other than 2 only changes the display.
    #[serde(default = "default_currency_decimals")]
    pub currency_decimals: u8,

    #[serde(default)]
    pub client: ClientConfig,
}

fn default_store_name() -> String {
    "SaleSys".to_string()
}

fn default_currency_symbol() -> String {
    "$".to_string()
}

fn default_currency_decimals() -> u8 {
    2
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            store_name: default_store_name(),
            currency_symbol: default_currency_symbol(),
            currency_decimals: default_currency_decimals(),
            client: ClientConfig::default(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (`salesys.toml`, or `config_path` if given)
    /// 3. Environment variables
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

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load config: {}. Using defaults.", e);
            Self::default()
        })
    }

    fn from_file(path: &Path) -> ConfigResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(toml::from_str(&contents)?)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.store_name.trim().is_empty() {
            return Err(ConfigError::Invalid("store_name must not be empty".into()));
        }
        if self.currency_decimals > MAX_CURRENCY_DECIMALS {
            return Err(ConfigError::Invalid(format!(
                "currency_decimals must be at most {}",
                MAX_CURRENCY_DECIMALS
            )));
        }
        self.client.validate()?;
        Ok(())
    }

    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides<F>(&mut self, var: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(name) = var("SALESYS_STORE_NAME") {
            self.store_name = name;
        }

        if let Some(symbol) = var("SALESYS_CURRENCY_SYMBOL") {
            self.currency_symbol = symbol;
        }

        if let Some(decimals) = var("SALESYS_CURRENCY_DECIMALS") {
            match decimals.parse::<u8>() {
                Ok(d) => self.currency_decimals = d,
                Err(_) => warn!(value = %decimals, "Ignoring SALESYS_CURRENCY_DECIMALS"),
            }
        }

        if let Some(timeout) = var("SALESYS_CALL_TIMEOUT_MS") {
            match timeout.parse::<u64>() {
                Ok(ms) => {
                    debug!(ms, "Overriding call timeout from environment");
                    self.client.call_timeout_ms = ms;
                }
                Err(_) => warn!(value = %timeout, "Ignoring SALESYS_CALL_TIMEOUT_MS"),
            }
        }

        if let Some(url) = var("SALESYS_BACKEND_URL") {
            debug!(%url, "Overriding backend endpoint from environment");
            self.client.endpoint = Some(url);
        }

        if let Some(token) = var("SALESYS_API_TOKEN") {
            self.client.api_token = Some(token);
        }
    }

    fn default_config_path() -> Option<PathBuf> {
        ProjectDirs::from("com", "salesys", "pos").map(|dirs| dirs.config_dir().join("salesys.toml"))
    }

    /// Formats a cent amount with the configured symbol and decimals.
    ///
    /// ```rust,ignore
    /// let config = AppConfig::default();
    /// assert_eq!(config.format_currency(1234), "$12.34");
    /// ```
    pub fn format_currency(&self, cents: i64) -> String {
        // cents carry two decimals; scale to the configured precision
        let scaled: i128 = match self.currency_decimals {
            d if d >= 2 => cents as i128 * 10_i128.pow(u32::from(d) - 2),
            d => {
                let divisor = 10_i128.pow(2 - u32::from(d));
                let half = divisor / 2;
                let c = cents as i128;
                if c >= 0 {
                    (c + half) / divisor
                } else {
                    (c - half) / divisor
                }
            }
        };
        let divisor = 10_i128.pow(u32::from(self.currency_decimals));
        let whole = (scaled / divisor).abs();
        let frac = (scaled % divisor).abs();

        format!(
            "{}{}{}",
            if scaled < 0 { "-" } else { "" },
            self.currency_symbol,
            if self.currency_decimals > 0 {
                format!(
                    "{}.{:0width$}",
                    whole,
                    frac,
                    width = self.currency_decimals as usize
                )
            } else {
                whole.to_string()
            }
        )
    }

    pub fn format_money(&self, amount: Money) -> String {
        self.format_currency(amount.cents())
    }
}

/// Managed wrapper around the loaded [`AppConfig`].
#[derive(Debug, Clone, Default)]
pub struct ConfigState {
    config: AppConfig,
}

impl ConfigState {
    pub fn new(config: AppConfig) -> Self {
        ConfigState { config }
    }

    pub fn inner(&self) -> &AppConfig {
        &self.config
    }
}
