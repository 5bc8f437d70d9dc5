//! Application configuration management.

use serde::Deserialize;

use crate::types::Currency;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Ledger configuration.
    #[serde(default)]
    pub ledger: LedgerConfig,
    /// Telemetry configuration.
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

/// Ledger configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LedgerConfig {
    /// Base currency assigned to newly provisioned tenants.
    #[serde(default = "default_base_currency")]
    pub default_base_currency: Currency,
    /// Decimal places kept when converting amounts to base currency.
    #[serde(default = "default_conversion_scale")]
    pub conversion_scale: u32,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            default_base_currency: default_base_currency(),
            conversion_scale: default_conversion_scale(),
        }
    }
}

fn default_base_currency() -> Currency {
    Currency::Eur
}

fn default_conversion_scale() -> u32 {
    4
}

/// Telemetry configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct TelemetryConfig {
    /// Log filter directive when `RUST_LOG` is not set (e.g., "saldo=debug").
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
    /// Emit logs as JSON instead of human-readable lines.
    #[serde(default)]
    pub json_logs: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_filter: default_log_filter(),
            json_logs: false,
        }
    }
}

fn default_log_filter() -> String {
    "info".to_string()
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// Sources, later ones winning: `config/default.toml`,
    /// `config/{RUN_MODE}.toml`, then `SALDO__`-prefixed environment
    /// variables (e.g., `SALDO__LEDGER__CONVERSION_SCALE=2`).
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        dotenvy::dotenv().ok();
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("SALDO").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}
