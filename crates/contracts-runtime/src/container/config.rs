//! # Runtime Configuration
//!
//! Unified configuration for the event bus, the signing workflow and
//! logging.
//!
//! ## Environment Overrides
//!
//! | Variable | Field |
//! |----------|-------|
//! | `CONTRACTS_BUS_CAPACITY` | `bus.capacity` |
//! | `CONTRACTS_MAX_SAVE_ATTEMPTS` | `signing.max_save_attempts` |
//! | `CONTRACTS_LOG` | `log_filter` (tracing `EnvFilter` syntax) |

use contract_signing::SigningConfig;
use shared_bus::DEFAULT_CHANNEL_CAPACITY;
use thiserror::Error;

/// Environment variable for the bus channel capacity.
pub const ENV_BUS_CAPACITY: &str = "CONTRACTS_BUS_CAPACITY";
/// Environment variable for the save retry budget.
pub const ENV_MAX_SAVE_ATTEMPTS: &str = "CONTRACTS_MAX_SAVE_ATTEMPTS";
/// Environment variable for the log filter.
pub const ENV_LOG: &str = "CONTRACTS_LOG";

/// Complete runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Event bus configuration.
    pub bus: BusConfig,
    /// Signing workflow configuration.
    pub signing: SigningConfig,
    /// Default tracing filter directive.
    pub log_filter: String,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            bus: BusConfig::default(),
            signing: SigningConfig::default(),
            log_filter: "info".to_string(),
        }
    }
}

/// Event bus configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BusConfig {
    /// Events buffered per subscriber before it starts lagging.
    pub capacity: usize,
}

impl Default for BusConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }
}

/// Configuration errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// An override could not be parsed.
    #[error("Invalid value for {key}: {value:?}")]
    InvalidValue {
        /// Variable name
        key: &'static str,
        /// Raw value
        value: String,
    },

    /// The bus needs room for at least one event.
    #[error("Bus capacity must be greater than zero")]
    ZeroBusCapacity,

    /// The workflow needs at least one save attempt.
    #[error("Max save attempts must be greater than zero")]
    ZeroSaveAttempts,
}

impl RuntimeConfig {
    /// Defaults overridden by process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for each variable.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup(ENV_BUS_CAPACITY) {
            config.bus.capacity = parse(ENV_BUS_CAPACITY, raw)?;
        }
        if let Some(raw) = lookup(ENV_MAX_SAVE_ATTEMPTS) {
            config.signing.max_save_attempts = parse(ENV_MAX_SAVE_ATTEMPTS, raw)?;
        }
        if let Some(filter) = lookup(ENV_LOG) {
            config.log_filter = filter;
        }

        config.validate()?;
        Ok(config)
    }

    /// Reject values the runtime cannot operate with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.bus.capacity == 0 {
            return Err(ConfigError::ZeroBusCapacity);
        }
        if self.signing.max_save_attempts == 0 {
            return Err(ConfigError::ZeroSaveAttempts);
        }
        Ok(())
    }
}

fn parse<T: std::str::FromStr>(key: &'static str, raw: String) -> Result<T, ConfigError> {
    raw.trim()
        .parse()
        .map_err(|_| ConfigError::InvalidValue { key, value: raw })
}
