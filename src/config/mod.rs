#[cfg(feature = "cli")]
pub mod cli;

use crate::adapters::http::TransportSettings;
use crate::adapters::vault::{VaultSettings, DEFAULT_API_BASE};
use crate::utils::error::{AccountingError, Result};
use crate::utils::validation::{validate_positive_number, validate_range, validate_url, Validate};
use axum::http::HeaderValue;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_ALLOWED_ORIGIN: &str = "http://localhost:3000";
pub const MAX_RETRY_COUNT: u32 = 10;

/// Which backend the server stores records in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum StoreKind {
    #[default]
    Vault,
    Memory,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub vault: VaultConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub port: u16,
    pub allowed_origin: String,
    pub store: StoreKind,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            allowed_origin: DEFAULT_ALLOWED_ORIGIN.to_string(),
            store: StoreKind::Vault,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VaultConfig {
    pub api_base: String,
    pub ledger: String,
    pub collection: String,
    pub api_key: String,
    pub timeout_seconds: u64,
    pub retry_count: u32,
    pub retry_wait_ms: u64,
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            ledger: "default".to_string(),
            collection: "default".to_string(),
            api_key: "default".to_string(),
            timeout_seconds: 5,
            retry_count: 3,
            retry_wait_ms: 100,
        }
    }
}

impl VaultConfig {
    pub fn transport(&self) -> TransportSettings {
        TransportSettings {
            timeout: Duration::from_secs(self.timeout_seconds),
            retry_count: self.retry_count,
            retry_wait: Duration::from_millis(self.retry_wait_ms),
        }
    }

    pub fn settings(&self) -> VaultSettings {
        VaultSettings::new(&self.ledger, &self.collection, &self.api_key)
            .with_api_base(&self.api_base)
            .with_transport(self.transport())
    }
}

impl ServerConfig {
    pub fn allowed_origin_header(&self) -> Result<HeaderValue> {
        HeaderValue::from_str(&self.allowed_origin).map_err(|e| {
            AccountingError::InvalidConfigValueError {
                field: "server.allowed_origin".to_string(),
                value: self.allowed_origin.clone(),
                reason: e.to_string(),
            }
        })
    }
}

impl AppConfig {
    /// Loads a TOML config file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(AccountingError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// Parses TOML, replacing `${VAR}` references with environment values first.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| AccountingError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Unset variables are left as written.
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| AccountingError::ConfigError {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }
}

impl Validate for AppConfig {
    type Error = AccountingError;

    /// Ledger, collection and API key are left to the ledger to reject.
    fn validate(&self) -> Result<()> {
        validate_positive_number("server.port", u64::from(self.server.port), 1)?;
        self.server.allowed_origin_header()?;

        if self.server.store == StoreKind::Vault {
            validate_url("vault.api_base", &self.vault.api_base)?;
            validate_positive_number("vault.timeout_seconds", self.vault.timeout_seconds, 1)?;
            validate_range("vault.retry_count", self.vault.retry_count, 0, MAX_RETRY_COUNT)?;
        }

        tracing::debug!("Configuration validation passed");
        Ok(())
    }
}
