use crate::config::{AppConfig, ServerConfig, StoreKind, VaultConfig};
use crate::utils::error::Result;
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "accounting-vault")]
#[command(about = "HTTP service storing accounting info in an immudb Vault ledger")]
pub struct CliConfig {
    #[arg(long, env = "API_PORT", default_value_t = crate::config::DEFAULT_PORT)]
    pub port: u16,

    #[arg(long, env = "CORS_ALLOWED_ORIGIN", default_value = crate::config::DEFAULT_ALLOWED_ORIGIN)]
    pub allowed_origin: String,

    #[arg(long, value_enum, env = "ACCOUNTING_STORE", default_value = "vault")]
    pub store: StoreKind,

    #[arg(long, env = "VAULT_API_BASE", default_value = crate::adapters::vault::DEFAULT_API_BASE)]
    pub vault_api_base: String,

    #[arg(long, env = "VAULT_LEDGER", default_value = "default")]
    pub vault_ledger: String,

    #[arg(long, env = "VAULT_COLLECTION", default_value = "default")]
    pub vault_collection: String,

    #[arg(long, env = "VAULT_API_KEY", default_value = "default", hide_env_values = true)]
    pub vault_api_key: String,

    #[arg(long, env = "VAULT_TIMEOUT_SECONDS", default_value_t = 5)]
    pub vault_timeout_seconds: u64,

    #[arg(long, env = "VAULT_RETRY_COUNT", default_value_t = 3)]
    pub vault_retry_count: u32,

    #[arg(long, env = "VAULT_RETRY_WAIT_MS", default_value_t = 100)]
    pub vault_retry_wait_ms: u64,

    #[arg(long, help = "TOML config file; replaces the flag and environment values")]
    pub config: Option<PathBuf>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub log_json: bool,
}

impl CliConfig {
    pub fn resolve(&self) -> Result<AppConfig> {
        if let Some(path) = &self.config {
            tracing::info!("Loading configuration from {}", path.display());
            return AppConfig::from_file(path);
        }

        Ok(AppConfig {
            server: ServerConfig {
                port: self.port,
                allowed_origin: self.allowed_origin.clone(),
                store: self.store,
            },
            vault: VaultConfig {
                api_base: self.vault_api_base.clone(),
                ledger: self.vault_ledger.clone(),
                collection: self.vault_collection.clone(),
                api_key: self.vault_api_key.clone(),
                timeout_seconds: self.vault_timeout_seconds,
                retry_count: self.vault_retry_count,
                retry_wait_ms: self.vault_retry_wait_ms,
            },
        })
    }
}
