pub mod adapters;
pub mod api;
pub mod app;
pub mod config;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::CliConfig;

pub use adapters::{
    http::TransportSettings,
    memory::InMemoryStore,
    vault::{VaultSettings, VaultStore},
};
pub use api::{create_router, AppState};
pub use app::AccountingService;
pub use config::{AppConfig, StoreKind};
pub use domain::model::{AccountingInfo, AccountingInfoRequest, Direction};
pub use domain::ports::AccountingStore;
pub use utils::error::{AccountingError, Result, StoreError};
