use accounting_vault::utils::{logger, validation::Validate};
use accounting_vault::{
    create_router, AccountingService, AccountingStore, AppConfig, AppState, CliConfig,
    InMemoryStore, StoreKind, VaultStore,
};
use clap::Parser;
use std::net::SocketAddr;
use std::sync::Arc;

#[tokio::main]
async fn main() {
    let cli = CliConfig::parse();

    if cli.log_json {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_server_logger(cli.verbose);
    }

    tracing::info!("Starting accounting-vault");

    if let Err(e) = run(&cli).await {
        tracing::error!("❌ {}", e);
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }
}

async fn run(cli: &CliConfig) -> anyhow::Result<()> {
    let config = cli.resolve()?;
    if cli.verbose {
        tracing::debug!("Resolved config: {:?}", redacted(&config));
    }
    config.validate()?;

    let store = build_store(&config)?;
    let service = AccountingService::new(store);
    let router = create_router(AppState::new(service), config.server.allowed_origin_header()?);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("🚀 Listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

fn build_store(config: &AppConfig) -> anyhow::Result<Arc<dyn AccountingStore>> {
    match config.server.store {
        StoreKind::Vault => {
            let settings = config.vault.settings();
            tracing::info!(
                "Using vault ledger '{}', collection '{}'",
                settings.ledger,
                settings.collection
            );
            Ok(Arc::new(VaultStore::new(settings)?))
        }
        StoreKind::Memory => {
            tracing::warn!("📝 Using the in-memory store, records are lost on exit");
            Ok(Arc::new(InMemoryStore::new()))
        }
    }
}

fn redacted(config: &AppConfig) -> AppConfig {
    let mut config = config.clone();
    config.vault.api_key = "***".to_string();
    config
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutting down server");
}
