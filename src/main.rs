use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use cars_api::auth::Authorizer;
use cars_api::config::{self, AppConfig, SecretBackend, StorageBackend};
use cars_api::database::{CarStore, ConnectionManager, InMemoryCarStore, PgCarRepository};
use cars_api::secrets::{EnvSecretProvider, KeyVaultCredential, KeyVaultSecretProvider, SecretProvider};
use cars_api::{build_router, AppState};

#[derive(Parser)]
#[command(name = "cars-api")]
#[command(about = "Cars resource API")]
#[command(version)]
struct Args {
    #[arg(long, help = "Bind address (overrides CARS_API_HOST)")]
    host: Option<String>,

    #[arg(long, help = "Listen port (overrides CARS_API_PORT / PORT)")]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so local runs pick up SECRET_* and KEY_VAULT_* vars
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("cars_api=info,tower_http=info")),
        )
        .init();

    let args = Args::parse();
    let config = config::config();
    info!("Starting Cars API in {:?} mode", config.environment);

    let secrets = build_secret_provider(config)?;
    let store = build_store(config, secrets.clone()).await;

    let state = AppState::new(Authorizer::new(secrets), store, &config.server.route_prefix);
    let app = build_router(state, config);

    let host = args.host.unwrap_or_else(|| config.server.host.clone());
    let port = args.port.unwrap_or(config.server.port);
    let bind_addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    info!("Cars API listening on http://{}", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("Cars API stopped");
    Ok(())
}

fn build_secret_provider(config: &AppConfig) -> anyhow::Result<Arc<dyn SecretProvider>> {
    match config.secrets.backend {
        SecretBackend::Env => {
            info!("Reading secrets from SECRET_* environment variables");
            Ok(Arc::new(EnvSecretProvider::new()))
        }
        SecretBackend::KeyVault => {
            let vault_url = config
                .secrets
                .key_vault_url
                .as_deref()
                .context("KEY_VAULT_URL must be set when SECRET_PROVIDER=keyvault")?;
            let credential = KeyVaultCredential::from_env(config.secrets.key_vault_token.clone())?;
            let provider = KeyVaultSecretProvider::new(
                vault_url,
                credential,
                Duration::from_secs(config.secrets.request_timeout_secs),
            )?;
            info!(vault = vault_url, "Reading secrets from Key Vault");
            Ok(Arc::new(provider))
        }
    }
}

async fn build_store(config: &AppConfig, secrets: Arc<dyn SecretProvider>) -> Arc<dyn CarStore> {
    match config.database.backend {
        StorageBackend::Memory => {
            warn!("Using in-memory storage; data is lost on restart");
            Arc::new(InMemoryCarStore::new())
        }
        StorageBackend::Postgres => {
            let manager = ConnectionManager::new(
                secrets,
                Duration::from_secs(config.database.connection_timeout),
            );
            // Startup probe only; requests open their own connections
            match manager.health_check().await {
                Ok(()) => info!("Database reachable"),
                Err(e) => warn!("Database not reachable at startup: {}", e),
            }
            Arc::new(PgCarRepository::new(manager))
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
