use std::net::SocketAddr;
use std::sync::Arc;

use clap::Parser;
use contact_core::ContactRepository;
use contact_gateway::config::{Cli, Config, FileConfig, StorageConfig};
use contact_gateway::{telemetry, App};
use contact_storage::{InMemoryRepository, MongoOptions, MongoRepository, RetryPolicy};
use tokio::net::TcpListener;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let dotenv = dotenvy::dotenv();

    let cli = Cli::try_parse()?;
    let file = FileConfig::load(&cli.config)?;
    let config_path = cli.config.clone();
    let file_found = file.is_some();
    let config = Config::resolve(cli, file)?;

    telemetry::init(config.env);

    match dotenv {
        Ok(path) => info!(path = %path.display(), "loaded .env file"),
        Err(err) if err.not_found() => info!("no .env file found"),
        Err(err) => warn!(error = %err, "failed to load .env file"),
    }
    info!(path = %config_path.display(), found = file_found, "config file");

    info!(
        env = %config.env,
        listen_addr = %config.listen_addr,
        storage_backend = %config.storage.backend(),
        storage_timeout_secs = config.storage_timeout.as_secs(),
        "starting contact API"
    );

    match config.storage {
        StorageConfig::InMemory => {
            run_server(
                config.listen_addr,
                Arc::new(InMemoryRepository::new()),
                config.debug_errors,
            )
            .await?;
        }
        StorageConfig::Mongo { database_url } => {
            let options = MongoOptions::builder()
                .operation_timeout(config.storage_timeout)
                .build();
            let repository = Arc::new(
                MongoRepository::connect_with(&database_url, options, RetryPolicy::default())
                    .await?,
            );

            let served =
                run_server(config.listen_addr, repository.clone(), config.debug_errors).await;
            repository.close().await;
            served?;
        }
    }

    info!("contact API stopped");
    Ok(())
}

async fn run_server<R: ContactRepository>(
    listen_addr: SocketAddr,
    repository: Arc<R>,
    debug_errors: bool,
) -> std::io::Result<()> {
    let listener = TcpListener::bind(listen_addr).await?;
    info!(listen_addr = %listener.local_addr()?, "listening");

    axum::serve(
        listener,
        App::router(repository, debug_errors).into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            warn!(error = %err, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                warn!(error = %err, "failed to listen for SIGTERM");
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

    info!("shutdown signal received");
}
