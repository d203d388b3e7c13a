use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use partitura_core::{
    load_config_or_default, validate_config, AudiverisConverter, Converter, InMemoryJobRegistry,
    JobOrchestrator, JobRegistry, JobSpawner, OrchestratorConfig, RetentionSweeper,
    StorageLayout, ZipArchiver,
};
use partitura_server::{api::create_router, state::AppState};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {:#}", e);
        eprintln!("Fatal error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Determine config path
    let config_path = std::env::var("PARTITURA_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config.toml"));

    // Load configuration before logging so `verbose` can pick the default filter
    let config = load_config_or_default(&config_path)
        .with_context(|| format!("Failed to load config from {:?}", config_path))?;

    // Initialize logging
    let default_filter = if config.verbose {
        "debug"
    } else {
        "info,tower_http=debug"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Loaded configuration from {:?}", config_path);

    // Validate configuration
    validate_config(&config).context("Configuration validation failed")?;

    info!("Upload area: {:?}", config.storage.upload_dir);
    info!("Output area: {:?}", config.storage.output_dir);

    // Storage roots must exist before the first upload
    let layout = StorageLayout::new(config.storage.clone());
    layout
        .ensure_roots()
        .await
        .context("Failed to create storage directories")?;

    // Converter problems only affect jobs, never startup
    let converter = AudiverisConverter::new(config.converter.clone());
    if let Err(e) = converter.validate().await {
        warn!("Converter check failed, conversions will fail until fixed: {}", e);
    }

    let registry: Arc<dyn JobRegistry> = Arc::new(InMemoryJobRegistry::new());
    let spawner = JobSpawner::new(Arc::clone(&registry), &config.jobs);
    match config.jobs.limit() {
        Some(limit) => info!("Running at most {} conversions at once", limit),
        None => info!("Conversion concurrency is unlimited"),
    }

    let orchestrator = Arc::new(JobOrchestrator::new(
        OrchestratorConfig::new(config.verbose, &config.converter, &config.archiver),
        layout.clone(),
        Arc::clone(&registry),
        Arc::new(converter),
        Arc::new(ZipArchiver::new(config.archiver.clone())),
        spawner,
    ));

    // Start retention sweeper
    let sweeper = RetentionSweeper::new(layout, config.retention.clone());
    let sweeper_handle = sweeper.start();

    // Create app state
    let state = Arc::new(AppState::new(
        config.clone(),
        registry,
        Arc::clone(&orchestrator),
    ));

    // Create router
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::new(config.server.host, config.server.port);
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    // Run server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutting down...");
    sweeper.stop();
    if let Some(handle) = sweeper_handle {
        let _ = handle.await;
    }

    let active = orchestrator.active_jobs();
    if active > 0 {
        warn!("{} conversions still running at shutdown will be abandoned", active);
    }

    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
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
}
