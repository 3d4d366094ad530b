use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use axum::Router;
use axum_server::tls_rustls::RustlsConfig;
use clap::Parser;
use sha2::{Digest, Sha256};
use tokio::signal;
use tracing::{error, info};

use buildhook_core::config::TlsConfig;
use buildhook_core::{
    create_authenticator, load_config, validate_config, Authenticator, Pipeline, SanitizedConfig,
};
use buildhook_server::api::create_router;
use buildhook_server::logging::init_logging;
use buildhook_server::state::{AppState, FatalSignal};

/// Application version
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// How long in-flight requests get to finish on shutdown
const SHUTDOWN_GRACE: Duration = Duration::from_secs(10);

#[derive(Parser)]
#[command(name = "buildhook", version, about = "Build webhook receiver")]
struct Args {
    /// Path to the TOML configuration file
    #[arg(short, long, env = "BUILDHOOK_CONFIG", default_value = "config.toml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        // Logging may not be up yet when configuration fails
        error!("Fatal error: {:#}", e);
        eprintln!("buildhook: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let args = Args::parse();

    let config = load_config(&args.config)
        .with_context(|| format!("Failed to load config from {:?}", args.config))?;
    validate_config(&config).context("Configuration validation failed")?;

    init_logging(&config.logging)?;

    // Compute config hash (token redacted)
    let config_json = serde_json::to_string(&SanitizedConfig::from(&config)).unwrap_or_default();
    let config_hash = format!("{:x}", Sha256::digest(config_json.as_bytes()));
    info!(
        version = VERSION,
        config = %args.config.display(),
        config_hash = &config_hash[..16],
        "Configuration loaded"
    );
    info!("Database path: {:?}", config.database.path);
    info!("Artifact directory: {:?}", config.artifacts.data_dir);
    info!(
        "Deploy executable: {:?} (on spawn failure: {:?})",
        config.deploy.exec_file, config.deploy.on_spawn_failure
    );

    let authenticator: Arc<dyn Authenticator> = Arc::from(create_authenticator(&config.auth));
    info!("Using authenticator: {}", authenticator.method_name());

    let pipeline = Pipeline::from_config(&config);
    let fatal = FatalSignal::new();

    let state = Arc::new(AppState::new(
        config.clone(),
        authenticator,
        pipeline,
        fatal.clone(),
    ));
    let app = create_router(state);

    let addr = SocketAddr::new(config.server.host, config.server.port);
    match &config.server.tls {
        Some(tls) => serve_tls(addr, tls, app, fatal.clone()).await?,
        None => serve_plain(addr, app, fatal.clone()).await?,
    }

    if fatal.is_tripped() {
        bail!("Stopped because a deploy could not be started");
    }

    info!("Server stopped");
    Ok(())
}

async fn serve_plain(addr: SocketAddr, app: Router, fatal: FatalSignal) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    info!("Listening on http://{}", addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal(fatal))
    .await
    .context("Server error")
}

async fn serve_tls(
    addr: SocketAddr,
    tls: &TlsConfig,
    app: Router,
    fatal: FatalSignal,
) -> Result<()> {
    let rustls = RustlsConfig::from_pem_file(&tls.cert, &tls.key)
        .await
        .with_context(|| {
            format!(
                "Failed to load TLS certificate {:?} and key {:?}",
                tls.cert, tls.key
            )
        })?;

    let handle = axum_server::Handle::new();
    tokio::spawn({
        let handle = handle.clone();
        async move {
            shutdown_signal(fatal).await;
            handle.graceful_shutdown(Some(SHUTDOWN_GRACE));
        }
    });

    info!("Listening on https://{}", addr);
    axum_server::bind_rustls(addr, rustls)
        .handle(handle)
        .serve(app.into_make_service_with_connect_info::<SocketAddr>())
        .await
        .with_context(|| format!("Failed to serve on {}", addr))
}

/// Wait for Ctrl+C, SIGTERM, or a fatal deploy failure
async fn shutdown_signal(fatal: FatalSignal) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
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
        _ = ctrl_c => info!("Received Ctrl+C, shutting down"),
        _ = terminate => info!("Received SIGTERM, shutting down"),
        _ = fatal.wait() => error!("Fatal deploy failure, shutting down"),
    }
}
