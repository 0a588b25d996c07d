//! translate-search server
//!
//! This is the main entry point for the application.

use anyhow::{bail, Context, Result};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};
use translate_search::{
    config,
    network::HttpClient,
    web::{create_router, AppState},
};

#[tokio::main]
async fn main() -> Result<()> {
    let config_path = match parse_args()? {
        Some(path) => path,
        None => return Ok(()),
    };

    // Load .env file (absent in production)
    let _ = dotenvy::dotenv();

    // Initialize logging
    FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    info!("Starting translate-search v{}", translate_search::VERSION);

    // Load configuration; missing credentials stop the process here
    let settings = config::load(config_path.as_deref()).context("Invalid configuration")?;
    info!(
        "Translator at {}, catalog search at {}",
        settings.translator.url, settings.product_search.endpoint
    );
    if !settings.server.require_auth {
        info!("Authentication is disabled for /v1/translate");
    }

    // Initialize HTTP client
    let client = HttpClient::with_settings(&settings.outgoing)?;
    info!("HTTP client initialized");

    // Create application state
    let state = AppState::new(settings.clone(), client);
    info!("Application state initialized");

    if let Some(limiter) = state.limiter.clone() {
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(60));
            loop {
                interval.tick().await;
                limiter.prune();
            }
        });
    }

    // Create router
    let app = create_router(state);

    // Bind address
    let addr = SocketAddr::new(
        settings
            .server
            .bind_address
            .parse()
            .context("server.bind_address must be an IP address")?,
        settings.server.port,
    );

    info!("Starting server on http://{}", addr);

    // Start server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    info!("Server stopped");
    Ok(())
}

/// Parse command line arguments.
///
/// Returns `Ok(None)` when the process should exit after printing help or
/// version, otherwise the optional settings file path.
fn parse_args() -> Result<Option<Option<PathBuf>>> {
    let mut config_path = None;
    let mut args = std::env::args().skip(1);

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-c" | "--config" => match args.next() {
                Some(path) => config_path = Some(PathBuf::from(path)),
                None => bail!("{} requires a file argument", arg),
            },
            "-h" | "--help" => {
                print_usage();
                return Ok(None);
            }
            "-V" | "--version" => {
                println!("translate-search {}", translate_search::VERSION);
                return Ok(None);
            }
            other => bail!("Unknown argument: {} (see --help)", other),
        }
    }

    Ok(Some(config_path))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

/// Print usage information
fn print_usage() {
    println!(
        r#"
translate-search v{}
Multilingual product search API

USAGE:
    translate-search [OPTIONS]

OPTIONS:
    -c, --config <FILE>    Path to configuration file
    -h, --help             Print help information
    -V, --version          Print version information

ENVIRONMENT VARIABLES:
    TRANSLATE_SEARCH_SETTINGS_PATH  Path to settings.yml
    TRANSLATE_API_URL               Translation API endpoint (required)
    TRANSLATE_API_TOKEN             Translation API bearer token (required)
    COSTCO_API_KEY                  Catalog search API key (required)
    TRANSLATE_SEARCH_PORT           Server port
    TRANSLATE_SEARCH_BIND_ADDRESS   Bind address
    TRANSLATE_SEARCH_REQUIRE_AUTH   Require bearer tokens (true/false)
    TRANSLATE_SEARCH_API_TOKENS     Comma-separated accepted bearer tokens
    TRANSLATE_SEARCH_RATE_LIMIT     Requests per minute per client
    RUST_LOG                        Log filter (default: info)
"#,
        translate_search::VERSION
    );
}
