//! tokenseek search service and CLI.
//!
//! # Usage
//!
//! ```bash
//! # Serve the HTTP API (config.toml in current directory)
//! cargo run -p tokenseek-server --release
//!
//! # Run with custom config path
//! tokenseek-server --config /path/to/config.toml serve
//!
//! # One-off lookup
//! tokenseek-server search "Token B"
//! tokenseek-server search 0xF574D0c40D3f520360882ee9Eabc718cF6AEA339 --json
//! ```
//!
//! # Environment Variables
//!
//! - `CONFIG` - Path to TOML configuration file (default: `config.toml`)
//! - `HOST` - Override bind address (default: `0.0.0.0`)
//! - `PORT` - Override port (default: `3000`)
//! - `RUST_LOG` - Log level filter (default: `info`)

use std::io::Write as _;
use std::path::PathBuf;
use std::sync::Arc;

use axum::http::Method;
use clap::{Parser, Subcommand};
use tokenseek::Resolver;
use tokenseek_evm::{Eip155TokenReader, http_provider};
use tokenseek_index::{EtherscanTokenIndex, IndexConfig};
use tower_http::cors;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use tokenseek_server::config::{ServerConfig, Settings};
use tokenseek_server::handlers::{SearchState, search_router};
use tokenseek_server::render::render_cards;

/// ERC-20 token lookup by contract address or name.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(long, env = "CONFIG", default_value = "config.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Serve the HTTP search API (default).
    Serve,
    /// Resolve one query and print the result.
    Search {
        /// Contract address or name fragment.
        query: String,
        /// Print the JSON array instead of text cards.
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // Initialize tracing with RUST_LOG env filter
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        tracing::error!("tokenseek failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let settings = ServerConfig::load_from(&cli.config)?.validate()?;
    tracing::info!(
        network = settings.network.name,
        index = %settings.index_url,
        max_concurrency = settings.max_concurrency.get(),
        "Loaded configuration"
    );

    let resolver = build_resolver(&settings).await?;

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(&settings, resolver).await,
        Command::Search { query, json } => {
            let tokens = resolver.resolve(&query).await;
            let output = if json {
                let mut out = serde_json::to_string_pretty(&tokens)?;
                out.push('\n');
                out
            } else {
                render_cards(&tokens)
            };
            std::io::stdout().lock().write_all(output.as_bytes())?;
            Ok(())
        }
    }
}

async fn build_resolver(settings: &Settings) -> Result<Resolver, Box<dyn std::error::Error>> {
    let provider = http_provider(&settings.rpc_url, settings.rpc_rate_limit)?;
    let reader = Eip155TokenReader::new(provider);

    match reader.chain_id().await {
        Ok(chain_id) if chain_id != settings.network.chain_id => tracing::warn!(
            expected = settings.network.chain_id,
            actual = chain_id,
            network = settings.network.name,
            "RPC endpoint serves a different chain than the configured network"
        ),
        Ok(_) => {}
        Err(e) => tracing::warn!(error = %e, "Could not query RPC chain id"),
    }

    let index = EtherscanTokenIndex::new(
        IndexConfig::new(settings.index_url.clone(), settings.index_api_key.clone())
            .with_timeout(settings.index_timeout),
    );

    Ok(Resolver::new(reader, index).with_max_concurrency(settings.max_concurrency))
}

async fn serve(settings: &Settings, resolver: Resolver) -> Result<(), Box<dyn std::error::Error>> {
    let state: SearchState = Arc::new(resolver);

    let app = search_router(state).layer(TraceLayer::new_for_http()).layer(
        cors::CorsLayer::new()
            .allow_origin(cors::Any)
            .allow_methods([Method::GET])
            .allow_headers(cors::Any),
    );

    let listener = tokio::net::TcpListener::bind(settings.bind).await?;
    tracing::info!("tokenseek listening on http://{}", settings.bind);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("tokenseek shut down gracefully");
    Ok(())
}

/// Waits for Ctrl-C or SIGTERM (Unix) to initiate graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = tokio::signal::ctrl_c();

    #[cfg(unix)]
    {
        let mut sigterm = tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler");
        tokio::select! {
            _ = ctrl_c => tracing::info!("Received Ctrl-C, shutting down..."),
            _ = sigterm.recv() => tracing::info!("Received SIGTERM, shutting down..."),
        }
    }

    #[cfg(not(unix))]
    {
        ctrl_c.await.expect("failed to listen for Ctrl-C");
        tracing::info!("Received Ctrl-C, shutting down...");
    }
}
