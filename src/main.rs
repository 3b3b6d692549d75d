use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use workspace_browser::{AppState, Config};

#[derive(Parser, Debug)]
#[command(name = "workspace-browser")]
#[command(about = "Read-only browser UI for a single workspace directory")]
#[command(version)]
struct Cli {
    /// Port to listen on
    #[arg(short, long, env = "WORKSPACE_BROWSER_PORT", default_value = "18888")]
    port: u16,

    /// Address to bind to
    #[arg(short, long, env = "WORKSPACE_BROWSER_BIND", default_value = "0.0.0.0")]
    bind: String,

    /// Workspace directory to expose
    #[arg(short, long, env = "WORKSPACE_BROWSER_ROOT", default_value = ".")]
    root: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, env = "WORKSPACE_BROWSER_VERBOSE")]
    verbose: bool,

    /// Config file path (optional)
    #[arg(short, long, env = "WORKSPACE_BROWSER_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose {
        "workspace_browser=debug,tower_http=debug"
    } else {
        "workspace_browser=info,tower_http=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = match &cli.config {
        Some(config_path) => Config::from_file(config_path)?,
        None => Config::default(),
    };

    let state = AppState::with_config(&cli.root, config)
        .with_context(|| format!("opening workspace root {}", cli.root.display()))?;

    info!("Serving workspace: {}", state.resolver.root().display());

    let app = workspace_browser::app(state);

    let addr: SocketAddr = format!("{}:{}", cli.bind, cli.port)
        .parse()
        .context("parsing bind address")?;
    info!("Workspace browser running at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("binding to address")?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("running server")?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
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
                tracing::error!("Failed to install SIGTERM handler: {}", e);
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

    info!("Shutdown signal received, stopping");
}
