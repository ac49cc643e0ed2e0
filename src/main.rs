//! Coach Launcher server
//!
//! Entry point: serves the launch page, or performs a one-off launch
//! against a running server with `coach-launcher launch`.

use mimalloc::MiMalloc;

/// Global allocator for improved performance (M-MIMALLOC-APPS).
#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

use std::sync::Arc;

use clap::Parser;
use dotenvy::dotenv;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use coach_launcher::config::{AppConfig, Cli, Command};
use coach_launcher::server;
use coach_launcher::session::{LaunchPhase, LaunchView, SessionLauncher};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing (M-LOG-STRUCTURED)
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Load .env (if present) before clap reads env-backed flags
    let _ = dotenv();

    let cli = Cli::parse();

    if let Some(Command::Launch { server }) = &cli.command {
        return launch(server).await;
    }

    let config = match AppConfig::from_cli(&cli) {
        Ok(c) => Arc::new(c),
        Err(e) => {
            eprintln!("Configuration error: {e}");
            std::process::exit(1);
        }
    };

    server::start_server(config).await
}

async fn launch(server: &str) -> anyhow::Result<()> {
    let launcher = SessionLauncher::new(server)?;
    let mut view = LaunchView::default();

    println!("{}", coach_launcher::session::STATUS_CREATING);
    launcher.launch(&mut view).await;
    println!("{view}");

    if view.phase() != LaunchPhase::Ready {
        std::process::exit(1);
    }
    Ok(())
}
