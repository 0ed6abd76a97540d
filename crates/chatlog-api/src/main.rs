//! Chatlog CLI and REST API entry point.
//!
//! Binary name: `chatlog`
//!
//! Parses CLI arguments, loads configuration, initializes the database and
//! service, then starts the REST API server or runs a one-shot command.

mod cli;
mod http;
mod state;

use clap::Parser;

use chatlog_infra::config::{apply_env_overrides, load_service_config, resolve_data_dir};
use chatlog_observe::tracing_setup::{default_filter, init_tracing};
use cli::{Cli, Commands};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let data_dir = resolve_data_dir();
    let mut diagnostics = Vec::new();
    let mut config = load_service_config(cli.config.as_deref(), &data_dir, &mut diagnostics).await;
    apply_env_overrides(&mut config, |key| std::env::var(key).ok(), &mut diagnostics);

    if let Commands::Serve { port, host } = &cli.command {
        if let Some(port) = port {
            config.port = *port;
        }
        if let Some(host) = host {
            config.host = host.clone();
        }
    }

    init_tracing(config.log_format, default_filter(cli.verbose, cli.quiet))
        .map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))?;
    for diagnostic in &diagnostics {
        diagnostic.emit();
    }

    config.validate()?;

    // Initialize application state (DB, services)
    let state = AppState::init(config.clone(), &data_dir).await?;

    match cli.command {
        Commands::Serve { .. } => {
            let router = http::router::build_router(state);

            let addr = format!("{}:{}", config.host, config.port);
            let listener = tokio::net::TcpListener::bind(&addr).await?;

            tracing::info!(
                %addr,
                civil_utc_offset_minutes = config.civil_utc_offset_minutes,
                "chatlog API listening"
            );

            axum::serve(listener, router)
                .with_graceful_shutdown(shutdown_signal())
                .await?;

            tracing::info!("server stopped");
        }

        Commands::Stats { user } => {
            cli::stats::print_stats(&state, user.as_deref()).await?;
        }
    }

    Ok(())
}

/// Wait for Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
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
                tracing::error!(error = %e, "failed to install SIGTERM handler");
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
