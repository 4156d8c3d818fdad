//! Waypost CLI and HTTP server entry point.
//!
//! Binary name: `waypost`
//!
//! Parses CLI arguments, loads configuration, then either starts the HTTP
//! server or runs a one-shot command.

mod cli;
mod http;
mod state;

use anyhow::anyhow;
use clap::Parser;
use clap_complete::generate;

use cli::{Cli, Commands};
use state::AppState;
use waypost_infra::config::load_config;
use waypost_observe::tracing_setup::{init_tracing, shutdown_tracing, verbosity_directive};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Shell completions don't need config or tracing
    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = <Cli as clap::CommandFactory>::command();
        generate(*shell, &mut cmd, "waypost", &mut std::io::stdout());
        return Ok(());
    }

    let mut config = load_config(&cli.config).await;
    init_tracing(&config.logging, verbosity_directive(cli.verbose))
        .map_err(|e| anyhow!("failed to initialize tracing: {e}"))?;

    match cli.command {
        Commands::Serve { port, host, seed } => {
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            let addr = format!("{}:{}", config.server.host, config.server.port);

            let state = AppState::init(config, seed.as_deref()).await?;
            let prefix = state.waiting_webhooks.prefix().to_string();

            let listener = tokio::net::TcpListener::bind(&addr).await?;
            tracing::info!(%addr, "listening");

            if !cli.json {
                println!(
                    "  {} Waypost listening on {}",
                    console::style("⚡").bold(),
                    console::style(format!("http://{addr}")).cyan()
                );
                println!(
                    "  {} waiting webhooks under {}",
                    console::style("⏸").bold(),
                    console::style(format!("/{prefix}/")).cyan()
                );
                println!("  {}", console::style("Press Ctrl+C to stop").dim());
            }

            let router = http::router::build_router(state);

            axum::serve(listener, router)
                .with_graceful_shutdown(shutdown_signal())
                .await?;

            if !cli.json {
                println!("\n  Server stopped.");
            }
        }

        Commands::SignUrl {
            execution_id,
            suffix,
            base_url,
        } => {
            cli::sign::sign_url(
                config,
                &execution_id,
                suffix.as_deref(),
                base_url.as_deref(),
                cli.json,
            )?;
        }

        Commands::Completions { .. } => unreachable!("handled above"),
    }

    shutdown_tracing();
    Ok(())
}

/// Wait for Ctrl+C or SIGTERM for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to listen for Ctrl+C: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to install SIGTERM handler: {e}");
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

    tracing::info!("shutdown signal received");
}
