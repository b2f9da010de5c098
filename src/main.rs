mod main_runtime;

use anyhow::Context;
use cadence::api::{create_router, AppState};
use cadence::cli::{self, Cli, Commands};
use cadence::config::AppConfig;
use cadence::error::CadenceError;
use clap::Parser;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = AppConfig::load_from(&cli.config)
        .with_context(|| format!("loading configuration from {}", cli.config))?;
    config.validate().map_err(CadenceError::InvalidConfig)?;

    match cli.command {
        Commands::Shell => {
            main_runtime::init_logging_simple();
            cli::shell::run(config.session)?;
        }
        Commands::Analyze { sequence, json } => {
            main_runtime::init_logging_simple();
            cli::run_analyze(config.session, &sequence, json)?;
        }
        Commands::Serve { bind } => {
            main_runtime::init_logging(&config.logging);
            run_server(config, bind).await?;
        }
        Commands::Config => {
            cli::print_config(&config)?;
        }
    }

    Ok(())
}

async fn run_server(config: AppConfig, bind: Option<String>) -> anyhow::Result<()> {
    let bind = bind.unwrap_or_else(|| config.server.bind.clone());
    let state = AppState::new(&config);
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(&bind)
        .await
        .with_context(|| format!("binding {bind}"))?;
    info!(
        addr = %bind,
        capacity = config.session.capacity,
        max_sessions = config.server.max_sessions,
        adaptive = config.session.adaptive,
        "session API listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(main_runtime::shutdown_signal())
        .await?;

    info!("server stopped");
    Ok(())
}
