//! AIRA command line
//!
//! Evaluates answer files against a configuration directory, validates the
//! configuration and watches it for changes.

mod answers;
mod cli;
mod commands;
mod config;

use crate::cli::{Cli, Commands};
use crate::config::CliConfig;
use aira_sdk::{AssessmentEngine, AssessmentEngineBuilder};
use anyhow::Result;
use clap::Parser;
use std::process::ExitCode;
use std::time::Duration;
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Initialize tracing
    init_tracing()?;

    let cli = Cli::parse();

    // Load configuration
    let mut config = CliConfig::load()?;
    if let Some(path) = &cli.repository {
        config = config.with_repository(path);
    }
    debug!("Loaded configuration: {:?}", config);

    match cli.command {
        Commands::Evaluate {
            answers,
            trace,
            json,
        } => {
            if trace {
                config.engine.trace = true;
            }
            let engine = init_engine(&config).await?;
            commands::evaluate(&engine, &answers, json).await
        }
        Commands::Validate => {
            let engine = init_engine(&config).await?;
            commands::validate(&engine).await
        }
        Commands::List => {
            let engine = init_engine(&config).await?;
            commands::list(&engine)
        }
        Commands::Watch { interval } => {
            let engine = init_engine(&config).await?;
            let interval = interval
                .map(Duration::from_secs)
                .unwrap_or_else(|| engine.config().poll_interval());
            commands::watch(&engine, interval).await
        }
    }
}

/// Initialize tracing subscriber
fn init_tracing() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "aira_cli=info,aira_sdk=info,aira_repository=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {}", e))?;

    Ok(())
}

/// Build the engine from the file system source in `config`
async fn init_engine(config: &CliConfig) -> Result<AssessmentEngine> {
    let engine = AssessmentEngineBuilder::new()
        .with_source_config(config.repository.clone())
        .with_config(config.engine.clone())
        .build()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))?;

    Ok(engine)
}
