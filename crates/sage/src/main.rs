// SPDX-FileCopyrightText: 2026 Sage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Sage - AI-assisted SQL report generation.
//!
//! This is the binary entry point: a thin driver around the report pipeline.

mod check;
mod pipeline;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use sage_config::{ConfigError, SageConfig};
use sage_core::SageError;

use crate::check::check_data_source;
use crate::pipeline::{Pipeline, cli_query};

/// Sage - turn natural-language requests into SQL reports.
#[derive(Parser, Debug)]
#[command(name = "sage", version, about, long_about = None)]
struct Cli {
    /// Configuration file to load instead of the standard locations.
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate a report and print it as JSON.
    Ask(RequestArgs),
    /// Print the composed prompt without calling the model.
    Prompt(RequestArgs),
    /// Validate configuration and health-check the configured data source.
    Check {
        /// Also print the effective configuration, secrets masked.
        #[arg(long)]
        show: bool,
    },
}

/// Arguments shared by commands that build a prompt.
#[derive(Args, Debug)]
struct RequestArgs {
    /// The natural-language request.
    prompt: String,

    /// SQL of the saved query being refined.
    #[arg(long, value_name = "SQL")]
    statement: Option<String>,

    /// JSON model catalog declaring models and their scopes.
    #[arg(long, value_name = "FILE")]
    catalog: Option<PathBuf>,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(errors) => {
            sage_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    init_tracing(&config.agent.log_level);

    if let Err(e) = run(cli.command, config).await {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn load_config(cli: &Cli) -> Result<SageConfig, Vec<ConfigError>> {
    match &cli.config {
        Some(path) => sage_config::load_and_validate_path(path),
        None => sage_config::load_and_validate(),
    }
}

async fn run(command: Commands, config: SageConfig) -> Result<(), SageError> {
    match command {
        Commands::Ask(args) => {
            let pipeline = Pipeline::open(config, args.catalog.as_deref()).await?;
            let query = cli_query(args.statement);
            let result = pipeline.ask(&query, &args.prompt).await?;
            let json = serde_json::to_string_pretty(&result)
                .map_err(|e| SageError::Internal(format!("failed to encode result: {e}")))?;
            println!("{json}");
        }
        Commands::Prompt(args) => {
            let pipeline = Pipeline::open(config, args.catalog.as_deref()).await?;
            let query = cli_query(args.statement);
            let composed = pipeline.preview(&query, &args.prompt).await;
            println!("{}", composed.instructions);
            println!("---");
            print!("{}", composed.message);
        }
        Commands::Check { show } => {
            println!(
                "sage: config OK (model={}, data_source={}, adapter={})",
                config.llm.model, config.data_source.name, config.data_source.adapter
            );
            let data_source = check_data_source(&config).await;
            println!("{}", data_source.describe());
            if show {
                let toml = config.to_redacted_toml().map_err(|e| {
                    SageError::Internal(format!("failed to render configuration: {e}"))
                })?;
                print!("{toml}");
            }
            if data_source.is_unhealthy() {
                return Err(SageError::data_source(format!(
                    "data source {} is not usable",
                    data_source.name
                )));
            }
        }
    }
    Ok(())
}

/// Initialize the tracing subscriber with an env filter.
///
/// Logs go to stderr so stdout carries only command output.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("sage={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
