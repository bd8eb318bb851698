// SPDX-License-Identifier: Apache-2.0

//! avstack CLI
//!
//! Command-line interface for managing the two-container address-validation
//! stack: API backend plus Streamlit UI over docker-compose.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};

use avstack_core::{
    ConfigLoader, Deployment, DockerCompose, HttpProbe, StackConfig, StackResult, TokioClock,
};

mod commands;
mod output;

/// Config file picked up from the working directory when present.
const DEFAULT_CONFIG_FILE: &str = "avstack.yaml";

/// avstack - deployment CLI for the address-validation stack
#[derive(Parser)]
#[command(name = "avstack")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Stack configuration file (built-in defaults when omitted)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build images and start the stack
    Start,

    /// Stop the stack
    Stop,

    /// Stop, pause briefly, then build and start again
    Restart,

    /// Follow aggregated service logs until interrupted
    Logs,

    /// Show container listing plus current endpoint health
    Status,

    /// Probe the service health endpoints
    Health,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt().with_env_filter(log_level).init();

    if let Err(e) = run(cli).await {
        output::fatal(&e.to_string());
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> StackResult<()> {
    let config = load_config(cli.config.as_deref())?;

    let orchestrator = DockerCompose::new(
        &config.options.compose_file,
        &config.options.project_dir,
    );
    let probe = HttpProbe::new()?;
    let deployment = Deployment::new(config, orchestrator, probe, TokioClock);

    // Dispatch to command handlers
    match cli.command {
        Commands::Start => commands::start::execute(&deployment).await,
        Commands::Stop => commands::stop::execute(&deployment).await,
        Commands::Restart => commands::restart::execute(&deployment).await,
        Commands::Logs => commands::logs::execute(&deployment).await,
        Commands::Status => commands::status::execute(&deployment).await,
        Commands::Health => commands::health::execute(&deployment).await,
    }
}

/// Explicit `-c` must name an existing file; otherwise the default file is
/// used when present and built-in defaults apply when it is not.
fn load_config(path: Option<&Path>) -> StackResult<StackConfig> {
    match path {
        Some(path) => ConfigLoader::load_file(path),
        None => {
            if Path::new(DEFAULT_CONFIG_FILE).is_file() {
                ConfigLoader::load_file(DEFAULT_CONFIG_FILE)
            } else {
                Ok(StackConfig::default())
            }
        }
    }
}
