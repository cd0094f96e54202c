use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "kpactl",
    about = "Resolve PodAutoscalers into autoscaler Deciders",
    version,
    propagate_version = true,
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve the Decider for a PodAutoscaler and print it as JSON.
    Decide {
        /// PodAutoscaler document (JSON).
        #[arg(long)]
        pa: PathBuf,
        /// Cluster autoscaler config (TOML). Defaults apply when omitted.
        #[arg(long)]
        config: Option<PathBuf>,
        /// Service to scale. Defaults to the PA's spec.serviceName.
        #[arg(long)]
        service: Option<String>,
    },
    /// Inspect cluster autoscaler config.
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the default config as TOML.
    Defaults,
    /// Load and validate a config file.
    Validate {
        path: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,kpactl=debug,kpa_deciders=debug")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Decide { pa, config, service } => {
            commands::decide::decide(&pa, config.as_deref(), service.as_deref())
        }
        Commands::Config { action } => match action {
            ConfigAction::Defaults => commands::config::defaults(),
            ConfigAction::Validate { path } => commands::config::validate(&path),
        },
    }
}
