//! # blockwiki CLI
//!
//! Command-line interface for the blockwiki static site generator.

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "blockwiki")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(long, default_value = "config.yml")]
    config: PathBuf,

    /// Defaults merged underneath the configuration file
    #[arg(long, default_value = "config.example.yml")]
    defaults: PathBuf,

    /// Notion integration secret (overrides the configuration files)
    #[arg(long, env = "BLOCKWIKI_NOTION_SECRET", hide_env_values = true)]
    secret: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the static site
    Build,

    /// Validate configuration without contacting the content source
    Check,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(if cli.verbose {
                tracing::Level::DEBUG.into()
            } else {
                tracing::Level::INFO.into()
            }),
        )
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = commands::load_config(&cli.defaults, &cli.config, cli.secret)?;

    match cli.command {
        Commands::Build => commands::build_site(config).await,
        Commands::Check => commands::check_config(&config),
    }
}
