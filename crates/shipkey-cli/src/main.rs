use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;

use commands::{
    config::{handle_config_command, ConfigCommands},
    resolve::{handle_resolve_command, ResolveArgs},
    signing::{handle_signing_command, SigningCommands},
};

#[derive(Parser)]
#[command(name = "shipkey")]
#[command(about = "Release signing and build variant resolver for Android builds", long_about = None)]
struct Cli {
    /// Project directory containing shipkey.yaml
    #[arg(long, env = "SHIPKEY_PROJECT_DIR", global = true, default_value = ".")]
    project_dir: PathBuf,

    /// Config file (overrides lookup in the project directory)
    #[arg(long, env = "SHIPKEY_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// key.properties location (overrides env and config)
    #[arg(long, global = true)]
    properties: Option<PathBuf>,

    /// Directory storeFile is resolved against (overrides env and config)
    #[arg(long, global = true)]
    keystore_base_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve a build variant and print its policy
    Resolve(ResolveArgs),

    /// Release signing management
    #[command(subcommand)]
    Signing(SigningCommands),

    /// Build configuration management
    #[command(subcommand)]
    Config(ConfigCommands),

    /// Show CLI version
    Version,
}

fn main() -> Result<()> {
    // Load .env file if present (doesn't override existing env vars)
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "shipkey=info,shipkey_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    if let Commands::Version = cli.command {
        println!("shipkey {}", shipkey_core::VERSION);
        return Ok(());
    }

    let loaded = config::load_config(&cli.project_dir, cli.config.as_deref())?;
    let settings = config::resolve_settings(
        &cli.project_dir,
        cli.properties.as_deref(),
        cli.keystore_base_dir.as_deref(),
        loaded,
    );

    match cli.command {
        Commands::Resolve(args) => handle_resolve_command(&settings, args)?,
        Commands::Signing(cmd) => handle_signing_command(&settings, cmd)?,
        Commands::Config(cmd) => handle_config_command(&settings, cmd)?,
        Commands::Version => unreachable!(), // Handled above
    }

    Ok(())
}
