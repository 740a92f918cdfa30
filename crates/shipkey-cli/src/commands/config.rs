//! `shipkey config` commands for inspecting the build configuration.

use anyhow::{bail, Context, Result};
use clap::Subcommand;
use std::fs;

use shipkey_core::config::{render_build_config, CONFIG_FILE_NAMES};

use crate::config::ResolvedSettings;

/// Starter `shipkey.yaml` written by `shipkey config init`.
pub const CONFIG_TEMPLATE: &str = r#"# shipkey build configuration
signing:
  # key.properties location, relative to this directory
  properties: key.properties
  # storeFile inside key.properties is resolved against this directory
  keystore_base_dir: .

variants:
  debug:
    minify: false
    shrink_resources: false
    debug_symbol_level: none
  release:
    minify: true
    shrink_resources: true
    debug_symbol_level: full

pins: {}
"#;

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Create a shipkey.yaml in the project directory
    Init {
        /// Overwrite existing config file
        #[arg(long)]
        force: bool,
    },

    /// Show the effective configuration
    Show,

    /// Show config file path
    Path,
}

pub fn handle_config_command(settings: &ResolvedSettings, cmd: ConfigCommands) -> Result<()> {
    match cmd {
        ConfigCommands::Init { force } => init_config(settings, force),
        ConfigCommands::Show => show_config(settings),
        ConfigCommands::Path => show_path(settings),
    }
}

/// Create a new config file.
fn init_config(settings: &ResolvedSettings, force: bool) -> Result<()> {
    let config_path = settings.project_dir.join(CONFIG_FILE_NAMES[0]);

    if config_path.exists() && !force {
        bail!(
            "Config file already exists at {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    fs::write(&config_path, CONFIG_TEMPLATE)
        .with_context(|| format!("Failed to write {}", config_path.display()))?;

    println!("Created config file at {}", config_path.display());
    Ok(())
}

/// Display the effective configuration.
fn show_config(settings: &ResolvedSettings) -> Result<()> {
    match &settings.config_path {
        Some(path) => println!("Config file: {}", path.display()),
        None => println!("Config file: none (using defaults)"),
    }
    println!("Properties:  {}", settings.properties.display());
    println!("Keystore base dir: {}", settings.keystore_base_dir.display());
    println!();

    println!("Variants:");
    let table = settings.config.variant_table()?;
    for (name, toggles) in table.iter() {
        println!(
            "  {:<8} minify={} shrink_resources={} debug_symbols={}",
            name, toggles.minify, toggles.shrink_resources, toggles.debug_symbol_level
        );
    }
    println!();

    println!("Resolved file contents:");
    print!("{}", render_build_config(&settings.config)?);

    Ok(())
}

fn show_path(settings: &ResolvedSettings) -> Result<()> {
    match &settings.config_path {
        Some(path) => println!("{}", path.display()),
        None => println!(
            "{} (not created)",
            settings.project_dir.join(CONFIG_FILE_NAMES[0]).display()
        ),
    }
    Ok(())
}
