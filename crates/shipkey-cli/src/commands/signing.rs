//! Release signing commands.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Subcommand;

use shipkey_core::models::SigningCredentials;
use shipkey_core::signing::{inspect_keystore, write_key_properties};

use crate::config::ResolvedSettings;

#[derive(Subcommand)]
pub enum SigningCommands {
    /// Load key.properties and check the keystore it points at
    Check,

    /// Create a key.properties file
    Init {
        /// Keystore path, as it should appear in storeFile
        #[arg(long)]
        store_file: PathBuf,

        /// Key alias inside the keystore
        #[arg(long)]
        key_alias: String,

        /// Keystore password
        #[arg(long, env = "SHIPKEY_STORE_PASSWORD", hide_env_values = true)]
        store_password: String,

        /// Key password
        #[arg(long, env = "SHIPKEY_KEY_PASSWORD", hide_env_values = true)]
        key_password: String,

        /// Overwrite an existing key.properties
        #[arg(long)]
        force: bool,
    },
}

pub fn handle_signing_command(settings: &ResolvedSettings, cmd: SigningCommands) -> Result<()> {
    match cmd {
        SigningCommands::Check => check_signing(settings),
        SigningCommands::Init {
            store_file,
            key_alias,
            store_password,
            key_password,
            force,
        } => init_signing(
            settings,
            store_file,
            key_alias,
            store_password,
            key_password,
            force,
        ),
    }
}

// ============================================================================
// Check
// ============================================================================

fn check_signing(settings: &ResolvedSettings) -> Result<()> {
    let source = settings.key_properties_source();
    let creds = source
        .load()
        .with_context(|| format!("Failed to load signing credentials from {}", source.path.display()))?;

    let info = inspect_keystore(creds.keystore_path()).with_context(|| {
        format!(
            "storeFile is resolved against {}",
            source.base_dir.display()
        )
    })?;

    println!("Signing Configuration");
    println!("=====================");
    println!();
    println!("Properties:     {}", source.path.display());
    println!("Keystore:       {}", info.path.display());
    println!("Keystore type:  {}", info.keystore_type);
    println!("Keystore size:  {} bytes", info.size_bytes);
    println!("Key alias:      {}", creds.key_alias());
    println!("Store password: ********");
    println!("Key password:   ********");

    Ok(())
}

// ============================================================================
// Init
// ============================================================================

fn init_signing(
    settings: &ResolvedSettings,
    store_file: PathBuf,
    key_alias: String,
    store_password: String,
    key_password: String,
    force: bool,
) -> Result<()> {
    // Passwords move straight into secret storage.
    let creds = SigningCredentials::new(store_file, store_password, key_alias, key_password);

    write_key_properties(&settings.properties, &creds, force)
        .with_context(|| format!("Failed to write {}", settings.properties.display()))?;

    println!("Created {}", settings.properties.display());
    println!();
    println!("storeFile will be resolved against {}", settings.keystore_base_dir.display());
    println!("Keep this file out of version control.");

    Ok(())
}
