//! Build configuration file (`shipkey.yaml`).
//!
//! ```yaml
//! signing:
//!   properties: android/key.properties   # relative to the project dir
//!   keystore_base_dir: android/app        # storeFile is resolved against this
//! variants:
//!   release:
//!     minify: true
//!     shrink_resources: true
//!     debug_symbol_level: full
//! pins:
//!   application_id: com.example.app
//!   min_sdk: 24
//!   ndk_version: "27.0.12077973"
//!   java_version: "21"
//! ```
//!
//! Every section is optional. Variants not listed keep the built-in
//! defaults from [`VariantTable::default`].

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, ShipkeyError};
use crate::models::{ProjectPins, ToggleOverrides, VariantName};
use crate::signing::KeyPropertiesSource;
use crate::variant::VariantTable;

/// Config file names looked up in the project directory, in priority order.
pub const CONFIG_FILE_NAMES: [&str; 2] = ["shipkey.yaml", ".shipkey.yaml"];

/// Default location of the signing property source.
pub const DEFAULT_KEY_PROPERTIES: &str = "key.properties";

/// Parsed `shipkey.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BuildConfig {
    pub signing: SigningConfig,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub variants: BTreeMap<VariantName, ToggleOverrides>,
    pub pins: ProjectPins,
}

/// Where signing material is found.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SigningConfig {
    /// Property source, relative to the project directory.
    pub properties: PathBuf,
    /// Directory `storeFile` is resolved against, relative to the project
    /// directory.
    pub keystore_base_dir: PathBuf,
}

impl Default for SigningConfig {
    fn default() -> Self {
        Self {
            properties: PathBuf::from(DEFAULT_KEY_PROPERTIES),
            keystore_base_dir: PathBuf::from("."),
        }
    }
}

impl BuildConfig {
    /// Builds the toggle table with this config's overrides applied.
    pub fn variant_table(&self) -> Result<VariantTable> {
        VariantTable::with_overrides(&self.variants)
    }

    pub fn properties_path(&self, project_dir: &Path) -> PathBuf {
        project_dir.join(&self.signing.properties)
    }

    pub fn keystore_base_dir(&self, project_dir: &Path) -> PathBuf {
        project_dir.join(&self.signing.keystore_base_dir)
    }

    /// The signing property source for a project rooted at `project_dir`.
    pub fn key_properties_source(&self, project_dir: &Path) -> KeyPropertiesSource {
        KeyPropertiesSource::new(
            self.properties_path(project_dir),
            self.keystore_base_dir(project_dir),
        )
    }
}

/// A config together with the file it was read from.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedConfig {
    pub config: BuildConfig,
    pub path: PathBuf,
}

/// Parses `shipkey.yaml` content.
///
/// An empty document yields the default config.
pub fn parse_build_config(content: &str) -> Result<BuildConfig> {
    let has_content = content
        .lines()
        .map(str::trim)
        .any(|line| !line.is_empty() && !line.starts_with('#'));
    if !has_content {
        return Ok(BuildConfig::default());
    }

    let config: BuildConfig = serde_yaml::from_str(content)
        .map_err(|e| ShipkeyError::ConfigParse(format!("Invalid YAML: {}", e)))?;

    validate_config(&config)?;

    Ok(config)
}

/// Renders a config back to YAML.
pub fn render_build_config(config: &BuildConfig) -> Result<String> {
    serde_yaml::to_string(config)
        .map_err(|e| ShipkeyError::ConfigParse(format!("Failed to serialize config: {}", e)))
}

/// Validates that the parsed config is usable.
fn validate_config(config: &BuildConfig) -> Result<()> {
    if config.signing.properties.as_os_str().is_empty() {
        return Err(ShipkeyError::ConfigParse(
            "signing.properties must not be empty".to_string(),
        ));
    }

    config.variant_table()?;

    Ok(())
}

/// Reads and parses the config file at `path`.
pub fn load_build_config_file(path: &Path) -> Result<BuildConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        ShipkeyError::ConfigParse(format!("Failed to read {}: {}", path.display(), e))
    })?;

    parse_build_config(&content).map_err(|e| match e {
        ShipkeyError::ConfigParse(msg) => {
            ShipkeyError::ConfigParse(format!("{}: {}", path.display(), msg))
        }
        other => other,
    })
}

/// Looks for a config file in `project_dir`.
///
/// Priority:
/// 1. shipkey.yaml
/// 2. .shipkey.yaml (hidden file variant)
///
/// Returns `Ok(None)` when neither exists.
pub fn load_build_config(project_dir: &Path) -> Result<Option<LoadedConfig>> {
    for name in CONFIG_FILE_NAMES {
        let path = project_dir.join(name);
        if path.is_file() {
            let config = load_build_config_file(&path)?;
            tracing::debug!("Loaded build config from {}", path.display());
            return Ok(Some(LoadedConfig { config, path }));
        }
    }

    tracing::debug!(
        "No build config found in {}, using defaults",
        project_dir.display()
    );
    Ok(None)
}
