//! CLI settings loading and resolution.
//!
//! Signing locations are resolved with priority order:
//! CLI flags > environment variables > `shipkey.yaml` > defaults.
//!
//! Paths given by flags or environment variables are taken as-is (relative
//! to the working directory); paths from the config file are relative to the
//! project directory.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use shipkey_core::config::{load_build_config, load_build_config_file, BuildConfig, LoadedConfig};
use shipkey_core::signing::KeyPropertiesSource;

/// Environment variable overriding the key.properties location.
pub const KEY_PROPERTIES_ENV: &str = "SHIPKEY_KEY_PROPERTIES";
/// Environment variable overriding the keystore base directory.
pub const KEYSTORE_BASE_DIR_ENV: &str = "SHIPKEY_KEYSTORE_BASE_DIR";

/// Settings after applying priority rules.
#[derive(Debug, Clone)]
pub struct ResolvedSettings {
    /// Project root.
    pub project_dir: PathBuf,
    /// Config file in effect, if any.
    pub config_path: Option<PathBuf>,
    /// Parsed config (defaults when no file exists).
    pub config: BuildConfig,
    /// key.properties location.
    pub properties: PathBuf,
    /// Directory `storeFile` is resolved against.
    pub keystore_base_dir: PathBuf,
}

impl ResolvedSettings {
    pub fn key_properties_source(&self) -> KeyPropertiesSource {
        KeyPropertiesSource::new(&self.properties, &self.keystore_base_dir)
    }
}

/// Load the build config.
///
/// An explicit `--config` path must exist; otherwise the project directory
/// is searched and a missing file means defaults.
pub fn load_config(project_dir: &Path, config_flag: Option<&Path>) -> Result<Option<LoadedConfig>> {
    match config_flag {
        Some(path) => {
            let config = load_build_config_file(path)
                .with_context(|| format!("Failed to load config {}", path.display()))?;
            Ok(Some(LoadedConfig {
                config,
                path: path.to_path_buf(),
            }))
        }
        None => load_build_config(project_dir)
            .with_context(|| format!("Failed to load config from {}", project_dir.display())),
    }
}

/// Resolve settings by applying priority rules.
///
/// Priority order (highest to lowest):
/// 1. CLI flags (`--properties`, `--keystore-base-dir`)
/// 2. Environment variables (`SHIPKEY_KEY_PROPERTIES`, `SHIPKEY_KEYSTORE_BASE_DIR`)
/// 3. Config file `signing` section
/// 4. Defaults (`key.properties` and `.` under the project directory)
pub fn resolve_settings(
    project_dir: &Path,
    properties_flag: Option<&Path>,
    base_dir_flag: Option<&Path>,
    loaded: Option<LoadedConfig>,
) -> ResolvedSettings {
    let (config, config_path) = match loaded {
        Some(loaded) => (loaded.config, Some(loaded.path)),
        None => (BuildConfig::default(), None),
    };

    // Config file (or its defaults) is the lowest priority
    let mut properties = config.properties_path(project_dir);
    let mut keystore_base_dir = config.keystore_base_dir(project_dir);

    if let Ok(env_path) = std::env::var(KEY_PROPERTIES_ENV) {
        if !env_path.is_empty() {
            properties = PathBuf::from(env_path);
        }
    }
    if let Ok(env_dir) = std::env::var(KEYSTORE_BASE_DIR_ENV) {
        if !env_dir.is_empty() {
            keystore_base_dir = PathBuf::from(env_dir);
        }
    }

    if let Some(p) = properties_flag {
        properties = p.to_path_buf();
    }
    if let Some(d) = base_dir_flag {
        keystore_base_dir = d.to_path_buf();
    }

    tracing::debug!(
        "Using key.properties at {} with keystore base {}",
        properties.display(),
        keystore_base_dir.display()
    );

    ResolvedSettings {
        project_dir: project_dir.to_path_buf(),
        config_path,
        config,
        properties,
        keystore_base_dir,
    }
}
