//! Signing credential loading from `key.properties`.

use std::path::{Path, PathBuf};

use zeroize::Zeroizing;

use crate::error::{Result, ShipkeyError};
use crate::models::SigningCredentials;

use super::android::warn_if_permissive;
use super::properties::{parse_properties, Properties};

/// Property holding the keystore path.
pub const STORE_FILE: &str = "storeFile";
/// Property holding the keystore password.
pub const STORE_PASSWORD: &str = "storePassword";
/// Property holding the key alias.
pub const KEY_ALIAS: &str = "keyAlias";
/// Property holding the key password.
pub const KEY_PASSWORD: &str = "keyPassword";

/// Required properties, in the order they are checked.
pub const REQUIRED_KEYS: [&str; 4] = [STORE_FILE, STORE_PASSWORD, KEY_ALIAS, KEY_PASSWORD];

/// Loads signing credentials from a property source.
///
/// `storeFile` is resolved against `base_dir`, not against the directory
/// containing `source`. Absolute `storeFile` values are used as-is.
///
/// The source is re-read on every call; nothing is cached.
pub fn load_signing_credentials(source: &Path, base_dir: &Path) -> Result<SigningCredentials> {
    match source.try_exists() {
        Ok(true) => {}
        Ok(false) => {
            return Err(ShipkeyError::MissingSource {
                path: source.to_path_buf(),
            });
        }
        Err(e) => return Err(unreadable(source, e.to_string())),
    }

    let bytes = Zeroizing::new(std::fs::read(source).map_err(|e| unreadable(source, e.to_string()))?);
    let content = std::str::from_utf8(&bytes)
        .map_err(|_| unreadable(source, "content is not valid UTF-8".to_string()))?;
    let props = parse_properties(content).map_err(|e| unreadable(source, e.to_string()))?;

    warn_if_permissive(source);

    let store_file = require(&props, STORE_FILE, source)?;
    let store_password = require(&props, STORE_PASSWORD, source)?;
    let key_alias = require(&props, KEY_ALIAS, source)?;
    let key_password = require(&props, KEY_PASSWORD, source)?;

    let keystore_path = base_dir.join(store_file);

    tracing::debug!(
        "Loaded signing credentials for alias '{}' from {} (keystore {})",
        key_alias,
        source.display(),
        keystore_path.display()
    );

    Ok(SigningCredentials::new(
        keystore_path,
        store_password,
        key_alias,
        key_password,
    ))
}

/// A `key.properties` location paired with the directory its `storeFile`
/// is resolved against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPropertiesSource {
    pub path: PathBuf,
    pub base_dir: PathBuf,
}

impl KeyPropertiesSource {
    pub fn new(path: impl Into<PathBuf>, base_dir: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            base_dir: base_dir.into(),
        }
    }

    /// Reads and validates the credentials.
    pub fn load(&self) -> Result<SigningCredentials> {
        load_signing_credentials(&self.path, &self.base_dir)
    }
}

fn require<'a>(props: &'a Properties, field: &'static str, source: &Path) -> Result<&'a str> {
    match props.get(field) {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ShipkeyError::MissingField {
            field,
            path: source.to_path_buf(),
        }),
    }
}

fn unreadable(source: &Path, reason: String) -> ShipkeyError {
    ShipkeyError::UnreadableSource {
        path: source.to_path_buf(),
        reason,
    }
}
