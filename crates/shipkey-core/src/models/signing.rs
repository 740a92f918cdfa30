//! Release signing models.

use std::path::{Path, PathBuf};

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use subtle::ConstantTimeEq;

// ============================================================================
// Signing Credentials
// ============================================================================

/// Identity used to sign a release artifact.
///
/// Built once per build invocation, usually by
/// [`load_signing_credentials`](crate::signing::load_signing_credentials).
/// Passwords are held as [`SecretString`] and never appear in `Debug` output.
pub struct SigningCredentials {
    keystore_path: PathBuf,
    store_password: SecretString,
    key_alias: String,
    key_password: SecretString,
}

impl SigningCredentials {
    /// Creates a credential record from already-validated values.
    pub fn new(
        keystore_path: impl Into<PathBuf>,
        store_password: impl Into<String>,
        key_alias: impl Into<String>,
        key_password: impl Into<String>,
    ) -> Self {
        Self {
            keystore_path: keystore_path.into(),
            store_password: SecretString::from(store_password.into()),
            key_alias: key_alias.into(),
            key_password: SecretString::from(key_password.into()),
        }
    }

    pub fn keystore_path(&self) -> &Path {
        &self.keystore_path
    }

    pub fn store_password(&self) -> &SecretString {
        &self.store_password
    }

    pub fn key_alias(&self) -> &str {
        &self.key_alias
    }

    pub fn key_password(&self) -> &SecretString {
        &self.key_password
    }
}

impl PartialEq for SigningCredentials {
    fn eq(&self, other: &Self) -> bool {
        self.keystore_path == other.keystore_path
            && self.key_alias == other.key_alias
            && secrets_equal(&self.store_password, &other.store_password)
            && secrets_equal(&self.key_password, &other.key_password)
    }
}

impl Eq for SigningCredentials {}

impl std::fmt::Debug for SigningCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SigningCredentials")
            .field("keystore_path", &self.keystore_path)
            .field("store_password", &"[REDACTED]")
            .field("key_alias", &self.key_alias)
            .field("key_password", &"[REDACTED]")
            .finish()
    }
}

/// Constant-time equality for secret values.
fn secrets_equal(a: &SecretString, b: &SecretString) -> bool {
    let a = a.expose_secret().as_bytes();
    let b = b.expose_secret().as_bytes();
    if a.len() != b.len() {
        return false;
    }
    a.ct_eq(b).into()
}

/// Signing identity without secrets, safe to print or serialize.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SigningSummary {
    pub keystore_path: String,
    pub key_alias: String,
}

impl From<&SigningCredentials> for SigningSummary {
    fn from(creds: &SigningCredentials) -> Self {
        Self {
            keystore_path: creds.keystore_path.display().to_string(),
            key_alias: creds.key_alias.clone(),
        }
    }
}

// ============================================================================
// Keystore
// ============================================================================

/// Android keystore container format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeystoreType {
    Jks,
    Pkcs12,
}

impl KeystoreType {
    pub fn as_str(&self) -> &'static str {
        match self {
            KeystoreType::Jks => "jks",
            KeystoreType::Pkcs12 => "pkcs12",
        }
    }
}

impl std::str::FromStr for KeystoreType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "jks" => Ok(KeystoreType::Jks),
            "pkcs12" => Ok(KeystoreType::Pkcs12),
            _ => Err(format!("Unknown keystore type: {}", s)),
        }
    }
}

impl std::fmt::Display for KeystoreType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Information gathered from a keystore file on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeystoreInfo {
    pub path: PathBuf,
    pub keystore_type: KeystoreType,
    pub size_bytes: u64,
}
