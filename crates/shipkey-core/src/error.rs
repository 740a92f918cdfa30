//! Error types for the shipkey core library.

use std::path::PathBuf;

use thiserror::Error;

use crate::models::VariantName;

/// Core error type for signing and variant resolution.
///
/// Every variant is terminal for the build invocation that produced it.
#[derive(Error, Debug)]
pub enum ShipkeyError {
    #[error("Signing property source not found: {}", path.display())]
    MissingSource { path: PathBuf },

    #[error("Signing property '{field}' is missing or empty in {}", path.display())]
    MissingField {
        field: &'static str,
        path: PathBuf,
    },

    #[error("Signing property source {} is unreadable: {reason}", path.display())]
    UnreadableSource { path: PathBuf, reason: String },

    #[error("Invalid toggles for {variant} variant: shrink_resources requires minify")]
    InvalidToggleCombination { variant: VariantName },

    #[error("Release variant has no signing credentials")]
    UnsignedRelease,

    #[error("Keystore not found: {}", path.display())]
    KeystoreNotFound { path: PathBuf },

    #[error("File already exists: {}", path.display())]
    AlreadyExists { path: PathBuf },

    #[error("Build configuration error: {0}")]
    ConfigParse(String),

    #[error("Invalid variant: {0}")]
    InvalidVariant(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for shipkey operations.
pub type Result<T> = std::result::Result<T, ShipkeyError>;
