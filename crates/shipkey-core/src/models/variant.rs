//! Build variant models.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{Result, ShipkeyError};

use super::SigningCredentials;

// ============================================================================
// Variant Name
// ============================================================================

/// Closed set of build variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VariantName {
    Debug,
    Release,
}

impl VariantName {
    pub const ALL: [VariantName; 2] = [VariantName::Debug, VariantName::Release];

    pub fn as_str(&self) -> &'static str {
        match self {
            VariantName::Debug => "debug",
            VariantName::Release => "release",
        }
    }

    /// Whether artifacts of this variant must be signed with release credentials.
    pub fn requires_signing(&self) -> bool {
        matches!(self, VariantName::Release)
    }
}

impl std::str::FromStr for VariantName {
    type Err = ShipkeyError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "debug" => Ok(VariantName::Debug),
            "release" => Ok(VariantName::Release),
            _ => Err(ShipkeyError::InvalidVariant(format!(
                "Unknown variant '{}', expected 'debug' or 'release'",
                s
            ))),
        }
    }
}

impl std::fmt::Display for VariantName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// Debug Symbol Level
// ============================================================================

/// Native debug symbol level packaged with the artifact.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DebugSymbolLevel {
    #[default]
    None,
    Full,
}

impl DebugSymbolLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            DebugSymbolLevel::None => "none",
            DebugSymbolLevel::Full => "full",
        }
    }
}

impl std::str::FromStr for DebugSymbolLevel {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "none" => Ok(DebugSymbolLevel::None),
            "full" => Ok(DebugSymbolLevel::Full),
            _ => Err(format!("Unknown debug symbol level: {}", s)),
        }
    }
}

impl std::fmt::Display for DebugSymbolLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// Toggles
// ============================================================================

/// Packager options selected for a variant.
///
/// The default is everything off, which is what a debug build gets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Toggles {
    pub minify: bool,
    pub shrink_resources: bool,
    pub debug_symbol_level: DebugSymbolLevel,
}

impl Toggles {
    /// Checks that resource shrinking is only requested together with minification.
    pub fn validate(&self, variant: VariantName) -> Result<()> {
        if self.shrink_resources && !self.minify {
            return Err(ShipkeyError::InvalidToggleCombination { variant });
        }
        Ok(())
    }
}

/// Partial toggle set; unset fields keep the value they override.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ToggleOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minify: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shrink_resources: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debug_symbol_level: Option<DebugSymbolLevel>,
}

impl ToggleOverrides {
    pub fn is_empty(&self) -> bool {
        self.minify.is_none() && self.shrink_resources.is_none() && self.debug_symbol_level.is_none()
    }

    /// Applies these overrides on top of `base`.
    pub fn apply(&self, base: Toggles) -> Toggles {
        Toggles {
            minify: self.minify.unwrap_or(base.minify),
            shrink_resources: self.shrink_resources.unwrap_or(base.shrink_resources),
            debug_symbol_level: self.debug_symbol_level.unwrap_or(base.debug_symbol_level),
        }
    }
}

// ============================================================================
// Build Variant
// ============================================================================

/// A resolved, validated build policy handed to the packager.
///
/// Produced by [`resolve_variant`](crate::variant::resolve_variant) and moved
/// into [`hand_off`](crate::packager::hand_off) exactly once.
#[derive(Debug, PartialEq, Eq)]
pub struct BuildVariant {
    pub name: VariantName,
    pub minify: bool,
    pub shrink_resources: bool,
    pub debug_symbol_level: DebugSymbolLevel,
    pub signing: Option<SigningCredentials>,
}

impl BuildVariant {
    pub fn toggles(&self) -> Toggles {
        Toggles {
            minify: self.minify,
            shrink_resources: self.shrink_resources,
            debug_symbol_level: self.debug_symbol_level,
        }
    }

    pub fn is_signed(&self) -> bool {
        self.signing.is_some()
    }
}

// ============================================================================
// Project Pins
// ============================================================================

/// Opaque project values passed through to the packager untouched.
///
/// SDK levels, NDK and Java targets are not interpreted here; unknown keys
/// are kept in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectPins {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub application_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_sdk: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compile_sdk: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_sdk: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ndk_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub java_version: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub proguard_files: Vec<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}
