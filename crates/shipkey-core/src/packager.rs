//! Hand-off of resolved build policies to a packager.
//!
//! Compiling and packaging the artifact happens outside this crate. A
//! [`Packager`] receives the resolved [`BuildVariant`] by value, so each
//! policy is consumed exactly once.

use serde::Serialize;

use crate::error::{Result, ShipkeyError};
use crate::models::{BuildVariant, DebugSymbolLevel, ProjectPins, SigningSummary, VariantName};

/// External compiler/packager collaborator.
pub trait Packager {
    /// What a successful packaging run produces.
    type Artifact;

    /// Packages the artifact described by `variant`.
    fn package(&mut self, variant: BuildVariant, pins: &ProjectPins) -> Result<Self::Artifact>;
}

/// Checks a variant and moves it into `packager`.
///
/// Rejects release variants without signing credentials and toggle sets that
/// shrink resources without minifying. Variants produced by
/// [`resolve_variant`](crate::variant::resolve_variant) always pass; records
/// assembled by hand may not.
pub fn hand_off<P: Packager>(
    packager: &mut P,
    variant: BuildVariant,
    pins: &ProjectPins,
) -> Result<P::Artifact> {
    if variant.name.requires_signing() && variant.signing.is_none() {
        return Err(ShipkeyError::UnsignedRelease);
    }
    variant.toggles().validate(variant.name)?;

    tracing::info!("Handing {} variant to packager", variant.name);
    packager.package(variant, pins)
}

/// Secret-free view of a resolved build policy.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PolicySummary {
    pub variant: VariantName,
    pub minify: bool,
    pub shrink_resources: bool,
    pub debug_symbol_level: DebugSymbolLevel,
    pub signing: Option<SigningSummary>,
    pub pins: ProjectPins,
}

impl PolicySummary {
    pub fn new(variant: &BuildVariant, pins: &ProjectPins) -> Self {
        Self {
            variant: variant.name,
            minify: variant.minify,
            shrink_resources: variant.shrink_resources,
            debug_symbol_level: variant.debug_symbol_level,
            signing: variant.signing.as_ref().map(SigningSummary::from),
            pins: pins.clone(),
        }
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Dry-run packager: produces the policy summary and drops the credentials.
#[derive(Debug, Default)]
pub struct SummaryPackager;

impl Packager for SummaryPackager {
    type Artifact = PolicySummary;

    fn package(&mut self, variant: BuildVariant, pins: &ProjectPins) -> Result<PolicySummary> {
        Ok(PolicySummary::new(&variant, pins))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SigningCredentials;

    /// Records every variant it receives.
    #[derive(Default)]
    struct RecordingPackager {
        received: Vec<VariantName>,
    }

    impl Packager for RecordingPackager {
        type Artifact = usize;

        fn package(&mut self, variant: BuildVariant, _pins: &ProjectPins) -> Result<usize> {
            self.received.push(variant.name);
            Ok(self.received.len())
        }
    }

    fn signed_release() -> BuildVariant {
        BuildVariant {
            name: VariantName::Release,
            minify: true,
            shrink_resources: true,
            debug_symbol_level: DebugSymbolLevel::Full,
            signing: Some(SigningCredentials::new("a.jks", "p1", "k1", "p2")),
        }
    }

    #[test]
    fn test_hand_off_signed_release() {
        let mut packager = RecordingPackager::default();

        let count = hand_off(&mut packager, signed_release(), &ProjectPins::default()).unwrap();

        assert_eq!(count, 1);
        assert_eq!(packager.received, vec![VariantName::Release]);
    }

    #[test]
    fn test_hand_off_rejects_unsigned_release() {
        let mut packager = RecordingPackager::default();
        let variant = BuildVariant {
            signing: None,
            ..signed_release()
        };

        let err = hand_off(&mut packager, variant, &ProjectPins::default()).unwrap_err();

        assert!(matches!(err, ShipkeyError::UnsignedRelease));
        assert!(packager.received.is_empty());
    }

    #[test]
    fn test_hand_off_rejects_shrink_without_minify() {
        let mut packager = RecordingPackager::default();
        let variant = BuildVariant {
            name: VariantName::Debug,
            minify: false,
            shrink_resources: true,
            debug_symbol_level: DebugSymbolLevel::None,
            signing: None,
        };

        let err = hand_off(&mut packager, variant, &ProjectPins::default()).unwrap_err();
        assert!(matches!(err, ShipkeyError::InvalidToggleCombination { .. }));
    }

    #[test]
    fn test_hand_off_unsigned_debug() {
        let mut packager = RecordingPackager::default();
        let variant = BuildVariant {
            name: VariantName::Debug,
            minify: false,
            shrink_resources: false,
            debug_symbol_level: DebugSymbolLevel::None,
            signing: None,
        };

        assert!(hand_off(&mut packager, variant, &ProjectPins::default()).is_ok());
    }

    #[test]
    fn test_summary_json_has_no_secrets() {
        let pins = ProjectPins {
            application_id: Some("com.example.app".to_string()),
            min_sdk: Some(24),
            ..Default::default()
        };

        let summary = hand_off(&mut SummaryPackager, signed_release(), &pins).unwrap();
        let json = summary.to_json_pretty().unwrap();

        assert!(json.contains("\"variant\": \"release\""));
        assert!(json.contains("\"debug_symbol_level\": \"full\""));
        assert!(json.contains("\"key_alias\": \"k1\""));
        assert!(json.contains("com.example.app"));
        assert!(!json.contains("p1"));
        assert!(!json.contains("p2"));
    }
}
