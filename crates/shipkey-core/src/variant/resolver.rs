//! Build variant resolver.
//!
//! Resolution is a single pass:
//! 1. Validate the toggle combination
//! 2. For release builds, ask the credentials provider for signing material
//! 3. Assemble the immutable [`BuildVariant`]
//!
//! Any failure ends resolution; there is no partially resolved policy.

use crate::error::Result;
use crate::models::{BuildVariant, SigningCredentials, Toggles, VariantName};

/// Resolves a build variant.
///
/// `credentials_provider` is only called for variants that require signing,
/// so debug builds never need signing material to be present. Its error is
/// returned unchanged. Toggles are validated first, so an invalid combination
/// is reported without touching signing material.
///
/// The provider's result is not cached; resolving again calls it again.
pub fn resolve_variant<F>(
    name: VariantName,
    toggles: Toggles,
    credentials_provider: F,
) -> Result<BuildVariant>
where
    F: FnOnce() -> Result<SigningCredentials>,
{
    toggles.validate(name)?;

    let signing = if name.requires_signing() {
        Some(credentials_provider()?)
    } else {
        None
    };

    tracing::debug!(
        "Resolved {} variant (minify={}, shrink_resources={}, debug_symbols={}, signed={})",
        name,
        toggles.minify,
        toggles.shrink_resources,
        toggles.debug_symbol_level,
        signing.is_some()
    );

    Ok(BuildVariant {
        name,
        minify: toggles.minify,
        shrink_resources: toggles.shrink_resources,
        debug_symbol_level: toggles.debug_symbol_level,
        signing,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ShipkeyError;
    use crate::models::DebugSymbolLevel;
    use std::cell::Cell;
    use std::path::PathBuf;

    fn creds() -> SigningCredentials {
        SigningCredentials::new("a.jks", "p1", "k1", "p2")
    }

    fn release_toggles() -> Toggles {
        Toggles {
            minify: true,
            shrink_resources: true,
            debug_symbol_level: DebugSymbolLevel::Full,
        }
    }

    #[test]
    fn test_debug_never_invokes_provider() {
        let called = Cell::new(false);

        let variant = resolve_variant(VariantName::Debug, Toggles::default(), || {
            called.set(true);
            Ok(creds())
        })
        .unwrap();

        assert!(!called.get());
        assert_eq!(variant.name, VariantName::Debug);
        assert!(!variant.minify);
        assert!(!variant.shrink_resources);
        assert_eq!(variant.debug_symbol_level, DebugSymbolLevel::None);
        assert!(variant.signing.is_none());
    }

    #[test]
    fn test_debug_with_failing_provider_succeeds() {
        let variant = resolve_variant(VariantName::Debug, Toggles::default(), || {
            Err(ShipkeyError::MissingSource {
                path: PathBuf::from("key.properties"),
            })
        })
        .unwrap();

        assert!(!variant.is_signed());
    }

    #[test]
    fn test_debug_honours_explicit_toggles() {
        let variant =
            resolve_variant(VariantName::Debug, release_toggles(), || Ok(creds())).unwrap();

        assert!(variant.minify);
        assert!(variant.shrink_resources);
        assert_eq!(variant.debug_symbol_level, DebugSymbolLevel::Full);
        assert!(variant.signing.is_none());
    }

    #[test]
    fn test_release_carries_provider_credentials() {
        let variant =
            resolve_variant(VariantName::Release, release_toggles(), || Ok(creds())).unwrap();

        assert_eq!(variant.name, VariantName::Release);
        assert_eq!(variant.toggles(), release_toggles());
        assert_eq!(variant.signing, Some(creds()));
    }

    #[test]
    fn test_release_propagates_provider_error_unchanged() {
        let err = resolve_variant(VariantName::Release, release_toggles(), || {
            Err(ShipkeyError::MissingField {
                field: "keyPassword",
                path: PathBuf::from("android/key.properties"),
            })
        })
        .unwrap_err();

        match err {
            ShipkeyError::MissingField { field, path } => {
                assert_eq!(field, "keyPassword");
                assert_eq!(path, PathBuf::from("android/key.properties"));
            }
            other => panic!("expected MissingField, got {:?}", other),
        }
    }

    #[test]
    fn test_shrink_without_minify_fails_for_every_variant() {
        let toggles = Toggles {
            minify: false,
            shrink_resources: true,
            debug_symbol_level: DebugSymbolLevel::None,
        };

        for name in VariantName::ALL {
            let err = resolve_variant(name, toggles, || Ok(creds())).unwrap_err();
            assert!(matches!(err, ShipkeyError::InvalidToggleCombination { variant } if variant == name));
        }
    }

    #[test]
    fn test_invalid_toggles_win_over_provider_failure() {
        let toggles = Toggles {
            minify: false,
            shrink_resources: true,
            debug_symbol_level: DebugSymbolLevel::Full,
        };
        let called = Cell::new(false);

        let err = resolve_variant(VariantName::Release, toggles, || {
            called.set(true);
            Err(ShipkeyError::MissingSource {
                path: PathBuf::from("key.properties"),
            })
        })
        .unwrap_err();

        assert!(matches!(err, ShipkeyError::InvalidToggleCombination { .. }));
        assert!(!called.get());
    }

    #[test]
    fn test_resolution_is_idempotent() {
        let first = resolve_variant(VariantName::Release, release_toggles(), || Ok(creds())).unwrap();
        let second = resolve_variant(VariantName::Release, release_toggles(), || Ok(creds())).unwrap();
        assert_eq!(first, second);

        let first = resolve_variant(VariantName::Debug, Toggles::default(), || Ok(creds())).unwrap();
        let second = resolve_variant(VariantName::Debug, Toggles::default(), || Ok(creds())).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_provider_called_on_every_resolution() {
        let calls = Cell::new(0);
        let provider = || {
            calls.set(calls.get() + 1);
            Ok(creds())
        };

        resolve_variant(VariantName::Release, release_toggles(), provider).unwrap();
        resolve_variant(VariantName::Release, release_toggles(), provider).unwrap();

        assert_eq!(calls.get(), 2);
    }
}
