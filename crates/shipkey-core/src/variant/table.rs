//! Enum-keyed toggle table.

use std::collections::BTreeMap;

use crate::error::Result;
use crate::models::{
    BuildVariant, DebugSymbolLevel, SigningCredentials, ToggleOverrides, Toggles, VariantName,
};

use super::resolve_variant;

/// Toggles for every variant, one entry per [`VariantName`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantTable {
    entries: BTreeMap<VariantName, Toggles>,
}

impl Default for VariantTable {
    /// Debug builds get everything off; release builds are minified, shrunk
    /// and ship full native debug symbols.
    fn default() -> Self {
        let mut entries = BTreeMap::new();
        entries.insert(VariantName::Debug, Toggles::default());
        entries.insert(
            VariantName::Release,
            Toggles {
                minify: true,
                shrink_resources: true,
                debug_symbol_level: DebugSymbolLevel::Full,
            },
        );
        Self { entries }
    }
}

impl VariantTable {
    /// Builds a table from the defaults with per-variant overrides applied.
    ///
    /// Fails if any resulting entry requests resource shrinking without
    /// minification.
    pub fn with_overrides(overrides: &BTreeMap<VariantName, ToggleOverrides>) -> Result<Self> {
        let mut table = Self::default();
        for (name, over) in overrides {
            let merged = over.apply(table.toggles(*name));
            merged.validate(*name)?;
            table.entries.insert(*name, merged);
        }
        Ok(table)
    }

    /// Returns the toggles for `name`.
    pub fn toggles(&self, name: VariantName) -> Toggles {
        self.entries.get(&name).copied().unwrap_or_default()
    }

    /// Replaces the toggles for `name`.
    pub fn set(&mut self, name: VariantName, toggles: Toggles) {
        self.entries.insert(name, toggles);
    }

    pub fn iter(&self) -> impl Iterator<Item = (VariantName, Toggles)> + '_ {
        self.entries.iter().map(|(name, toggles)| (*name, *toggles))
    }

    /// Resolves `name` using the toggles held in this table.
    pub fn resolve<F>(&self, name: VariantName, credentials_provider: F) -> Result<BuildVariant>
    where
        F: FnOnce() -> Result<SigningCredentials>,
    {
        resolve_variant(name, self.toggles(name), credentials_provider)
    }
}
