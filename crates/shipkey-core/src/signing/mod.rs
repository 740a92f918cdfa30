//! Release signing credentials.
//!
//! This module provides functionality for:
//! - Parsing `key.properties` style key/value sources
//! - Loading validated signing credentials from them
//! - Android keystore inspection and key.properties generation

pub mod android;
pub mod loader;
pub mod properties;

pub use android::*;
pub use loader::*;
pub use properties::*;
