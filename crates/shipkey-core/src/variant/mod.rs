//! Build variant policy resolution.
//!
//! This module combines a variant name, its toggles and (for release builds)
//! signing credentials into a validated [`BuildVariant`](crate::models::BuildVariant).

pub mod resolver;
pub mod table;

pub use resolver::*;
pub use table::*;
