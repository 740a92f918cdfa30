//! Domain models for signing credentials and build variants.

pub mod signing;
pub mod variant;

pub use signing::*;
pub use variant::*;
