//! Shipkey Core Library
//!
//! Release signing credential loading and build variant policy resolution
//! for Android/Flutter release builds.

pub mod config;
pub mod error;
pub mod models;
pub mod packager;
pub mod signing;
pub mod variant;

pub use error::{Result, ShipkeyError};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
