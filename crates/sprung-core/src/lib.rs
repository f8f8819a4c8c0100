//! # sprung-core
//!
//! Core types, settings, and error types for the sprung framework.
//! This crate has zero framework dependencies and provides the foundation
//! for the HTTP and MVC crates.
//!
//! ## Modules
//!
//! - [`error`] - Error types and result alias
//! - [`settings`] - Framework settings
//! - [`settings_loader`] - Loading settings from TOML and the environment
//! - [`logging`] - Tracing-based logging integration

pub mod error;
pub mod logging;
pub mod settings;
pub mod settings_loader;

// Re-export the most commonly used types at the crate root.
pub use error::{SprungError, SprungResult};
pub use settings::Settings;
