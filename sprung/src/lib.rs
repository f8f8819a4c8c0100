//! # sprung
//!
//! A Spring MVC equivalent web framework for Rust.
//!
//! This is the meta-crate that re-exports all sub-crates for convenient
//! access. You can depend on `sprung` to get the whole framework, or depend
//! on individual crates for finer-grained control.

/// Core types, settings, logging setup, and error types.
pub use sprung_core as core;

/// HTTP layer: request, response, parameter dictionaries, multipart uploads.
#[cfg(feature = "http")]
pub use sprung_http as http;

/// MVC layer: route table, parameter binding, model attributes, view
/// resolution, and the dispatcher.
#[cfg(feature = "mvc")]
pub use sprung_mvc as mvc;
