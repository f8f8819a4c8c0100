//! Core error types for the sprung framework.
//!
//! This module provides the [`SprungError`] enum covering routing, binding,
//! view resolution, upload, and configuration failures. It mirrors the
//! exception taxonomy a Spring MVC dispatcher surfaces: missing mappings,
//! unsupported methods, bind failures, unresolvable views.

use thiserror::Error;

/// The primary error type for the sprung framework.
///
/// Every variant maps to an HTTP status code via [`SprungError::status_code`],
/// so request-scoped failures become responses instead of crashing the
/// server. Registration-time failures (`DuplicateRoute`,
/// `ImproperlyConfigured`) are surfaced before the server starts serving.
#[derive(Error, Debug)]
pub enum SprungError {
    // ── Routing ──────────────────────────────────────────────────────

    /// No route is registered for the request path (HTTP 404).
    #[error("No mapping found for {method} {path}")]
    RouteNotFound {
        /// The request method.
        method: String,
        /// The request path.
        path: String,
    },

    /// The path is registered, but not under this method (HTTP 405).
    #[error("Request method '{method}' not supported for {path}")]
    MethodNotAllowed {
        method: String,
        path: String,
        /// Methods the path is registered under, for the `Allow` header.
        allowed: Vec<&'static str>,
    },

    /// A route was registered twice, or `ANY` overlaps an existing method
    /// registration for the same path.
    #[error("Ambiguous mapping: {method} {path} is already registered")]
    DuplicateRoute { method: String, path: String },

    // ── Binding ──────────────────────────────────────────────────────

    /// A request parameter was present but could not be coerced to the
    /// declared field type (HTTP 400).
    #[error("Failed to bind parameter '{field}': {reason}")]
    Binding { field: String, reason: String },

    /// A required request parameter was absent (HTTP 400).
    #[error("Required parameter '{field}' is not present")]
    MissingParameter { field: String },

    // ── Views ────────────────────────────────────────────────────────

    /// A handler named a view that the resolver could not load (HTTP 500).
    #[error("Could not resolve view '{view}'")]
    ViewNotFound { view: String },

    // ── Uploads ──────────────────────────────────────────────────────

    /// A multipart request body violated the multipart framing rules or
    /// exceeded the in-memory size cap (HTTP 400).
    #[error("Malformed multipart request: {0}")]
    MalformedUpload(String),

    // ── Configuration ────────────────────────────────────────────────

    /// The framework is improperly configured.
    #[error("Improperly configured: {0}")]
    ImproperlyConfigured(String),

    // ── IO ───────────────────────────────────────────────────────────

    /// An I/O error occurred.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl SprungError {
    /// Returns the HTTP status code associated with this error.
    ///
    /// - `Binding`, `MissingParameter`, `MalformedUpload` -> 400
    /// - `RouteNotFound` -> 404
    /// - `MethodNotAllowed` -> 405
    /// - Everything else -> 500
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::Binding { .. } | Self::MissingParameter { .. } | Self::MalformedUpload(_) => 400,
            Self::RouteNotFound { .. } => 404,
            Self::MethodNotAllowed { .. } => 405,
            Self::DuplicateRoute { .. }
            | Self::ViewNotFound { .. }
            | Self::ImproperlyConfigured(_)
            | Self::Io(_) => 500,
        }
    }
}

/// A convenience type alias for `Result<T, SprungError>`.
pub type SprungResult<T> = Result<T, SprungError>;
