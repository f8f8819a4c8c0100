//! Settings for the sprung framework.
//!
//! This module provides the [`Settings`] struct, which holds all framework
//! configuration with defaults mirroring a stock servlet deployment: the
//! dispatcher listens on port 8181, views resolve from a `templates/`
//! directory with an `.html` suffix, and uploads buffer in memory up to
//! 2.5 MB.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// View resolution configuration.
///
/// Mirrors Spring MVC's `InternalResourceViewResolver`: a view name returned
/// by a handler resolves to `<dir>/<name><suffix>`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewSettings {
    /// Directory view templates are loaded from (the resolver prefix).
    pub dir: PathBuf,
    /// Extension appended to view names (the resolver suffix).
    pub suffix: String,
}

impl Default for ViewSettings {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("templates"),
            suffix: ".html".to_string(),
        }
    }
}

/// Multipart upload configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadSettings {
    /// Maximum number of bytes a single uploaded file may occupy in memory.
    ///
    /// Files are request-scoped and never written to disk; a part larger
    /// than this cap fails the whole multipart parse.
    pub max_memory_bytes: usize,
}

impl Default for UploadSettings {
    fn default() -> Self {
        Self {
            max_memory_bytes: 2_621_440, // 2.5 MB
        }
    }
}

/// The complete set of framework settings.
///
/// Missing fields fall back to their defaults when deserializing, so a
/// configuration file only needs to name what it changes.
///
/// # Examples
///
/// ```
/// use sprung_core::settings::Settings;
///
/// let settings = Settings::default();
/// assert!(settings.debug);
/// assert_eq!(settings.server_addr, "127.0.0.1:8181");
/// assert_eq!(settings.views.suffix, ".html");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // ── Core ─────────────────────────────────────────────────────────

    /// Whether debug mode is enabled. Controls log formatting.
    pub debug: bool,
    /// Address the HTTP server binds to.
    pub server_addr: String,

    // ── Logging ──────────────────────────────────────────────────────

    /// The log level (e.g. "info", "debug", "warn").
    pub log_level: String,

    // ── Views ────────────────────────────────────────────────────────

    /// View resolution configuration.
    pub views: ViewSettings,

    // ── Uploads ──────────────────────────────────────────────────────

    /// Multipart upload configuration.
    pub uploads: UploadSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            debug: true,
            server_addr: "127.0.0.1:8181".to_string(),
            log_level: "info".to_string(),
            views: ViewSettings::default(),
            uploads: UploadSettings::default(),
        }
    }
}
