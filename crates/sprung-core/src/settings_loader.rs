//! Settings loading from configuration files.
//!
//! This module provides functions to load [`Settings`] from TOML files and
//! to apply environment variable overrides. It mirrors the concept of a
//! servlet deployment descriptor, but as a configuration file instead of
//! XML.
//!
//! ## Loading Order
//!
//! 1. Start with default settings.
//! 2. Load from a TOML file (overriding defaults).
//! 3. Apply environment variable overrides (highest priority).
//!
//! ## Environment Variable Mapping
//!
//! | Env Var | Setting |
//! |---|---|
//! | `SPRUNG_DEBUG` | `debug` |
//! | `SPRUNG_SERVER_ADDR` | `server_addr` |
//! | `SPRUNG_LOG_LEVEL` | `log_level` |
//! | `SPRUNG_VIEWS_DIR` | `views.dir` |
//! | `SPRUNG_VIEWS_SUFFIX` | `views.suffix` |
//! | `SPRUNG_UPLOAD_MAX_BYTES` | `uploads.max_memory_bytes` |

use std::path::Path;

use crate::error::SprungError;
use crate::settings::Settings;

/// Loads settings from a TOML string.
///
/// Fields not present in the TOML keep their default values.
///
/// # Errors
///
/// Returns an error if the TOML is malformed or cannot be deserialized.
pub fn from_toml_str(toml_str: &str) -> Result<Settings, SprungError> {
    toml::from_str(toml_str)
        .map_err(|e| SprungError::ImproperlyConfigured(format!("Failed to parse TOML: {e}")))
}

/// Loads settings from a TOML file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or the TOML is malformed.
pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Settings, SprungError> {
    let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
        SprungError::ImproperlyConfigured(format!(
            "Failed to read TOML file '{}': {e}",
            path.as_ref().display()
        ))
    })?;
    from_toml_str(&content)
}

/// Loads settings from a TOML file and then applies environment variable
/// overrides.
///
/// # Errors
///
/// Returns an error if the file cannot be read or the TOML is malformed.
pub fn from_toml_file_with_env(path: impl AsRef<Path>) -> Result<Settings, SprungError> {
    let mut settings = from_toml_file(path)?;
    apply_env_overrides(&mut settings);
    Ok(settings)
}

/// Loads settings from just environment variables (starting from defaults).
pub fn from_env() -> Settings {
    let mut settings = Settings::default();
    apply_env_overrides(&mut settings);
    settings
}

/// Applies environment variable overrides to a settings struct.
pub fn apply_env_overrides(settings: &mut Settings) {
    if let Ok(val) = std::env::var("SPRUNG_DEBUG") {
        settings.debug = matches!(val.to_lowercase().as_str(), "true" | "1" | "yes");
    }

    if let Ok(val) = std::env::var("SPRUNG_SERVER_ADDR") {
        settings.server_addr = val;
    }

    if let Ok(val) = std::env::var("SPRUNG_LOG_LEVEL") {
        settings.log_level = val;
    }

    if let Ok(val) = std::env::var("SPRUNG_VIEWS_DIR") {
        settings.views.dir = val.into();
    }

    if let Ok(val) = std::env::var("SPRUNG_VIEWS_SUFFIX") {
        settings.views.suffix = val;
    }

    if let Ok(val) = std::env::var("SPRUNG_UPLOAD_MAX_BYTES") {
        if let Ok(bytes) = val.parse::<usize>() {
            settings.uploads.max_memory_bytes = bytes;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── TOML loading ────────────────────────────────────────────────

    #[test]
    fn test_from_toml_str_basic() {
        let toml = r#"
            debug = false
            server_addr = "0.0.0.0:8080"
        "#;

        let settings = from_toml_str(toml).unwrap();
        assert!(!settings.debug);
        assert_eq!(settings.server_addr, "0.0.0.0:8080");
        // Defaults preserved
        assert_eq!(settings.log_level, "info");
        assert_eq!(settings.views.suffix, ".html");
    }

    #[test]
    fn test_from_toml_str_views_section() {
        let toml = r#"
            [views]
            dir = "web/pages"
            suffix = ".jsp"
        "#;

        let settings = from_toml_str(toml).unwrap();
        assert_eq!(settings.views.dir, std::path::PathBuf::from("web/pages"));
        assert_eq!(settings.views.suffix, ".jsp");
    }

    #[test]
    fn test_from_toml_str_uploads_section() {
        let toml = r#"
            [uploads]
            max_memory_bytes = 1048576
        "#;

        let settings = from_toml_str(toml).unwrap();
        assert_eq!(settings.uploads.max_memory_bytes, 1_048_576);
    }

    #[test]
    fn test_from_toml_str_empty() {
        // Empty TOML should produce defaults
        let settings = from_toml_str("").unwrap();
        assert!(settings.debug);
        assert_eq!(settings.server_addr, "127.0.0.1:8181");
    }

    #[test]
    fn test_from_toml_str_invalid() {
        let result = from_toml_str("[[invalid toml content");
        assert!(result.is_err());
    }

    // ── File loading ────────────────────────────────────────────────

    #[test]
    fn test_from_toml_file() {
        let dir = std::env::temp_dir().join("sprung_test_toml");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("test_settings.toml");

        let toml_content = r#"
            debug = false
            log_level = "warn"
        "#;
        std::fs::write(&path, toml_content).unwrap();

        let settings = from_toml_file(&path).unwrap();
        assert!(!settings.debug);
        assert_eq!(settings.log_level, "warn");

        std::fs::remove_file(&path).ok();
        std::fs::remove_dir(&dir).ok();
    }

    #[test]
    fn test_from_toml_file_missing() {
        let result = from_toml_file("/nonexistent/path/settings.toml");
        assert!(result.is_err());
    }

    // ── Environment variable overrides ──────────────────────────────

    #[test]
    fn test_apply_env_overrides_server_addr() {
        let mut settings = Settings::default();
        std::env::set_var("SPRUNG_SERVER_ADDR", "0.0.0.0:9000");
        apply_env_overrides(&mut settings);
        assert_eq!(settings.server_addr, "0.0.0.0:9000");
        std::env::remove_var("SPRUNG_SERVER_ADDR");
    }

    #[test]
    fn test_apply_env_overrides_log_level() {
        let mut settings = Settings::default();
        std::env::set_var("SPRUNG_LOG_LEVEL", "debug");
        apply_env_overrides(&mut settings);
        assert_eq!(settings.log_level, "debug");
        std::env::remove_var("SPRUNG_LOG_LEVEL");
    }

    #[test]
    fn test_apply_env_overrides_invalid_upload_cap() {
        let mut settings = Settings::default();
        let original = settings.uploads.max_memory_bytes;
        std::env::set_var("SPRUNG_UPLOAD_MAX_BYTES", "not-a-number");
        apply_env_overrides(&mut settings);
        assert_eq!(settings.uploads.max_memory_bytes, original); // Should not change
        std::env::remove_var("SPRUNG_UPLOAD_MAX_BYTES");
    }
}
