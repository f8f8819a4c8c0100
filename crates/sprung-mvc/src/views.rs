//! View resolution and rendering.
//!
//! Handlers return logical view names; this module turns them into response
//! bodies. A [`ViewLoader`] finds the view source, and [`ViewResolver`]
//! renders it against the request's [`Model`], substituting `${expr}`
//! placeholders with dotted-path lookups.
//!
//! The name-to-file mapping mirrors Spring MVC's
//! `InternalResourceViewResolver`: a configured root directory as the
//! prefix and an extension as the suffix.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, RwLock};

use sprung_core::settings::ViewSettings;
use sprung_core::{SprungError, SprungResult};

use crate::model::Model;

/// The view-name prefix that turns a response into an HTTP redirect.
///
/// A handler returning `"redirect:/target"` is answered with a 302 to
/// `/target` instead of a rendered view.
pub const REDIRECT_PREFIX: &str = "redirect:";

/// Returns the redirect target if the view name carries the redirect
/// prefix.
pub fn redirect_target(view_name: &str) -> Option<&str> {
    view_name.strip_prefix(REDIRECT_PREFIX)
}

/// Derives the default view name for a request path.
///
/// Used when a handler completes without naming a view: the path minus its
/// surrounding slashes becomes the view name, and the root path maps to
/// `index`. This mirrors Spring's `DefaultRequestToViewNameTranslator`.
///
/// # Examples
///
/// ```
/// use sprung_mvc::views::default_view_name;
///
/// assert_eq!(default_view_name("/"), "index");
/// assert_eq!(default_view_name("/basePost"), "basePost");
/// assert_eq!(default_view_name("/spring/vo02"), "spring/vo02");
/// ```
pub fn default_view_name(path: &str) -> String {
    let trimmed = path.trim_matches('/');
    if trimmed.is_empty() {
        "index".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Loads view source text by logical name.
pub trait ViewLoader: Send + Sync {
    /// Loads the source of the view with the given name.
    ///
    /// # Errors
    ///
    /// Returns `ViewNotFound` if no view with that name exists.
    fn load(&self, name: &str) -> SprungResult<String>;
}

/// Loads views from a directory on the filesystem.
///
/// A view name `n` resolves to `<root>/n<suffix>`. View names never escape
/// the loader root.
pub struct FileViewLoader {
    root: PathBuf,
    suffix: String,
}

impl FileViewLoader {
    /// Creates a new `FileViewLoader` with the given root directory and
    /// view-name suffix.
    pub fn new(root: impl Into<PathBuf>, suffix: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            suffix: suffix.into(),
        }
    }

    /// Creates a loader from view settings.
    pub fn from_settings(views: &ViewSettings) -> Self {
        Self::new(views.dir.clone(), views.suffix.clone())
    }
}

impl ViewLoader for FileViewLoader {
    fn load(&self, name: &str) -> SprungResult<String> {
        if name.starts_with('/') || name.split('/').any(|segment| segment == "..") {
            return Err(SprungError::ViewNotFound {
                view: name.to_string(),
            });
        }

        let path = self.root.join(format!("{name}{}", self.suffix));
        if !path.exists() {
            return Err(SprungError::ViewNotFound {
                view: name.to_string(),
            });
        }

        Ok(std::fs::read_to_string(&path)?)
    }
}

/// Loads views from an in-memory map of name to source strings.
///
/// Useful for tests and for embedding views directly in a binary.
pub struct MemoryViewLoader {
    views: RwLock<HashMap<String, String>>,
}

impl MemoryViewLoader {
    /// Creates a new empty `MemoryViewLoader`.
    pub fn new() -> Self {
        Self {
            views: RwLock::new(HashMap::new()),
        }
    }

    /// Creates a `MemoryViewLoader` from a map of view names to sources.
    pub fn from_map(views: HashMap<String, String>) -> Self {
        Self {
            views: RwLock::new(views),
        }
    }

    /// Adds or replaces a view.
    pub fn add(&self, name: impl Into<String>, source: impl Into<String>) {
        self.views
            .write()
            .unwrap()
            .insert(name.into(), source.into());
    }
}

impl Default for MemoryViewLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewLoader for MemoryViewLoader {
    fn load(&self, name: &str) -> SprungResult<String> {
        self.views
            .read()
            .unwrap()
            .get(name)
            .cloned()
            .ok_or_else(|| SprungError::ViewNotFound {
                view: name.to_string(),
            })
    }
}

/// Renders named views against a model.
///
/// `${expr}` placeholders in the view source are replaced with the model
/// attribute at `expr`, resolved with dotted-path lookup. An expression
/// with no matching attribute renders as the empty string, the way JSP EL
/// treats unknown values.
///
/// # Examples
///
/// ```
/// use sprung_mvc::model::Model;
/// use sprung_mvc::views::{MemoryViewLoader, ViewResolver};
///
/// let loader = MemoryViewLoader::new();
/// loader.add("greeting", "<p>Hello, ${name}!</p>");
///
/// let resolver = ViewResolver::new(loader);
/// let mut model = Model::new();
/// model.add_attribute("name", "World");
///
/// let body = resolver.render("greeting", &model).unwrap();
/// assert_eq!(body, "<p>Hello, World!</p>");
/// ```
pub struct ViewResolver {
    loader: Arc<dyn ViewLoader>,
}

impl ViewResolver {
    /// Creates a resolver backed by the given loader.
    pub fn new(loader: impl ViewLoader + 'static) -> Self {
        Self {
            loader: Arc::new(loader),
        }
    }

    /// Creates a resolver loading views from the configured directory.
    pub fn from_settings(views: &ViewSettings) -> Self {
        Self::new(FileViewLoader::from_settings(views))
    }

    /// Renders the named view against the model.
    ///
    /// # Errors
    ///
    /// Returns `ViewNotFound` if the view cannot be loaded.
    pub fn render(&self, name: &str, model: &Model) -> SprungResult<String> {
        let source = self.loader.load(name)?;
        Ok(interpolate(&source, model))
    }
}

impl std::fmt::Debug for ViewResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViewResolver").finish_non_exhaustive()
    }
}

/// Substitutes `${expr}` placeholders in the source with model values.
///
/// An unterminated placeholder is copied through verbatim.
fn interpolate(source: &str, model: &Model) -> String {
    let mut out = String::with_capacity(source.len());
    let mut rest = source;

    while let Some(start) = rest.find("${") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        match after.find('}') {
            Some(end) => {
                let expr = after[..end].trim();
                if let Some(value) = model.get(expr) {
                    out.push_str(&value.to_display_string());
                }
                rest = &after[end + 1..];
            }
            None => {
                out.push_str(&rest[start..]);
                rest = "";
            }
        }
    }

    out.push_str(rest);
    out
}
