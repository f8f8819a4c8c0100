//! The route table: exact-path request mappings.
//!
//! Routes are registered explicitly against literal paths and a
//! [`MethodSpec`], mirroring Spring MVC's `@RequestMapping` family. There
//! are no path variables and no pattern matching; a request either names a
//! registered path exactly or it does not.
//!
//! Lookup distinguishes two misses: an unregistered path is a 404, while a
//! registered path hit with the wrong method is a 405 carrying the methods
//! the path does answer to.

use std::fmt;
use std::sync::Arc;

use http::Method;

use sprung_core::{SprungError, SprungResult};
use sprung_http::HttpRequest;

use crate::dispatch::DispatchResult;
use crate::model::Model;

/// The handler function type stored in routes.
///
/// A handler reads the request, fills in the model, and says what should
/// happen next as a [`DispatchResult`]. Handlers are plain synchronous
/// functions the way Spring controller methods are; the async boundary
/// lives in the server layer.
pub type RouteHandler =
    Arc<dyn Fn(&HttpRequest, &mut Model) -> SprungResult<DispatchResult> + Send + Sync>;

/// Which request methods a route answers to.
///
/// `Any` is the bare `@RequestMapping` form: it admits every method, and
/// therefore conflicts with any other registration at the same path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MethodSpec {
    /// GET requests only.
    Get,
    /// POST requests only.
    Post,
    /// Every request method.
    Any,
}

impl MethodSpec {
    /// Returns `true` if this spec admits the given request method.
    pub fn admits(self, method: &Method) -> bool {
        match self {
            Self::Get => method == Method::GET,
            Self::Post => method == Method::POST,
            Self::Any => true,
        }
    }

    /// Returns `true` if two specs at the same path would be ambiguous.
    ///
    /// Identical specs conflict, and `Any` conflicts with everything.
    pub const fn conflicts_with(self, other: Self) -> bool {
        matches!(
            (self, other),
            (Self::Any, _) | (_, Self::Any) | (Self::Get, Self::Get) | (Self::Post, Self::Post)
        )
    }

    /// The methods this spec admits, as the table distinguishes them.
    ///
    /// Used to build the `Allow` header on a 405.
    pub const fn allowed_methods(self) -> &'static [&'static str] {
        match self {
            Self::Get => &["GET"],
            Self::Post => &["POST"],
            Self::Any => &["GET", "POST"],
        }
    }
}

impl fmt::Display for MethodSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Any => "ANY",
        };
        write!(f, "{name}")
    }
}

/// A single registered route.
pub struct Route {
    path: String,
    method: MethodSpec,
    handler: RouteHandler,
}

impl Route {
    /// The registered path, normalized.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The methods this route answers to.
    pub const fn method(&self) -> MethodSpec {
        self.method
    }

    /// The route's handler.
    pub const fn handler(&self) -> &RouteHandler {
        &self.handler
    }
}

impl fmt::Debug for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Route")
            .field("path", &self.path)
            .field("method", &self.method)
            .finish_non_exhaustive()
    }
}

/// Normalizes a request or registration path.
///
/// Paths always carry a leading slash, and a trailing slash is dropped
/// everywhere except the root, so `/base` and `/base/` name the same
/// route.
fn normalize_path(path: &str) -> String {
    let mut normalized = if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{path}")
    };
    while normalized.len() > 1 && normalized.ends_with('/') {
        normalized.pop();
    }
    normalized
}

/// Joins a controller prefix onto a handler path.
fn join_paths(prefix: &str, path: &str) -> String {
    let prefix = normalize_path(prefix);
    if prefix == "/" {
        normalize_path(path)
    } else {
        normalize_path(&format!("{prefix}{}", normalize_path(path)))
    }
}

/// The immutable mapping from paths to handlers.
///
/// Routes are registered once at startup and the finished table is shared
/// read-only across requests. Registration fails loudly on ambiguity: the
/// same path cannot be registered twice under overlapping method specs.
///
/// # Examples
///
/// ```
/// use sprung_mvc::dispatch::DispatchResult;
/// use sprung_mvc::routes::RouteTable;
///
/// let mut routes = RouteTable::new();
/// routes
///     .get("/letsGet", |_req, _model| Ok(DispatchResult::view("letsGet")))
///     .unwrap();
///
/// let route = routes.lookup(&http::Method::GET, "/letsGet").unwrap();
/// assert_eq!(route.path(), "/letsGet");
/// assert!(routes.lookup(&http::Method::POST, "/letsGet").is_err());
/// ```
#[derive(Debug, Default)]
pub struct RouteTable {
    routes: Vec<Route>,
}

impl RouteTable {
    /// Creates a new empty route table.
    pub fn new() -> Self {
        Self { routes: Vec::new() }
    }

    /// Registers a handler for the given path and method spec.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateRoute` if the path is already registered under a
    /// conflicting spec: the same spec twice, or `Any` overlapping any
    /// other registration.
    pub fn register(
        &mut self,
        path: &str,
        method: MethodSpec,
        handler: RouteHandler,
    ) -> SprungResult<()> {
        let normalized = normalize_path(path);
        for existing in &self.routes {
            if existing.path == normalized && existing.method.conflicts_with(method) {
                return Err(SprungError::DuplicateRoute {
                    method: method.to_string(),
                    path: normalized,
                });
            }
        }
        self.routes.push(Route {
            path: normalized,
            method,
            handler,
        });
        Ok(())
    }

    /// Registers a GET-only handler.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateRoute` on a conflicting registration.
    pub fn get<H>(&mut self, path: &str, handler: H) -> SprungResult<()>
    where
        H: Fn(&HttpRequest, &mut Model) -> SprungResult<DispatchResult> + Send + Sync + 'static,
    {
        self.register(path, MethodSpec::Get, Arc::new(handler))
    }

    /// Registers a POST-only handler.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateRoute` on a conflicting registration.
    pub fn post<H>(&mut self, path: &str, handler: H) -> SprungResult<()>
    where
        H: Fn(&HttpRequest, &mut Model) -> SprungResult<DispatchResult> + Send + Sync + 'static,
    {
        self.register(path, MethodSpec::Post, Arc::new(handler))
    }

    /// Registers a handler answering every method.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateRoute` on a conflicting registration.
    pub fn any<H>(&mut self, path: &str, handler: H) -> SprungResult<()>
    where
        H: Fn(&HttpRequest, &mut Model) -> SprungResult<DispatchResult> + Send + Sync + 'static,
    {
        self.register(path, MethodSpec::Any, Arc::new(handler))
    }

    /// Mounts every route of a [`Controller`] under its prefix.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateRoute` if any mounted route conflicts with an
    /// existing registration.
    pub fn mount(&mut self, controller: Controller) -> SprungResult<()> {
        let Controller { prefix, routes } = controller;
        for (path, method, handler) in routes {
            let full = join_paths(&prefix, &path);
            self.register(&full, method, handler)?;
        }
        Ok(())
    }

    /// Finds the route answering the given method and path.
    ///
    /// # Errors
    ///
    /// Returns `RouteNotFound` if the path is not registered at all, or
    /// `MethodNotAllowed` naming the admissible methods if the path is
    /// registered but not under this method.
    pub fn lookup(&self, method: &Method, path: &str) -> SprungResult<&Route> {
        let normalized = normalize_path(path);
        let mut allowed: Vec<&'static str> = Vec::new();
        let mut path_seen = false;

        for route in &self.routes {
            if route.path != normalized {
                continue;
            }
            path_seen = true;
            if route.method.admits(method) {
                return Ok(route);
            }
            for m in route.method.allowed_methods() {
                if !allowed.contains(m) {
                    allowed.push(m);
                }
            }
        }

        if path_seen {
            Err(SprungError::MethodNotAllowed {
                method: method.to_string(),
                path: normalized,
                allowed,
            })
        } else {
            Err(SprungError::RouteNotFound {
                method: method.to_string(),
                path: normalized,
            })
        }
    }

    /// Returns the number of registered routes.
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Returns `true` if no routes are registered.
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Iterates over the registered routes in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Route> {
        self.routes.iter()
    }
}

/// A group of handlers sharing a path prefix.
///
/// This is the class-level `@RequestMapping` shape: the controller carries
/// the prefix, each handler carries its own sub-path, and
/// [`RouteTable::mount`] joins them. An empty prefix mounts the handlers
/// at their own paths.
///
/// # Examples
///
/// ```
/// use sprung_mvc::dispatch::DispatchResult;
/// use sprung_mvc::routes::{Controller, RouteTable};
///
/// let controller = Controller::new("/admin")
///     .get("/status", |_req, _model| Ok(DispatchResult::view("status")));
///
/// let mut routes = RouteTable::new();
/// routes.mount(controller).unwrap();
/// assert!(routes.lookup(&http::Method::GET, "/admin/status").is_ok());
/// ```
pub struct Controller {
    prefix: String,
    routes: Vec<(String, MethodSpec, RouteHandler)>,
}

impl Controller {
    /// Creates a controller with the given path prefix.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            routes: Vec::new(),
        }
    }

    /// Adds a GET-only handler under the controller prefix.
    #[must_use]
    pub fn get<H>(self, path: &str, handler: H) -> Self
    where
        H: Fn(&HttpRequest, &mut Model) -> SprungResult<DispatchResult> + Send + Sync + 'static,
    {
        self.route(path, MethodSpec::Get, Arc::new(handler))
    }

    /// Adds a POST-only handler under the controller prefix.
    #[must_use]
    pub fn post<H>(self, path: &str, handler: H) -> Self
    where
        H: Fn(&HttpRequest, &mut Model) -> SprungResult<DispatchResult> + Send + Sync + 'static,
    {
        self.route(path, MethodSpec::Post, Arc::new(handler))
    }

    /// Adds a handler answering every method under the controller prefix.
    #[must_use]
    pub fn any<H>(self, path: &str, handler: H) -> Self
    where
        H: Fn(&HttpRequest, &mut Model) -> SprungResult<DispatchResult> + Send + Sync + 'static,
    {
        self.route(path, MethodSpec::Any, Arc::new(handler))
    }

    /// Adds a handler with an explicit method spec.
    #[must_use]
    pub fn route(mut self, path: &str, method: MethodSpec, handler: RouteHandler) -> Self {
        self.routes.push((path.to_string(), method, handler));
        self
    }

    /// Returns the number of handlers added so far.
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Returns `true` if no handlers have been added.
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

impl fmt::Debug for Controller {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Controller")
            .field("prefix", &self.prefix)
            .field("routes", &self.routes.len())
            .finish()
    }
}
