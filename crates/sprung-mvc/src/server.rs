//! HTTP server integration for sprung.
//!
//! This module provides [`MvcApp`], the application builder that combines
//! a route table, view resolution, and settings into a runnable web
//! server. It integrates with Axum to provide the actual HTTP server
//! implementation.
//!
//! This mirrors the servlet-container glue around Spring MVC's
//! `DispatcherServlet`: one catch-all entry point that funnels every
//! request through the dispatcher.
//!
//! # Examples
//!
//! ```no_run
//! use sprung_core::Settings;
//! use sprung_mvc::dispatch::DispatchResult;
//! use sprung_mvc::routes::RouteTable;
//! use sprung_mvc::server::MvcApp;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut routes = RouteTable::new();
//! routes.any("/", |_req, _model| Ok(DispatchResult::NoBody))?;
//!
//! let app = MvcApp::new(Settings::default()).routes(routes);
//!
//! // app.run().await?;
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use axum::body::Body;
use axum::extract::Request;
use axum::response::IntoResponse;
use axum::routing::any;

use sprung_core::{Settings, SprungError, SprungResult};
use sprung_http::{HttpRequest, HttpResponse};

use crate::dispatch::Dispatcher;
use crate::routes::RouteTable;
use crate::views::ViewResolver;

/// The main application type for sprung.
///
/// `MvcApp` combines a route table, a view resolver, and settings into a
/// single application that can be converted to an Axum router or run
/// directly as an HTTP server. When no view resolver is supplied, views
/// are loaded from the directory named in the settings.
pub struct MvcApp {
    settings: Settings,
    routes: RouteTable,
    views: Option<ViewResolver>,
}

impl MvcApp {
    /// Creates a new `MvcApp` with the given settings.
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            routes: RouteTable::new(),
            views: None,
        }
    }

    /// Sets the route table for this application.
    #[must_use]
    pub fn routes(mut self, routes: RouteTable) -> Self {
        self.routes = routes;
        self
    }

    /// Sets the view resolver, overriding the settings-derived default.
    #[must_use]
    pub fn views(mut self, views: ViewResolver) -> Self {
        self.views = Some(views);
        self
    }

    /// Returns a reference to the application settings.
    pub const fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Returns the number of registered routes.
    pub fn route_count(&self) -> usize {
        self.routes.len()
    }

    /// Returns `true` if an explicit view resolver has been set.
    pub const fn has_views(&self) -> bool {
        self.views.is_some()
    }

    /// Converts the application into an Axum router.
    ///
    /// The router funnels every request, at any path and method, into the
    /// dispatcher.
    pub fn into_axum_router(self) -> axum::Router {
        let views = match self.views {
            Some(views) => views,
            None => ViewResolver::from_settings(&self.settings.views),
        };
        let dispatcher = Arc::new(Dispatcher::new(self.routes, views));
        let max_upload = self.settings.uploads.max_memory_bytes;

        let handler = move |req: Request<Body>| {
            let dispatcher = dispatcher.clone();

            async move {
                let (parts, body) = req.into_parts();
                let body_bytes = axum::body::to_bytes(body, usize::MAX)
                    .await
                    .unwrap_or_default()
                    .to_vec();

                let request = match HttpRequest::from_parts(parts, body_bytes, max_upload) {
                    Ok(request) => request,
                    Err(error) => return HttpResponse::from_error(&error).into_response(),
                };

                dispatcher.dispatch(&request).into_http().into_response()
            }
        };

        axum::Router::new()
            .route("/{*path}", any(handler.clone()))
            .route("/", any(handler))
    }

    /// Runs the application as an HTTP server on the configured address.
    ///
    /// This starts a Tokio-based HTTP server using Axum, bound to
    /// `settings.server_addr`.
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails to bind to the address or
    /// encounters a runtime error.
    pub async fn run(self) -> SprungResult<()> {
        let addr = self.settings.server_addr.clone();
        let debug = self.settings.debug;
        let router = self.into_axum_router();

        let listener = tokio::net::TcpListener::bind(&addr).await.map_err(|e| {
            SprungError::ImproperlyConfigured(format!("Failed to bind to {addr}: {e}"))
        })?;

        if debug {
            tracing::info!("Starting development server at http://{addr}/");
        }

        axum::serve(listener, router).await?;

        Ok(())
    }
}

impl std::fmt::Debug for MvcApp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MvcApp")
            .field("route_count", &self.routes.len())
            .field("has_views", &self.views.is_some())
            .field("debug", &self.settings.debug)
            .finish()
    }
}
