//! The dispatcher: request in, outcome out.
//!
//! [`Dispatcher`] is the front controller. It looks the request up in the
//! [`RouteTable`], runs the matched handler against a fresh [`Model`],
//! interprets the handler's [`DispatchResult`], and renders the view. Every
//! failure along the way becomes an [`Outcome::Failure`] carrying the
//! error; a dispatch never panics and never tears down the server.

use sprung_core::{logging, SprungError, SprungResult};
use sprung_http::{HttpRequest, HttpResponse};

use crate::model::Model;
use crate::routes::RouteTable;
use crate::views::{self, ViewResolver};

/// What a handler asks the dispatcher to do next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchResult {
    /// The handler produced no view name; the dispatcher derives one from
    /// the request path.
    NoBody,
    /// Render the named view. A name carrying the
    /// [`REDIRECT_PREFIX`](crate::views::REDIRECT_PREFIX) redirects
    /// instead.
    ViewName(String),
    /// Redirect to the given target without rendering.
    Redirect(String),
}

impl DispatchResult {
    /// Renders the named view.
    pub fn view(name: impl Into<String>) -> Self {
        Self::ViewName(name.into())
    }

    /// Redirects to the given target.
    pub fn redirect(target: impl Into<String>) -> Self {
        Self::Redirect(target.into())
    }
}

/// The terminal result of dispatching one request.
#[derive(Debug)]
pub enum Outcome {
    /// A rendered page.
    Page {
        /// The resolved view name.
        view: String,
        /// The rendered body.
        body: String,
    },
    /// A redirect to another location.
    Redirect {
        /// The redirect target.
        target: String,
    },
    /// The request failed; the error decides the status code.
    Failure {
        /// What went wrong.
        error: SprungError,
    },
}

impl Outcome {
    /// The HTTP status code this outcome is answered with.
    pub const fn status(&self) -> u16 {
        match self {
            Self::Page { .. } => 200,
            Self::Redirect { .. } => 302,
            Self::Failure { error } => error.status_code(),
        }
    }

    /// Converts the outcome into an HTTP response.
    pub fn into_http(self) -> HttpResponse {
        match self {
            Self::Page { body, .. } => HttpResponse::ok(body),
            Self::Redirect { target } => HttpResponse::redirect(&target),
            Self::Failure { error } => HttpResponse::from_error(&error),
        }
    }
}

/// The front controller: routes a request, runs its handler, renders the
/// view.
///
/// A dispatcher is immutable once built and shared across requests. Each
/// dispatch gets its own [`Model`]; no state crosses request boundaries.
///
/// # Examples
///
/// ```
/// use sprung_mvc::dispatch::{DispatchResult, Dispatcher};
/// use sprung_mvc::routes::RouteTable;
/// use sprung_mvc::views::{MemoryViewLoader, ViewResolver};
/// use sprung_http::HttpRequest;
///
/// let loader = MemoryViewLoader::new();
/// loader.add("hello", "Hello, ${name}!");
///
/// let mut routes = RouteTable::new();
/// routes
///     .get("/hello", |_req, model| {
///         model.add_attribute("name", "World");
///         Ok(DispatchResult::view("hello"))
///     })
///     .unwrap();
///
/// let dispatcher = Dispatcher::new(routes, ViewResolver::new(loader));
/// let request = HttpRequest::builder().path("/hello").build().unwrap();
/// let outcome = dispatcher.dispatch(&request);
/// assert_eq!(outcome.status(), 200);
/// ```
#[derive(Debug)]
pub struct Dispatcher {
    routes: RouteTable,
    views: ViewResolver,
}

impl Dispatcher {
    /// Creates a dispatcher over the given route table and view resolver.
    pub fn new(routes: RouteTable, views: ViewResolver) -> Self {
        Self { routes, views }
    }

    /// Returns the route table.
    pub const fn routes(&self) -> &RouteTable {
        &self.routes
    }

    /// Dispatches one request to completion.
    ///
    /// Request-scoped failures come back as [`Outcome::Failure`]; this
    /// method itself never fails.
    pub fn dispatch(&self, request: &HttpRequest) -> Outcome {
        let span = logging::request_span(request.method().as_str(), request.path());
        let _guard = span.enter();

        match self.run(request) {
            Ok(outcome) => outcome,
            Err(error) => {
                if error.status_code() >= 500 {
                    tracing::error!("{error}");
                } else {
                    tracing::warn!("{error}");
                }
                Outcome::Failure { error }
            }
        }
    }

    fn run(&self, request: &HttpRequest) -> SprungResult<Outcome> {
        let route = self.routes.lookup(request.method(), request.path())?;
        let mut model = Model::new();

        let result = (route.handler())(request, &mut model)?;
        let view_name = match result {
            DispatchResult::Redirect(target) => return Ok(Outcome::Redirect { target }),
            DispatchResult::ViewName(name) => name,
            DispatchResult::NoBody => views::default_view_name(request.path()),
        };

        if let Some(target) = views::redirect_target(&view_name) {
            return Ok(Outcome::Redirect {
                target: target.to_string(),
            });
        }

        let body = self.views.render(&view_name, &model)?;
        tracing::debug!("Rendered view '{view_name}' ({} bytes)", body.len());
        Ok(Outcome::Page {
            view: view_name,
            body,
        })
    }
}
