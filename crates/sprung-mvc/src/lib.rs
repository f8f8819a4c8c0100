//! # sprung-mvc
//!
//! The MVC layer of the sprung framework: an explicit route table, typed
//! parameter binding, model attributes, view resolution, and the
//! dispatcher that ties them together. The shape mirrors Spring MVC's
//! `DispatcherServlet` pipeline with handlers registered explicitly
//! instead of discovered through annotations.
//!
//! ## Modules
//!
//! - [`routes`] - Exact-path route table and controllers
//! - [`bind`] - Coercing request parameters into typed records
//! - [`model`] - Attributes handlers expose to views
//! - [`views`] - View loading and `${expr}` rendering
//! - [`dispatch`] - The request dispatcher
//! - [`server`] - Axum server glue

pub mod bind;
pub mod dispatch;
pub mod model;
pub mod routes;
pub mod server;
pub mod views;

// Re-export the most commonly used types at the crate root.
pub use bind::{bind_record, bind_scalar, Bindable, FieldKind, FieldSpec, FieldValue, FromParam};
pub use dispatch::{DispatchResult, Dispatcher, Outcome};
pub use model::{Attr, Model};
pub use routes::{Controller, MethodSpec, Route, RouteHandler, RouteTable};
pub use server::MvcApp;
pub use views::{
    default_view_name, FileViewLoader, MemoryViewLoader, ViewLoader, ViewResolver, REDIRECT_PREFIX,
};
