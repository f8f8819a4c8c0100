//! # sprung Request-Mapping Example
//!
//! The classic request-mapping tour, served by the sprung framework:
//!
//! - **Plain mappings**: handlers answering any method, GET only, or POST only
//! - **Command objects**: query parameters bound into a `BaseVO` record
//! - **Model attributes**: handler data picked up by `${...}` placeholders
//! - **Redirects**: view names carrying the `redirect:` prefix
//! - **File upload**: a multipart POST logging each received file
//!
//! ## Running
//!
//! ```bash
//! cargo run --package request-mapping-example
//! ```
//!
//! Then browse to <http://127.0.0.1:8181/>. Settings load from
//! `request-mapping.toml` when that file exists, and `SPRUNG_*` environment
//! variables override either source.

mod controller;

use std::path::{Path, PathBuf};

use tower_http::trace::TraceLayer;

use sprung_core::{logging, settings_loader, Settings};
use sprung_mvc::routes::RouteTable;
use sprung_mvc::server::MvcApp;

const SETTINGS_FILE: &str = "request-mapping.toml";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = load_settings()?;
    logging::setup(&settings);

    tracing::info!(
        "Example configured: debug={}, views under {}",
        settings.debug,
        settings.views.dir.display()
    );

    let mut routes = RouteTable::new();
    routes.mount(controller::routes())?;

    let addr = settings.server_addr.clone();
    let app = MvcApp::new(settings).routes(routes);
    tracing::info!("Serving {} routes", app.route_count());

    let router = app.into_axum_router().layer(TraceLayer::new_for_http());
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Tour ready at http://{addr}/");
    axum::serve(listener, router).await?;
    Ok(())
}

/// Loads settings from `request-mapping.toml` when present, otherwise
/// defaults pointed at this example's template directory.
fn load_settings() -> anyhow::Result<Settings> {
    if Path::new(SETTINGS_FILE).exists() {
        return Ok(settings_loader::from_toml_file_with_env(SETTINGS_FILE)?);
    }

    let mut settings = Settings::default();
    settings.views.dir = PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/templates"));
    settings_loader::apply_env_overrides(&mut settings);
    Ok(settings)
}
