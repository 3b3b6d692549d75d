//! Read-only browser for a single workspace directory.
//!
//! Serves directory listings with server-side sorting, raw file bytes and
//! HTML previews, never touching anything outside the workspace root.

pub mod breadcrumb;
pub mod catalog;
pub mod config;
pub mod error;
pub mod filetypes;
pub mod handlers;
pub mod preview;
pub mod render;
pub mod resolver;
pub mod routes;
pub mod sort;

use std::io;
use std::path::Path;
use std::sync::Arc;

use axum::Router;
use tower_http::trace::TraceLayer;

pub use catalog::EntryCatalog;
pub use config::Config;
pub use error::BrowserError;
pub use resolver::PathResolver;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub resolver: PathResolver,
    pub catalog: EntryCatalog,
    pub config: Arc<Config>,
}

impl AppState {
    /// Create state for `root` with the default config.
    pub fn new(root: &Path) -> io::Result<Self> {
        Self::with_config(root, Config::default())
    }

    /// Create state for `root` with the given config. Fails when the root
    /// does not exist or is not a directory.
    pub fn with_config(root: &Path, config: Config) -> io::Result<Self> {
        let resolver = PathResolver::new(root)?;
        Ok(Self {
            catalog: EntryCatalog::new(resolver.clone()),
            resolver,
            config: Arc::new(config),
        })
    }
}

/// Build the full application router.
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(routes::browser_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
