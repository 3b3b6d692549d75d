use axum::{Router, routing::get};

use crate::AppState;
use crate::handlers;

/// Create browser routes. Every path is a workspace path, so there are no
/// reserved endpoints besides the root.
pub fn browser_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::browse))
        .route("/{*path}", get(handlers::browse))
}
