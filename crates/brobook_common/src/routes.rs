// --- File: crates/brobook_common/src/routes.rs ---

// Routes shared by every deployment of the backend, independent of which
// feature crates are compiled in.

use axum::{routing::get, Json, Router};
use serde_json::json;

/// Creates a router containing common routes that can be used across the application.
pub fn routes() -> Router {
    Router::new().route(
        "/health",
        get(|| async { Json(json!({ "status": "ok" })) }),
    )
}
