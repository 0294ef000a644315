use axum::Json;
use serde_json::{json, Value};

use crate::matching::visibility::VISIBILITY_THRESHOLD;

/// GET /health
/// Returns a simple status object with service version.
pub async fn health_handler() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "matcher",
        "visibility_threshold": VISIBILITY_THRESHOLD
    }))
}
