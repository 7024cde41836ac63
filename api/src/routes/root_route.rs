//! GET /: static greeting.

use axum::Json;
use serde_json::{Value, json};

pub async fn root() -> Json<Value> {
    Json(json!({ "message": "Hello, World!" }))
}
