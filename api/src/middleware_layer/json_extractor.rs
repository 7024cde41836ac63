use axum::{
    body::{Body, Bytes},
    http::{HeaderMap, HeaderValue, Request, StatusCode, header},
    middleware::Next,
    response::Response,
};
use chrono::Utc;
use tracing::debug;

use crate::core::http::response_envelope::{ApiErrorDetail, ApiResponse};

pub const REQUEST_ID_HEADER: &str = "X-Request-Id";

async fn take_body(res: Response) -> (axum::http::response::Parts, Bytes) {
    let (parts, body) = res.into_parts();
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .unwrap_or_default();
    (parts, bytes)
}

fn guess_path_from_serde_msg(msg: &str) -> Option<String> {
    for key in ["user_input", "messages", "context", "overrides", "role", "content"] {
        if msg.contains(&format!("`{key}`")) {
            return Some(key.to_string());
        }
    }
    None
}

fn hint_from_serde_msg(msg: &str) -> Option<String> {
    if msg.contains("expected a sequence") {
        Some("Expected an array of messages (e.g. [{\"role\": \"user\", \"content\": \"hi\"}]).".into())
    } else if msg.contains("expected a map") || msg.contains("expected struct") {
        Some("Expected a JSON object here (e.g. { \"field\": \"value\" }).".into())
    } else if msg.contains("unknown variant") {
        Some("Message role must be one of: user, assistant, system.".into())
    } else if msg.contains("Content-Type") {
        Some("Send the body with `Content-Type: application/json`.".into())
    } else {
        None
    }
}

/// Caller-supplied id, or a fresh time-based one.
fn request_id(headers: &HeaderMap) -> HeaderValue {
    if let Some(h) = headers.get(REQUEST_ID_HEADER) {
        if let Ok(v) = h.to_str() {
            if !v.trim().is_empty() {
                return h.clone();
            }
        }
    }
    let nanos = Utc::now()
        .timestamp_nanos_opt()
        .unwrap_or_else(|| Utc::now().timestamp_micros() * 1000);
    HeaderValue::from_str(&format!("req-{nanos}"))
        .unwrap_or_else(|_| HeaderValue::from_static("req-unknown"))
}

/// Tags every response with `X-Request-Id` and rewrites plain-text request
/// rejections (400/422) into the [`ApiResponse`] error envelope.
pub async fn json_error_mapper(req: Request<Body>, next: Next) -> Response {
    let req_id = request_id(req.headers());
    let mut res = next.run(req).await;
    let status = res.status();

    // Only 400/422 from extractors are rewritten; JSON bodies are already ours.
    let is_json = res
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("application/json"));
    if !(status == StatusCode::BAD_REQUEST || status == StatusCode::UNPROCESSABLE_ENTITY)
        || is_json
    {
        res.headers_mut().insert(REQUEST_ID_HEADER, req_id);
        return res;
    }

    let (mut parts, bytes) = take_body(res).await;
    let original = String::from_utf8_lossy(&bytes);
    debug!(%status, rejection = %original.trim(), "request body rejected");

    let detail = ApiErrorDetail {
        path: guess_path_from_serde_msg(&original),
        hint: hint_from_serde_msg(&original),
    };
    let details = if detail.path.is_none() && detail.hint.is_none() {
        Vec::new()
    } else {
        vec![detail]
    };

    let envelope = ApiResponse::error(
        if status == StatusCode::BAD_REQUEST {
            "BAD_REQUEST"
        } else {
            "UNPROCESSABLE_ENTITY"
        },
        original.trim(),
        details,
    );

    let body = match serde_json::to_vec(&envelope) {
        Ok(v) => v,
        Err(_) => bytes.to_vec(),
    };

    parts.headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );
    parts.headers.remove(header::CONTENT_LENGTH);
    parts.headers.insert(REQUEST_ID_HEADER, req_id);

    Response::from_parts(parts, body.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_offending_field() {
        let msg = "Failed to deserialize the JSON body into the target type: missing field `user_input` at line 1 column 2";
        assert_eq!(guess_path_from_serde_msg(msg).as_deref(), Some("user_input"));
        assert_eq!(guess_path_from_serde_msg("EOF while parsing"), None);
    }

    #[test]
    fn keeps_caller_request_id() {
        let mut headers = HeaderMap::new();
        headers.insert(REQUEST_ID_HEADER, HeaderValue::from_static("abc-123"));
        assert_eq!(request_id(&headers), "abc-123");

        let fresh = request_id(&HeaderMap::new());
        assert!(fresh.to_str().unwrap().starts_with("req-"));
    }
}
