//! HTTP surface of the grounded chat backend.
//!
//! Routes:
//! - `GET /`            static greeting
//! - `GET /health`      startup initialisation status
//! - `POST /evaluation` `{user_input}` → `{message}`
//! - `POST /chat`       `{messages, context?}` → `{message, context, valid_query}`

use std::{env, sync::Arc};

pub mod core;
pub mod error_handler;
pub mod middleware_layer;
pub mod routes;

#[cfg(test)]
mod test_support;

use axum::{
    Router, middleware,
    routing::{get, post},
};
use tokio::signal;
use tracing::{error, info};

use crate::{
    core::app_state::AppState,
    error_handler::AppError,
    middleware_layer::json_extractor::json_error_mapper,
    routes::{
        chat::chat_route::chat, evaluation::evaluation_route::evaluation, health_route::health,
        root_route::root,
    },
};

/// Bind address variable and its fallback.
pub const API_ADDRESS: &str = "API_ADDRESS";
pub const DEFAULT_API_ADDRESS: &str = "0.0.0.0:8000";

/// Builds the router over an already initialised state.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/evaluation", post(evaluation))
        .route("/chat", post(chat))
        .layer(middleware::from_fn(json_error_mapper))
        .with_state(Arc::new(state))
}

/// Reads configuration, binds `API_ADDRESS` and serves until Ctrl+C.
pub async fn start() -> Result<(), AppError> {
    let host_url = env::var(API_ADDRESS).unwrap_or_else(|_| DEFAULT_API_ADDRESS.to_string());

    let state = AppState::from_env()?;
    if state.pipeline.is_none() {
        error!(issues = ?state.issues, "serving in degraded mode");
    }
    let app = router(state);

    // Bind to address
    let listener = tokio::net::TcpListener::bind(&host_url)
        .await
        .map_err(|source| AppError::Bind {
            addr: host_url.clone(),
            source,
        })?;
    info!(addr = %host_url, "HTTP server listening");

    // Start server with graceful shutdown on Ctrl+C
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(AppError::Server)?;

    info!("HTTP server stopped");
    Ok(())
}

/// Resolves when Ctrl+C is pressed.
async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}

#[cfg(test)]
mod tests {
    use reqwest::StatusCode;
    use serde_json::{Value, json};

    use super::*;
    use crate::test_support::{laptop_hits, pipeline};

    async fn serve(state: AppState) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router(state)).await.unwrap();
        });
        format!("http://{addr}")
    }

    const GREETING: &str = r#"{"proceed_to_retrieval": false, "improved_query": "Hello! How can I help you with our products?"}"#;
    const LAPTOPS: &str =
        r#"{"proceed_to_retrieval": true, "improved_query": "laptops under 1000 dollars"}"#;

    #[tokio::test]
    async fn root_greets() {
        let base = serve(AppState::default()).await;
        let body: Value = reqwest::get(format!("{base}/")).await.unwrap().json().await.unwrap();
        assert_eq!(body, json!({ "message": "Hello, World!" }));
    }

    #[tokio::test]
    async fn health_reflects_startup_state() {
        let base = serve(AppState::ready(pipeline(&[], json!([])))).await;
        let res = reqwest::get(format!("{base}/health")).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(res.json::<Value>().await.unwrap(), json!({ "status": "healthy" }));

        let base = serve(AppState::degraded(vec!["search client: bad key".into()])).await;
        let res = reqwest::get(format!("{base}/health")).await.unwrap();
        assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(
            res.json::<Value>().await.unwrap(),
            json!({ "status": "unhealthy", "issues": ["search client: bad key"] })
        );
    }

    #[tokio::test]
    async fn evaluation_returns_direct_greeting() {
        let base = serve(AppState::ready(pipeline(&[GREETING], json!([])))).await;
        let res = reqwest::Client::new()
            .post(format!("{base}/evaluation"))
            .json(&json!({ "user_input": "hi there" }))
            .send()
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::OK);
        assert!(res.headers().contains_key("x-request-id"));
        assert_eq!(
            res.json::<Value>().await.unwrap(),
            json!({ "message": "Hello! How can I help you with our products?" })
        );
    }

    #[tokio::test]
    async fn chat_round_trips_context() {
        let state = AppState::ready(pipeline(
            &[LAPTOPS, "The TrailBook 14 ($899) fits your budget."],
            laptop_hits(),
        ));
        let base = serve(state).await;

        let res = reqwest::Client::new()
            .post(format!("{base}/chat"))
            .json(&json!({
                "messages": [{ "role": "user", "content": "I need a laptop under 1000 dollars" }],
                "context": { "overrides": { "top": 2 }, "session": "abc" }
            }))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);

        let body: Value = res.json().await.unwrap();
        assert_eq!(body["valid_query"], json!(true));
        assert_eq!(body["message"], json!("The TrailBook 14 ($899) fits your budget."));
        assert_eq!(body["context"]["session"], json!("abc"));
        assert_eq!(body["context"]["grounding_data"][0]["id"], json!("doc-7"));
        assert_eq!(body["context"]["grounding_data"][1]["id"], json!("doc-2"));
        assert_eq!(
            body["context"]["thoughts"],
            json!([{ "title": "Generated search query", "description": "laptops under 1000 dollars" }])
        );
    }

    #[tokio::test]
    async fn malformed_intent_is_a_server_error() {
        let base = serve(AppState::ready(pipeline(&["not json"], json!([])))).await;
        let res = reqwest::Client::new()
            .post(format!("{base}/evaluation"))
            .json(&json!({ "user_input": "laptops?" }))
            .send()
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body: Value = res.json().await.unwrap();
        assert_eq!(body["error"], json!("MALFORMED_INTENT_OUTPUT"));
    }

    #[tokio::test]
    async fn degraded_state_rejects_evaluation() {
        let base = serve(AppState::degraded(vec!["chat model client: bad key".into()])).await;
        let res = reqwest::Client::new()
            .post(format!("{base}/evaluation"))
            .json(&json!({ "user_input": "hi" }))
            .send()
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);
        let body: Value = res.json().await.unwrap();
        assert_eq!(body["error"], json!("SERVICE_UNAVAILABLE"));
    }

    #[tokio::test]
    async fn rejected_bodies_use_envelope() {
        let base = serve(AppState::ready(pipeline(&[], json!([])))).await;
        let client = reqwest::Client::new();

        let res = client
            .post(format!("{base}/evaluation"))
            .header("content-type", "application/json")
            .header("x-request-id", "trace-42")
            .body(r#"{"user_input": "#)
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        assert_eq!(res.headers()["x-request-id"], "trace-42");
        let body: Value = res.json().await.unwrap();
        assert_eq!(body["success"], json!(false));
        assert_eq!(body["error"]["code"], json!("BAD_REQUEST"));

        let res = client
            .post(format!("{base}/evaluation"))
            .json(&json!({ "question": "hi" }))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body: Value = res.json().await.unwrap();
        assert_eq!(body["error"]["code"], json!("UNPROCESSABLE_ENTITY"));
        assert_eq!(body["error"]["details"][0]["path"], json!("user_input"));
    }

    #[tokio::test]
    async fn chat_requires_messages() {
        let base = serve(AppState::ready(pipeline(&[], json!([])))).await;
        let res = reqwest::Client::new()
            .post(format!("{base}/chat"))
            .json(&json!({ "messages": [] }))
            .send()
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body: Value = res.json().await.unwrap();
        assert_eq!(body["error"], json!("BAD_REQUEST"));
    }
}
