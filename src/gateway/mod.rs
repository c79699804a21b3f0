//! Axum-based HTTP gateway for the assistant.
//!
//! A stateless proxy in front of the upstream completion and news providers:
//! per-request work is independent, with body limits and request timeouts at
//! the router layer. The only cross-request state is the in-memory
//! [`SessionStore`].

mod handlers;

use handlers::{
    handle_chat, handle_datetime, handle_health, handle_news_country, handle_news_topic,
    handle_pdf, handle_reset_memory, handle_search_web,
};

use crate::config::Config;
use crate::error::GatewayError;
use crate::news::{GnewsSource, NewsApiSource, NewsService};
use crate::providers::{CompletionProvider, OpenAiProvider};
use crate::session::SessionStore;
use anyhow::Result;
use axum::{
    Router,
    http::StatusCode,
    routing::{get, post},
};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;

/// Maximum request body size (10MB) — bounded by PDF uploads
pub const MAX_BODY_SIZE: usize = 10 * 1024 * 1024;
/// Request timeout — must cover one upstream completion round-trip
pub const REQUEST_TIMEOUT_SECS: u64 = 120;

/// Fixed instruction prepended fresh on every upstream call; never stored in
/// the history itself.
pub const SYSTEM_PROMPT: &str = "You are Nova X, a friendly personal assistant. \
Answer concisely and helpfully. Preserve formatting with plain line breaks.";

/// Fixed apologetic reply returned when the upstream completion fails.
pub const FALLBACK_REPLY: &str =
    "Sorry, I couldn't process that right now. Please try again in a moment.";

/// Shared state for all axum handlers
#[derive(Clone)]
pub struct AppState {
    pub provider: Arc<dyn CompletionProvider>,
    pub model: String,
    pub temperature: f64,
    pub sessions: Arc<SessionStore>,
    pub news: Arc<NewsService>,
    pub http: reqwest::Client,
    pub search_base_url: String,
    pub search_max_results: usize,
}

impl AppState {
    pub fn from_config(config: &Config) -> Self {
        let provider: Arc<dyn CompletionProvider> = Arc::new(OpenAiProvider::new(
            config.api_key.as_deref(),
            &config.provider_base_url,
        ));
        let news = Arc::new(NewsService::new(
            Arc::new(NewsApiSource::new(
                config.news.newsapi_key.as_deref(),
                &config.news.newsapi_base_url,
            )),
            Arc::new(GnewsSource::new(
                config.news.gnews_key.as_deref(),
                &config.news.gnews_base_url,
            )),
        ));

        Self {
            provider,
            model: config.default_model.clone(),
            temperature: config.default_temperature,
            sessions: Arc::new(SessionStore::new()),
            news,
            http: reqwest::Client::builder()
                .timeout(Duration::from_secs(20))
                .connect_timeout(Duration::from_secs(10))
                .build()
                .unwrap_or_else(|_| reqwest::Client::new()),
            search_base_url: config.search.base_url.clone(),
            search_max_results: config.search.max_results,
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handle_health))
        .route("/chat", post(handle_chat))
        // Legacy alias kept for older widget builds
        .route("/api/ask", post(handle_chat))
        .route("/reset-memory", post(handle_reset_memory))
        .route("/news/topic", get(handle_news_topic))
        .route("/news/country", get(handle_news_country))
        .route("/pdf", post(handle_pdf))
        .route("/search-web", post(handle_search_web))
        .route("/datetime", get(handle_datetime))
        .with_state(state)
        .layer(RequestBodyLimitLayer::new(MAX_BODY_SIZE))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(REQUEST_TIMEOUT_SECS),
        ))
}

/// Run the HTTP gateway.
pub async fn run_gateway(host: &str, port: u16, config: &Config) -> Result<()> {
    let addr: SocketAddr = format!("{host}:{port}")
        .parse()
        .map_err(|e| GatewayError::Bind(format!("{host}:{port}: {e}")))?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| GatewayError::Bind(format!("{addr}: {e}")))?;
    run_gateway_with_listener(listener, AppState::from_config(config)).await
}

/// Run the HTTP gateway from a pre-bound listener (tests bind port 0).
pub async fn run_gateway_with_listener(
    listener: tokio::net::TcpListener,
    state: AppState,
) -> Result<()> {
    let addr = listener.local_addr()?;
    tracing::info!(%addr, "gateway listening");
    println!("◆ Nova X gateway listening on {addr}");
    println!("  POST /chat (alias /api/ask)");
    println!("  POST /reset-memory");
    println!("  GET  /news/topic?topic= · GET /news/country?country=");
    println!("  POST /pdf · POST /search-web · GET /datetime");
    println!("  Press Ctrl-C to stop\n");

    let app = build_router(state);
    axum::serve(listener, app).await?;

    Ok(())
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn body_limit_covers_pdf_uploads() {
        assert_eq!(MAX_BODY_SIZE, 10 * 1024 * 1024);
    }

    #[test]
    fn timeout_covers_one_completion_round_trip() {
        assert_eq!(REQUEST_TIMEOUT_SECS, 120);
    }

    #[test]
    fn app_state_is_clone() {
        fn assert_clone<T: Clone>() {}
        assert_clone::<AppState>();
    }

    #[test]
    fn system_prompt_names_the_assistant() {
        assert!(SYSTEM_PROMPT.contains("Nova X"));
    }

    #[tokio::test]
    async fn bind_to_an_occupied_port_is_a_bind_error() {
        let held = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = held.local_addr().unwrap().port();

        let err = run_gateway("127.0.0.1", port, &Config::default())
            .await
            .unwrap_err();

        assert!(matches!(
            err.downcast_ref::<GatewayError>(),
            Some(GatewayError::Bind(_))
        ));
    }
}
