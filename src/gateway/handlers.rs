use super::{AppState, FALLBACK_REPLY, SYSTEM_PROMPT};
use crate::error::NewsError;
use crate::extract::{self, AttachmentKind};
use crate::news::{country_code, format_headlines};
use crate::providers::sanitize_api_error;
use crate::search;
use crate::session::DEFAULT_SESSION;
use axum::{
    extract::{Multipart, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json},
};
use chrono::Local;
use serde::Deserialize;
use serde_json::json;

/// Request body for `/chat` and its `/api/ask` alias.
#[derive(Deserialize)]
pub struct ChatBody {
    pub message: String,
}

#[derive(Deserialize)]
pub struct SearchBody {
    pub query: String,
}

#[derive(Deserialize)]
pub struct TopicQuery {
    pub topic: Option<String>,
}

#[derive(Deserialize)]
pub struct CountryQuery {
    pub country: Option<String>,
}

fn session_id(headers: &HeaderMap) -> String {
    headers
        .get("X-Session-Id")
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(DEFAULT_SESSION)
        .to_string()
}

/// GET /health
pub(super) async fn handle_health() -> impl IntoResponse {
    Json(json!({"status": "ok"}))
}

/// POST /chat — append a user turn, forward the window upstream, reply.
///
/// The user turn is appended before the upstream call and is never rolled
/// back: a failed completion leaves an unpaired user turn in the history.
pub(super) async fn handle_chat(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Json<ChatBody>, axum::extract::rejection::JsonRejection>,
) -> impl IntoResponse {
    let Json(chat_body) = match body {
        Ok(b) => b,
        Err(e) => {
            let err = json!({
                "error": format!("Invalid JSON: {e}. Expected: {{\"message\": \"...\"}}")
            });
            return (StatusCode::BAD_REQUEST, Json(err));
        }
    };

    let message = chat_body.message.trim();
    if message.is_empty() {
        let err = json!({"error": "message must not be empty"});
        return (StatusCode::BAD_REQUEST, Json(err));
    }

    let session = session_id(&headers);
    state.sessions.append_user(&session, message);
    let window = state.sessions.window(&session);

    match state
        .provider
        .complete(Some(SYSTEM_PROMPT), &window, &state.model, state.temperature)
        .await
    {
        Ok(reply) => {
            state.sessions.append_assistant(&session, &reply);
            (StatusCode::OK, Json(json!({"response": reply})))
        }
        Err(e) => {
            tracing::error!(
                session,
                "completion failed: {}",
                sanitize_api_error(&e.to_string())
            );
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"response": FALLBACK_REPLY})),
            )
        }
    }
}

/// POST /reset-memory — drop one session's history.
pub(super) async fn handle_reset_memory(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> impl IntoResponse {
    let session = session_id(&headers);
    state.sessions.reset(&session);
    Json(json!({"message": "Memory cleared."}))
}

/// GET /news/topic?topic=
pub(super) async fn handle_news_topic(
    State(state): State<AppState>,
    Query(params): Query<TopicQuery>,
) -> impl IntoResponse {
    let topic = params.topic.as_deref().map(str::trim).unwrap_or_default();
    if topic.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"response": "Please provide a topic."})),
        );
    }

    match state.news.topic_headlines(topic).await {
        Ok(headlines) => (
            StatusCode::OK,
            Json(json!({"response": format_headlines(&headlines)})),
        ),
        Err(NewsError::Empty(_)) => (
            StatusCode::OK,
            Json(json!({"response": format!("No news found for \"{topic}\".")})),
        ),
        Err(e) => {
            tracing::error!(topic, error = %e, "news topic lookup failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"response": "Sorry, I couldn't fetch the news right now."})),
            )
        }
    }
}

/// GET /news/country?country= — the name is mapped through a fixed table;
/// unmapped names fail before any outbound call.
pub(super) async fn handle_news_country(
    State(state): State<AppState>,
    Query(params): Query<CountryQuery>,
) -> impl IntoResponse {
    let country = params.country.as_deref().map(str::trim).unwrap_or_default();
    if country.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"response": "Please provide a country."})),
        );
    }

    let code = match country_code(country) {
        Ok(code) => code,
        Err(e) => {
            tracing::debug!(country, error = %e, "country lookup rejected");
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({"response": format!("Sorry, I don't recognize the country \"{country}\".")})),
            );
        }
    };

    match state.news.country_headlines(code).await {
        Ok(headlines) => (
            StatusCode::OK,
            Json(json!({"response": format_headlines(&headlines)})),
        ),
        Err(NewsError::Empty(_)) => (
            StatusCode::OK,
            Json(json!({"response": format!("No news found for \"{country}\".")})),
        ),
        Err(e) => {
            tracing::error!(country, error = %e, "news country lookup failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"response": "Sorry, I couldn't fetch the news right now."})),
            )
        }
    }
}

/// POST /pdf — multipart upload, field `pdf`. The file lives only for this
/// request; nothing is persisted.
pub(super) async fn handle_pdf(
    State(_state): State<AppState>,
    mut multipart: Multipart,
) -> impl IntoResponse {
    let mut pdf_bytes: Option<Vec<u8>> = None;
    let mut filename: Option<String> = None;

    loop {
        match multipart.next_field().await {
            Ok(Some(field)) if field.name() == Some("pdf") => {
                filename = field.file_name().map(str::to_string);
                match field.bytes().await {
                    Ok(bytes) => pdf_bytes = Some(bytes.to_vec()),
                    Err(e) => {
                        tracing::warn!(error = %e, "pdf field read failed");
                        return (StatusCode::BAD_REQUEST, Json(json!({"text": null})));
                    }
                }
            }
            Ok(Some(_)) => {} // ignore unrelated fields
            Ok(None) => break,
            Err(e) => {
                tracing::warn!(error = %e, "malformed multipart body");
                return (StatusCode::BAD_REQUEST, Json(json!({"text": null})));
            }
        }
    }

    let Some(bytes) = pdf_bytes else {
        return (StatusCode::BAD_REQUEST, Json(json!({"text": null})));
    };

    let (mime, kind) = extract::classify(&bytes, filename.as_deref());
    if kind != AttachmentKind::Pdf {
        tracing::warn!(mime, "rejected non-pdf upload");
        return (StatusCode::BAD_REQUEST, Json(json!({"text": null})));
    }

    match extract::pdf::extract_text(bytes).await {
        // Empty text (no extractable text layer) is not an error.
        Ok(text) => (StatusCode::OK, Json(json!({"text": text}))),
        Err(e) => {
            tracing::error!(error = %e, "pdf extraction failed");
            (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({"text": null})))
        }
    }
}

/// POST /search-web — `{query}` in, mixed hit/notice list out.
pub(super) async fn handle_search_web(
    State(state): State<AppState>,
    body: Result<Json<SearchBody>, axum::extract::rejection::JsonRejection>,
) -> impl IntoResponse {
    let Json(search_body) = match body {
        Ok(b) => b,
        Err(e) => {
            let err = json!({"error": format!("Invalid JSON: {e}. Expected: {{\"query\": \"...\"}}")});
            return (StatusCode::BAD_REQUEST, Json(err));
        }
    };

    let query = search_body.query.trim();
    if query.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": "query must not be empty"})),
        );
    }

    match search::search_web(
        &state.http,
        &state.search_base_url,
        query,
        state.search_max_results,
    )
    .await
    {
        Ok(results) => (StatusCode::OK, Json(json!({"results": results}))),
        Err(e) => {
            tracing::error!(query, error = %e, "web search failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": "search failed"})),
            )
        }
    }
}

/// GET /datetime
pub(super) async fn handle_datetime() -> impl IntoResponse {
    let now = Local::now();
    Json(json!({
        "response": now.format("%A, %B %e, %Y at %H:%M").to_string()
    }))
}
