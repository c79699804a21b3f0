//! End-to-end tests over a real listener: stub upstream providers, bind
//! port 0, drive the gateway with a plain HTTP client.

use async_trait::async_trait;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use novax::gateway::{AppState, run_gateway_with_listener, FALLBACK_REPLY};
use novax::news::{Headline, NewsService, NewsSource};
use novax::providers::CompletionProvider;
use novax::session::{ConversationTurn, SessionStore};

struct StubProvider {
    calls: AtomicUsize,
    reply: Result<String, String>,
}

#[async_trait]
impl CompletionProvider for StubProvider {
    async fn complete(
        &self,
        _system_prompt: Option<&str>,
        _turns: &[ConversationTurn],
        _model: &str,
        _temperature: f64,
    ) -> anyhow::Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.reply {
            Ok(text) => Ok(text.clone()),
            Err(e) => Err(anyhow::anyhow!("{e}")),
        }
    }
}

struct StubNews {
    titles: Vec<&'static str>,
}

#[async_trait]
impl NewsSource for StubNews {
    fn name(&self) -> &'static str {
        "stub"
    }

    async fn by_topic(&self, _topic: &str) -> anyhow::Result<Vec<Headline>> {
        Ok(self
            .titles
            .iter()
            .map(|t| Headline {
                title: (*t).to_string(),
                source: Some("Stub Wire".to_string()),
            })
            .collect())
    }

    async fn by_country(&self, _code: &str) -> anyhow::Result<Vec<Headline>> {
        self.by_topic("").await
    }
}

fn stub_state(reply: Result<String, String>, search_base_url: &str) -> AppState {
    let provider = Arc::new(StubProvider {
        calls: AtomicUsize::new(0),
        reply,
    });
    let news = Arc::new(NewsService::new(
        Arc::new(StubNews {
            titles: vec!["First headline", "Second headline"],
        }),
        Arc::new(StubNews { titles: vec![] }),
    ));
    AppState {
        provider,
        model: "test-model".to_string(),
        temperature: 0.0,
        sessions: Arc::new(SessionStore::new()),
        news,
        http: reqwest::Client::new(),
        search_base_url: search_base_url.to_string(),
        search_max_results: 8,
    }
}

/// Bind port 0, serve the state in a background task, return the base URL.
async fn serve(state: AppState) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = run_gateway_with_listener(listener, state).await;
    });
    format!("http://{addr}")
}

#[tokio::test]
async fn health_endpoint_responds() {
    let base = serve(stub_state(Ok("hi".into()), "http://127.0.0.1:1")).await;

    let response = reqwest::get(format!("{base}/health")).await.unwrap();
    assert_eq!(response.status(), 200);
}

#[tokio::test]
async fn chat_returns_the_upstream_reply() {
    let base = serve(stub_state(Ok("Hello!".into()), "http://127.0.0.1:1")).await;

    let response = reqwest::Client::new()
        .post(format!("{base}/chat"))
        .json(&serde_json::json!({"message": "hi there"}))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["response"], "Hello!");
}

#[tokio::test]
async fn api_ask_alias_reaches_the_chat_handler() {
    let base = serve(stub_state(Ok("aliased".into()), "http://127.0.0.1:1")).await;

    let response = reqwest::Client::new()
        .post(format!("{base}/api/ask"))
        .json(&serde_json::json!({"message": "hi"}))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["response"], "aliased");
}

#[tokio::test]
async fn blank_message_is_rejected() {
    let base = serve(stub_state(Ok("unused".into()), "http://127.0.0.1:1")).await;

    let response = reqwest::Client::new()
        .post(format!("{base}/chat"))
        .json(&serde_json::json!({"message": "   "}))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 400);
    let body: serde_json::Value = response.json().await.unwrap();
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn malformed_json_is_a_client_error() {
    let base = serve(stub_state(Ok("unused".into()), "http://127.0.0.1:1")).await;

    let response = reqwest::Client::new()
        .post(format!("{base}/chat"))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn upstream_failure_returns_fallback_reply() {
    let base = serve(stub_state(Err("boom".into()), "http://127.0.0.1:1")).await;

    let response = reqwest::Client::new()
        .post(format!("{base}/chat"))
        .json(&serde_json::json!({"message": "hi"}))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 500);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["response"], FALLBACK_REPLY);
}

#[tokio::test]
async fn sessions_are_separated_by_header() {
    let base = serve(stub_state(Ok("reply".into()), "http://127.0.0.1:1")).await;
    let client = reqwest::Client::new();

    for session in ["alpha", "beta"] {
        let response = client
            .post(format!("{base}/chat"))
            .header("X-Session-Id", session)
            .json(&serde_json::json!({"message": "hi"}))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), 200);
    }

    // Reset targets the caller's session (default here, no header).
    let response = client
        .post(format!("{base}/reset-memory"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["message"], "Memory cleared.");
}

#[tokio::test]
async fn news_topic_returns_numbered_headlines() {
    let base = serve(stub_state(Ok("unused".into()), "http://127.0.0.1:1")).await;

    let response = reqwest::get(format!("{base}/news/topic?topic=rust"))
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    let body: serde_json::Value = response.json().await.unwrap();
    let text = body["response"].as_str().unwrap();
    assert!(text.starts_with("1. First headline"));
    assert!(text.contains("2. Second headline"));
}

#[tokio::test]
async fn unmapped_country_fails_before_any_lookup() {
    let base = serve(stub_state(Ok("unused".into()), "http://127.0.0.1:1")).await;

    let response = reqwest::get(format!("{base}/news/country?country=atlantis"))
        .await
        .unwrap();

    assert_eq!(response.status(), 400);
    let body: serde_json::Value = response.json().await.unwrap();
    assert!(body["response"].as_str().unwrap().contains("atlantis"));
}

#[tokio::test]
async fn non_pdf_upload_is_rejected_with_null_text() {
    let base = serve(stub_state(Ok("unused".into()), "http://127.0.0.1:1")).await;

    let part = reqwest::multipart::Part::bytes(b"plain text".to_vec())
        .file_name("notes.txt")
        .mime_str("text/plain")
        .unwrap();
    let form = reqwest::multipart::Form::new().part("pdf", part);

    let response = reqwest::Client::new()
        .post(format!("{base}/pdf"))
        .multipart(form)
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 400);
    let body: serde_json::Value = response.json().await.unwrap();
    assert!(body["text"].is_null());
}

#[tokio::test]
async fn datetime_reports_a_formatted_local_time() {
    let base = serve(stub_state(Ok("unused".into()), "http://127.0.0.1:1")).await;

    let response = reqwest::get(format!("{base}/datetime")).await.unwrap();
    assert_eq!(response.status(), 200);
    let body: serde_json::Value = response.json().await.unwrap();
    // "Saturday, August 30, 2026 at 14:05" — check the joints, not the values.
    let text = body["response"].as_str().unwrap();
    assert!(text.contains(" at "));
    assert!(text.contains(", 20"));
}

#[tokio::test]
async fn search_parses_stubbed_result_page() {
    let search = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/html/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<html><body>
                <a class="result__a" href="https://example.com/one">Example One</a>
                <a class="result__a" href="//duckduckgo.com/l/?uddg=https%3A%2F%2Fexample.com%2Ftwo&rut=x">Example Two</a>
            </body></html>"#,
        ))
        .mount(&search)
        .await;

    let base = serve(stub_state(Ok("unused".into()), &search.uri())).await;

    let response = reqwest::Client::new()
        .post(format!("{base}/search-web"))
        .json(&serde_json::json!({"query": "example"}))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    let body: serde_json::Value = response.json().await.unwrap();
    let results = body["results"].as_array().unwrap();
    assert_eq!(results.len(), 2);
    assert_eq!(results[0]["title"], "Example One");
    assert_eq!(results[1]["url"], "https://example.com/two");
}

#[tokio::test]
async fn search_with_no_hits_returns_a_notice_entry() {
    let search = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/html/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html><body></body></html>"))
        .mount(&search)
        .await;

    let base = serve(stub_state(Ok("unused".into()), &search.uri())).await;

    let response = reqwest::Client::new()
        .post(format!("{base}/search-web"))
        .json(&serde_json::json!({"query": "zxqv"}))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    let body: serde_json::Value = response.json().await.unwrap();
    let results = body["results"].as_array().unwrap();
    assert_eq!(results.len(), 1);
    // The notice is a bare string, not an object.
    assert!(results[0].as_str().unwrap().contains("zxqv"));
}
