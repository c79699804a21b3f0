//! Assistant client: the widget's message-dispatch and attachment flows,
//! driven from a terminal instead of a DOM.

pub mod attachments;
pub mod dispatch;
pub mod reminders;
pub mod repl;
pub mod tasks;
pub mod transcript;

pub use dispatch::{send_message, SendOutcome};
pub use transcript::{Bubble, Speaker, Transcript};

use crate::error::GatewayError;
use anyhow::Context;
use async_trait::async_trait;
use serde::Deserialize;

/// Transport seam between the client and the gateway. Tests substitute a
/// counting stub to assert that certain inputs never reach the wire.
#[async_trait]
pub trait GatewayApi: Send + Sync {
    /// POST /chat `{message}` → reply text.
    async fn ask(&self, message: &str) -> anyhow::Result<String>;

    /// POST /pdf multipart → extracted text.
    async fn extract_pdf(&self, filename: &str, bytes: Vec<u8>) -> anyhow::Result<String>;

    /// POST /reset-memory.
    async fn reset(&self) -> anyhow::Result<String>;
}

/// reqwest-backed gateway client.
pub struct HttpGateway {
    base_url: String,
    http: reqwest::Client,
}

#[derive(Deserialize)]
struct AskResponse {
    response: String,
}

#[derive(Deserialize)]
struct PdfResponse {
    text: Option<String>,
}

#[derive(Deserialize)]
struct MessageResponse {
    message: String,
}

impl HttpGateway {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http: reqwest::Client::builder()
                .timeout(std::time::Duration::from_secs(150))
                .connect_timeout(std::time::Duration::from_secs(10))
                .build()
                .unwrap_or_else(|_| reqwest::Client::new()),
        }
    }

    /// GET /news/topic or /news/country — used by the aux CLI commands.
    pub async fn news(&self, kind: &str, value: &str) -> anyhow::Result<String> {
        let response = self
            .http
            .get(format!("{}/news/{kind}", self.base_url))
            .query(&[(kind, value)])
            .send()
            .await
            .context("news request failed")?;
        let parsed: AskResponse = response.json().await.context("news response parse failed")?;
        Ok(parsed.response)
    }

    /// POST /search-web — raw JSON passthrough for display.
    pub async fn search(&self, query: &str) -> anyhow::Result<serde_json::Value> {
        let response = self
            .http
            .post(format!("{}/search-web", self.base_url))
            .json(&serde_json::json!({"query": query}))
            .send()
            .await
            .context("search request failed")?;
        response.json().await.context("search response parse failed")
    }
}

#[async_trait]
impl GatewayApi for HttpGateway {
    async fn ask(&self, message: &str) -> anyhow::Result<String> {
        let response = self
            .http
            .post(format!("{}/chat", self.base_url))
            .json(&serde_json::json!({"message": message}))
            .send()
            .await
            .map_err(|e| GatewayError::Unreachable(e.to_string()))?;

        // Upstream failures come back as a 500 whose body still carries a
        // readable `response`; surface that text rather than the status.
        let parsed: AskResponse = response.json().await.context("chat response parse failed")?;
        Ok(parsed.response)
    }

    async fn extract_pdf(&self, filename: &str, bytes: Vec<u8>) -> anyhow::Result<String> {
        let part = reqwest::multipart::Part::bytes(bytes)
            .file_name(filename.to_string())
            .mime_str("application/pdf")
            .context("invalid mime for pdf part")?;
        let form = reqwest::multipart::Form::new().part("pdf", part);

        let response = self
            .http
            .post(format!("{}/pdf", self.base_url))
            .multipart(form)
            .send()
            .await
            .map_err(|e| GatewayError::Unreachable(e.to_string()))?;

        let status = response.status();
        let parsed: PdfResponse = response.json().await.context("pdf response parse failed")?;
        match parsed.text {
            Some(text) => Ok(text),
            None => anyhow::bail!("pdf extraction failed upstream ({status})"),
        }
    }

    async fn reset(&self) -> anyhow::Result<String> {
        let response = self
            .http
            .post(format!("{}/reset-memory", self.base_url))
            .send()
            .await
            .map_err(|e| GatewayError::Unreachable(e.to_string()))?;
        let parsed: MessageResponse = response
            .json()
            .await
            .context("reset response parse failed")?;
        Ok(parsed.message)
    }
}
