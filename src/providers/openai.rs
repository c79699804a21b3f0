use crate::error::ProviderError;
use crate::providers::traits::CompletionProvider;
use crate::session::{ConversationTurn, TurnRole};
use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

/// OpenAI-style chat-completion client.
///
/// The base URL is configurable so tests can point it at a local stub and
/// deployments can target any compatible endpoint.
pub struct OpenAiProvider {
    /// Pre-computed `"Bearer <key>"` header value (avoids `format!` per request).
    cached_auth_header: Option<String>,
    base_url: String,
    client: Client,
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<WireMessage>,
    temperature: f64,
}

#[derive(Debug, Serialize)]
struct WireMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

impl OpenAiProvider {
    pub fn new(api_key: Option<&str>, base_url: &str) -> Self {
        Self {
            cached_auth_header: api_key.map(|k| format!("Bearer {k}")),
            base_url: base_url.trim_end_matches('/').to_string(),
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(120))
                .connect_timeout(std::time::Duration::from_secs(10))
                .pool_max_idle_per_host(10)
                .pool_idle_timeout(std::time::Duration::from_secs(90))
                .tcp_keepalive(std::time::Duration::from_secs(60))
                .build()
                .unwrap_or_else(|_| Client::new()),
        }
    }

    fn wire_role(role: TurnRole) -> &'static str {
        match role {
            TurnRole::User => "user",
            TurnRole::Assistant => "assistant",
            TurnRole::System => "system",
        }
    }

    fn build_request(
        system_prompt: Option<&str>,
        turns: &[ConversationTurn],
        model: &str,
        temperature: f64,
    ) -> ChatRequest {
        let capacity = turns.len() + usize::from(system_prompt.is_some());
        let mut messages = Vec::with_capacity(capacity);

        // System prompt is prepended fresh per call; it is never part of the
        // stored history.
        if let Some(sys) = system_prompt {
            messages.push(WireMessage {
                role: "system",
                content: sys.to_string(),
            });
        }

        // Turns as stored, oldest-to-newest. No alternation repair.
        for turn in turns {
            messages.push(WireMessage {
                role: Self::wire_role(turn.role),
                content: turn.content.clone(),
            });
        }

        ChatRequest {
            model: model.to_string(),
            messages,
            temperature,
        }
    }

    fn extract_text(chat_response: ChatResponse) -> anyhow::Result<String> {
        chat_response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| anyhow::anyhow!("No response from completion provider"))
    }

    async fn call_api(&self, request: &ChatRequest) -> anyhow::Result<ChatResponse> {
        let auth_header = self
            .cached_auth_header
            .as_ref()
            .ok_or_else(|| ProviderError::missing_key("completion", "NOVAX_API_KEY"))?;

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", auth_header)
            .json(&request)
            .send()
            .await
            .context("completion request failed")?;

        if !response.status().is_success() {
            return Err(super::api_error("completion", response).await);
        }

        response.json().await.map_err(|e| {
            ProviderError::BadBody {
                provider: "completion".to_string(),
                message: e.to_string(),
            }
            .into()
        })
    }
}

#[async_trait]
impl CompletionProvider for OpenAiProvider {
    async fn complete(
        &self,
        system_prompt: Option<&str>,
        turns: &[ConversationTurn],
        model: &str,
        temperature: f64,
    ) -> anyhow::Result<String> {
        let request = Self::build_request(system_prompt, turns, model, temperature);
        let chat_response = self.call_api(&request).await?;
        Self::extract_text(chat_response)
    }
}
