use crate::session::ConversationTurn;
use async_trait::async_trait;

/// Seam for the upstream chat-completion provider.
///
/// The gateway owns the system prompt and the history window; the provider
/// just turns them into one reply string. Implementations map the turns onto
/// whatever wire format their API expects.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    async fn complete(
        &self,
        system_prompt: Option<&str>,
        turns: &[ConversationTurn],
        model: &str,
        temperature: f64,
    ) -> anyhow::Result<String>;
}
