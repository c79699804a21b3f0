use super::transcript::{Speaker, Transcript};
use super::GatewayApi;

/// Fixed error bubble shown when the gateway can't be reached or its reply
/// can't be parsed. Never retried.
pub const UNREACHABLE_BUBBLE: &str = "⚠️ Error: Unable to reach server.";

#[derive(Debug, PartialEq, Eq)]
pub enum SendOutcome {
    /// Blank input: no bubble, no request.
    Ignored,
    Replied(String),
    /// Transport or parse failure; the fixed error bubble was appended.
    Failed,
    /// The reply arrived after a newer send started and was discarded.
    Stale,
}

/// The widget's send path: optimistic user echo, one POST, one reply bubble.
///
/// Blank or whitespace-only input is a silent no-op. There is no retry and
/// no cancellation of an in-flight send; a newer send simply outranks the
/// older one via the transcript's generation counter.
pub async fn send_message(
    gateway: &dyn GatewayApi,
    transcript: &mut Transcript,
    text: &str,
) -> SendOutcome {
    let message = text.trim();
    if message.is_empty() {
        return SendOutcome::Ignored;
    }

    // Optimistic echo before the request goes out.
    transcript.push(Speaker::You, message);
    let generation = transcript.begin_turn();

    match gateway.ask(message).await {
        Ok(reply) => {
            if transcript.try_complete(generation, Speaker::Nova, reply.clone()) {
                SendOutcome::Replied(reply)
            } else {
                SendOutcome::Stale
            }
        }
        Err(e) => {
            tracing::debug!(error = %e, "send failed");
            if transcript.try_complete(generation, Speaker::Nova, UNREACHABLE_BUBBLE) {
                SendOutcome::Failed
            } else {
                SendOutcome::Stale
            }
        }
    }
}
