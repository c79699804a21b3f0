//! In-memory conversation history, keyed by session id.
//!
//! History lives only in process memory and is lost on restart. The store
//! keeps the full append-only log per session; only a sliding window of the
//! most recent [`HISTORY_WINDOW`] turns is forwarded upstream per request.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Mutex;

/// Number of recent turns forwarded to the completion provider per request.
pub const HISTORY_WINDOW: usize = 12;

/// Session id used when a caller does not identify itself.
pub const DEFAULT_SESSION: &str = "default";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnRole {
    User,
    Assistant,
    System,
}

impl TurnRole {
    pub fn as_str(self) -> &'static str {
        match self {
            TurnRole::User => "user",
            TurnRole::Assistant => "assistant",
            TurnRole::System => "system",
        }
    }
}

/// One message exchanged in a conversation, tagged with its speaker role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub role: TurnRole,
    pub content: String,
}

impl ConversationTurn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: TurnRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: TurnRole::Assistant,
            content: content.into(),
        }
    }
}

/// Explicit session store replacing the original's module-level global.
///
/// Mutations are serialized by the inner mutex, but there is no cross-request
/// coordination: two concurrent sends on the same session interleave their
/// appends non-deterministically. That matches the single-casual-user target
/// of this system.
#[derive(Default)]
pub struct SessionStore {
    sessions: Mutex<HashMap<String, Vec<ConversationTurn>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a user turn. A failed upstream call later does NOT roll this
    /// back: the unpaired user turn stays in the log, so alternation is not
    /// an invariant of the stored history.
    pub fn append_user(&self, session_id: &str, content: &str) {
        self.append(session_id, ConversationTurn::user(content));
    }

    pub fn append_assistant(&self, session_id: &str, content: &str) {
        self.append(session_id, ConversationTurn::assistant(content));
    }

    fn append(&self, session_id: &str, turn: ConversationTurn) {
        let mut sessions = self.sessions.lock().expect("session store poisoned");
        sessions.entry(session_id.to_string()).or_default().push(turn);
    }

    /// The most recent [`HISTORY_WINDOW`] turns, oldest-to-newest, as stored
    /// (no alternation repair). The underlying log is untouched.
    pub fn window(&self, session_id: &str) -> Vec<ConversationTurn> {
        let sessions = self.sessions.lock().expect("session store poisoned");
        let Some(turns) = sessions.get(session_id) else {
            return Vec::new();
        };
        let start = turns.len().saturating_sub(HISTORY_WINDOW);
        turns[start..].to_vec()
    }

    /// Total turns stored for a session (beyond the forwarded window).
    pub fn len(&self, session_id: &str) -> usize {
        let sessions = self.sessions.lock().expect("session store poisoned");
        sessions.get(session_id).map_or(0, Vec::len)
    }

    pub fn is_empty(&self, session_id: &str) -> bool {
        self.len(session_id) == 0
    }

    /// Drop all turns for one session.
    pub fn reset(&self, session_id: &str) {
        let mut sessions = self.sessions.lock().expect("session store poisoned");
        sessions.remove(session_id);
    }
}
