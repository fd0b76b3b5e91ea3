//! Session state — the conversation history and its session-scoped identity.
//!
//! A session lives for the lifetime of one chat process and is never
//! persisted here. History is owned exclusively by the session: within a
//! turn it only grows, and insertion order is meaningful because the full
//! list is replayed to the completion service on every iteration.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::types::Message;

/// Mutable conversation state for one chat session.
#[derive(Clone, Debug)]
pub struct SessionState {
    /// Ordered conversation history, starting with the system prompt.
    history: Vec<Message>,
    /// Opaque id scoping ephemeral memory writes to this session.
    run_id: String,
    /// When the session was created.
    created_at: DateTime<Utc>,
}

impl SessionState {
    /// Create a fresh session seeded with a system prompt.
    ///
    /// The `run_id` is generated once here and injected into every
    /// session-scoped tool invocation for the session's lifetime.
    pub fn new(system_prompt: impl Into<String>) -> Self {
        SessionState {
            history: vec![Message::system(system_prompt)],
            run_id: Uuid::new_v4().to_string(),
            created_at: Utc::now(),
        }
    }

    /// The session-scoped run id.
    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    /// The full conversation history, oldest first.
    pub fn history(&self) -> &[Message] {
        &self.history
    }

    /// Append a message. The only mutation the history supports.
    pub fn push(&mut self, message: Message) {
        self.history.push(message);
    }

    /// Number of messages in the history.
    pub fn len(&self) -> usize {
        self.history.len()
    }

    /// Whether the history is empty (never true for a seeded session).
    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    /// When the session was created.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
