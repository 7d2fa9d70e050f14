//! The per-agent record owned by the registry.

use chrono::{DateTime, Utc};

use crate::types::ChatMessage;

/// One agent: its task, model binding, and append-only message history.
#[derive(Debug, Clone)]
pub struct AgentSession {
    task: String,
    model: String,
    messages: Vec<ChatMessage>,
    created_at: DateTime<Utc>,
}

impl AgentSession {
    pub(crate) fn new(task: String, model: String, messages: Vec<ChatMessage>) -> Self {
        Self {
            task,
            model,
            messages,
            created_at: Utc::now(),
        }
    }

    /// The task description given at creation.
    pub fn task(&self) -> &str {
        &self.task
    }

    /// The model every completion for this agent is sent to.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Full history, oldest turn first.
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Append a user turn and the reply it produced.
    pub(crate) fn push_exchange(&mut self, user: ChatMessage, reply: ChatMessage) {
        self.messages.push(user);
        self.messages.push(reply);
    }
}
