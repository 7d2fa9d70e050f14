//! Shared test helpers and mock completion service.
#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use agent_registry::error::RegistryError;
use agent_registry::provider::CompletionService;
use agent_registry::types::ChatMessage;

/// A completion request as the mock saw it.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
}

/// A mock service that returns queued outcomes and records every request.
///
/// With nothing queued it answers `"irrelevant"`.
pub struct ScriptedCompletion {
    outcomes: Mutex<VecDeque<Result<String, RegistryError>>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl ScriptedCompletion {
    pub fn new() -> Self {
        Self {
            outcomes: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Queue a successful reply.
    pub fn queue_reply(&self, text: &str) {
        self.outcomes
            .lock()
            .unwrap()
            .push_back(Ok(text.to_string()));
    }

    /// Queue a failure for the next call.
    pub fn queue_error(&self, error: RegistryError) {
        self.outcomes.lock().unwrap().push_back(Err(error));
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn last_request(&self) -> Option<RecordedRequest> {
        self.requests.lock().unwrap().last().cloned()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl CompletionService for ScriptedCompletion {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn complete(
        &self,
        model: &str,
        messages: &[ChatMessage],
    ) -> Result<String, RegistryError> {
        self.requests.lock().unwrap().push(RecordedRequest {
            model: model.to_string(),
            messages: messages.to_vec(),
        });
        self.outcomes
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok("irrelevant".to_string()))
    }
}
