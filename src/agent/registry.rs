//! Registry of live agents.

use std::collections::BTreeMap;
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::error::{RegistryError, Result};
use crate::provider::CompletionService;
use crate::types::ChatMessage;

use super::key::AgentKey;
use super::session::AgentSession;

/// Registry handle for callers that need concurrent access.
///
/// The mutex serialises whole operations, including the completion call,
/// so key allocation and insertion are never interleaved.
pub type SharedAgentRegistry = Arc<Mutex<AgentRegistry>>;

/// Creates, addresses, continues and destroys agent sessions.
///
/// Construct one per process and pass it to whatever handles commands.
/// Every mutation goes through `&mut self`, so the registry has a single
/// writer path and no internal locking.
pub struct AgentRegistry {
    completion: Arc<dyn CompletionService>,
    agents: BTreeMap<AgentKey, AgentSession>,
    next_key: u64,
}

impl AgentRegistry {
    pub fn new(completion: Arc<dyn CompletionService>) -> Self {
        Self {
            completion,
            agents: BTreeMap::new(),
            next_key: 0,
        }
    }

    pub fn into_shared(self) -> SharedAgentRegistry {
        Arc::new(Mutex::new(self))
    }

    /// Start a new agent on `task` and return its key with the first reply.
    ///
    /// The agent is registered only after the completion service answers;
    /// on failure nothing is stored and no key is consumed.
    pub async fn create_agent(
        &mut self,
        task: &str,
        prompt: &str,
        model: &str,
    ) -> Result<(AgentKey, String)> {
        require_non_empty("task", task)?;
        require_non_empty("prompt", prompt)?;
        require_non_empty("model", model)?;
        // Keys are never reissued, so refuse rather than wrap.
        let next_key = self
            .next_key
            .checked_add(1)
            .ok_or(RegistryError::KeySpaceExhausted)?;

        let mut messages = initial_history(task, prompt);
        debug!(model, service = self.completion.name(), "creating agent");
        let reply = self.completion.complete(model, &messages).await?;
        messages.push(ChatMessage::assistant(reply.clone()));

        let key = AgentKey(self.next_key);
        self.next_key = next_key;
        self.agents.insert(
            key,
            AgentSession::new(task.to_string(), model.to_string(), messages),
        );

        info!(%key, model, "agent created");
        Ok((key, reply))
    }

    /// Send `message` to the agent under `key` and return its reply.
    ///
    /// The whole accumulated history goes to the completion service. The
    /// user turn and the reply are committed together once the reply
    /// arrives; if the call fails (or the future is dropped) the history is
    /// left exactly as it was.
    pub async fn message_agent(&mut self, key: AgentKey, message: &str) -> Result<String> {
        let session = self.agents.get(&key).ok_or(RegistryError::NotFound { key })?;
        require_non_empty("message", message)?;

        let user_turn = ChatMessage::user(message);
        let model = session.model().to_string();
        let mut request = Vec::with_capacity(session.messages().len() + 1);
        request.extend_from_slice(session.messages());
        request.push(user_turn.clone());

        debug!(%key, model = %model, turns = request.len(), "messaging agent");
        let reply = match self.completion.complete(&model, &request).await {
            Ok(reply) => reply,
            Err(e) => {
                warn!(%key, error = %e, "completion failed, user turn discarded");
                return Err(e);
            }
        };

        let session = self
            .agents
            .get_mut(&key)
            .ok_or(RegistryError::NotFound { key })?;
        session.push_exchange(user_turn, ChatMessage::assistant(reply.clone()));
        Ok(reply)
    }

    /// Snapshot of `(key, task)` for every registered agent.
    pub fn list_agents(&self) -> Vec<(AgentKey, String)> {
        self.agents
            .iter()
            .map(|(key, session)| (*key, session.task().to_string()))
            .collect()
    }

    /// Remove the agent under `key`. Returns `false` if there was none.
    pub fn delete_agent(&mut self, key: AgentKey) -> bool {
        let removed = self.agents.remove(&key).is_some();
        if removed {
            info!(%key, "agent deleted");
        }
        removed
    }

    pub fn get(&self, key: AgentKey) -> Option<&AgentSession> {
        self.agents.get(&key)
    }

    pub fn contains(&self, key: AgentKey) -> bool {
        self.agents.contains_key(&key)
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    /// Drop every agent and restart key allocation at 0.
    ///
    /// Only meant for test isolation; keys issued before a reset may be
    /// issued again afterwards.
    pub fn reset(&mut self) {
        self.agents.clear();
        self.next_key = 0;
    }
}

fn initial_history(task: &str, prompt: &str) -> Vec<ChatMessage> {
    vec![
        ChatMessage::system(format!("You are an agent. Your task: {task}")),
        ChatMessage::user(prompt),
    ]
}

fn require_non_empty(name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(RegistryError::invalid_argument(format!(
            "{name} must not be empty"
        )));
    }
    Ok(())
}
