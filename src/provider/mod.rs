//! Completion service trait and implementations.

pub mod http;
pub mod openai;

pub use openai::OpenAiCompletionService;

use async_trait::async_trait;

use crate::error::RegistryError;
use crate::types::ChatMessage;

/// Turns a model id plus a message history into a generated reply.
///
/// Implementations own all transport concerns (auth, timeouts, retries).
/// Whatever they fail with is surfaced unchanged to the registry's caller.
#[async_trait]
pub trait CompletionService: Send + Sync {
    /// Service name (e.g., "openai").
    fn name(&self) -> &str;

    /// Generate the next assistant reply for `messages` using `model`.
    async fn complete(&self, model: &str, messages: &[ChatMessage])
        -> Result<String, RegistryError>;
}
