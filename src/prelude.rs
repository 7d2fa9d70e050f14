//! Convenience re-exports for common use.

pub use crate::agent::{AgentKey, AgentRegistry, AgentSession, SharedAgentRegistry};
pub use crate::config::RegistryConfig;
pub use crate::error::{RegistryError, Result};
pub use crate::provider::{CompletionService, OpenAiCompletionService};
pub use crate::types::{ChatMessage, CompletionSettings, Role};
