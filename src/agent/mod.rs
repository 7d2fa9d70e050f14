//! Agent registry: keyed conversational sessions backed by a completion service.

pub mod key;
pub mod registry;
pub mod session;

pub use key::AgentKey;
pub use registry::{AgentRegistry, SharedAgentRegistry};
pub use session::AgentSession;
