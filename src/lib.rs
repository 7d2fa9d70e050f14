//! Agent Registry
//!
//! Creates, addresses, continues and destroys lightweight conversational
//! agents, each backed by calls to an external completion service.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use agent_registry::prelude::*;
//!
//! # async fn example() -> agent_registry::error::Result<()> {
//! let config = RegistryConfig::from_env();
//! let service = OpenAiCompletionService::from_config(&config)?;
//! let mut registry = AgentRegistry::new(Arc::new(service));
//!
//! let (key, reply) = registry
//!     .create_agent("translate English to French", "Translate: 'Hello'", "gpt-3.5-turbo")
//!     .await?;
//! println!("{key}: {reply}");
//! let reply = registry.message_agent(key, "Good morning").await?;
//! println!("{reply}");
//! registry.delete_agent(key);
//! # Ok(())
//! # }
//! ```

pub mod agent;
pub mod config;
pub mod error;
pub mod prelude;
pub mod provider;
pub mod types;

#[cfg(feature = "cli")]
pub mod cli;
