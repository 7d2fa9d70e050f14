//! Completion settings.

use bon::Builder;
use serde::{Deserialize, Serialize};

/// Sampling settings forwarded with every completion request.
///
/// Example:
/// ```
/// use agent_registry::types::CompletionSettings;
///
/// let settings = CompletionSettings::builder().temperature(0.2).build();
/// assert_eq!(settings.temperature, Some(0.2));
/// assert!(settings.max_tokens.is_none());
/// ```
#[derive(Debug, Clone, Builder, Serialize, Deserialize, Default, PartialEq)]
pub struct CompletionSettings {
    pub temperature: Option<f64>,
    pub max_tokens: Option<u32>,
}
