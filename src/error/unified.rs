//! Error classification.

use strum::Display;

/// Broad error category for routing caller-side handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum ErrorCategory {
    NotFound,
    InvalidArgument,
    Authentication,
    RateLimit,
    Network,
    Server,
    Api,
    Configuration,
    Serialization,
    Unknown,
}
