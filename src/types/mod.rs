//! Core types shared by the registry and completion providers.

pub mod generation;
pub mod message;

pub use generation::*;
pub use message::*;
