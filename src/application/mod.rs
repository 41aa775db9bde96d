//! Application layer - Commands, Queries, and Handlers.
//!
//! This layer turns recognised intents into CI operations and replies.
//! Handlers depend only on the `CiServer` port.

pub mod handlers;
pub mod intent_router;

pub use handlers::{JobHandlerSettings, JobHandlers, JobOperationError};
pub use intent_router::{IntentRouter, FALLBACK_REPLY};
