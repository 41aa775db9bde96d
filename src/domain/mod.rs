//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (job names, build numbers, errors)
//! - `jobs` - Job definitions, build results and outcomes
//! - `intent` - Conversational intents, slots and spelling suggestions

pub mod foundation;
pub mod intent;
pub mod jobs;
