//! Adapters - Implementations of port interfaces and inbound surfaces.
//!
//! - `jenkins` - CiServer implementations (REST client, in-memory mock)
//! - `lex` - HTTP surface for conversational fulfillment events

pub mod jenkins;
pub mod lex;

pub use jenkins::{JenkinsClient, JenkinsConfig, MockCiServer};
pub use lex::{lex_routes, LexHandlers};
