//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `CiServer` - The continuous-integration server (Jenkins) the bot drives

mod ci_server;

pub use ci_server::{BuildInfo, CiError, CiServer, JobInfo, JobSummary};
