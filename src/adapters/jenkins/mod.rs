//! Jenkins Adapters.
//!
//! Implementations of the CiServer port.
//!
//! ## Available Adapters
//!
//! - `JenkinsClient` - Jenkins REST API over HTTP basic auth
//! - `MockCiServer` - Configurable in-memory server for testing

mod jenkins_client;
mod mock_ci_server;

pub use jenkins_client::{JenkinsClient, JenkinsConfig};
pub use mock_ci_server::{CiOperation, MockCiServer};
