//! JMX connection runtime - addressing, transport seams, and time plumbing
//!
//! This crate provides the low-level infrastructure for talking to a remote
//! JVM's management endpoint:
//!
//! - **Service URLs**: Building and parsing JMX-over-RMI addresses
//! - **Transport**: The seam implemented by the management-protocol client
//!   library (session open, liveness, close, server-time estimation)
//! - **Clock**: Injectable wall-clock and sleep primitives
//! - **Status**: Plain-text progress reporting during connection attempts
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────┐
//! │    jfr-rs     │  Connection lifecycle (Connector, JfrConnection)
//! └───────┬───────┘
//!         │ drives
//! ┌───────▼───────┐
//! │  jfr-runtime  │  This crate
//! │  ┌──────────┐ │
//! │  │ Url      │ │  service:jmx:rmi address construction
//! │  └──────────┘ │
//! │  ┌──────────┐ │
//! │  │ Transport│ │  session traits + descriptors
//! │  └──────────┘ │
//! │  ┌──────────┐ │
//! │  │ Clock    │ │  wall time + retry sleeps
//! │  └──────────┘ │
//! └───────────────┘
//! ```
//!
//! The wire protocol itself is out of scope: `Transport` and
//! `ManagementSession` are implemented by an external client library, and
//! everything in this crate is written against those traits.

pub mod clock;
pub mod error;
pub mod status;
pub mod transport;
pub mod url;

// Re-export key types at crate root
pub use clock::{Clock, SystemClock};
pub use secrecy::SecretString;
pub use error::{Error, Result};
pub use status::{LogSink, StatusSink};
pub use transport::{
    ConnectionDescriptor, Credentials, FailureCallback, ManagementSession, ServerDescriptor,
    Transport,
};
pub use url::{DEFAULT_PORT, ServiceUrl};
