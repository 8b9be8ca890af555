//! Flight-recorder connections over a remote management protocol.
//!
//! This crate manages the lifecycle of a single connection to a running
//! JVM's management endpoint: build the service address, open a session with
//! bounded fixed-delay retries, wrap it in a handle, bind the
//! flight-recorder service through a factory, and guarantee the session is
//! released exactly once however the connection stops being used.
//!
//! The wire protocol and the flight-recorder request/response semantics are
//! external collaborators, injected through the [`Transport`] and
//! [`ServiceFactory`] traits.
//!
//! # Example
//!
//! ```ignore
//! use jfr_rs::{ConnectOptions, Connector};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> jfr_rs::Result<()> {
//!     // `transport` and `factory` come from the management-protocol
//!     // client library.
//!     let connector = Connector::new(transport, factory)
//!         .with_options(ConnectOptions::new().with_max_retry(3));
//!
//!     let connection = connector.connect("localhost", jfr_rs::DEFAULT_PORT).await?;
//!     let recorder = connection.service();
//!     // ... drive the recorder ...
//!     connection.disconnect();
//!     Ok(())
//! }
//! ```

pub mod connection;
pub mod handle;
pub mod service;
pub mod testing;

// Re-export key types at crate root
pub use connection::{ConnectOptions, Connector, JfrConnection, RETRY_DELAY};
pub use handle::{ConnectionHandle, ConnectionListener};
pub use jfr_runtime::{
    Clock, ConnectionDescriptor, Credentials, DEFAULT_PORT, Error, FailureCallback, LogSink,
    ManagementSession, Result, SecretString, ServerDescriptor, ServiceUrl, StatusSink, SystemClock,
    Transport,
};
pub use service::{FlightRecorderService, ServiceFactory};
