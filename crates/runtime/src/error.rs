//! Error types for the JMX connection runtime.

use thiserror::Error;

/// Result type alias for runtime operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while establishing or using a management connection.
#[derive(Debug, Error)]
pub enum Error {
    /// The transport library failed to construct or open a session.
    #[error("Failed to open management session: {0}")]
    TransportOpen(String),

    /// A session was constructed but reports itself not live.
    ///
    /// Raised synthetically when the liveness check answers `false`; the
    /// retry loop treats it exactly like an open failure.
    #[error("Connection Failed")]
    NotConnected,

    /// Every connection attempt failed.
    ///
    /// Carries the most recent underlying failure as its source.
    #[error("Connection failed after {attempts} attempt(s)")]
    RetriesExhausted {
        /// Number of attempts made before giving up.
        attempts: u32,
        /// The failure from the final attempt.
        #[source]
        source: Box<Error>,
    },

    /// The remote side does not expose the flight-recorder capability.
    #[error("Flight recorder service unavailable: {0}")]
    ServiceUnsupported(String),

    /// The service URL was malformed.
    #[error("Invalid service URL: {0}")]
    InvalidUrl(String),

    /// I/O error surfaced by a transport implementation.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Returns true if a fresh connection attempt could succeed where this
    /// failure occurred.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Error::TransportOpen(_) | Error::NotConnected | Error::Io(_)
        )
    }

    /// Returns the attempt count if retries were exhausted.
    pub fn attempts(&self) -> Option<u32> {
        match self {
            Error::RetriesExhausted { attempts, .. } => Some(*attempts),
            _ => None,
        }
    }
}
