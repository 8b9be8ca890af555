//! JMX service URL construction and parsing.
//!
//! Addresses follow the fixed RMI template
//! `service:jmx:rmi:///jndi/rmi://<host>:<port>/jmxrmi`. The formatted string
//! is computed once at construction and every accessor reads back from it,
//! so canonicalization is reflected everywhere.

use crate::error::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// Default remote management port.
pub const DEFAULT_PORT: u16 = 9091;

const URL_PREFIX: &str = "service:jmx:rmi:///jndi/rmi://";
const URL_SUFFIX: &str = "/jmxrmi";

/// Canonical address of a remote management endpoint.
///
/// Immutable once constructed. The host is trimmed and lowercased; the port
/// is kept as given.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ServiceUrl {
    host: String,
    port: u16,
    formatted: String,
}

impl ServiceUrl {
    /// Builds a service URL for `host:port`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidUrl`] if the host is empty or contains
    /// characters that would corrupt the address template.
    pub fn new(host: &str, port: u16) -> Result<Self> {
        let host = host.trim().to_ascii_lowercase();
        if host.is_empty() {
            return Err(Error::InvalidUrl("host is empty".to_string()));
        }
        if host.contains([':', '/', ' ']) {
            return Err(Error::InvalidUrl(format!(
                "host '{host}' contains reserved characters"
            )));
        }

        let formatted = format!("{URL_PREFIX}{host}:{port}{URL_SUFFIX}");
        Ok(Self {
            host,
            port,
            formatted,
        })
    }

    /// The canonical host component.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// The port component.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// The full formatted address.
    pub fn as_str(&self) -> &str {
        &self.formatted
    }
}

impl fmt::Display for ServiceUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.formatted)
    }
}

impl FromStr for ServiceUrl {
    type Err = Error;

    /// Parses a pre-built address back into host and port.
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let rest = s
            .strip_prefix(URL_PREFIX)
            .ok_or_else(|| Error::InvalidUrl(format!("'{s}' does not match the RMI template")))?;
        let authority = rest
            .strip_suffix(URL_SUFFIX)
            .ok_or_else(|| Error::InvalidUrl(format!("'{s}' does not end in {URL_SUFFIX}")))?;

        let (host, port) = authority
            .rsplit_once(':')
            .ok_or_else(|| Error::InvalidUrl(format!("'{authority}' is missing a port")))?;
        let port = port
            .parse::<u16>()
            .map_err(|_| Error::InvalidUrl(format!("'{port}' is not a valid port")))?;

        Self::new(host, port)
    }
}
