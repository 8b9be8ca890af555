//! Transport seam for the remote management protocol.
//!
//! The wire protocol lives in an external client library. This module
//! defines the traits that library implements plus the descriptor types
//! handed to it when opening a session.

use crate::error::{Error, Result};
use crate::url::ServiceUrl;
use futures_util::future::BoxFuture;
use secrecy::SecretString;
use std::sync::Arc;

/// Credential placeholder passed to the transport when opening a session.
///
/// Management endpoints expect a credential slot even when authentication is
/// disabled; both fields default to absent.
#[derive(Debug, Default, Clone)]
pub struct Credentials {
    username: Option<String>,
    password: Option<SecretString>,
}

impl Credentials {
    /// Anonymous credentials: no username, no password.
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Credentials with a username and secret password.
    pub fn new(username: impl Into<String>, password: SecretString) -> Self {
        Self {
            username: Some(username.into()),
            password: Some(password),
        }
    }

    /// The username, if any.
    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    /// The password, if any. Callers expose it only at the point of use.
    pub fn password(&self) -> Option<&SecretString> {
        self.password.as_ref()
    }
}

/// Identity metadata describing the remote server to the transport.
#[derive(Debug, Clone)]
pub struct ServerDescriptor {
    guid: Option<String>,
    display_name: String,
}

impl ServerDescriptor {
    /// Descriptor with a display name and no GUID.
    pub fn new(display_name: impl Into<String>) -> Self {
        Self {
            guid: None,
            display_name: display_name.into(),
        }
    }

    /// Attaches a server GUID.
    #[must_use]
    pub fn with_guid(mut self, guid: impl Into<String>) -> Self {
        self.guid = Some(guid.into());
        self
    }

    /// The server GUID, if known.
    pub fn guid(&self) -> Option<&str> {
        self.guid.as_deref()
    }

    /// Human-readable server name.
    pub fn display_name(&self) -> &str {
        &self.display_name
    }
}

/// Everything the transport needs to locate and authenticate a session.
#[derive(Debug, Clone)]
pub struct ConnectionDescriptor {
    url: ServiceUrl,
    credentials: Credentials,
}

impl ConnectionDescriptor {
    /// Descriptor for the given address with anonymous credentials.
    pub fn new(url: ServiceUrl) -> Self {
        Self {
            url,
            credentials: Credentials::anonymous(),
        }
    }

    /// Replaces the credential placeholder.
    #[must_use]
    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = credentials;
        self
    }

    /// The target address.
    pub fn url(&self) -> &ServiceUrl {
        &self.url
    }

    /// The credential placeholder.
    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }
}

/// Callback invoked by the transport when an established session fails
/// asynchronously.
///
/// A plain function pointer rather than a closure: the callback must not
/// capture state that could outlive the session.
pub type FailureCallback = fn(&Error);

/// A live session to the remote management endpoint.
///
/// Close authority rests with the connection that owns the session. Handles
/// and services hold non-owning references and must never call [`close`].
///
/// [`close`]: ManagementSession::close
pub trait ManagementSession: Send + Sync {
    /// Brings the session up, answering whether the endpoint accepted it.
    ///
    /// `Ok(false)` means the session object exists but the endpoint is not
    /// live; callers treat that the same as an open failure.
    fn connect(&self) -> BoxFuture<'_, Result<bool>>;

    /// Releases the session and its network resources.
    ///
    /// Synchronous so the owner can call it from `Drop` without a runtime
    /// handle. Implementations are not required to tolerate a second call.
    fn close(&self);

    /// Estimates the remote wall-clock time for a local reading, in
    /// milliseconds since the Unix epoch.
    fn approximate_server_time(&self, local_epoch_millis: i64) -> i64;
}

/// Client-library entry point that opens management sessions.
pub trait Transport: Send + Sync {
    /// Opens a session at the descriptor's address.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TransportOpen`] (or [`Error::Io`]) when the session
    /// cannot be constructed.
    fn open<'a>(
        &'a self,
        descriptor: &'a ConnectionDescriptor,
        server: &'a ServerDescriptor,
        on_failure: FailureCallback,
    ) -> BoxFuture<'a, Result<Arc<dyn ManagementSession>>>;
}
