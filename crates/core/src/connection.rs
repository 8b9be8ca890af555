//! Connection lifecycle: bounded-retry establishment and exactly-once
//! teardown.
//!
//! A [`Connector`] carries the injected collaborators (transport, service
//! factory, clock, status sink) and the retry policy. Its `connect` methods
//! run the whole lifecycle eagerly: open a session with bounded retries,
//! wrap it in a [`ConnectionHandle`], bind the flight-recorder service, and
//! hand back a [`JfrConnection`] that owns all three. Construction either
//! yields a fully usable connection or fails with the last cause attached;
//! no partially-initialized state escapes.

use crate::handle::ConnectionHandle;
use crate::service::{FlightRecorderService, ServiceFactory};
use jfr_runtime::{
    Clock, ConnectionDescriptor, Credentials, Error, LogSink, ManagementSession, Result,
    ServerDescriptor, ServiceUrl, StatusSink, SystemClock, Transport,
};
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tracing::{debug, error, warn};

/// Fixed delay slept between connection attempts.
pub const RETRY_DELAY: Duration = Duration::from_millis(500);

/// Retry policy for connection establishment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectOptions {
    /// Bound on failed attempts: the n-th failure is terminal once
    /// `n >= max_retry`. With `0` the very first failure aborts; this is a
    /// deliberate single-attempt mode, not unlimited retries.
    pub max_retry: u32,
    /// Delay between attempts. Constant; no backoff is applied.
    pub retry_delay: Duration,
}

impl Default for ConnectOptions {
    fn default() -> Self {
        Self {
            max_retry: 0,
            retry_delay: RETRY_DELAY,
        }
    }
}

impl ConnectOptions {
    /// Options with the default single-attempt policy.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the failed-attempt bound.
    #[must_use]
    pub fn with_max_retry(mut self, max_retry: u32) -> Self {
        self.max_retry = max_retry;
        self
    }

    /// Sets the delay between attempts.
    #[must_use]
    pub fn with_retry_delay(mut self, retry_delay: Duration) -> Self {
        self.retry_delay = retry_delay;
        self
    }
}

/// Builds [`JfrConnection`]s from injected collaborators.
///
/// The transport and service factory come from the management-protocol
/// client library; the clock and status sink default to the production
/// implementations and are swappable for tests.
pub struct Connector {
    transport: Arc<dyn Transport>,
    factory: Arc<dyn ServiceFactory>,
    clock: Arc<dyn Clock>,
    sink: Arc<dyn StatusSink>,
    credentials: Credentials,
    options: ConnectOptions,
}

impl Connector {
    /// Connector with the default clock, sink, anonymous credentials, and
    /// retry policy.
    pub fn new(transport: Arc<dyn Transport>, factory: Arc<dyn ServiceFactory>) -> Self {
        Self {
            transport,
            factory,
            clock: Arc::new(SystemClock),
            sink: Arc::new(LogSink),
            credentials: Credentials::anonymous(),
            options: ConnectOptions::default(),
        }
    }

    /// Replaces the clock.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Replaces the status sink.
    #[must_use]
    pub fn with_sink(mut self, sink: Arc<dyn StatusSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Replaces the credential placeholder passed to the transport.
    #[must_use]
    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = credentials;
        self
    }

    /// Replaces the retry policy.
    #[must_use]
    pub fn with_options(mut self, options: ConnectOptions) -> Self {
        self.options = options;
        self
    }

    /// Connects to `host:port` via the standard service URL template.
    pub async fn connect(&self, host: &str, port: u16) -> Result<JfrConnection> {
        self.connect_url(ServiceUrl::new(host, port)?).await
    }

    /// Connects to a pre-built service URL.
    ///
    /// Blocks the calling task for the full retry sequence; nothing runs in
    /// the background.
    pub async fn connect_url(&self, url: ServiceUrl) -> Result<JfrConnection> {
        let session = self.attempt_connect(&url).await?;
        let handle = Arc::new(ConnectionHandle::new(
            Arc::clone(&session),
            format!("{}:{}", url.host(), url.port()),
            Vec::new(),
        ));

        // A factory failure after a successful connect is not retried, but
        // the session it would have used must not leak.
        let service = match self.factory.flight_recorder(&handle).await {
            Ok(service) => service,
            Err(err) => {
                warn!(target: "jfr", url = %url, error = %err, "service lookup failed, closing session");
                session.close();
                return Err(err);
            }
        };

        debug!(target: "jfr", url = %url, "connection established");
        Ok(JfrConnection {
            url,
            session,
            handle,
            service,
            closed: AtomicBool::new(false),
        })
    }

    /// Opens a session, retrying failed attempts with a fixed delay.
    ///
    /// The terminal failure does not sleep: `max_retry` attempts produce
    /// `max_retry - 1` sleeps.
    async fn attempt_connect(&self, url: &ServiceUrl) -> Result<Arc<dyn ManagementSession>> {
        let descriptor =
            ConnectionDescriptor::new(url.clone()).with_credentials(self.credentials.clone());
        let server = ServerDescriptor::new(url.host());

        let mut attempts: u32 = 0;
        loop {
            match self.try_connect(&descriptor, &server).await {
                Ok(session) => return Ok(session),
                Err(err) => {
                    attempts += 1;
                    self.sink
                        .message(&format!("Connection attempt {attempts} failed."));
                    warn!(target: "jfr", url = %url, attempts, error = %err, "connection attempt failed");
                    if attempts >= self.options.max_retry {
                        self.sink.message("Too many failed connections. Aborting.");
                        return Err(Error::RetriesExhausted {
                            attempts,
                            source: Box::new(err),
                        });
                    }
                    self.sink.message(&err.to_string());
                    self.clock.sleep(self.options.retry_delay).await;
                }
            }
        }
    }

    /// One attempt: open the session and check that it reports live.
    ///
    /// Open errors, liveness errors, and a dead liveness answer all
    /// normalize to a single failure; a session that was opened but found
    /// dead is closed before the failure is returned.
    async fn try_connect(
        &self,
        descriptor: &ConnectionDescriptor,
        server: &ServerDescriptor,
    ) -> Result<Arc<dyn ManagementSession>> {
        let session = self
            .transport
            .open(descriptor, server, fail_connection)
            .await?;
        match session.connect().await {
            Ok(true) => Ok(session),
            Ok(false) => {
                session.close();
                Err(Error::NotConnected)
            }
            Err(err) => {
                session.close();
                Err(err)
            }
        }
    }
}

impl fmt::Debug for Connector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Connector")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

/// Failure callback handed to the transport: stateless, fail fast, leave a
/// trace of what the session reported.
fn fail_connection(err: &Error) {
    error!(target: "jfr", error = %err, "management session failed");
}

/// A live flight-recorder connection.
///
/// Construction is eager: a value of this type only exists once the session
/// is up and the service lookup has succeeded. Dropping the connection
/// releases the session; [`disconnect`] does the same explicitly and
/// consumes the value so a second call is unrepresentable.
///
/// Not intended for concurrent accessor/teardown use from multiple tasks;
/// the close-once flag makes teardown races safe, but the type is designed
/// for a single owner.
///
/// [`disconnect`]: JfrConnection::disconnect
pub struct JfrConnection {
    url: ServiceUrl,
    session: Arc<dyn ManagementSession>,
    handle: Arc<ConnectionHandle>,
    service: Arc<dyn FlightRecorderService>,
    closed: AtomicBool,
}

impl JfrConnection {
    /// Identity view over the session, for downstream consumers.
    pub fn handle(&self) -> Arc<ConnectionHandle> {
        Arc::clone(&self.handle)
    }

    /// The flight-recorder service bound to this connection, cached for the
    /// connection's life.
    pub fn service(&self) -> Arc<dyn FlightRecorderService> {
        Arc::clone(&self.service)
    }

    /// Canonical host, read back from the stored service URL.
    pub fn host(&self) -> &str {
        self.url.host()
    }

    /// Port, read back from the stored service URL.
    pub fn port(&self) -> u16 {
        self.url.port()
    }

    /// The address this connection was established against.
    pub fn url(&self) -> &ServiceUrl {
        &self.url
    }

    /// Estimates the remote wall-clock time from a local reading.
    ///
    /// Clock skew between the two hosts is estimated by the session's
    /// protocol layer rather than assumed to be zero.
    pub fn approximate_server_time(&self, clock: &dyn Clock) -> i64 {
        self.session
            .approximate_server_time(clock.wall_time_millis())
    }

    /// Closes the session.
    ///
    /// Consuming `self` means teardown runs at most once through this path;
    /// the drop glue observes the close flag and does nothing more.
    pub fn disconnect(self) {
        self.close_once();
    }

    fn close_once(&self) {
        if !self.closed.swap(true, Ordering::SeqCst) {
            debug!(target: "jfr", url = %self.url, "closing connection");
            self.handle.notify_closed();
            self.session.close();
        }
    }
}

impl Drop for JfrConnection {
    fn drop(&mut self) {
        self.close_once();
    }
}

impl fmt::Debug for JfrConnection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JfrConnection")
            .field("url", &self.url)
            .field("closed", &self.closed.load(Ordering::SeqCst))
            .finish_non_exhaustive()
    }
}
