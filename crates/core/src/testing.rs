//! Test doubles for exercising the connection lifecycle without a live
//! management endpoint.
//!
//! Everything here is deterministic: the clock records sleeps instead of
//! waiting, the transport plays back scripted outcomes, and the sink keeps
//! every line it is given.

use crate::handle::{ConnectionHandle, ConnectionListener};
use crate::service::{FlightRecorderService, ServiceFactory};
use futures_util::FutureExt;
use futures_util::future::BoxFuture;
use jfr_runtime::{
    Clock, ConnectionDescriptor, Error, FailureCallback, ManagementSession, Result,
    ServerDescriptor, StatusSink, Transport,
};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};
use std::time::Duration;

/// Shared counter recording how often a session was closed.
#[derive(Debug, Default, Clone)]
pub struct CloseCounter(Arc<AtomicUsize>);

impl CloseCounter {
    /// Counter starting at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of close calls recorded so far.
    pub fn count(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }

    fn record(&self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

/// Session double with a scripted liveness answer and a fixed server-time
/// skew.
pub struct FakeSession {
    live: bool,
    skew_millis: i64,
    closes: CloseCounter,
}

impl FakeSession {
    /// Session whose liveness check answers `true`.
    pub fn live(closes: CloseCounter) -> Arc<Self> {
        Arc::new(Self {
            live: true,
            skew_millis: 0,
            closes,
        })
    }

    /// Session whose liveness check answers `false`.
    pub fn dead(closes: CloseCounter) -> Arc<Self> {
        Arc::new(Self {
            live: false,
            skew_millis: 0,
            closes,
        })
    }

    /// Live session whose server time runs `skew_millis` ahead of the local
    /// reading.
    pub fn with_skew(closes: CloseCounter, skew_millis: i64) -> Arc<Self> {
        Arc::new(Self {
            live: true,
            skew_millis,
            closes,
        })
    }
}

impl ManagementSession for FakeSession {
    fn connect(&self) -> BoxFuture<'_, Result<bool>> {
        futures_util::future::ready(Ok(self.live)).boxed()
    }

    fn close(&self) {
        self.closes.record();
    }

    fn approximate_server_time(&self, local_epoch_millis: i64) -> i64 {
        local_epoch_millis + self.skew_millis
    }
}

/// One scripted outcome for a [`ScriptedTransport`] open call.
pub enum OpenOutcome {
    /// Open fails with the given message.
    Fail(String),
    /// Open succeeds with the given session.
    Session(Arc<FakeSession>),
}

impl OpenOutcome {
    /// Failure outcome.
    pub fn fail(message: impl Into<String>) -> Self {
        Self::Fail(message.into())
    }

    /// Success outcome.
    pub fn session(session: Arc<FakeSession>) -> Self {
        Self::Session(session)
    }
}

/// Transport double that plays back outcomes in order.
///
/// Running past the end of the script fails the open call; lifecycle tests
/// should script every attempt they expect.
pub struct ScriptedTransport {
    script: Mutex<VecDeque<OpenOutcome>>,
    descriptors: Mutex<Vec<ConnectionDescriptor>>,
    opens: AtomicUsize,
}

impl ScriptedTransport {
    /// Transport that plays back `script` front to back.
    pub fn new(script: Vec<OpenOutcome>) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(script.into()),
            descriptors: Mutex::new(Vec::new()),
            opens: AtomicUsize::new(0),
        })
    }

    /// Number of open calls made so far.
    pub fn open_calls(&self) -> usize {
        self.opens.load(Ordering::SeqCst)
    }

    /// The descriptor passed to the most recent open call.
    pub fn last_descriptor(&self) -> Option<ConnectionDescriptor> {
        self.descriptors.lock().last().cloned()
    }
}

impl Transport for ScriptedTransport {
    fn open<'a>(
        &'a self,
        descriptor: &'a ConnectionDescriptor,
        _server: &'a ServerDescriptor,
        _on_failure: FailureCallback,
    ) -> BoxFuture<'a, Result<Arc<dyn ManagementSession>>> {
        self.opens.fetch_add(1, Ordering::SeqCst);
        self.descriptors.lock().push(descriptor.clone());
        let outcome = self.script.lock().pop_front();
        let result = match outcome {
            Some(OpenOutcome::Fail(message)) => Err(Error::TransportOpen(message)),
            Some(OpenOutcome::Session(session)) => Ok(session as Arc<dyn ManagementSession>),
            None => Err(Error::TransportOpen("script exhausted".to_string())),
        };
        futures_util::future::ready(result).boxed()
    }
}

/// Clock double: wall time advances only when told, sleeps are recorded and
/// return immediately.
pub struct ManualClock {
    now_millis: AtomicI64,
    sleeps: Mutex<Vec<Duration>>,
}

impl ManualClock {
    /// Clock starting at `start_millis`.
    pub fn new(start_millis: i64) -> Arc<Self> {
        Arc::new(Self {
            now_millis: AtomicI64::new(start_millis),
            sleeps: Mutex::new(Vec::new()),
        })
    }

    /// Moves the wall clock forward.
    pub fn advance(&self, millis: i64) {
        self.now_millis.fetch_add(millis, Ordering::SeqCst);
    }

    /// Every sleep requested so far, in order.
    pub fn sleeps(&self) -> Vec<Duration> {
        self.sleeps.lock().clone()
    }
}

impl Clock for ManualClock {
    fn wall_time_millis(&self) -> i64 {
        self.now_millis.load(Ordering::SeqCst)
    }

    fn sleep(&self, duration: Duration) -> BoxFuture<'_, ()> {
        self.sleeps.lock().push(duration);
        futures_util::future::ready(()).boxed()
    }
}

/// Status sink double that keeps every line.
#[derive(Default)]
pub struct RecordingSink {
    lines: Mutex<Vec<String>>,
}

impl RecordingSink {
    /// Empty sink.
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Every line reported so far, in order.
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().clone()
    }
}

impl StatusSink for RecordingSink {
    fn message(&self, text: &str) {
        self.lines.lock().push(text.to_string());
    }
}

/// Listener double counting teardown notifications.
#[derive(Default)]
pub struct RecordingListener {
    closings: AtomicUsize,
}

impl RecordingListener {
    /// Listener with no notifications yet.
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Number of teardown notifications received.
    pub fn closings(&self) -> usize {
        self.closings.load(Ordering::SeqCst)
    }
}

impl ConnectionListener for RecordingListener {
    fn on_connection_closed(&self) {
        self.closings.fetch_add(1, Ordering::SeqCst);
    }
}

/// Inert flight-recorder service for wiring tests.
#[derive(Debug, Default)]
pub struct NullService;

impl FlightRecorderService for NullService {}

/// Factory double: hands out [`NullService`] or refuses the lookup.
pub struct StaticFactory {
    supported: bool,
    lookups: AtomicUsize,
}

impl StaticFactory {
    /// Factory whose lookups succeed.
    pub fn supported() -> Arc<Self> {
        Arc::new(Self {
            supported: true,
            lookups: AtomicUsize::new(0),
        })
    }

    /// Factory whose lookups fail with [`Error::ServiceUnsupported`].
    pub fn unsupported() -> Arc<Self> {
        Arc::new(Self {
            supported: false,
            lookups: AtomicUsize::new(0),
        })
    }

    /// Number of lookups made so far.
    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

impl ServiceFactory for StaticFactory {
    fn flight_recorder<'a>(
        &'a self,
        _handle: &'a ConnectionHandle,
    ) -> BoxFuture<'a, Result<Arc<dyn FlightRecorderService>>> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        let result = if self.supported {
            Ok(Arc::new(NullService) as Arc<dyn FlightRecorderService>)
        } else {
            Err(Error::ServiceUnsupported(
                "flight recorder not present on remote".to_string(),
            ))
        };
        futures_util::future::ready(result).boxed()
    }
}
