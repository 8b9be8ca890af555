//! Connection handle - identity view over a live session.

use jfr_runtime::ManagementSession;
use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;

/// Observer notified when the connection that produced a handle goes away.
pub trait ConnectionListener: Send + Sync {
    /// Called exactly once when the owning connection closes.
    fn on_connection_closed(&self);
}

/// Lightweight wrapper exposing a session's identity to downstream service
/// factories without granting close authority.
///
/// The listener set starts from whatever is passed at construction;
/// connections always pass an empty vector and interested parties register
/// afterwards via [`add_listener`].
///
/// [`add_listener`]: ConnectionHandle::add_listener
pub struct ConnectionHandle {
    display_name: String,
    session: Arc<dyn ManagementSession>,
    listeners: Mutex<Vec<Arc<dyn ConnectionListener>>>,
}

impl ConnectionHandle {
    /// Wraps a session with a display name and an initial listener set.
    pub fn new(
        session: Arc<dyn ManagementSession>,
        display_name: impl Into<String>,
        listeners: Vec<Arc<dyn ConnectionListener>>,
    ) -> Self {
        Self {
            display_name: display_name.into(),
            session,
            listeners: Mutex::new(listeners),
        }
    }

    /// Human-readable name for the connection behind this handle.
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// The underlying session, for service factories that issue protocol
    /// calls through it.
    ///
    /// Holders must never close the session; teardown belongs to the owning
    /// connection.
    pub fn session(&self) -> Arc<dyn ManagementSession> {
        Arc::clone(&self.session)
    }

    /// Registers a listener for connection teardown.
    pub fn add_listener(&self, listener: Arc<dyn ConnectionListener>) {
        self.listeners.lock().push(listener);
    }

    /// Number of registered listeners.
    pub fn listener_count(&self) -> usize {
        self.listeners.lock().len()
    }

    /// Drains the listener set, notifying each listener once. Called by the
    /// owning connection during teardown; draining makes a repeat call inert.
    pub(crate) fn notify_closed(&self) {
        let listeners: Vec<_> = self.listeners.lock().drain(..).collect();
        for listener in listeners {
            listener.on_connection_closed();
        }
    }
}

impl fmt::Debug for ConnectionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionHandle")
            .field("display_name", &self.display_name)
            .field("listeners", &self.listener_count())
            .finish_non_exhaustive()
    }
}
