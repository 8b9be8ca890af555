//! Wall-clock and sleep primitives.
//!
//! Connection code never reaches for the system clock directly; a [`Clock`]
//! is always injected so tests can script time and observe retry sleeps.

use futures_util::FutureExt;
use futures_util::future::BoxFuture;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Source of wall-clock readings and the sleep primitive used between
/// connection attempts.
pub trait Clock: Send + Sync {
    /// Current wall-clock time in milliseconds since the Unix epoch.
    fn wall_time_millis(&self) -> i64;

    /// Suspends the calling task for the given duration.
    fn sleep(&self, duration: Duration) -> BoxFuture<'_, ()>;
}

/// Clock backed by the operating system and the tokio timer.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn wall_time_millis(&self) -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_millis() as i64)
            .unwrap_or(0)
    }

    fn sleep(&self, duration: Duration) -> BoxFuture<'_, ()> {
        tokio::time::sleep(duration).boxed()
    }
}
