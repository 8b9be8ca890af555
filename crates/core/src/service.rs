//! Flight-recorder service seam.

use crate::handle::ConnectionHandle;
use downcast_rs::{DowncastSync, impl_downcast};
use futures_util::future::BoxFuture;
use jfr_runtime::Result;
use std::sync::Arc;

/// Queryable flight-recorder capability bound to a connection handle.
///
/// Request/response semantics live in the implementing client library; this
/// crate only manages the service's lifetime. The trait is downcast-capable
/// so callers recover their concrete service type from the cached
/// `Arc<dyn FlightRecorderService>`.
pub trait FlightRecorderService: DowncastSync {}
impl_downcast!(sync FlightRecorderService);

/// Factory that looks up the flight-recorder capability for a handle.
pub trait ServiceFactory: Send + Sync {
    /// Binds a service to the handle.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ServiceUnsupported`] when the remote side does not
    /// expose the capability.
    ///
    /// [`Error::ServiceUnsupported`]: jfr_runtime::Error::ServiceUnsupported
    fn flight_recorder<'a>(
        &'a self,
        handle: &'a ConnectionHandle,
    ) -> BoxFuture<'a, Result<Arc<dyn FlightRecorderService>>>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::NullService;

    #[test]
    fn test_service_downcasts_to_concrete_type() {
        let service: Arc<dyn FlightRecorderService> = Arc::new(NullService);
        let concrete = service.downcast_arc::<NullService>();
        assert!(concrete.is_ok());
    }
}
