//! services/client/src/views/scope.rs
//!
//! Ties the lifetime of in-flight API calls to the view that started them.

use myflix_core::ports::{PortError, PortResult};
use std::future::Future;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Owned by every view. Tearing the view down cancels whatever it still has
/// in flight, and a cancelled call never hands its result back.
#[derive(Debug, Default)]
pub struct ViewScope {
    cancellation_token: CancellationToken,
}

impl ViewScope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs `call` unless the scope is torn down first.
    pub async fn run<T, F>(&self, call: F) -> PortResult<T>
    where
        F: Future<Output = PortResult<T>>,
    {
        if self.cancellation_token.is_cancelled() {
            return Err(PortError::Cancelled);
        }
        tokio::select! {
            biased;
            _ = self.cancellation_token.cancelled() => {
                debug!("View call cancelled.");
                Err(PortError::Cancelled)
            }
            result = call => result,
        }
    }

    /// A handle that can tear the scope down from another task.
    pub fn canceller(&self) -> CancellationToken {
        self.cancellation_token.clone()
    }

    pub fn teardown(&self) {
        self.cancellation_token.cancel();
    }

    pub fn is_torn_down(&self) -> bool {
        self.cancellation_token.is_cancelled()
    }
}

impl Drop for ViewScope {
    fn drop(&mut self) {
        self.cancellation_token.cancel();
    }
}
