//! Cancellation handle threaded through every blocking plugin call.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::{ProviderError, ProviderResult};

/// Shared cancellation flag for one run.
///
/// Clones observe the same flag, so a host can keep one clone to cancel while
/// the run holds another.
#[derive(Debug, Clone, Default)]
pub struct Context {
    cancelled: Arc<AtomicBool>,
}

impl Context {
    /// Create a context that is not cancelled.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. Idempotent.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// Whether cancellation has been requested.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Fail with [`ProviderError::Cancelled`] once cancelled.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Cancelled`] after [`Context::cancel`] was called.
    pub fn check(&self) -> ProviderResult<()> {
        if self.is_cancelled() {
            Err(ProviderError::Cancelled)
        } else {
            Ok(())
        }
    }
}
