//! Cancellation utilities for interruptible background work
//!
//! A [`CancellationToken`] is the advisory half of stopping a session: the
//! background loop checks it between bounded reads. Closing the line source
//! is the hard half that unblocks a read in progress.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared one-way stop flag. Clones observe the same flag.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. Returns true if this call set the flag.
    pub fn cancel(&self) -> bool {
        !self.cancelled.swap(true, Ordering::AcqRel)
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}
