//! Liveness flag for discarding late responses.
//!
//! A request cannot be cancelled once sent. When its owner goes away while it is
//! in flight, the response must be dropped instead of applied. Owners check
//! [`Liveness::is_alive`] before every state change that follows an `.await`.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared handle; every clone observes the same flag.
#[derive(Debug, Clone)]
pub struct Liveness(Arc<AtomicBool>);

impl Default for Liveness {
    fn default() -> Self {
        Self(Arc::new(AtomicBool::new(true)))
    }
}

impl Liveness {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_alive(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    /// Mark the owner as gone. Irreversible.
    pub fn end(&self) {
        self.0.store(false, Ordering::Release);
    }
}
