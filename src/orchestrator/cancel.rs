//! Cooperative cancellation (spec §5).
//!
//! The spec's suspension point is FX fetch only; everything else is
//! CPU-bound and checked at state boundaries. A full `tokio-util`
//! `CancellationToken` tree is more machinery than that needs — a single
//! shared flag, checked between states and before/after the FX await, is
//! enough (spec §5 "the orchestrator honors an external abort signal at
//! every state boundary and during FX fetch").

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// A cheap, clonable abort flag.
#[derive(Debug, Clone, Default)]
pub struct AbortSignal {
    aborted: Arc<AtomicBool>,
}

impl AbortSignal {
    pub fn new() -> Self {
        AbortSignal::default()
    }

    pub fn abort(&self) {
        self.aborted.store(true, Ordering::SeqCst);
    }

    pub fn is_aborted(&self) -> bool {
        self.aborted.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_unaborted_and_can_be_aborted() {
        let signal = AbortSignal::new();
        assert!(!signal.is_aborted());
        signal.abort();
        assert!(signal.is_aborted());
    }

    #[test]
    fn clones_share_state() {
        let signal = AbortSignal::new();
        let clone = signal.clone();
        clone.abort();
        assert!(signal.is_aborted());
    }
}
