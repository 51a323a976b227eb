//! Navigation lock: lets nested interactive content suppress wizard-level
//! keyboard navigation.
//!
//! A text input inside a step calls [`NavigationLock::disable`] when it takes
//! focus so Enter/Escape reach the input instead of the wizard, and
//! [`NavigationLock::enable`] when it blurs. The input-decoding collaborator
//! consults the lock before forwarding intents (the engine's
//! [`dispatch`](crate::Stepper::dispatch) does this check); programmatic
//! navigation from step content bypasses the lock by design.
//!
//! The lock is a plain boolean flag, not a counter. If two nested widgets
//! both call `disable()`, the first `enable()` from either re-opens
//! navigation even though the other widget still expects it closed. This is
//! a known limitation kept for compatibility; coordinate focus so only one
//! widget holds the lock at a time.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Shared flag arbitrating between wizard-level and nested-widget-level key
/// handling. Cloning yields another handle to the same flag.
#[derive(Clone, Debug, Default)]
pub struct NavigationLock {
    locked: Arc<AtomicBool>,
}

impl NavigationLock {
    /// Create an open (unlocked) navigation lock.
    pub fn new() -> Self {
        Self::default()
    }

    /// Suppress keyboard-driven wizard navigation.
    pub fn disable(&self) {
        self.locked.store(true, Ordering::SeqCst);
    }

    /// Re-enable keyboard-driven wizard navigation.
    pub fn enable(&self) {
        self.locked.store(false, Ordering::SeqCst);
    }

    /// Whether navigation is currently suppressed.
    pub fn is_locked(&self) -> bool {
        self.locked.load(Ordering::SeqCst)
    }
}

static_assertions::assert_impl_all!(NavigationLock: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lock_round_trip() {
        let lock = NavigationLock::new();
        assert!(!lock.is_locked());
        lock.disable();
        assert!(lock.is_locked());
        lock.enable();
        assert!(!lock.is_locked());
    }

    #[test]
    fn test_handles_share_one_flag() {
        let lock = NavigationLock::new();
        let other = lock.clone();
        lock.disable();
        assert!(other.is_locked());
        other.enable();
        assert!(!lock.is_locked());
    }

    #[test]
    fn test_lock_is_not_reentrant() {
        // Documented limitation: the flag is not a counter, so one enable()
        // undoes any number of disable() calls.
        let lock = NavigationLock::new();
        lock.disable();
        lock.disable();
        lock.enable();
        assert!(!lock.is_locked());
    }
}
