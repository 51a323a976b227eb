//! Proceed gates: the "may advance" check attached to each step.
//!
//! A gate is either a fixed boolean or a predicate evaluated when the user
//! tries to advance past the step. Predicates are asynchronous: a synchronous
//! check is wrapped in an already-resolved future, so the engine has a single
//! evaluation path instead of inspecting the gate's shape at runtime.
//!
//! # Example
//!
//! ```
//! use stepflow::ProceedGate;
//!
//! // Advancing always allowed (the default).
//! let open = ProceedGate::fixed(true);
//! assert!(!open.is_predicate());
//!
//! // Synchronous check.
//! let checked = ProceedGate::from_fn(|| true);
//! assert!(checked.is_predicate());
//! ```

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// The failure type a fallible gate predicate may produce.
///
/// Failures are not interpreted by the engine; they propagate out of
/// [`Stepper::advance`](crate::Stepper::advance) untouched.
pub type GateError = Box<dyn std::error::Error + Send + Sync>;

/// The future a gate predicate evaluates to.
pub type GateFuture = Pin<Box<dyn Future<Output = Result<bool, GateError>> + Send>>;

/// A gate predicate: produces a fresh [`GateFuture`] per evaluation.
pub type GatePredicate = Arc<dyn Fn() -> GateFuture + Send + Sync>;

/// Controls whether advancing past a step is currently allowed.
#[derive(Clone)]
pub enum ProceedGate {
    /// A fixed answer, consulted synchronously.
    Fixed(bool),
    /// A predicate evaluated on every advance attempt.
    Predicate(GatePredicate),
}

impl ProceedGate {
    /// Create a gate with a fixed answer.
    pub fn fixed(allow: bool) -> Self {
        Self::Fixed(allow)
    }

    /// Create a gate from a synchronous, infallible predicate.
    pub fn from_fn<F>(predicate: F) -> Self
    where
        F: Fn() -> bool + Send + Sync + 'static,
    {
        Self::Predicate(Arc::new(move || {
            let allow = predicate();
            Box::pin(std::future::ready(Ok(allow)))
        }))
    }

    /// Create a gate from an asynchronous, infallible predicate.
    pub fn from_future<F, Fut>(predicate: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = bool> + Send + 'static,
    {
        Self::Predicate(Arc::new(move || {
            let future = predicate();
            Box::pin(async move { Ok(future.await) })
        }))
    }

    /// Create a gate from an asynchronous predicate that may fail.
    ///
    /// A failure aborts the advance attempt and propagates to the caller of
    /// [`Stepper::advance`](crate::Stepper::advance).
    pub fn from_fallible<F, Fut>(predicate: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<bool, GateError>> + Send + 'static,
    {
        Self::Predicate(Arc::new(move || Box::pin(predicate())))
    }

    /// Whether this gate runs a predicate (and therefore arms the engine's
    /// validating flag when evaluated).
    pub fn is_predicate(&self) -> bool {
        matches!(self, Self::Predicate(_))
    }
}

impl Default for ProceedGate {
    /// Steps without an explicit gate may always be advanced past.
    fn default() -> Self {
        Self::Fixed(true)
    }
}

impl From<bool> for ProceedGate {
    fn from(allow: bool) -> Self {
        Self::Fixed(allow)
    }
}

impl fmt::Debug for ProceedGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fixed(allow) => f.debug_tuple("Fixed").field(allow).finish(),
            Self::Predicate(_) => f.write_str("Predicate(..)"),
        }
    }
}
