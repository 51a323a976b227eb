//! Error types for the navigation engine.

use crate::gate::GateError;

/// Result type alias for engine operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur when building or driving a stepper.
///
/// Everything else the engine absorbs on purpose: duplicate registrations,
/// unknown unregistrations, out-of-range jump targets, and navigation
/// attempts while locked or validating are silent no-ops, not errors.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The builder was finalized without a completion hook.
    #[error("stepper requires an `on_complete` hook")]
    MissingCompleteHook,

    /// A proceed-gate predicate failed.
    ///
    /// The engine resets its validating flag before propagating this, so the
    /// presentation layer never stays stuck; the failure itself is not
    /// swallowed.
    #[error("proceed gate failed for step {index}: {source}")]
    Gate {
        index: usize,
        #[source]
        source: GateError,
    },
}

impl Error {
    /// Create a gate-failure error.
    pub fn gate(index: usize, source: GateError) -> Self {
        Self::Gate { index, source }
    }
}
