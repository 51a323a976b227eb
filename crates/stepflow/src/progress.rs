//! Progress projection: the read-only per-step summary derived from engine
//! state.
//!
//! [`project`] is a pure function over the ordered step list and the current
//! index; it never mutates engine state, is order-stable, and produces
//! identical output for identical input. The rendering collaborator calls it
//! (via [`Stepper::progress`](crate::Stepper::progress)) after every
//! transition to redraw its progress bar.

use crate::registry::RegisteredStep;

/// Status of one step in the projection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepStatus {
    /// The step's display name.
    pub name: String,
    /// Whether the step lies before the current index.
    pub completed: bool,
    /// Whether the step is the current one.
    pub current: bool,
}

/// The value handed to the progress-rendering collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProgressContext {
    /// Current step index (zero-based).
    pub current_index: usize,
    /// Per-step status, in step order.
    pub steps: Vec<StepStatus>,
}

/// Project the ordered step list and current index into per-step status.
pub fn project(steps: &[RegisteredStep], current_index: usize) -> ProgressContext {
    ProgressContext {
        current_index,
        steps: steps
            .iter()
            .enumerate()
            .map(|(index, step)| StepStatus {
                name: step.name().to_owned(),
                completed: index < current_index,
                current: index == current_index,
            })
            .collect(),
    }
}

static_assertions::assert_impl_all!(ProgressContext: Send, Sync);
