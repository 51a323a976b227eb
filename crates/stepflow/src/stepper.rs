//! The navigation controller: owns the current index, runs the validation
//! gate, and sequences lifecycle callbacks.
//!
//! # Overview
//!
//! A [`Stepper`] drives a strictly linear wizard. The presentation layer
//! registers steps as it mounts them, forwards decoded navigation intents
//! through [`Stepper::dispatch`], and redraws from [`Stepper::progress`] and
//! [`Stepper::step_context`] after every change notification. Step content
//! may also call the navigation primitives directly; programmatic calls
//! bypass the [`NavigationLock`] by design.
//!
//! All methods take `&self`: state lives behind a mutex, so one engine
//! instance can be handed by reference (or inside an `Arc`) to whatever
//! needs to call it. Lifecycle hooks are invoked with the mutex released,
//! which means a hook may itself navigate without deadlocking.
//!
//! # Example
//!
//! ```
//! use stepflow::{StepDefinition, Stepper};
//!
//! # fn main() -> stepflow::Result<()> {
//! let stepper = Stepper::builder()
//!     .on_complete(|| println!("wizard finished"))
//!     .on_step_change(|index| println!("now on step {index}"))
//!     .build()?;
//!
//! stepper.register_step(StepDefinition::new("theme", "Theme"));
//! stepper.register_step(StepDefinition::new("review", "Review"));
//!
//! assert_eq!(stepper.current_index(), 0);
//! assert_eq!(stepper.step_context().total_steps, 2);
//! # Ok(())
//! # }
//! ```
//!
//! Advancing is asynchronous because a step's proceed gate may be: the engine
//! awaits the predicate while exposing `validating = true`, and rejects a
//! second `advance` arriving before the first resolves.

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::error::{Error, Result};
use crate::gate::ProceedGate;
use crate::lock::NavigationLock;
use crate::progress::{self, ProgressContext};
use crate::registry::{StepDefinition, StepId, StepRegistry};

type NotifyHook = Arc<dyn Fn() + Send + Sync>;
type IndexHook = Arc<dyn Fn(usize) + Send + Sync>;

/// The exit hook: invoked with the index being left, returns `false` to veto
/// the transition.
type ExitHook = Arc<dyn Fn(usize) -> bool + Send + Sync>;

// ============================================================================
// NavIntent
// ============================================================================

/// An abstract navigation intent, produced by the input-decoding
/// collaborator (e.g. "Enter" decoded to [`NavIntent::Advance`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavIntent {
    /// Move to the next step, consulting the current step's proceed gate.
    Advance,
    /// Move to the previous step, or cancel from the first.
    Retreat,
}

// ============================================================================
// StepContext
// ============================================================================

/// Snapshot of engine state handed to rendered step content.
///
/// Navigation itself happens through the [`Stepper`] the snapshot came from;
/// the engine's methods are the stable "function references" of this
/// context. A snapshot cannot exist without a live engine, so using it
/// outside one is unrepresentable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepContext {
    /// Current step index (zero-based).
    pub current_index: usize,
    /// Total number of registered steps.
    pub total_steps: usize,
    /// Whether the current step is the first.
    pub is_first: bool,
    /// Whether the current step is the last.
    pub is_last: bool,
    /// Whether an asynchronous proceed-gate check is in flight.
    pub validating: bool,
}

// ============================================================================
// StepperBuilder
// ============================================================================

/// Builder for [`Stepper`].
///
/// `on_complete` is required; [`build`](Self::build) fails without it. All
/// other hooks and options are optional.
pub struct StepperBuilder {
    on_complete: Option<NotifyHook>,
    on_cancel: Option<NotifyHook>,
    on_step_change: Option<IndexHook>,
    on_exit_step: Option<ExitHook>,
    on_enter_step: Option<IndexHook>,
    initial_step: usize,
    controlled_step: Option<usize>,
    keyboard_nav: bool,
}

impl Default for StepperBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl StepperBuilder {
    /// Create a builder with default options.
    pub fn new() -> Self {
        Self {
            on_complete: None,
            on_cancel: None,
            on_step_change: None,
            on_exit_step: None,
            on_enter_step: None,
            initial_step: 0,
            controlled_step: None,
            keyboard_nav: true,
        }
    }

    /// Hook invoked when `advance()` succeeds from the last step. Required.
    pub fn on_complete<F>(mut self, hook: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.on_complete = Some(Arc::new(hook));
        self
    }

    /// Hook invoked on `retreat()` from the first step or on explicit
    /// `cancel()`.
    pub fn on_cancel<F>(mut self, hook: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.on_cancel = Some(Arc::new(hook));
        self
    }

    /// Hook invoked with the new zero-based index after any successful
    /// navigation (`advance`, `retreat`, or `jump_to`). The silent index
    /// clamp performed by [`Stepper::unregister_step`] does not notify.
    pub fn on_step_change<F>(mut self, hook: F) -> Self
    where
        F: Fn(usize) + Send + Sync + 'static,
    {
        self.on_step_change = Some(Arc::new(hook));
        self
    }

    /// Hook invoked with the index being left; return `false` to veto the
    /// transition. Not consulted by [`Stepper::jump_to`].
    pub fn on_exit_step<F>(mut self, hook: F) -> Self
    where
        F: Fn(usize) -> bool + Send + Sync + 'static,
    {
        self.on_exit_step = Some(Arc::new(hook));
        self
    }

    /// Hook invoked with the index being entered, after the mutation.
    /// Side-effect only; it cannot veto.
    pub fn on_enter_step<F>(mut self, hook: F) -> Self
    where
        F: Fn(usize) + Send + Sync + 'static,
    {
        self.on_enter_step = Some(Arc::new(hook));
        self
    }

    /// Starting index in uncontrolled mode. Default 0.
    pub fn initial_step(mut self, index: usize) -> Self {
        self.initial_step = index;
        self
    }

    /// Externally owned current index. Supplying one switches the engine to
    /// controlled mode: the value is authoritative, read fresh on every
    /// access, and never clamped or validated against the step count.
    pub fn controlled_step(mut self, index: usize) -> Self {
        self.controlled_step = Some(index);
        self
    }

    /// Whether [`Stepper::dispatch`] acts on intents at all. Default `true`;
    /// turning it off makes the keyboard path inert while leaving
    /// programmatic navigation untouched.
    pub fn keyboard_nav(mut self, enabled: bool) -> Self {
        self.keyboard_nav = enabled;
        self
    }

    /// Finalize the builder.
    ///
    /// # Errors
    ///
    /// [`Error::MissingCompleteHook`] if no `on_complete` hook was supplied.
    pub fn build(self) -> Result<Stepper> {
        let on_complete = self.on_complete.ok_or(Error::MissingCompleteHook)?;
        Ok(Stepper {
            state: Mutex::new(EngineState {
                registry: StepRegistry::new(),
                internal_index: self.initial_step,
                controlled_index: self.controlled_step,
                validating: false,
            }),
            on_complete,
            on_cancel: self.on_cancel,
            on_step_change: self.on_step_change,
            on_exit_step: self.on_exit_step,
            on_enter_step: self.on_enter_step,
            keyboard_nav: self.keyboard_nav,
            lock: NavigationLock::new(),
        })
    }
}

// ============================================================================
// Stepper
// ============================================================================

/// Mutable engine state, guarded by the stepper's mutex.
struct EngineState {
    registry: StepRegistry,
    /// The engine's own notion of the current position. Keeps advancing
    /// underneath controlled mode, where it is ignored.
    internal_index: usize,
    /// When present, the authoritative current index (controlled mode).
    controlled_index: Option<usize>,
    /// True exactly while an asynchronous proceed-gate call is outstanding.
    validating: bool,
}

impl EngineState {
    fn current(&self) -> usize {
        self.controlled_index.unwrap_or(self.internal_index)
    }
}

/// The wizard navigation engine.
///
/// Construct via [`Stepper::builder`]. See the [module docs](self) for the
/// overall flow and [`StepperBuilder`] for the recognized options.
pub struct Stepper {
    state: Mutex<EngineState>,
    on_complete: NotifyHook,
    on_cancel: Option<NotifyHook>,
    on_step_change: Option<IndexHook>,
    on_exit_step: Option<ExitHook>,
    on_enter_step: Option<IndexHook>,
    keyboard_nav: bool,
    lock: NavigationLock,
}

impl Stepper {
    /// Start building a stepper.
    pub fn builder() -> StepperBuilder {
        StepperBuilder::new()
    }

    // =========================================================================
    // Step Management
    // =========================================================================

    /// Register a step, typically when the presentation layer mounts it.
    ///
    /// First registration wins: a duplicate id is a no-op returning `false`.
    pub fn register_step(&self, definition: StepDefinition) -> bool {
        self.state.lock().registry.register(definition)
    }

    /// Unregister a step, typically on unmount. Absent ids are a no-op.
    ///
    /// In uncontrolled mode the internal index is clamped back into range if
    /// the removal left it past the end, keeping the index invariant intact.
    /// The clamp is bookkeeping, not navigation: it fires no change
    /// notification. A controlled index is never touched.
    pub fn unregister_step(&self, id: &StepId) -> bool {
        let mut state = self.state.lock();
        let removed = state.registry.unregister(id);
        if removed {
            let count = state.registry.len();
            if state.internal_index >= count {
                state.internal_index = count.saturating_sub(1);
            }
        }
        removed
    }

    /// Refresh the name and gate of a registered step, keeping its order.
    ///
    /// The escape hatch from first-wins registration; returns `false` for an
    /// unknown id.
    pub fn update_step(&self, definition: StepDefinition) -> bool {
        self.state.lock().registry.update(definition)
    }

    /// Number of registered steps.
    pub fn step_count(&self) -> usize {
        self.state.lock().registry.len()
    }

    // =========================================================================
    // Navigation
    // =========================================================================

    /// Advance to the next step, consulting the current step's proceed gate.
    ///
    /// Returns `Ok(true)` when the index moved or the wizard completed,
    /// `Ok(false)` when nothing happened: a closed fixed gate, a predicate
    /// resolving to `false`, an exit-hook veto, or a call arriving while a
    /// previous validation is still in flight (at most one validation is
    /// outstanding per engine; later calls are rejected, not queued).
    ///
    /// From the last step a permitted advance invokes the completion hook
    /// and leaves the index unchanged; the engine has no terminal state and
    /// the caller decides what happens after.
    ///
    /// # Errors
    ///
    /// [`Error::Gate`] if the gate predicate fails. The validating flag is
    /// reset before the failure propagates.
    pub async fn advance(&self) -> Result<bool> {
        let (current, predicate) = {
            let mut state = self.state.lock();
            let current = state.current();
            // A missing step at the current index (empty wizard, or an
            // out-of-range controlled index) permits advancing, which then
            // resolves to completion below.
            let gate = state
                .registry
                .ordered_steps()
                .get(current)
                .map(|step| step.gate().clone())
                .unwrap_or_default();
            match gate {
                ProceedGate::Fixed(false) => return Ok(false),
                ProceedGate::Fixed(true) => (current, None),
                ProceedGate::Predicate(predicate) => {
                    if state.validating {
                        tracing::debug!(
                            target: "stepflow::stepper",
                            index = current,
                            "advance rejected: validation already in flight"
                        );
                        return Ok(false);
                    }
                    state.validating = true;
                    (current, Some(predicate))
                }
            }
        };

        if let Some(predicate) = predicate {
            let outcome = predicate().await;
            self.state.lock().validating = false;
            match outcome {
                Ok(true) => {}
                Ok(false) => return Ok(false),
                Err(source) => {
                    tracing::debug!(
                        target: "stepflow::stepper",
                        index = current,
                        error = %source,
                        "proceed gate failed"
                    );
                    return Err(Error::gate(current, source));
                }
            }
        }

        // Re-read: a synchronous retreat or jump may have landed while the
        // gate was being awaited.
        let (current, count) = {
            let state = self.state.lock();
            (state.current(), state.registry.len())
        };

        if current + 1 >= count {
            tracing::debug!(target: "stepflow::stepper", index = current, "wizard completed");
            (self.on_complete)();
            return Ok(true);
        }

        Ok(self.run_transition(current, current + 1))
    }

    /// Retreat to the previous step.
    ///
    /// From index 0 this invokes the cancellation hook and returns `false`
    /// without moving. Retreating never consults the proceed gate; it is
    /// always permitted once past the first step, subject only to the
    /// exit-hook veto.
    pub fn retreat(&self) -> bool {
        let current = self.state.lock().current();
        if current == 0 {
            tracing::debug!(target: "stepflow::stepper", "retreat from first step: cancelling");
            if let Some(cancel) = &self.on_cancel {
                cancel();
            }
            return false;
        }
        self.run_transition(current, current - 1)
    }

    /// Jump to a specific step, clamping `target` into `[0, n - 1]`.
    ///
    /// The designated escape hatch for programmatic, non-linear transitions:
    /// it bypasses the proceed gate and, deliberately, the exit/enter hooks
    /// as well — only the change notification fires. With no steps
    /// registered this is a no-op. Returns whether the index changed.
    pub fn jump_to(&self, target: i32) -> bool {
        let jumped = {
            let mut state = self.state.lock();
            let count = state.registry.len();
            if count == 0 {
                return false;
            }
            let clamped = target.clamp(0, count as i32 - 1) as usize;
            if clamped == state.current() {
                return false;
            }
            state.internal_index = clamped;
            clamped
        };
        tracing::trace!(target: "stepflow::stepper", index = jumped, "jumped");
        if let Some(changed) = &self.on_step_change {
            changed(jumped);
        }
        true
    }

    /// Cancel the wizard: unconditionally invokes the cancellation hook.
    /// The index never changes.
    pub fn cancel(&self) {
        if let Some(cancel) = &self.on_cancel {
            cancel();
        }
    }

    /// The keyboard-decoding entry point.
    ///
    /// Acts like [`advance`](Self::advance)/[`retreat`](Self::retreat), but
    /// only when the navigation lock is open and keyboard navigation is
    /// enabled; otherwise the intent is ignored and `Ok(false)` returned.
    /// Programmatic calls to the primitives themselves bypass both checks.
    pub async fn dispatch(&self, intent: NavIntent) -> Result<bool> {
        if !self.keyboard_nav || self.lock.is_locked() {
            tracing::trace!(target: "stepflow::stepper", ?intent, "intent ignored while locked");
            return Ok(false);
        }
        match intent {
            NavIntent::Advance => self.advance().await,
            NavIntent::Retreat => Ok(self.retreat()),
        }
    }

    /// Exit-hook veto, index mutation, enter hook, change notification — the
    /// one ordered pipeline behind `advance` and `retreat`. Returns `false`
    /// when the exit hook vetoes, leaving the index untouched.
    fn run_transition(&self, from: usize, to: usize) -> bool {
        if let Some(exit) = &self.on_exit_step
            && !exit(from)
        {
            tracing::debug!(target: "stepflow::stepper", from, to, "transition vetoed");
            return false;
        }

        self.state.lock().internal_index = to;
        tracing::trace!(target: "stepflow::stepper", from, to, "step changed");

        if let Some(enter) = &self.on_enter_step {
            enter(to);
        }
        if let Some(changed) = &self.on_step_change {
            changed(to);
        }
        true
    }

    // =========================================================================
    // Controlled Mode
    // =========================================================================

    /// Supply (or clear) the externally owned current index.
    ///
    /// While present the value is authoritative and reported verbatim: an
    /// out-of-range index is the owner's responsibility and is never
    /// corrected here. A controlling owner typically updates this from its
    /// `on_step_change` hook.
    pub fn set_controlled_index(&self, index: Option<usize>) {
        self.state.lock().controlled_index = index;
    }

    // =========================================================================
    // Observation
    // =========================================================================

    /// The current step index: the controlled index when one is supplied,
    /// the internal index otherwise.
    pub fn current_index(&self) -> usize {
        self.state.lock().current()
    }

    /// Whether an asynchronous proceed-gate check is in flight. The
    /// presentation layer can use this to disable further input.
    pub fn is_validating(&self) -> bool {
        self.state.lock().validating
    }

    /// Snapshot of the values handed to rendered step content.
    pub fn step_context(&self) -> StepContext {
        let state = self.state.lock();
        let current = state.current();
        let total = state.registry.len();
        StepContext {
            current_index: current,
            total_steps: total,
            is_first: current == 0,
            is_last: total > 0 && current == total - 1,
            validating: state.validating,
        }
    }

    /// The progress projection for the rendering collaborator.
    pub fn progress(&self) -> ProgressContext {
        let state = self.state.lock();
        progress::project(state.registry.ordered_steps(), state.current())
    }

    /// A handle to the navigation lock, for nested input widgets.
    pub fn navigation_lock(&self) -> NavigationLock {
        self.lock.clone()
    }
}

impl fmt::Debug for Stepper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.lock();
        f.debug_struct("Stepper")
            .field("current_index", &state.current())
            .field("step_count", &state.registry.len())
            .field("controlled", &state.controlled_index.is_some())
            .field("validating", &state.validating)
            .field("locked", &self.lock.is_locked())
            .finish()
    }
}

static_assertions::assert_impl_all!(Stepper: Send, Sync);
