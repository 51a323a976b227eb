//! Sequential-wizard navigation engine for terminal (and other single-focus)
//! applications.
//!
//! stepflow drives an application through an ordered list of steps, one
//! visible at a time. It owns the state with real invariants — the step
//! registry, the current index, the asynchronous validation gate, the
//! navigation lock — and leaves rendering and keystroke decoding to the
//! presentation layer around it:
//!
//! - **[`StepRegistry`]**: the mounted steps and their stable, per-instance
//!   mount order
//! - **[`Stepper`]**: the navigation controller with the four primitives
//!   (advance, retreat, jump, cancel) and lifecycle hooks
//! - **[`ProceedGate`]**: fixed-boolean or async-predicate "may advance"
//!   checks
//! - **[`NavigationLock`]**: lets nested interactive content suppress
//!   keyboard-driven navigation
//! - **[`ProgressContext`]**: the pure per-step completed/current/pending
//!   projection for progress rendering
//!
//! # Example
//!
//! ```
//! use stepflow::{StepDefinition, Stepper};
//!
//! # fn main() -> stepflow::Result<()> {
//! let stepper = Stepper::builder()
//!     .on_complete(|| println!("setup finished"))
//!     .on_cancel(|| println!("setup aborted"))
//!     .build()?;
//!
//! stepper.register_step(StepDefinition::new("theme", "Theme"));
//! stepper.register_step(StepDefinition::new("directory", "Directory"));
//! stepper.register_step(StepDefinition::new("review", "Review"));
//!
//! stepper.jump_to(1);
//! let progress = stepper.progress();
//! assert!(progress.steps[0].completed);
//! assert!(progress.steps[1].current);
//! # Ok(())
//! # }
//! ```
//!
//! # Async gating
//!
//! A step may guard forward navigation with an asynchronous predicate;
//! [`Stepper::advance`] awaits it while exposing `validating = true` so the
//! UI can disable input, and rejects re-entrant advance calls outright — at
//! most one validation is in flight per engine:
//!
//! ```no_run
//! use stepflow::{ProceedGate, StepDefinition, Stepper};
//!
//! # async fn demo(stepper: &Stepper) -> stepflow::Result<()> {
//! stepper.register_step(
//!     StepDefinition::new("account", "Account").with_gate(ProceedGate::from_future(|| async {
//!         // e.g. verify credentials against a server
//!         true
//!     })),
//! );
//! stepper.advance().await?;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod gate;
pub mod lock;
pub mod progress;
pub mod registry;
pub mod stepper;

pub use error::{Error, Result};
pub use gate::{GateError, GateFuture, GatePredicate, ProceedGate};
pub use lock::NavigationLock;
pub use progress::{ProgressContext, StepStatus};
pub use registry::{RegisteredStep, StepDefinition, StepId, StepRegistry};
pub use stepper::{NavIntent, StepContext, Stepper, StepperBuilder};
