//! Step registry: the set of currently-mounted steps and their stable order.
//!
//! Steps are registered when the presentation layer mounts them and removed
//! on unmount. Each *new* id receives an order value from a counter owned by
//! the registry instance; the value is never reassigned and never reused,
//! even after the step is unregistered, so the active set sorts
//! deterministically for a given mount sequence.
//!
//! Registration is first-wins: registering an id that already exists is a
//! strict no-op and refreshes nothing. Use [`StepRegistry::update`] to change
//! the name or gate of a mounted step.

use std::fmt;

use crate::gate::ProceedGate;

/// Opaque step identity, assigned by the owning presentation layer.
///
/// Unique for the lifetime of the mounted step; the registry never holds two
/// entries with the same id.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StepId(String);

impl StepId {
    /// Create a step id.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for StepId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl From<String> for StepId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl fmt::Display for StepId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for StepId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StepId({:?})", self.0)
    }
}

/// What a step looks like at registration time: identity, display name, and
/// proceed gate.
#[derive(Debug, Clone)]
pub struct StepDefinition {
    id: StepId,
    name: String,
    gate: ProceedGate,
}

impl StepDefinition {
    /// Create a step definition. The gate defaults to always-open.
    pub fn new(id: impl Into<StepId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            gate: ProceedGate::default(),
        }
    }

    /// Set the proceed gate using builder pattern.
    pub fn with_gate(mut self, gate: impl Into<ProceedGate>) -> Self {
        self.gate = gate.into();
        self
    }

    /// Get the step id.
    pub fn id(&self) -> &StepId {
        &self.id
    }

    /// Get the display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the proceed gate.
    pub fn gate(&self) -> &ProceedGate {
        &self.gate
    }
}

/// A registered step: its definition plus the order assigned at first
/// registration.
#[derive(Debug, Clone)]
pub struct RegisteredStep {
    definition: StepDefinition,
    order: u64,
}

impl RegisteredStep {
    /// Get the step id.
    pub fn id(&self) -> &StepId {
        self.definition.id()
    }

    /// Get the display name.
    pub fn name(&self) -> &str {
        self.definition.name()
    }

    /// Get the proceed gate.
    pub fn gate(&self) -> &ProceedGate {
        self.definition.gate()
    }

    /// Get the order value assigned at first registration.
    pub fn order(&self) -> u64 {
        self.order
    }
}

/// Holds the mounted steps of one engine instance, sorted by mount order.
///
/// The order counter is local to the registry: two wizards in one process
/// never observe each other's registrations.
#[derive(Debug, Default)]
pub struct StepRegistry {
    /// Ascending by `order`; appends are monotonic by construction.
    steps: Vec<RegisteredStep>,
    next_order: u64,
}

impl StepRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a step.
    ///
    /// Inserts the definition with the next order value if the id is new and
    /// returns `true`. A duplicate id is a strict no-op returning `false`:
    /// later registrations never refresh the name, gate, or order.
    pub fn register(&mut self, definition: StepDefinition) -> bool {
        if self.contains(definition.id()) {
            tracing::debug!(
                target: "stepflow::registry",
                id = %definition.id(),
                "duplicate registration ignored"
            );
            return false;
        }

        let order = self.next_order;
        self.next_order += 1;
        tracing::trace!(
            target: "stepflow::registry",
            id = %definition.id(),
            order,
            "step registered"
        );
        self.steps.push(RegisteredStep { definition, order });
        true
    }

    /// Unregister a step by id.
    ///
    /// Returns `true` if a step was removed; an absent id is a no-op, not an
    /// error. The removed step's order value is retired, never reused.
    pub fn unregister(&mut self, id: &StepId) -> bool {
        match self.steps.iter().position(|step| step.id() == id) {
            Some(index) => {
                self.steps.remove(index);
                tracing::trace!(target: "stepflow::registry", id = %id, "step unregistered");
                true
            }
            None => false,
        }
    }

    /// Refresh the name and gate of an already-registered step.
    ///
    /// The step keeps its order. Returns `false` if the id is not registered.
    /// This is the sanctioned way to change a mounted step's fields, since
    /// [`register`](Self::register) is first-wins by contract.
    pub fn update(&mut self, definition: StepDefinition) -> bool {
        match self
            .steps
            .iter_mut()
            .find(|step| step.id() == definition.id())
        {
            Some(step) => {
                step.definition = definition;
                true
            }
            None => false,
        }
    }

    /// The registered steps, ascending by order.
    pub fn ordered_steps(&self) -> &[RegisteredStep] {
        &self.steps
    }

    /// Look up a step by id.
    pub fn get(&self, id: &StepId) -> Option<&RegisteredStep> {
        self.steps.iter().find(|step| step.id() == id)
    }

    /// Whether a step with this id is registered.
    pub fn contains(&self, id: &StepId) -> bool {
        self.steps.iter().any(|step| step.id() == id)
    }

    /// Number of registered steps.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(registry: &StepRegistry) -> Vec<&str> {
        registry
            .ordered_steps()
            .iter()
            .map(|step| step.id().as_str())
            .collect()
    }

    #[test]
    fn test_register_assigns_monotonic_order() {
        let mut registry = StepRegistry::new();
        assert!(registry.register(StepDefinition::new("a", "A")));
        assert!(registry.register(StepDefinition::new("b", "B")));
        assert!(registry.register(StepDefinition::new("c", "C")));

        let orders: Vec<u64> = registry
            .ordered_steps()
            .iter()
            .map(RegisteredStep::order)
            .collect();
        assert_eq!(orders, vec![0, 1, 2]);
    }

    #[test]
    fn test_order_never_reused_after_churn() {
        let mut registry = StepRegistry::new();
        registry.register(StepDefinition::new("a", "A"));
        registry.register(StepDefinition::new("b", "B"));
        registry.unregister(&"a".into());
        registry.register(StepDefinition::new("a", "A again"));

        // Re-registering after unmount counts as a new id sighting: the step
        // goes to the back with a fresh, strictly larger order value.
        assert_eq!(ids(&registry), vec!["b", "a"]);
        let orders: Vec<u64> = registry
            .ordered_steps()
            .iter()
            .map(RegisteredStep::order)
            .collect();
        assert_eq!(orders, vec![1, 2]);
    }

    #[test]
    fn test_duplicate_register_is_noop() {
        let mut registry = StepRegistry::new();
        registry.register(StepDefinition::new("a", "First name"));
        let inserted =
            registry.register(StepDefinition::new("a", "Second name").with_gate(false));

        assert!(!inserted);
        assert_eq!(registry.len(), 1);
        let step = registry.get(&"a".into()).unwrap();
        assert_eq!(step.name(), "First name");
        assert!(matches!(step.gate(), ProceedGate::Fixed(true)));
        assert_eq!(step.order(), 0);
    }

    #[test]
    fn test_unregister_unknown_id_is_noop() {
        let mut registry = StepRegistry::new();
        registry.register(StepDefinition::new("a", "A"));
        assert!(!registry.unregister(&"missing".into()));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_update_refreshes_fields_but_not_order() {
        let mut registry = StepRegistry::new();
        registry.register(StepDefinition::new("a", "A"));
        registry.register(StepDefinition::new("b", "B"));

        assert!(registry.update(StepDefinition::new("a", "A renamed").with_gate(false)));

        let step = registry.get(&"a".into()).unwrap();
        assert_eq!(step.name(), "A renamed");
        assert!(matches!(step.gate(), ProceedGate::Fixed(false)));
        assert_eq!(step.order(), 0);
        assert_eq!(ids(&registry), vec!["a", "b"]);
    }

    #[test]
    fn test_update_unknown_id_is_noop() {
        let mut registry = StepRegistry::new();
        assert!(!registry.update(StepDefinition::new("ghost", "Ghost")));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_ordered_steps_stay_sorted_under_churn() {
        let mut registry = StepRegistry::new();
        for id in ["a", "b", "c", "d"] {
            registry.register(StepDefinition::new(id, id.to_uppercase()));
        }
        registry.unregister(&"b".into());
        registry.register(StepDefinition::new("e", "E"));
        registry.unregister(&"d".into());

        let orders: Vec<u64> = registry
            .ordered_steps()
            .iter()
            .map(RegisteredStep::order)
            .collect();
        assert!(orders.windows(2).all(|pair| pair[0] < pair[1]));
        assert_eq!(ids(&registry), vec!["a", "c", "e"]);
    }
}
