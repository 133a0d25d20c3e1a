//! Fluent builder for machine definitions.

use super::config::{MachineConfig, StateNodeConfig, TransitionTarget};
use super::definition::StateMachine;
use super::error::{ConfigError, ConfigErrors};
use std::collections::BTreeMap;

/// Builder for constructing machine definitions with a fluent API.
///
/// # Example
///
/// ```rust
/// use causality::machine::MachineBuilder;
///
/// let machine = MachineBuilder::new()
///     .id("fishBurger")
///     .initial("idle")
///     .context(0u32)
///     .transition("idle", "START", "cooking")
///     .transition_with_actions("cooking", "DONE", "completed", ["notify"])
///     .transition("completed", "RESET", "idle")
///     .build()
///     .unwrap();
///
/// assert_eq!(machine.resolve_transition("idle", "START"), Some("cooking"));
/// ```
pub struct MachineBuilder<C> {
    id: Option<String>,
    initial: Option<String>,
    context: Option<C>,
    states: BTreeMap<String, StateNodeConfig>,
    on: BTreeMap<String, TransitionTarget>,
}

impl<C> MachineBuilder<C> {
    pub fn new() -> Self {
        Self {
            id: None,
            initial: None,
            context: None,
            states: BTreeMap::new(),
            on: BTreeMap::new(),
        }
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Set the initial state (required).
    pub fn initial(mut self, state: impl Into<String>) -> Self {
        self.initial = Some(state.into());
        self
    }

    /// Set the initial context (required).
    pub fn context(mut self, context: C) -> Self {
        self.context = Some(context);
        self
    }

    /// Declare a state with no outgoing transitions of its own.
    pub fn state(mut self, name: impl Into<String>) -> Self {
        self.states.entry(name.into()).or_default();
        self
    }

    pub fn transition(
        self,
        from: impl Into<String>,
        event: impl Into<String>,
        to: impl Into<String>,
    ) -> Self {
        self.entry(from.into(), event.into(), TransitionTarget::state(to))
    }

    pub fn transition_with_actions<I, A>(
        self,
        from: impl Into<String>,
        event: impl Into<String>,
        to: impl Into<String>,
        actions: I,
    ) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<String>,
    {
        self.entry(
            from.into(),
            event.into(),
            TransitionTarget::with_actions(to, actions),
        )
    }

    /// Add a machine-wide fallback transition, valid from every state.
    pub fn global(mut self, event: impl Into<String>, to: impl Into<String>) -> Self {
        self.on.insert(event.into(), TransitionTarget::state(to));
        self
    }

    fn entry(mut self, from: String, event: String, target: TransitionTarget) -> Self {
        self.states.entry(from).or_default().on.insert(event, target);
        self
    }

    /// Build and validate the machine definition.
    pub fn build(self) -> Result<StateMachine<C>, ConfigErrors> {
        let (initial, context) = match (self.initial, self.context) {
            (Some(initial), Some(context)) => (initial, context),
            (initial, context) => {
                let mut errors = Vec::new();
                if initial.is_none() {
                    errors.push(ConfigError::MissingInitialState);
                }
                if context.is_none() {
                    errors.push(ConfigError::MissingContext);
                }
                return Err(ConfigErrors::new(errors));
            }
        };

        StateMachine::new(MachineConfig {
            id: self.id,
            initial,
            context,
            states: self.states,
            on: (!self.on.is_empty()).then_some(self.on),
        })
    }
}

impl<C> Default for MachineBuilder<C> {
    fn default() -> Self {
        Self::new()
    }
}
