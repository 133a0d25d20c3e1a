//! Declarative transition tables.
//!
//! A machine definition maps each state to the events it reacts to, plus an
//! optional machine-wide map consulted when a state has no entry for an
//! event. The serde representation is the declarative source format:
//!
//! ```json
//! {
//!   "id": "fishBurger",
//!   "initial": "idle",
//!   "context": 0,
//!   "states": {
//!     "idle": { "on": { "START": "cooking" } },
//!     "cooking": { "on": { "DONE": { "target": "completed", "actions": ["notify"] } } },
//!     "completed": { "on": { "RESET": "idle" } }
//!   },
//!   "on": { "CANCEL": "idle" }
//! }
//! ```

use super::error::{ConfigError, MACHINE_SCOPE};
use crate::core::{EventKey, OVERRIDE_EVENT};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

/// Where an event leads: a bare target, or a target plus named actions.
///
/// Actions are exposed for the caller to run; they never change the target.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TransitionTarget {
    State(String),
    WithActions {
        target: String,
        #[serde(default)]
        actions: Vec<String>,
    },
}

impl TransitionTarget {
    pub fn state(target: impl Into<String>) -> Self {
        Self::State(target.into())
    }

    pub fn with_actions<I, A>(target: impl Into<String>, actions: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<String>,
    {
        Self::WithActions {
            target: target.into(),
            actions: actions.into_iter().map(Into::into).collect(),
        }
    }

    pub fn target(&self) -> &str {
        match self {
            Self::State(target) | Self::WithActions { target, .. } => target,
        }
    }

    /// Named actions in declaration order. Empty for bare targets.
    pub fn actions(&self) -> &[String] {
        match self {
            Self::State(_) => &[],
            Self::WithActions { actions, .. } => actions,
        }
    }
}

impl From<&str> for TransitionTarget {
    fn from(target: &str) -> Self {
        Self::state(target)
    }
}

impl From<String> for TransitionTarget {
    fn from(target: String) -> Self {
        Self::State(target)
    }
}

/// Transitions available from one state.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateNodeConfig {
    #[serde(default)]
    pub on: BTreeMap<String, TransitionTarget>,
}

impl StateNodeConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(mut self, event: impl Into<String>, target: impl Into<TransitionTarget>) -> Self {
        self.on.insert(event.into(), target.into());
        self
    }
}

/// Machine definition in declarative form.
///
/// # Example
///
/// ```rust
/// use causality::machine::{MachineConfig, StateNodeConfig};
///
/// let config = MachineConfig::new("idle", 0)
///     .with_state("idle", StateNodeConfig::new().on("START", "cooking"))
///     .with_state("cooking", StateNodeConfig::new().on("DONE", "completed"))
///     .with_global("RESET", "idle");
///
/// assert_eq!(config.resolve_transition("idle", "START"), Some("cooking"));
/// assert_eq!(config.resolve_transition("cooking", "RESET"), Some("idle"));
/// assert_eq!(config.resolve_transition("idle", "DONE"), None);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MachineConfig<C> {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub initial: String,
    pub context: C,
    #[serde(default)]
    pub states: BTreeMap<String, StateNodeConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on: Option<BTreeMap<String, TransitionTarget>>,
}

impl<C> MachineConfig<C> {
    pub fn new(initial: impl Into<String>, context: C) -> Self {
        Self {
            id: None,
            initial: initial.into(),
            context,
            states: BTreeMap::new(),
            on: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_state(mut self, name: impl Into<String>, state: StateNodeConfig) -> Self {
        self.states.insert(name.into(), state);
        self
    }

    /// Add a machine-wide fallback transition.
    pub fn with_global(
        mut self,
        event: impl Into<String>,
        target: impl Into<TransitionTarget>,
    ) -> Self {
        self.on
            .get_or_insert_with(BTreeMap::new)
            .insert(event.into(), target.into());
        self
    }

    /// Parse the declarative JSON form.
    pub fn from_json(json: &str) -> Result<Self, ConfigError>
    where
        C: DeserializeOwned,
    {
        serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Find the transition entry for `event` in `state`.
    ///
    /// The state's own map wins; the machine-wide map is the fallback.
    /// Unknown states and unknown events resolve to `None`.
    pub fn resolve<Ev>(&self, state: &str, event: &Ev) -> Option<&TransitionTarget>
    where
        Ev: EventKey + ?Sized,
    {
        let key = event.event_key();
        self.states
            .get(state)
            .and_then(|node| node.on.get(key.as_ref()))
            .or_else(|| self.on.as_ref().and_then(|on| on.get(key.as_ref())))
    }

    /// Target state for `event` in `state`, if any.
    pub fn resolve_transition<Ev>(&self, state: &str, event: &Ev) -> Option<&str>
    where
        Ev: EventKey + ?Sized,
    {
        self.resolve(state, event).map(TransitionTarget::target)
    }

    /// Event keys valid from `state`: its own plus the machine-wide ones.
    pub fn enabled_events(&self, state: &str) -> BTreeSet<String> {
        let own = self.states.get(state).into_iter().flat_map(|n| n.on.keys());
        let global = self.on.iter().flat_map(|on| on.keys());
        own.chain(global).cloned().collect()
    }

    /// Check the definition, accumulating every problem.
    pub fn validate(&self) -> Validation<(), NonEmptyVec<ConfigError>> {
        let mut checks: Vec<Validation<(), NonEmptyVec<ConfigError>>> = Vec::new();

        checks.push(if self.initial.trim().is_empty() {
            Validation::fail(ConfigError::MissingInitialState)
        } else {
            Validation::success(())
        });

        for (state, node) in &self.states {
            for (event, target) in &node.on {
                checks.extend(check_transition(state, event, target));
            }
        }

        if let Some(on) = &self.on {
            for (event, target) in on {
                checks.extend(check_transition(MACHINE_SCOPE, event, target));
            }
        }

        Validation::all_vec(checks).map(|_| ())
    }
}

fn check_transition(
    state: &str,
    event: &str,
    target: &TransitionTarget,
) -> Vec<Validation<(), NonEmptyVec<ConfigError>>> {
    let mut failures = Vec::new();

    if event.is_empty() {
        failures.push(ConfigError::EmptyEventKey {
            state: state.to_string(),
        });
    }
    if event == OVERRIDE_EVENT {
        failures.push(ConfigError::ReservedEventKey {
            state: state.to_string(),
            event: event.to_string(),
        });
    }
    if target.target().trim().is_empty() {
        failures.push(ConfigError::EmptyTarget {
            state: state.to_string(),
            event: event.to_string(),
        });
    }
    if target.actions().iter().any(|a| a.trim().is_empty()) {
        failures.push(ConfigError::EmptyActionName {
            state: state.to_string(),
            event: event.to_string(),
        });
    }

    failures.into_iter().map(Validation::fail).collect()
}
