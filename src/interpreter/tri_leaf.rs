//! Event-scoped facade: every enabled event is a branch with three leaves.
//!
//! From any state, each enabled event (plus the override key) offers
//! *forward* (take it), *pause* (checkpoint the head) and *backward* (undo
//! to the root). Pause and backward are global: they act the same whichever
//! branch they are invoked from.

use super::service::{Interpreter, StateSnapshot};
use crate::core::{CausalHistory, EventKey, HistoryOps, OVERRIDE_EVENT};
use crate::machine::StateMachine;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Which leaves of one branch are currently usable.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BranchActions {
    /// The branch's event resolves from the current state
    pub can_forward: bool,
    /// Pausing is always available
    pub can_pause: bool,
    /// At least one event is applied
    pub can_backward: bool,
}

/// Display data for the tri-leaf view of an interpreter.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriLeafVisualData {
    /// Initial state of the machine
    pub root_state_value: String,
    /// Enabled events plus the override key, sorted
    pub enabled_event_keys: Vec<String>,
    /// State of the current head
    pub current_state_value: String,
    /// Whether no events are applied
    pub at_root: bool,
    /// Leaf availability per enabled event
    pub branch_availability: BTreeMap<String, BranchActions>,
}

/// Tri-leaf facade over an [`Interpreter`].
pub struct TriLeafInterpreter<C, E, H = CausalHistory<C, E>> {
    interpreter: Interpreter<C, E, H>,
}

impl<C: Clone, E> TriLeafInterpreter<C, E, CausalHistory<C, E>> {
    /// Interpret `machine` and wrap the result.
    pub fn interpret(machine: StateMachine<C>) -> Self {
        Self::from_interpreter(Interpreter::interpret(machine))
    }
}

impl<C, E, H> TriLeafInterpreter<C, E, H> {
    pub fn from_interpreter(interpreter: Interpreter<C, E, H>) -> Self {
        Self { interpreter }
    }

    pub fn interpreter(&self) -> &Interpreter<C, E, H> {
        &self.interpreter
    }

    pub fn interpreter_mut(&mut self) -> &mut Interpreter<C, E, H> {
        &mut self.interpreter
    }

    pub fn into_inner(self) -> Interpreter<C, E, H> {
        self.interpreter
    }
}

impl<C, E, H> TriLeafInterpreter<C, E, H>
where
    C: Clone,
    E: EventKey,
    H: HistoryOps<C, E>,
{
    /// Whether no events are applied.
    pub fn is_at_root(&self) -> bool {
        !self.interpreter.can_undo()
    }

    /// Enabled event keys of the current state, plus the override key.
    pub fn enabled_events(&self) -> BTreeSet<String> {
        let mut events = self.interpreter.enabled_events();
        events.insert(OVERRIDE_EVENT.to_string());
        events
    }

    /// Take the forward leaf of a normal event branch.
    pub fn forward(&mut self, event: E) -> bool {
        self.interpreter.send(event)
    }

    /// Take the forward leaf of the override branch.
    pub fn forward_override(&mut self, target: impl Into<String>, context: Option<C>) -> bool {
        match context {
            Some(context) => self.interpreter.set_state_with_context(target, context),
            None => self.interpreter.set_state(target),
        }
    }

    pub fn pause(&mut self) {
        self.interpreter.pause();
    }

    pub fn resume(&mut self) -> bool {
        self.interpreter.resume()
    }

    /// Undo back to the root. Returns `true` if anything was undone.
    pub fn backward(&mut self) -> bool {
        self.interpreter.undo_to_root()
    }

    /// Whether the branch for `event` can move forward from here.
    pub fn can_forward<Ev>(&self, event: &Ev) -> bool
    where
        Ev: EventKey + ?Sized,
    {
        event.event_key() == OVERRIDE_EVENT || self.interpreter.transition_for(event).is_some()
    }

    pub fn can_backward(&self) -> bool {
        self.interpreter.can_undo()
    }

    pub fn snapshot(&self) -> StateSnapshot<C, E>
    where
        E: Clone,
    {
        self.interpreter.snapshot()
    }

    pub fn value(&self) -> &str {
        self.interpreter.value()
    }

    pub fn context(&self) -> &C {
        self.interpreter.context()
    }

    pub fn visual_data(&self) -> TriLeafVisualData {
        let enabled: Vec<String> = self.enabled_events().into_iter().collect();
        let can_backward = self.can_backward();
        let branch_availability = enabled
            .iter()
            .map(|event| {
                let actions = BranchActions {
                    can_forward: self.can_forward(event.as_str()),
                    can_pause: true,
                    can_backward,
                };
                (event.clone(), actions)
            })
            .collect();

        TriLeafVisualData {
            root_state_value: self.interpreter.machine().initial().to_string(),
            enabled_event_keys: enabled,
            current_state_value: self.value().to_string(),
            at_root: self.is_at_root(),
            branch_availability,
        }
    }
}
