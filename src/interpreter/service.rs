//! The running interpreter: events in, causal nodes out.

use crate::core::{CausalHistory, CausalNode, EventKey, HistoryOps, Lineage, NodeId, Trigger};
use crate::machine::{StateMachine, TransitionTarget};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::convert::Infallible;
use std::marker::PhantomData;
use thiserror::Error;

/// Read-only projection of the current head.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StateSnapshot<C, E> {
    /// Current state name
    pub value: String,
    /// Context carried by the head
    pub context: C,
    /// What produced the head
    pub event: Trigger<E>,
    /// Always `false`: final states are not modelled.
    pub done: bool,
}

/// A caller-supplied context assignment failed. Nothing was written.
#[derive(Debug, Error)]
#[error("Context assignment failed for event '{event}' in state '{state}'")]
pub struct AssignError<Err> {
    /// State the event was sent in
    pub state: String,
    /// Key of the event that matched
    pub event: String,
    /// Error returned by the assignment
    #[source]
    pub source: Err,
}

/// Interpreted state machine service.
///
/// Events are resolved against the machine's transition table from the
/// current head's state. A match produces a new [`CausalNode`] written to
/// the history; no match leaves everything untouched. Undo, redo, pause and
/// resume bypass the table and act on the history directly.
///
/// The history backend is any [`HistoryOps`] implementation, so a plain
/// [`CausalHistory`] and an [`ObservingHistory`](crate::core::ObservingHistory)
/// are interchangeable.
///
/// # Example
///
/// ```rust
/// use causality::interpreter::Interpreter;
/// use causality::machine::MachineBuilder;
///
/// let machine = MachineBuilder::new()
///     .initial("idle")
///     .context(0u32)
///     .transition("idle", "START", "cooking")
///     .transition("cooking", "DONE", "completed")
///     .build()
///     .unwrap();
///
/// let mut service: Interpreter<u32, &str> = Interpreter::interpret(machine);
/// service.send("START");
/// service.send("DONE");
/// assert_eq!(service.value(), "completed");
///
/// service.undo();
/// assert_eq!(service.value(), "cooking");
/// ```
pub struct Interpreter<C, E, H = CausalHistory<C, E>> {
    machine: StateMachine<C>,
    history: H,
    started: bool,
    _event: PhantomData<E>,
}

impl<C: Clone, E> Interpreter<C, E, CausalHistory<C, E>> {
    /// Start an interpreter over a fresh history rooted at the machine's
    /// initial state and context.
    pub fn interpret(machine: StateMachine<C>) -> Self {
        let root = CausalNode::root(machine.initial(), machine.initial_context().clone())
            .with_id(NodeId::new());
        let history = CausalHistory::new(root);
        Self::interpret_with(machine, history)
    }
}

impl<C, E, H> Interpreter<C, E, H> {
    /// Start an interpreter over a caller-supplied history.
    ///
    /// The history must already hold the initial node as its head.
    pub fn interpret_with(machine: StateMachine<C>, history: H) -> Self {
        Self {
            machine,
            history,
            started: true,
            _event: PhantomData,
        }
    }

    /// Re-enable dispatch. History is untouched.
    pub fn start(&mut self) -> &mut Self {
        self.started = true;
        self
    }

    /// Stop dispatch: `send` and `set_state` become no-ops. History
    /// navigation stays available.
    pub fn stop(&mut self) -> &mut Self {
        self.started = false;
        self
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn machine(&self) -> &StateMachine<C> {
        &self.machine
    }

    pub fn history(&self) -> &H {
        &self.history
    }

    pub fn into_history(self) -> H {
        self.history
    }
}

impl<C, E, H> Interpreter<C, E, H>
where
    C: Clone,
    E: EventKey,
    H: HistoryOps<C, E>,
{
    /// Send an event, keeping the current context.
    ///
    /// Returns `true` if a transition was taken.
    pub fn send(&mut self, event: E) -> bool {
        match self.send_with(event, |context, _| Ok::<C, Infallible>(context.clone())) {
            Ok(written) => written,
            Err(err) => match err.source {},
        }
    }

    /// Send an event, deriving the next context with `assign`.
    pub fn send_assign<F>(&mut self, event: E, assign: F) -> bool
    where
        F: FnOnce(&C, &E) -> C,
    {
        match self.send_with(event, |context, event| {
            Ok::<C, Infallible>(assign(context, event))
        }) {
            Ok(written) => written,
            Err(err) => match err.source {},
        }
    }

    /// Send an event with a fallible context assignment.
    ///
    /// `assign` only runs when a transition matches. If it fails the error
    /// is returned and the history is left unmodified.
    pub fn send_with<F, Err>(&mut self, event: E, assign: F) -> Result<bool, AssignError<Err>>
    where
        F: FnOnce(&C, &E) -> Result<C, Err>,
    {
        if !self.started {
            tracing::trace!(
                target: "causality::interpreter",
                event = %event.event_key(),
                "event ignored: interpreter stopped"
            );
            return Ok(false);
        }

        let head = self.history.head();
        let Some(target) = self.machine.resolve_transition(head.state_value(), &event) else {
            tracing::trace!(
                target: "causality::interpreter",
                state = head.state_value(),
                event = %event.event_key(),
                "event dropped: no transition"
            );
            return Ok(false);
        };
        let target = target.to_string();

        let context = assign(head.context(), &event).map_err(|source| AssignError {
            state: head.state_value().to_string(),
            event: event.event_key().into_owned(),
            source,
        })?;

        let parent = self.history.head_index();
        let node = CausalNode::new(target, context, Trigger::Event(event), Some(parent))
            .with_id(NodeId::new());
        self.history.write(node);
        Ok(true)
    }

    /// Force the machine into `target`, keeping the current context.
    ///
    /// The node is recorded with the override trigger and goes through the
    /// same history as ordinary transitions, so undo unwinds it.
    pub fn set_state(&mut self, target: impl Into<String>) -> bool {
        let context = self.history.head().context().clone();
        self.set_state_with_context(target, context)
    }

    /// Force the machine into `target` with a replacement context.
    pub fn set_state_with_context(&mut self, target: impl Into<String>, context: C) -> bool {
        if !self.started {
            return false;
        }
        let parent = self.history.head_index();
        let node = CausalNode::new(target, context, Trigger::Override, Some(parent))
            .with_id(NodeId::new());
        self.history.write(node);
        true
    }

    /// Transition entry `event` would take from the current state, with
    /// its action names.
    pub fn transition_for<Ev>(&self, event: &Ev) -> Option<&TransitionTarget>
    where
        Ev: EventKey + ?Sized,
    {
        self.machine.resolve(self.value(), event)
    }

    /// Event keys valid from the current state.
    pub fn enabled_events(&self) -> BTreeSet<String> {
        self.machine.enabled_events(self.value())
    }

    pub fn snapshot(&self) -> StateSnapshot<C, E>
    where
        E: Clone,
    {
        let head = self.history.head();
        StateSnapshot {
            value: head.state_value().to_string(),
            context: head.context().clone(),
            event: head.event().clone(),
            done: false,
        }
    }

    pub fn head(&self) -> &CausalNode<C, E> {
        self.history.head()
    }

    pub fn value(&self) -> &str {
        self.history.head().state_value()
    }

    pub fn context(&self) -> &C {
        self.history.head().context()
    }

    /// Causal audit trail from the current head back to the root.
    pub fn lineage(&self) -> Lineage<'_, C, E> {
        self.history.lineage()
    }

    pub fn undo(&mut self) -> bool {
        self.history.undo()
    }

    pub fn redo(&mut self) -> bool {
        self.history.redo()
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Undo until no events are applied.
    pub fn undo_to_root(&mut self) -> bool {
        self.history.undo_to_root()
    }

    /// Alias for [`undo_to_root`](Self::undo_to_root).
    pub fn backward(&mut self) -> bool {
        self.history.undo_to_root()
    }

    pub fn pause(&mut self) {
        self.history.pause();
    }

    pub fn resume(&mut self) -> bool {
        self.history.resume()
    }

    pub fn clear_paused(&mut self) {
        self.history.clear_paused();
    }

    pub fn is_paused(&self) -> bool {
        self.history.is_paused()
    }
}
