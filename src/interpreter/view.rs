//! Render-key notification for view layers.
//!
//! A [`ViewMachine`] wraps an interpreter with a stable string key and tells
//! observers "something changed, re-render" whenever the head moves.

use super::service::{AssignError, Interpreter, StateSnapshot};
use crate::core::{CausalHistory, EventKey, HistoryOps};
use crate::machine::StateMachine;

type Observer = Box<dyn FnMut(&str) + Send>;

/// Handle returned by [`ViewMachine::observe_view_key`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Subscription(u64);

/// Interpreter wrapper that notifies observers of its render key.
///
/// Observers are called once on registration and again after every
/// operation that moved the head: a taken transition, an override, a
/// successful undo, redo, undo-to-root or resume.
///
/// # Example
///
/// ```rust
/// use causality::interpreter::ViewMachine;
/// use causality::machine::MachineBuilder;
/// use std::sync::{Arc, Mutex};
///
/// let machine = MachineBuilder::new()
///     .id("fishBurger")
///     .initial("idle")
///     .context(0u32)
///     .transition("idle", "START", "cooking")
///     .build()
///     .unwrap();
///
/// let mut view: ViewMachine<u32, &str> = ViewMachine::interpret(machine);
/// let seen = Arc::new(Mutex::new(Vec::new()));
/// let sink = Arc::clone(&seen);
/// view.observe_view_key(move |key| sink.lock().unwrap().push(key.to_string()));
///
/// view.send("START");
/// assert_eq!(*seen.lock().unwrap(), vec!["fishBurger", "fishBurger"]);
/// ```
pub struct ViewMachine<C, E, H = CausalHistory<C, E>> {
    interpreter: Interpreter<C, E, H>,
    render_key: String,
    observers: Vec<(Subscription, Observer)>,
    next_subscription: u64,
}

impl<C: Clone, E> ViewMachine<C, E, CausalHistory<C, E>> {
    /// Interpret `machine`, using its id (or initial state) as render key.
    pub fn interpret(machine: StateMachine<C>) -> Self {
        let render_key = machine.id().unwrap_or(machine.initial()).to_string();
        Self::new(Interpreter::interpret(machine), render_key)
    }
}

impl<C, E, H> ViewMachine<C, E, H> {
    pub fn new(interpreter: Interpreter<C, E, H>, render_key: impl Into<String>) -> Self {
        Self {
            interpreter,
            render_key: render_key.into(),
            observers: Vec::new(),
            next_subscription: 0,
        }
    }

    pub fn render_key(&self) -> &str {
        &self.render_key
    }

    pub fn interpreter(&self) -> &Interpreter<C, E, H> {
        &self.interpreter
    }

    /// Register an observer. It is called immediately with the render key.
    pub fn observe_view_key<F>(&mut self, observer: F) -> Subscription
    where
        F: FnMut(&str) + Send + 'static,
    {
        let mut observer: Observer = Box::new(observer);
        observer(&self.render_key);

        let subscription = Subscription(self.next_subscription);
        self.next_subscription += 1;
        self.observers.push((subscription, observer));
        subscription
    }

    /// Remove an observer. Returns `false` if it was already removed.
    pub fn unsubscribe(&mut self, subscription: Subscription) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(id, _)| *id != subscription);
        self.observers.len() != before
    }

    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    fn notify_if(&mut self, changed: bool) -> bool {
        if changed {
            for (_, observer) in &mut self.observers {
                observer(&self.render_key);
            }
        }
        changed
    }
}

impl<C, E, H> ViewMachine<C, E, H>
where
    C: Clone,
    E: EventKey,
    H: HistoryOps<C, E>,
{
    pub fn send(&mut self, event: E) -> bool {
        let changed = self.interpreter.send(event);
        self.notify_if(changed)
    }

    pub fn send_with<F, Err>(&mut self, event: E, assign: F) -> Result<bool, AssignError<Err>>
    where
        F: FnOnce(&C, &E) -> Result<C, Err>,
    {
        let changed = self.interpreter.send_with(event, assign)?;
        Ok(self.notify_if(changed))
    }

    pub fn set_state(&mut self, target: impl Into<String>) -> bool {
        let changed = self.interpreter.set_state(target);
        self.notify_if(changed)
    }

    pub fn set_state_with_context(&mut self, target: impl Into<String>, context: C) -> bool {
        let changed = self.interpreter.set_state_with_context(target, context);
        self.notify_if(changed)
    }

    pub fn undo(&mut self) -> bool {
        let changed = self.interpreter.undo();
        self.notify_if(changed)
    }

    pub fn redo(&mut self) -> bool {
        let changed = self.interpreter.redo();
        self.notify_if(changed)
    }

    pub fn undo_to_root(&mut self) -> bool {
        let changed = self.interpreter.undo_to_root();
        self.notify_if(changed)
    }

    pub fn pause(&mut self) {
        self.interpreter.pause();
    }

    pub fn resume(&mut self) -> bool {
        let changed = self.interpreter.resume();
        self.notify_if(changed)
    }

    /// Discard the pause checkpoint. The head does not move, so nothing is
    /// notified.
    pub fn clear_paused(&mut self) {
        self.interpreter.clear_paused();
    }

    pub fn context(&self) -> &C {
        self.interpreter.context()
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
}
