//! Causality: a finite-state-machine interpreter with causal history
//!
//! Every transition is recorded as an immutable node. The interpreter
//! resolves events through a declarative transition table and, on top of
//! ordinary dispatch, offers undo, redo, rewind-to-root and a pause/resume
//! checkpoint.
//!
//! # Core Concepts
//!
//! - **Causal nodes**: immutable records of state, context, trigger and parent
//! - **History**: head plus past/redo stacks and a pause checkpoint, behind the
//!   [`HistoryOps`] trait
//! - **Observing history**: a decorator adding atomic counters and `tracing` output
//! - **Machine definitions**: validated per-state and machine-wide transition tables
//! - **Interpreter**: the service tying a definition to a history
//!
//! # Example
//!
//! ```rust
//! use causality::interpreter::Interpreter;
//! use causality::machine::MachineBuilder;
//!
//! let machine = MachineBuilder::new()
//!     .id("fishBurger")
//!     .initial("idle")
//!     .context(0u32)
//!     .transition("idle", "START", "cooking")
//!     .transition("cooking", "DONE", "completed")
//!     .transition("completed", "RESET", "idle")
//!     .build()
//!     .unwrap();
//!
//! let mut service: Interpreter<u32, &str> = Interpreter::interpret(machine);
//! service.send("START");
//! service.send("DONE");
//! assert_eq!(service.value(), "completed");
//!
//! assert!(service.undo());
//! assert!(service.undo());
//! assert_eq!(service.value(), "idle");
//! assert!(!service.can_undo());
//!
//! assert!(service.redo());
//! assert_eq!(service.value(), "cooking");
//! ```

pub mod core;
pub mod interpreter;
pub mod logging;
pub mod machine;

// Re-export commonly used types
pub use core::{
    CausalHistory, CausalNode, EventKey, HistoryMetrics, HistoryOps, ObservingHistory, Trigger,
    OVERRIDE_EVENT,
};
pub use interpreter::{Interpreter, StateSnapshot, TriLeafInterpreter, ViewMachine};
pub use machine::{MachineBuilder, MachineConfig, StateMachine};
