//! Running interpreters and the facades built on them.
//!
//! - [`Interpreter`]: turns events into causal nodes via the transition table
//! - [`TriLeafInterpreter`]: forward / pause / backward per enabled event
//! - [`ViewMachine`]: render-key notification for view layers

mod service;
mod tri_leaf;
mod view;

pub use service::{AssignError, Interpreter, StateSnapshot};
pub use tri_leaf::{BranchActions, TriLeafInterpreter, TriLeafVisualData};
pub use view::{Subscription, ViewMachine};
