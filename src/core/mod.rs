//! Core history types.
//!
//! This module contains the data structures time travel is built on:
//! - Immutable causal nodes and event keys
//! - The undo/redo/pause history and the trait all backends share
//! - An observing decorator with thread-safe counters
//!
//! Nothing here knows about transition tables; the interpreter layers
//! machine semantics on top.

mod history;
mod metrics;
mod node;
mod observing;

pub use history::{CausalHistory, HistoryOps, Lineage};
pub use metrics::{HistoryMetrics, MetricsSnapshot};
pub use node::{CausalNode, EventKey, NodeId, NodeIndex, Trigger, NO_EVENT, OVERRIDE_EVENT};
pub use observing::ObservingHistory;
