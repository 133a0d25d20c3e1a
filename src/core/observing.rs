//! History decorator adding metrics and debug logging.

use super::history::HistoryOps;
use super::metrics::HistoryMetrics;
use super::node::{CausalNode, EventKey, NodeIndex};
use std::sync::Arc;
use tracing::Level;

/// Wraps any [`HistoryOps`] implementation, forwarding every call and
/// counting the ones that had an effect.
///
/// `undo`, `redo`, `undo_to_root` and `resume` are counted only when the
/// delegate reports success. `write`, `pause` and `clear_paused` always
/// count. Observable history behavior is identical to the delegate's.
///
/// When logging is enabled, operations emit `DEBUG` events on the
/// `causality::history` target. Nothing is formatted unless a subscriber is
/// interested in that level.
///
/// # Example
///
/// ```rust
/// use causality::core::{CausalHistory, CausalNode, HistoryOps, ObservingHistory, Trigger};
///
/// let plain: CausalHistory<u32, &str> = CausalHistory::new(CausalNode::root("idle", 0));
/// let mut observed = ObservingHistory::with_metrics(plain);
///
/// let parent = observed.head_index();
/// observed.write(CausalNode::new("cooking", 0, Trigger::Event("START"), Some(parent)));
/// observed.redo(); // nothing to redo, not counted
///
/// let snapshot = observed.metrics().snapshot();
/// assert_eq!(snapshot.writes, 1);
/// assert_eq!(snapshot.redos, 0);
/// ```
#[derive(Debug)]
pub struct ObservingHistory<H> {
    delegate: H,
    metrics: Arc<HistoryMetrics>,
    logging: bool,
}

impl<H> ObservingHistory<H> {
    pub fn new(delegate: H, metrics: Arc<HistoryMetrics>, logging: bool) -> Self {
        Self {
            delegate,
            metrics,
            logging,
        }
    }

    /// Decorator that only counts.
    pub fn with_metrics(delegate: H) -> Self {
        Self::new(delegate, Arc::new(HistoryMetrics::new()), false)
    }

    /// Decorator that counts into `metrics` and logs.
    pub fn with_logging_and_metrics(delegate: H, metrics: Arc<HistoryMetrics>) -> Self {
        Self::new(delegate, metrics, true)
    }

    pub fn metrics(&self) -> &Arc<HistoryMetrics> {
        &self.metrics
    }

    pub fn inner(&self) -> &H {
        &self.delegate
    }

    pub fn into_inner(self) -> H {
        self.delegate
    }

    fn log_enabled(&self) -> bool {
        self.logging && tracing::enabled!(target: "causality::history", Level::DEBUG)
    }

    fn log_head(&self, operation: &'static str, head: &str) {
        if self.log_enabled() {
            tracing::debug!(target: "causality::history", head, "causality.{operation}");
        }
    }
}

impl<C, E, H> HistoryOps<C, E> for ObservingHistory<H>
where
    E: EventKey,
    H: HistoryOps<C, E>,
{
    fn head(&self) -> &CausalNode<C, E> {
        self.delegate.head()
    }

    fn head_index(&self) -> NodeIndex {
        self.delegate.head_index()
    }

    fn node(&self, index: NodeIndex) -> Option<&CausalNode<C, E>> {
        self.delegate.node(index)
    }

    fn len(&self) -> usize {
        self.delegate.len()
    }

    fn past_len(&self) -> usize {
        self.delegate.past_len()
    }

    fn redo_len(&self) -> usize {
        self.delegate.redo_len()
    }

    fn can_undo(&self) -> bool {
        self.delegate.can_undo()
    }

    fn can_redo(&self) -> bool {
        self.delegate.can_redo()
    }

    fn is_paused(&self) -> bool {
        self.delegate.is_paused()
    }

    fn write(&mut self, node: CausalNode<C, E>) -> NodeIndex {
        if self.log_enabled() {
            tracing::debug!(
                target: "causality::history",
                state = node.state_value(),
                event = %node.event().event_key(),
                "causality.write"
            );
        }
        self.metrics.increment_writes();
        self.delegate.write(node)
    }

    fn undo(&mut self) -> bool {
        let result = self.delegate.undo();
        if result {
            self.log_head("undo", self.delegate.head().state_value());
            self.metrics.increment_undos();
        }
        result
    }

    fn redo(&mut self) -> bool {
        let result = self.delegate.redo();
        if result {
            self.log_head("redo", self.delegate.head().state_value());
            self.metrics.increment_redos();
        }
        result
    }

    fn undo_to_root(&mut self) -> bool {
        let result = self.delegate.undo_to_root();
        if result {
            self.log_head("undo_to_root", self.delegate.head().state_value());
            self.metrics.increment_undo_to_root();
        }
        result
    }

    fn pause(&mut self) {
        if self.log_enabled() {
            tracing::debug!(target: "causality::history", "causality.pause");
        }
        self.metrics.increment_pauses();
        self.delegate.pause();
    }

    fn resume(&mut self) -> bool {
        let result = self.delegate.resume();
        if result {
            self.log_head("resume", self.delegate.head().state_value());
            self.metrics.increment_resumes();
        }
        result
    }

    fn clear_paused(&mut self) {
        if self.log_enabled() {
            tracing::debug!(target: "causality::history", "causality.clear_paused");
        }
        self.metrics.increment_clear_paused();
        self.delegate.clear_paused();
    }
}
