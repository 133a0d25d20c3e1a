//! Causal history: the current head plus undo, redo and pause bookkeeping.
//!
//! Every node ever written is kept in an append-only arena. The head, the
//! past and redo stacks and the paused checkpoint are indices into that
//! arena, so nodes are never copied as the head moves around.

use super::node::{CausalNode, NodeIndex};

/// Capability set shared by every history backend.
///
/// The plain [`CausalHistory`] and decorators such as
/// [`ObservingHistory`](super::ObservingHistory) both implement this trait, so
/// an interpreter can be bound to either without knowing which.
///
/// Implementations are single-writer: mutation happens through `&mut self`
/// and is not internally synchronized.
pub trait HistoryOps<C, E> {
    /// The current node. Always defined.
    fn head(&self) -> &CausalNode<C, E>;

    /// Arena position of the current node.
    fn head_index(&self) -> NodeIndex;

    /// Look up any node ever written to this history.
    fn node(&self, index: NodeIndex) -> Option<&CausalNode<C, E>>;

    /// Number of nodes stored, including the root.
    fn len(&self) -> usize;

    /// Number of heads that `undo` can step back through.
    fn past_len(&self) -> usize;

    /// Number of heads that `redo` can step forward through.
    fn redo_len(&self) -> usize;

    fn can_undo(&self) -> bool;

    fn can_redo(&self) -> bool;

    /// Whether a pause checkpoint is outstanding.
    fn is_paused(&self) -> bool;

    /// Make `node` the new head. Clears the redo stack.
    fn write(&mut self, node: CausalNode<C, E>) -> NodeIndex;

    /// Step back one head. Returns `false` when there is nothing to undo.
    fn undo(&mut self) -> bool;

    /// Step forward one head. Returns `false` when there is nothing to redo.
    fn redo(&mut self) -> bool;

    /// Undo until the past stack is empty. Returns `true` if anything moved.
    fn undo_to_root(&mut self) -> bool;

    /// Record the current head as the pause checkpoint, replacing any prior one.
    fn pause(&mut self);

    /// Jump the head back to the pause checkpoint and clear it.
    ///
    /// The past and redo stacks are left as they are: nodes written while
    /// paused stay reachable through `undo`.
    fn resume(&mut self) -> bool;

    /// Discard the pause checkpoint without moving the head.
    fn clear_paused(&mut self);

    /// Whether the history holds only its root node.
    fn is_empty(&self) -> bool {
        self.len() <= 1
    }

    /// Walk from the head back through parent links to the node it derives from.
    ///
    /// This is the causal audit trail. It follows `parent`, not the undo
    /// stack, so it reflects how the head was produced rather than how the
    /// caller navigated. The walk ends at a parent link that does not point
    /// to an earlier node.
    fn lineage(&self) -> Lineage<'_, C, E>
    where
        Self: Sized,
    {
        Lineage {
            history: self,
            next: Some(self.head_index()),
        }
    }
}

/// Iterator over a node and its ancestors, newest first.
pub struct Lineage<'a, C, E> {
    history: &'a dyn HistoryOps<C, E>,
    next: Option<NodeIndex>,
}

impl<'a, C: 'a, E: 'a> Iterator for Lineage<'a, C, E> {
    type Item = &'a CausalNode<C, E>;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        let node = self.history.node(current)?;
        // The arena only grows, so a real parent sits below its child.
        self.next = node.parent().filter(|parent| *parent < current);
        Some(node)
    }
}

/// Stack-backed history.
///
/// # Example
///
/// ```rust
/// use causality::core::{CausalHistory, CausalNode, HistoryOps, Trigger};
///
/// let mut history: CausalHistory<u32, &str> = CausalHistory::new(CausalNode::root("idle", 0));
/// let root = history.head_index();
///
/// history.write(CausalNode::new("cooking", 0, Trigger::Event("START"), Some(root)));
/// assert!(history.can_undo());
///
/// assert!(history.undo());
/// assert_eq!(history.head().state_value(), "idle");
/// assert!(history.can_redo());
///
/// assert!(history.redo());
/// assert_eq!(history.head().state_value(), "cooking");
/// ```
#[derive(Clone, Debug)]
pub struct CausalHistory<C, E> {
    nodes: Vec<CausalNode<C, E>>,
    head: NodeIndex,
    past: Vec<NodeIndex>,
    redo: Vec<NodeIndex>,
    paused: Option<NodeIndex>,
}

impl<C, E> CausalHistory<C, E> {
    /// Create a history whose head is `initial`.
    pub fn new(initial: CausalNode<C, E>) -> Self {
        Self {
            nodes: vec![initial],
            head: NodeIndex::new(0),
            past: Vec::new(),
            redo: Vec::new(),
            paused: None,
        }
    }

    /// Every node written so far, in write order.
    pub fn nodes(&self) -> &[CausalNode<C, E>] {
        &self.nodes
    }

    /// The outstanding pause checkpoint, if any.
    pub fn paused_snapshot(&self) -> Option<&CausalNode<C, E>> {
        self.paused.and_then(|index| self.node(index))
    }

    fn at(&self, index: NodeIndex) -> &CausalNode<C, E> {
        // Indices are only ever produced by this arena, which never shrinks.
        &self.nodes[index.get()]
    }
}

impl<C, E> HistoryOps<C, E> for CausalHistory<C, E> {
    fn head(&self) -> &CausalNode<C, E> {
        self.at(self.head)
    }

    fn head_index(&self) -> NodeIndex {
        self.head
    }

    fn node(&self, index: NodeIndex) -> Option<&CausalNode<C, E>> {
        self.nodes.get(index.get())
    }

    fn len(&self) -> usize {
        self.nodes.len()
    }

    fn past_len(&self) -> usize {
        self.past.len()
    }

    fn redo_len(&self) -> usize {
        self.redo.len()
    }

    fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    fn is_paused(&self) -> bool {
        self.paused.is_some()
    }

    fn write(&mut self, node: CausalNode<C, E>) -> NodeIndex {
        let index = NodeIndex::new(self.nodes.len());
        self.nodes.push(node);
        self.redo.clear();
        self.past.push(self.head);
        self.head = index;
        index
    }

    fn undo(&mut self) -> bool {
        let Some(previous) = self.past.pop() else {
            return false;
        };
        self.redo.push(self.head);
        self.head = previous;
        true
    }

    fn redo(&mut self) -> bool {
        let Some(next) = self.redo.pop() else {
            return false;
        };
        self.past.push(self.head);
        self.head = next;
        true
    }

    fn undo_to_root(&mut self) -> bool {
        let mut did_undo = false;
        while self.undo() {
            did_undo = true;
        }
        did_undo
    }

    fn pause(&mut self) {
        self.paused = Some(self.head);
    }

    fn resume(&mut self) -> bool {
        let Some(snapshot) = self.paused.take() else {
            return false;
        };
        self.head = snapshot;
        true
    }

    fn clear_paused(&mut self) {
        self.paused = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::node::Trigger;

    type Node = CausalNode<u32, &'static str>;

    fn history() -> CausalHistory<u32, &'static str> {
        CausalHistory::new(Node::root("idle", 0))
    }

    fn push(
        history: &mut CausalHistory<u32, &'static str>,
        state: &str,
        ctx: u32,
        event: &'static str,
    ) {
        let parent = history.head_index();
        history.write(Node::new(state, ctx, Trigger::Event(event), Some(parent)));
    }

    #[test]
    fn new_history_has_root_head() {
        let history = history();
        assert_eq!(history.head().state_value(), "idle");
        assert!(!history.can_undo());
        assert!(!history.can_redo());
        assert!(!history.is_paused());
        assert!(history.is_empty());
    }

    #[test]
    fn write_pushes_past_and_clears_redo() {
        let mut history = history();
        push(&mut history, "a", 1, "E1");
        push(&mut history, "b", 2, "E2");
        assert!(history.undo());
        assert!(history.can_redo());

        push(&mut history, "c", 3, "E3");
        assert!(!history.can_redo());
        assert_eq!(history.past_len(), 2);
        assert_eq!(history.head().state_value(), "c");
    }

    #[test]
    fn undo_on_root_is_noop() {
        let mut history = history();
        assert!(!history.undo());
        assert_eq!(history.head().state_value(), "idle");
        assert!(!history.can_redo());
    }

    #[test]
    fn redo_without_undo_is_noop() {
        let mut history = history();
        push(&mut history, "a", 1, "E1");
        assert!(!history.redo());
        assert_eq!(history.head().state_value(), "a");
    }

    #[test]
    fn undo_then_redo_restores_head() {
        let mut history = history();
        push(&mut history, "a", 1, "E1");
        let before = history.head().clone();

        assert!(history.undo());
        assert!(history.redo());
        assert_eq!(history.head(), &before);
    }

    #[test]
    fn undo_to_root_unwinds_everything() {
        let mut history = history();
        push(&mut history, "a", 1, "E1");
        push(&mut history, "b", 2, "E2");
        push(&mut history, "c", 3, "E3");

        assert!(history.undo_to_root());
        assert_eq!(history.head().state_value(), "idle");
        assert!(!history.can_undo());
        assert!(history.can_redo());
        assert_eq!(history.redo_len(), 3);
    }

    #[test]
    fn undo_to_root_from_root_returns_false() {
        let mut history = history();
        assert!(!history.undo_to_root());
        assert_eq!(history.head().state_value(), "idle");
    }

    #[test]
    fn pause_resume_restores_head() {
        let mut history = history();
        push(&mut history, "a", 1, "E1");
        history.pause();
        assert!(history.is_paused());
        assert_eq!(
            history.paused_snapshot().map(|n| n.state_value()),
            Some("a")
        );

        assert!(history.resume());
        assert!(!history.is_paused());
        assert_eq!(history.head().state_value(), "a");
    }

    #[test]
    fn resume_without_pause_returns_false() {
        let mut history = history();
        assert!(!history.resume());
    }

    #[test]
    fn pause_overwrites_previous_checkpoint() {
        let mut history = history();
        history.pause();
        push(&mut history, "a", 1, "E1");
        history.pause();
        push(&mut history, "b", 2, "E2");

        assert!(history.resume());
        assert_eq!(history.head().state_value(), "a");
    }

    #[test]
    fn clear_paused_discards_checkpoint_without_moving_head() {
        let mut history = history();
        history.pause();
        push(&mut history, "a", 1, "E1");
        history.clear_paused();

        assert!(!history.is_paused());
        assert!(!history.resume());
        assert_eq!(history.head().state_value(), "a");
    }

    // Resume is a checkpoint jump: nodes written while paused stay on the
    // past stack and remain reachable by undo.
    #[test]
    fn resume_does_not_reconcile_past_stack() {
        let mut history = history();
        history.pause();
        push(&mut history, "a", 1, "E1");
        push(&mut history, "b", 2, "E2");

        assert!(history.resume());
        assert_eq!(history.head().state_value(), "idle");
        assert_eq!(history.past_len(), 2);
        assert!(history.can_undo());

        assert!(history.undo());
        assert_eq!(history.head().state_value(), "a");
    }

    #[test]
    fn lineage_follows_parent_links() {
        let mut history = history();
        push(&mut history, "a", 1, "E1");
        push(&mut history, "b", 2, "E2");

        let states: Vec<&str> = history.lineage().map(|n| n.state_value()).collect();
        assert_eq!(states, vec!["b", "a", "idle"]);
    }

    #[test]
    fn lineage_ignores_undo_navigation() {
        let mut history = history();
        push(&mut history, "a", 1, "E1");
        history.undo();
        push(&mut history, "b", 2, "E2");

        let states: Vec<&str> = history.lineage().map(|n| n.state_value()).collect();
        assert_eq!(states, vec!["b", "idle"]);
        assert_eq!(history.len(), 3);
    }

    #[test]
    fn lineage_stops_at_forward_parent_links() {
        let mut history = history();
        push(&mut history, "a", 1, "E1");
        history.write(Node::new("self", 2, Trigger::Event("E2"), Some(NodeIndex::new(2))));

        let states: Vec<&str> = history.lineage().map(|n| n.state_value()).collect();
        assert_eq!(states, vec!["self"]);

        history.write(Node::new("ahead", 3, Trigger::Event("E3"), Some(NodeIndex::new(9))));
        assert_eq!(history.lineage().count(), 1);
    }
}
