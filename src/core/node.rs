//! Causal nodes: immutable points in history.
//!
//! A node records which state the machine was in, the context it carried,
//! what triggered it and where it came from. Nodes never change after
//! construction; history navigation only moves references to them around.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;
use uuid::Uuid;

/// Reserved event key marking a manually forced transition.
///
/// Application event vocabularies must not use this key; machine
/// definitions that do are rejected at construction time.
pub const OVERRIDE_EVENT: &str = "__override";

/// Event key of "no event", used by root nodes and null payloads.
pub const NO_EVENT: &str = "null";

/// Derives the lookup key of an event for transition resolution.
///
/// A plain string is its own key. Structured JSON events use their `type`
/// field, falling back to the event's own JSON text when the field is absent.
///
/// # Example
///
/// ```rust
/// use causality::core::EventKey;
/// use serde_json::json;
///
/// assert_eq!("START".event_key(), "START");
/// assert_eq!(json!({ "type": "DONE", "by": "chef" }).event_key(), "DONE");
/// assert_eq!(json!(null).event_key(), "null");
/// ```
pub trait EventKey {
    /// The key this event is looked up under.
    fn event_key(&self) -> Cow<'_, str>;
}

impl EventKey for str {
    fn event_key(&self) -> Cow<'_, str> {
        Cow::Borrowed(self)
    }
}

impl EventKey for String {
    fn event_key(&self) -> Cow<'_, str> {
        Cow::Borrowed(self.as_str())
    }
}

impl<T: EventKey + ?Sized> EventKey for &T {
    fn event_key(&self) -> Cow<'_, str> {
        (**self).event_key()
    }
}

impl<T: EventKey> EventKey for Option<T> {
    fn event_key(&self) -> Cow<'_, str> {
        match self {
            Some(event) => event.event_key(),
            None => Cow::Borrowed(NO_EVENT),
        }
    }
}

impl EventKey for serde_json::Value {
    fn event_key(&self) -> Cow<'_, str> {
        use serde_json::Value;

        match self {
            Value::Null => Cow::Borrowed(NO_EVENT),
            Value::String(s) => Cow::Borrowed(s.as_str()),
            Value::Object(map) => match map.get("type") {
                Some(Value::String(s)) => Cow::Borrowed(s.as_str()),
                Some(Value::Null) | None => Cow::Owned(self.to_string()),
                Some(other) => Cow::Owned(other.to_string()),
            },
            other => Cow::Owned(other.to_string()),
        }
    }
}

/// What caused a node to exist.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "event", rename_all = "snake_case")]
pub enum Trigger<E> {
    /// No event: the root of a history.
    None,
    /// A manual override via `set_state`, not a transition-table lookup.
    Override,
    /// An application event resolved through the transition table.
    Event(E),
}

impl<E> Trigger<E> {
    pub fn is_override(&self) -> bool {
        matches!(self, Self::Override)
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    /// The application event, if this trigger carries one.
    pub fn event(&self) -> Option<&E> {
        match self {
            Self::Event(event) => Some(event),
            _ => None,
        }
    }
}

impl<E: EventKey> EventKey for Trigger<E> {
    fn event_key(&self) -> Cow<'_, str> {
        match self {
            Self::None => Cow::Borrowed(NO_EVENT),
            Self::Override => Cow::Borrowed(OVERRIDE_EVENT),
            Self::Event(event) => event.event_key(),
        }
    }
}

/// Position of a node inside the arena of the history that stores it.
///
/// Indices are only meaningful for the history that handed them out.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeIndex(usize);

impl NodeIndex {
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    pub fn get(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Opaque node identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(Uuid);

impl NodeId {
    /// Generate a fresh random identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for NodeId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// One immutable point in history.
///
/// The `parent` link records which node this one was derived from. It exists
/// for causal audit ("how did we get here") and is never followed by undo or
/// redo, which work purely on the history's stacks.
///
/// # Example
///
/// ```rust
/// use causality::core::{CausalNode, NodeIndex, Trigger};
///
/// let root: CausalNode<u32, &str> = CausalNode::root("idle", 0);
/// assert!(root.is_root());
/// assert_eq!(root.event(), &Trigger::None);
///
/// let next = CausalNode::new("cooking", 0, Trigger::Event("START"), Some(NodeIndex::new(0)));
/// assert_eq!(next.state_value(), "cooking");
/// assert_eq!(next.parent(), Some(NodeIndex::new(0)));
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CausalNode<C, E> {
    state_value: String,
    context: C,
    event: Trigger<E>,
    timestamp: DateTime<Utc>,
    parent: Option<NodeIndex>,
    id: Option<NodeId>,
}

impl<C, E> CausalNode<C, E> {
    /// Create a node stamped with the current time and no id.
    pub fn new(
        state_value: impl Into<String>,
        context: C,
        event: Trigger<E>,
        parent: Option<NodeIndex>,
    ) -> Self {
        Self {
            state_value: state_value.into(),
            context,
            event,
            timestamp: Utc::now(),
            parent,
            id: None,
        }
    }

    /// Create a root node: no triggering event, no parent.
    pub fn root(state_value: impl Into<String>, context: C) -> Self {
        Self::new(state_value, context, Trigger::None, None)
    }

    pub fn with_id(mut self, id: NodeId) -> Self {
        self.id = Some(id);
        self
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    pub fn state_value(&self) -> &str {
        &self.state_value
    }

    pub fn context(&self) -> &C {
        &self.context
    }

    pub fn event(&self) -> &Trigger<E> {
        &self.event
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn parent(&self) -> Option<NodeIndex> {
        self.parent
    }

    pub fn id(&self) -> Option<NodeId> {
        self.id
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}
