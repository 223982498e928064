//! DOM events and listeners.

use std::rc::Rc;

use vellum_carton::String;

use crate::node::NodeId;

/// Result returned by an event listener.
pub type ListenerResult = Result<(), Box<dyn std::error::Error>>;

/// Shared event listener.
pub type Listener = Rc<dyn Fn(&Event) -> ListenerResult>;

/// A dispatched event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    kind: String,
    target: NodeId,
    bubbles: bool,
}

impl Event {
    /// Create a bubbling event aimed at `target`
    pub fn new(kind: impl Into<String>, target: NodeId) -> Self {
        Self {
            kind: kind.into(),
            target,
            bubbles: true,
        }
    }

    /// Create an event that is only delivered to its target
    pub fn non_bubbling(kind: impl Into<String>, target: NodeId) -> Self {
        Self {
            bubbles: false,
            ..Self::new(kind, target)
        }
    }

    /// Event type, e.g. `input` or `click`
    #[inline]
    pub fn kind(&self) -> &str {
        self.kind.as_str()
    }

    /// Node the event was dispatched at
    #[inline]
    pub fn target(&self) -> NodeId {
        self.target
    }

    #[inline]
    pub fn bubbles(&self) -> bool {
        self.bubbles
    }
}
