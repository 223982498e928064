//! Shared document handle and event dispatch.

use std::cell::{Ref, RefCell, RefMut};
use std::rc::{Rc, Weak};

use crate::document::Document;
use crate::errors::{DomError, DomResult};
use crate::event::{Event, Listener, ListenerResult};
use crate::node::NodeId;

/// Cheaply cloneable handle to a [`Document`].
///
/// Listeners are invoked with no borrow held, so they are free to mutate the
/// document they were dispatched from.
#[derive(Clone, Default)]
pub struct Dom {
    document: Rc<RefCell<Document>>,
}

impl Dom {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_document(document: Document) -> Self {
        Self {
            document: Rc::new(RefCell::new(document)),
        }
    }

    /// Borrow the document for reading
    #[inline]
    pub fn borrow(&self) -> Ref<'_, Document> {
        self.document.borrow()
    }

    /// Borrow the document for writing
    #[inline]
    pub fn borrow_mut(&self) -> RefMut<'_, Document> {
        self.document.borrow_mut()
    }

    /// Whether two handles point at the same document
    pub fn ptr_eq(&self, other: &Dom) -> bool {
        Rc::ptr_eq(&self.document, &other.document)
    }

    /// Non-owning handle, for listeners stored inside the document itself
    pub fn downgrade(&self) -> WeakDom {
        WeakDom {
            document: Rc::downgrade(&self.document),
        }
    }

    pub fn add_event_listener<F>(&self, node: NodeId, event: &str, listener: F) -> DomResult<()>
    where
        F: Fn(&Event) -> ListenerResult + 'static,
    {
        let listener: Listener = Rc::new(listener);
        self.borrow_mut().add_listener(node, event, listener)
    }

    /// Deliver an event to its target, then to each ancestor if it bubbles.
    ///
    /// Dispatch stops at the first listener that fails.
    pub fn dispatch_event(&self, event: &Event) -> DomResult<()> {
        let path = {
            let doc = self.borrow();
            doc.node(event.target())?;
            let mut path = vec![event.target()];
            if event.bubbles() {
                let mut current = doc.parent(event.target());
                while let Some(id) = current {
                    path.push(id);
                    current = doc.parent(id);
                }
            }
            path
        };

        tracing::trace!(event = event.kind(), target = %event.target(), "dispatching event");
        for node in path {
            // Earlier listeners may have freed part of the path.
            let Ok(listeners) = self.borrow().listeners_for(node, event.kind()) else {
                continue;
            };
            for listener in listeners {
                listener(event).map_err(|source| DomError::Listener {
                    event: event.kind().into(),
                    source,
                })?;
            }
        }
        Ok(())
    }

    /// Simulate typing: assign the control's value, then fire `input`
    pub fn input(&self, node: NodeId, value: &str) -> DomResult<()> {
        self.borrow_mut().set_value(node, value)?;
        self.dispatch_event(&Event::new("input", node))
    }

    /// Fire a `click` at a node
    pub fn click(&self, node: NodeId) -> DomResult<()> {
        self.dispatch_event(&Event::new("click", node))
    }
}

/// Weak counterpart of [`Dom`].
#[derive(Clone, Default)]
pub struct WeakDom {
    document: Weak<RefCell<Document>>,
}

impl WeakDom {
    pub fn upgrade(&self) -> Option<Dom> {
        self.document.upgrade().map(|document| Dom { document })
    }
}
