//! Relief - The DOM surface for Vellum.
//!
//! An in-memory document: an arena of element, text and comment nodes with
//! attributes, live form values and event listeners. Bindings never touch a
//! platform DOM directly; they mutate this tree through [`Dom`], which also
//! dispatches events back into listeners.

pub mod document;
pub mod dom;
pub mod errors;
pub mod event;
pub mod node;

pub use document::Document;
pub use dom::{Dom, WeakDom};
pub use errors::{DomError, DomResult};
pub use event::{Event, Listener, ListenerResult};
pub use node::{Attribute, ElementData, NodeData, NodeId, NodeKind, NodeType};
