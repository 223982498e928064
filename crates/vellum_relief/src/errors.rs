//! DOM error types.

use vellum_carton::String;

use crate::node::NodeId;

/// Error type for DOM operations.
#[derive(Debug, thiserror::Error)]
pub enum DomError {
    /// The node handle does not belong to this document.
    #[error("Unknown node: {0}")]
    UnknownNode(NodeId),

    /// An element-only operation was applied to another node type.
    #[error("Node {0} is not an element")]
    NotAnElement(NodeId),

    /// Inserting the node would make it its own ancestor.
    #[error("Cannot insert node {child} into its own descendant {parent}")]
    HierarchyRequest { parent: NodeId, child: NodeId },

    /// An event listener returned an error.
    #[error("Listener for '{event}' failed: {source}")]
    Listener {
        event: String,
        #[source]
        source: Box<dyn std::error::Error>,
    },
}

/// Result type for DOM operations.
pub type DomResult<T> = Result<T, DomError>;
