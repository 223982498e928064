//! Reactivity error types.

use vellum_carton::String;

/// Error type for reactive reads and writes.
#[derive(Debug, thiserror::Error)]
pub enum ReactiveError {
    /// A path walked into something that cannot hold properties.
    #[error("Cannot set '{segment}' on a non-object while resolving '{path}'")]
    NotAnObject { path: String, segment: String },

    /// A write targeted a computed (getter-only) property.
    #[error("Cannot assign to computed property '{key}'")]
    ReadOnly { key: String },

    /// A watcher callback failed during notification.
    #[error("Watcher callback for '{expression}' failed: {source}")]
    Callback {
        expression: String,
        #[source]
        source: Box<dyn std::error::Error>,
    },
}

/// Result type for reactive operations.
pub type ReactiveResult<T> = Result<T, ReactiveError>;
