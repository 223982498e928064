//! Compiler error types.

use vellum_carton::String;
use vellum_pulse::ReactiveError;
use vellum_relief::DomError;

/// Error type for compiling and binding templates.
#[derive(Debug, thiserror::Error)]
pub enum CompileError {
    /// A directive attribute names no registered directive. `name` is the
    /// full attribute name.
    #[error("Unknown directive '{name}' on <{tag}>")]
    UnknownDirective { name: String, tag: String },

    /// An event directive was written without `:<event>`.
    #[error("Directive '{name}' on <{tag}> requires an event name")]
    MissingEventName { name: String, tag: String },

    /// An event fired for a method the view-model does not define.
    #[error("Method '{name}' is not defined")]
    UnknownMethod { name: String },

    #[error("Invalid interpolation delimiters: {0}")]
    Delimiters(#[from] regex::Error),

    #[error(transparent)]
    Dom(#[from] DomError),

    #[error(transparent)]
    Reactive(#[from] ReactiveError),
}

/// Result type for compilation.
pub type CompileResult<T> = Result<T, CompileError>;
