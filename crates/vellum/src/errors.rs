//! View-model error types.

use vellum_atelier::CompileError;
use vellum_carton::String;
use vellum_pulse::ReactiveError;
use vellum_relief::DomError;

/// Error type for mounting and driving a view-model.
#[derive(Debug, thiserror::Error)]
pub enum VellumError {
    /// The `el` selector matched nothing.
    #[error("Mount target '{selector}' not found")]
    MountNotFound { selector: String },

    #[error(transparent)]
    Compile(#[from] CompileError),

    #[error(transparent)]
    Reactive(#[from] ReactiveError),

    #[error(transparent)]
    Dom(#[from] DomError),
}

/// Result type for view-model operations.
pub type VellumResult<T> = Result<T, VellumError>;
