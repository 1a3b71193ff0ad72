//! Core error types

use thiserror::Error;

use crate::core::backend::ViewId;

/// Errors surfaced by the window lifecycle coordinator.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WindowError {
    #[error("no rendering engine is bound")]
    EngineNotBound,

    #[error("a popup cannot be the first window")]
    CannotBeFirstWindow,

    #[error("native surface creation failed")]
    SurfaceCreationFailed,

    #[error("unknown parent window: {0}")]
    UnknownParentWindow(ViewId),
}

/// Result type for core operations
pub type Result<T> = std::result::Result<T, WindowError>;
