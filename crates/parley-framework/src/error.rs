//! Error types for the Parley framework.

use thiserror::Error;

/// Errors that can occur while invoking a command handler.
///
/// Unknown commands are not errors: they simply produce no dispatch.
#[derive(Debug, Clone, Error)]
pub enum DispatchError {
    /// The handler panicked. The event loop keeps running.
    #[error("handler for '{command}' panicked: {message}")]
    HandlerPanicked {
        /// The command whose handler panicked.
        command: String,
        /// The panic payload, if it was a string.
        message: String,
    },
}

/// Result type for dispatch operations.
pub type DispatchResult<T> = Result<T, DispatchError>;
