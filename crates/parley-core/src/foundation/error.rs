//! Unified error types for the Parley core.
//!
//! This module provides the error types shared by every layer that talks to
//! the platform collaborator. Framework-level errors (like `DispatchError`)
//! are defined in parley-framework.

use thiserror::Error;

// =============================================================================
// Platform Errors
// =============================================================================

/// Errors returned by the platform collaborator's operations.
#[derive(Debug, Clone, Error)]
pub enum PlatformError {
    /// The platform connection is not established.
    #[error("platform is not connected")]
    NotConnected,

    /// Sending a text message failed.
    #[error("failed to send message to '{channel}': {reason}")]
    SendFailed {
        /// The channel the message was addressed to.
        channel: String,
        /// Reason for failure.
        reason: String,
    },

    /// Joining a voice channel failed.
    #[error("failed to join voice channel '{channel}': {reason}")]
    VoiceJoinFailed {
        /// The voice channel that could not be joined.
        channel: String,
        /// Reason for failure.
        reason: String,
    },

    /// Playing a stream on a joined voice channel failed.
    #[error("playback error: {0}")]
    Playback(String),

    /// Other error.
    #[error("{0}")]
    Other(String),
}

impl PlatformError {
    /// Creates a send failure for the given channel.
    pub fn send_failed(channel: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::SendFailed {
            channel: channel.into(),
            reason: reason.into(),
        }
    }

    /// Creates a voice join failure for the given channel.
    pub fn voice_join_failed(channel: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::VoiceJoinFailed {
            channel: channel.into(),
            reason: reason.into(),
        }
    }
}

// =============================================================================
// Adapter Errors
// =============================================================================

/// Errors that can occur while starting or running an adapter.
#[derive(Debug, Clone, Error)]
pub enum AdapterError {
    /// Internal adapter error.
    #[error("adapter error: {0}")]
    Internal(String),

    /// The runtime stopped listening for events.
    #[error("event channel closed")]
    ChannelClosed,

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(String),

    /// Platform error.
    #[error(transparent)]
    Platform(#[from] PlatformError),
}

impl AdapterError {
    /// Creates an internal adapter error.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}

impl From<std::io::Error> for AdapterError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for platform operations.
pub type PlatformResult<T> = Result<T, PlatformError>;

/// Result type for adapter operations.
pub type AdapterResult<T> = Result<T, AdapterError>;
