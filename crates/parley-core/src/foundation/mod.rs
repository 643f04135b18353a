//! Foundation layer - Core abstractions and type system.
//!
//! This module contains the fundamental building blocks of the Parley framework:
//! - Event types delivered by the platform collaborator
//! - The [`Response`] value returned by command handlers
//! - Error types shared by every layer

pub mod error;
pub mod event;
pub mod response;

pub use error::{AdapterError, AdapterResult, PlatformError, PlatformResult};
pub use event::{
    BotIdentity, ChannelId, IncomingMessage, PlatformEvent, ReadyEvent, UserId, VoiceChannel,
};
pub use response::{AudioStream, DeferredText, Response};
