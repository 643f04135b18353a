//! # Parley Core
//!
//! The core types of the Parley command framework.
//!
//! This crate provides the vocabulary shared between the chat platform and
//! the command engine: events, handler responses, and the traits a platform
//! adapter implements.
//!
//! ## Architecture Layers
//!
//! ### Foundation Layer
//!
//! Core abstractions and type system:
//! - **Events**: [`PlatformEvent`], [`ReadyEvent`], [`IncomingMessage`]
//! - **Identity**: [`UserId`], [`ChannelId`], [`BotIdentity`], [`VoiceChannel`]
//! - **Responses**: the [`Response`] union returned by handlers
//!
//! ### Integration Layer
//!
//! External system interfaces:
//! - **Adapter System**: platform connections ([`Adapter`], [`EventSink`])
//! - **Platform**: the reply surface ([`Platform`], [`AudioSink`])
//!
//! ## Data Flow
//!
//! ```text
//! ┌─────────────┐ PlatformEvent ┌─────────┐     ┌─────────┐
//! │   Adapter   │──────────────▶│ Runtime │────▶│   Bot   │
//! └─────────────┘               └─────────┘     └────┬────┘
//!        ▲                                           │ Response
//!        │            send / join_voice              │
//!        └───────────────────────────────────────────┘
//! ```

// Architectural layers
pub mod foundation;
pub mod integration;

// Re-export foundation types
pub use foundation::{
    AdapterError, AdapterResult, AudioStream, BotIdentity, ChannelId, DeferredText,
    IncomingMessage, PlatformError, PlatformEvent, PlatformResult, ReadyEvent, Response, UserId,
    VoiceChannel,
};

// Re-export integration types
pub use integration::{
    Adapter, AudioSink, BoxedAdapter, BoxedAudioSink, BoxedPlatform, ConfigurableAdapter,
    EventSink, EventStream, Platform, PlayOptions, create_event_channel,
};

/// Prelude for common imports.
pub mod prelude {
    pub use super::foundation::*;
    pub use super::integration::{AudioSink, Platform, PlayOptions};
}
