//! Integration layer - External system interfaces.
//!
//! This module contains the contract with the chat-platform collaborator:
//! - Adapter system for starting a platform connection
//! - Platform and audio sink traits used to reply

pub mod adapter;
pub mod platform;

pub use adapter::{
    Adapter, BoxedAdapter, ConfigurableAdapter, EventSink, EventStream, create_event_channel,
};
pub use platform::{AudioSink, BoxedAudioSink, BoxedPlatform, Platform, PlayOptions};
