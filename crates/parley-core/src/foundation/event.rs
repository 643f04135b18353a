//! Event system for the Parley framework.
//!
//! The platform collaborator delivers exactly two kinds of events:
//!
//! - [`ReadyEvent`] - the connection is established and the bot knows who it is
//! - [`IncomingMessage`] - someone posted text in a channel the bot can see
//!
//! Both travel through the runtime wrapped in [`PlatformEvent`].
//!
//! # Example
//!
//! ```rust
//! use parley_core::{ChannelId, IncomingMessage, PlatformEvent, UserId, VoiceChannel};
//!
//! let msg = IncomingMessage::new(UserId::new("42"), ChannelId::new("general"), ".ping")
//!     .with_author_name("alice")
//!     .with_voice(VoiceChannel::new("lounge"));
//!
//! let event = PlatformEvent::Message(msg);
//! assert_eq!(event.event_name(), "message");
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

// ============================================================================
// Identifiers
// ============================================================================

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Creates a new identifier from any string-like value.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Returns the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }
    };
}

string_id! {
    /// Platform-assigned identity of a user (including the bot itself).
    UserId
}

string_id! {
    /// Platform-assigned identity of a text or voice channel.
    ChannelId
}

// ============================================================================
// Bot Identity
// ============================================================================

/// The bot's own identity as reported by the platform on connection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BotIdentity {
    /// Displayable name, used for name-mention triggers.
    pub name: String,
    /// Platform-assigned id, used for id-mention triggers and self-filtering.
    pub id: UserId,
}

impl BotIdentity {
    /// Creates a new identity.
    pub fn new(name: impl Into<String>, id: impl Into<UserId>) -> Self {
        Self {
            name: name.into(),
            id: id.into(),
        }
    }

    /// The `@name` mention form.
    pub fn name_mention(&self) -> String {
        format!("@{}", self.name)
    }

    /// The canonical `<@id>` mention form and its `<@!id>` nickname variant.
    pub fn id_mentions(&self) -> [String; 2] {
        [format!("<@{}>", self.id), format!("<@!{}>", self.id)]
    }
}

// ============================================================================
// Voice Membership
// ============================================================================

/// A voice channel the message author is currently connected to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoiceChannel {
    /// The voice channel id.
    pub id: ChannelId,
    /// Human-readable channel name, if the platform reports one.
    #[serde(default)]
    pub name: Option<String>,
}

impl VoiceChannel {
    /// Creates a voice channel handle with no display name.
    pub fn new(id: impl Into<ChannelId>) -> Self {
        Self {
            id: id.into(),
            name: None,
        }
    }

    /// Sets the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

// ============================================================================
// Events
// ============================================================================

/// Emitted once the platform connection is ready.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadyEvent {
    /// Who the bot is on this platform.
    pub identity: BotIdentity,
}

impl ReadyEvent {
    /// Creates a ready event for the given identity.
    pub fn new(identity: BotIdentity) -> Self {
        Self { identity }
    }
}

/// A chat message received from the platform.
///
/// Transient: it lives for the duration of one dispatch and is never stored.
#[derive(Debug, Clone, PartialEq)]
pub struct IncomingMessage {
    /// Platform message id (may be empty if the platform has none).
    pub id: String,
    /// Author identity.
    pub author: UserId,
    /// Author display name.
    pub author_name: String,
    /// Channel the message was posted in; replies go here.
    pub channel: ChannelId,
    /// Raw message text.
    pub text: String,
    /// The author's current voice channel, if any.
    pub voice: Option<VoiceChannel>,
    /// Opaque platform payload, passed through to handlers untouched.
    pub raw: Value,
}

impl IncomingMessage {
    /// Creates a message with no voice membership and an empty payload.
    pub fn new(
        author: impl Into<UserId>,
        channel: impl Into<ChannelId>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            id: String::new(),
            author: author.into(),
            author_name: String::new(),
            channel: channel.into(),
            text: text.into(),
            voice: None,
            raw: Value::Null,
        }
    }

    /// Sets the platform message id.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Sets the author display name.
    pub fn with_author_name(mut self, name: impl Into<String>) -> Self {
        self.author_name = name.into();
        self
    }

    /// Marks the author as connected to the given voice channel.
    pub fn with_voice(mut self, voice: VoiceChannel) -> Self {
        self.voice = Some(voice);
        self
    }

    /// Attaches the opaque platform payload.
    pub fn with_raw(mut self, raw: Value) -> Self {
        self.raw = raw;
        self
    }
}

/// Everything the platform collaborator can deliver to the runtime.
#[derive(Debug, Clone, PartialEq)]
pub enum PlatformEvent {
    /// The connection is ready.
    Ready(ReadyEvent),
    /// A message was received.
    Message(IncomingMessage),
}

impl PlatformEvent {
    /// Returns the human-readable name of this event type.
    pub fn event_name(&self) -> &'static str {
        match self {
            Self::Ready(_) => "ready",
            Self::Message(_) => "message",
        }
    }
}

impl From<ReadyEvent> for PlatformEvent {
    fn from(event: ReadyEvent) -> Self {
        Self::Ready(event)
    }
}

impl From<IncomingMessage> for PlatformEvent {
    fn from(msg: IncomingMessage) -> Self {
        Self::Message(msg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_mentions() {
        let identity = BotIdentity::new("parley", "1234");
        assert_eq!(identity.name_mention(), "@parley");
        assert_eq!(identity.id_mentions(), ["<@1234>".to_string(), "<@!1234>".to_string()]);
    }

    #[test]
    fn test_message_builder() {
        let msg = IncomingMessage::new("7", "general", "hello")
            .with_id("m1")
            .with_author_name("bob")
            .with_voice(VoiceChannel::new("v1").with_name("Lounge"));

        assert_eq!(msg.author.as_str(), "7");
        assert_eq!(msg.channel.to_string(), "general");
        assert_eq!(msg.author_name, "bob");
        assert_eq!(msg.voice.as_ref().and_then(|v| v.name.as_deref()), Some("Lounge"));
        assert_eq!(msg.raw, Value::Null);
    }

    #[test]
    fn test_ids_serialize_transparently() {
        let id = UserId::new("99");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"99\"");
        let back: ChannelId = serde_json::from_str("\"c\"").unwrap();
        assert_eq!(back, ChannelId::new("c"));
    }
}
