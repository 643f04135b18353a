//! Platform trait and related types.
//!
//! This module defines the [`Platform`] trait, the send-side surface of the
//! chat-platform collaborator, and the [`AudioSink`] handed out when joining a
//! voice channel.

use std::sync::Arc;

use async_trait::async_trait;

use crate::foundation::error::PlatformResult;
use crate::foundation::event::{ChannelId, VoiceChannel};
use crate::foundation::response::AudioStream;

/// Playback options passed to [`AudioSink::play_stream`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayOptions {
    /// Start offset in seconds.
    pub seek: u64,
    /// Linear volume, `1.0` being unchanged.
    pub volume: f32,
}

impl Default for PlayOptions {
    fn default() -> Self {
        Self {
            seek: 0,
            volume: 1.0,
        }
    }
}

/// The core Platform trait.
///
/// A Platform is the live connection to the chat service. The framework only
/// ever uses it to:
/// - Send text to a channel
/// - Join a voice channel to play a stream
///
/// Everything else (login, reconnects, sockets) stays inside the adapter
/// that produced it.
#[async_trait]
pub trait Platform: Send + Sync + 'static {
    /// Returns the platform name (e.g., "console", "discord").
    fn name(&self) -> &str;

    /// Sends a text message to a channel.
    ///
    /// # Arguments
    ///
    /// * `channel` - The channel to post in
    /// * `text` - The message content
    async fn send(&self, channel: &ChannelId, text: &str) -> PlatformResult<()>;

    /// Joins a voice channel and returns its playback sink.
    ///
    /// The default implementation reports that voice is unsupported.
    async fn join_voice(&self, channel: &VoiceChannel) -> PlatformResult<BoxedAudioSink> {
        Err(crate::PlatformError::voice_join_failed(
            channel.id.as_str(),
            format!("voice is not supported by '{}'", self.name()),
        ))
    }
}

/// A boxed Platform trait object.
pub type BoxedPlatform = Arc<dyn Platform>;

/// Playback sink of a joined voice channel.
#[async_trait]
pub trait AudioSink: Send + Sync {
    /// Plays the stream until it ends.
    async fn play_stream(&self, stream: AudioStream, options: PlayOptions) -> PlatformResult<()>;

    /// Leaves the voice channel.
    async fn close(&self) -> PlatformResult<()>;
}

/// A boxed AudioSink trait object.
pub type BoxedAudioSink = Box<dyn AudioSink>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PlatformError;

    struct TextOnly;

    #[async_trait]
    impl Platform for TextOnly {
        fn name(&self) -> &str {
            "text-only"
        }

        async fn send(&self, _channel: &ChannelId, _text: &str) -> PlatformResult<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_default_join_voice_fails() {
        let platform: BoxedPlatform = Arc::new(TextOnly);
        let result = platform.join_voice(&VoiceChannel::new("v")).await;
        assert!(matches!(result, Err(PlatformError::VoiceJoinFailed { .. })));
    }

    #[test]
    fn test_default_play_options() {
        let opts = PlayOptions::default();
        assert_eq!(opts.seek, 0);
        assert_eq!(opts.volume, 1.0);
    }
}
