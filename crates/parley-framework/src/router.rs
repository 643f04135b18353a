//! Response routing.
//!
//! Takes the [`Response`] produced by a handler and delivers it to the
//! channel the triggering message came from. Exactly one branch runs:
//!
//! 1. [`Response::None`] or empty text: nothing is sent.
//! 2. [`Response::Deferred`]: a task awaits the future and sends either the
//!    resolved text or `:warning: {reason}`. [`route`] returns before the
//!    future resolves.
//! 3. [`Response::Stream`]: if the author is not in a voice channel a notice
//!    is sent instead. Otherwise a task joins the channel, plays the stream
//!    at default options and leaves. Join and playback failures are only
//!    logged.
//! 4. [`Response::Text`]: sent right away.
//!
//! A deferred future that panics counts as a failure and is reported with the
//! panic message. A panicking stream stops playback and is logged.
//!
//! Spawned continuations are never cancelled; they may finish in any order
//! relative to later messages.

use std::panic::AssertUnwindSafe;

use futures::FutureExt;
use parley_core::{
    AudioStream, BoxedPlatform, ChannelId, DeferredText, IncomingMessage, PlayOptions, Response,
    VoiceChannel,
};
use tokio::task::JoinHandle;
use tracing::{debug, error, warn};

use crate::handler::panic_message;

/// Marker prepended to the reason of a failed deferred reply.
pub const WARNING_MARKER: &str = ":warning:";

/// Sent when a stream is returned for an author outside any voice channel.
pub const NOT_IN_VOICE_NOTICE: &str = "You are not in a voice channel.";

/// Formats the reply sent for a rejected deferred value.
pub fn warning(reason: &str) -> String {
    format!("{WARNING_MARKER} {reason}")
}

/// What the router did with a response.
#[derive(Debug)]
pub enum RouteOutcome {
    /// The response was empty.
    Nothing,
    /// Text was sent.
    Sent,
    /// Sending text failed; the error was logged.
    Failed,
    /// A task is waiting for the deferred value.
    Deferred(JoinHandle<()>),
    /// The author had no voice channel; the notice was sent.
    NotInVoice,
    /// A task is joining the voice channel and playing the stream.
    Streaming(JoinHandle<()>),
}

impl RouteOutcome {
    /// Short tag used in logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Nothing => "nothing",
            Self::Sent => "sent",
            Self::Failed => "failed",
            Self::Deferred(_) => "deferred",
            Self::NotInVoice => "not_in_voice",
            Self::Streaming(_) => "streaming",
        }
    }

    /// Waits for a spawned continuation, if any.
    ///
    /// Production code never needs this; it exists so callers (mostly tests)
    /// can observe the eventual sends.
    pub async fn settle(self) {
        if let Self::Deferred(handle) | Self::Streaming(handle) = self
            && let Err(e) = handle.await
        {
            error!(error = %e, "Response task did not complete");
        }
    }
}

/// Routes `response` back to the channel of `message`.
pub async fn route(
    response: Response,
    message: &IncomingMessage,
    platform: &BoxedPlatform,
) -> RouteOutcome {
    debug!(kind = response.kind(), "Routing response");

    match response {
        response if response.is_none() => RouteOutcome::Nothing,
        Response::Deferred(future) => {
            RouteOutcome::Deferred(spawn_deferred(future, message.channel.clone(), platform))
        }
        Response::Stream(stream) => match &message.voice {
            Some(voice) => {
                RouteOutcome::Streaming(spawn_stream(stream, voice.clone(), platform.clone()))
            }
            None => {
                if send(platform, &message.channel, NOT_IN_VOICE_NOTICE).await {
                    RouteOutcome::NotInVoice
                } else {
                    RouteOutcome::Failed
                }
            }
        },
        Response::Text(text) => {
            if send(platform, &message.channel, &text).await {
                RouteOutcome::Sent
            } else {
                RouteOutcome::Failed
            }
        }
        Response::None => RouteOutcome::Nothing,
    }
}

async fn send(platform: &BoxedPlatform, channel: &ChannelId, text: &str) -> bool {
    match platform.send(channel, text).await {
        Ok(()) => true,
        Err(e) => {
            error!(channel = %channel, error = %e, "Failed to send reply");
            false
        }
    }
}

fn spawn_deferred(
    future: DeferredText,
    channel: ChannelId,
    platform: &BoxedPlatform,
) -> JoinHandle<()> {
    let platform = platform.clone();
    tokio::spawn(async move {
        let result = AssertUnwindSafe(future)
            .catch_unwind()
            .await
            .unwrap_or_else(|payload| {
                let reason = panic_message(payload.as_ref());
                error!(channel = %channel, reason = %reason, "Deferred reply panicked");
                Err(reason)
            });
        let text = match result {
            Ok(text) => text,
            Err(reason) => {
                debug!(channel = %channel, reason = %reason, "Deferred reply failed");
                warning(&reason)
            }
        };
        send(&platform, &channel, &text).await;
    })
}

fn spawn_stream(
    stream: AudioStream,
    voice: VoiceChannel,
    platform: BoxedPlatform,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let sink = match platform.join_voice(&voice).await {
            Ok(sink) => sink,
            Err(e) => {
                warn!(voice = %voice.id, error = %e, "Failed to join voice channel");
                return;
            }
        };

        debug!(voice = %voice.id, "Joined voice channel, starting playback");
        let played = AssertUnwindSafe(sink.play_stream(stream, PlayOptions::default()))
            .catch_unwind()
            .await;
        match played {
            Ok(Ok(())) => {}
            Ok(Err(e)) => error!(voice = %voice.id, error = %e, "Playback failed"),
            Err(payload) => error!(
                voice = %voice.id,
                reason = %panic_message(payload.as_ref()),
                "Audio stream panicked"
            ),
        }
        if let Err(e) = sink.close().await {
            warn!(voice = %voice.id, error = %e, "Failed to leave voice channel");
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::MockPlatform;
    use futures::{StreamExt, stream};
    use std::time::Duration;
    use tokio::sync::oneshot;

    fn message() -> IncomingMessage {
        IncomingMessage::new("user", "general", ".cmd")
    }

    fn in_voice() -> IncomingMessage {
        message().with_voice(VoiceChannel::new("lounge"))
    }

    #[tokio::test]
    async fn test_none_sends_nothing() {
        let mock = MockPlatform::new();
        for response in [Response::None, Response::from("")] {
            let outcome = route(response, &message(), &mock.boxed()).await;
            assert!(matches!(outcome, RouteOutcome::Nothing));
        }
        assert!(mock.sent().is_empty());
    }

    #[tokio::test]
    async fn test_text_is_sent_once() {
        let mock = MockPlatform::new();
        let outcome = route("pong".into(), &message(), &mock.boxed()).await;

        assert!(matches!(outcome, RouteOutcome::Sent));
        assert_eq!(
            mock.sent(),
            vec![("general".to_string(), "pong".to_string())]
        );
    }

    #[tokio::test]
    async fn test_send_failure_is_reported() {
        let mock = MockPlatform::failing_send();
        let outcome = route("pong".into(), &message(), &mock.boxed()).await;
        assert!(matches!(outcome, RouteOutcome::Failed));
    }

    #[tokio::test]
    async fn test_deferred_sends_after_resolution() {
        let mock = MockPlatform::new();
        let (tx, rx) = oneshot::channel::<String>();
        let response = Response::deferred(async move { rx.await.map_err(|e| e.to_string()) });

        let outcome = route(response, &message(), &mock.boxed()).await;
        assert!(matches!(outcome, RouteOutcome::Deferred(_)));

        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(mock.sent().is_empty());

        tx.send("done".to_string()).unwrap();
        outcome.settle().await;
        assert_eq!(mock.sent_texts(), vec!["done"]);
    }

    #[tokio::test]
    async fn test_deferred_failure_sends_warning() {
        let mock = MockPlatform::new();
        let response = Response::deferred(async { Err::<String, _>("dice fell off the table") });

        route(response, &message(), &mock.boxed()).await.settle().await;
        assert_eq!(
            mock.sent_texts(),
            vec![":warning: dice fell off the table"]
        );
    }

    #[tokio::test]
    async fn test_panicking_deferred_sends_warning() {
        let mock = MockPlatform::new();
        let response = Response::deferred(async {
            let cached: Option<String> = None;
            match cached {
                Some(text) => Ok::<_, String>(text),
                None => panic!("lookup exploded"),
            }
        });

        route(response, &message(), &mock.boxed()).await.settle().await;
        assert_eq!(mock.sent_texts(), vec![":warning: lookup exploded"]);
    }

    #[tokio::test]
    async fn test_panicking_stream_still_leaves_voice() {
        let mock = MockPlatform::new();
        let chunks = stream::iter(0..3u8).map(|n| {
            if n == 1 {
                panic!("decoder crashed");
            }
            vec![n]
        });

        route(Response::stream(chunks), &in_voice(), &mock.boxed())
            .await
            .settle()
            .await;
        assert_eq!(mock.joined(), vec!["lounge"]);
        assert_eq!(mock.closed(), 1);
        assert!(mock.sent().is_empty());
    }

    #[tokio::test]
    async fn test_stream_without_voice_sends_notice() {
        let mock = MockPlatform::new();
        let response = Response::stream(stream::iter(vec![vec![1u8]]));

        let outcome = route(response, &message(), &mock.boxed()).await;
        assert!(matches!(outcome, RouteOutcome::NotInVoice));
        assert_eq!(mock.sent_texts(), vec![NOT_IN_VOICE_NOTICE]);
        assert!(mock.joined().is_empty());
    }

    #[tokio::test]
    async fn test_stream_plays_in_voice_channel() {
        let mock = MockPlatform::new();
        let response = Response::stream(stream::iter(vec![vec![1u8, 2], vec![3]]));

        let outcome = route(response, &in_voice(), &mock.boxed()).await;
        assert!(matches!(outcome, RouteOutcome::Streaming(_)));
        outcome.settle().await;

        assert_eq!(mock.joined(), vec!["lounge"]);
        let played = mock.played();
        assert_eq!(played.len(), 1);
        assert_eq!(played[0].0, PlayOptions::default());
        assert_eq!(played[0].1, vec![1, 2, 3]);
        assert_eq!(mock.closed(), 1);
        assert!(mock.sent().is_empty());
    }

    #[tokio::test]
    async fn test_join_failure_is_not_sent() {
        let mock = MockPlatform::failing_join();
        let response = Response::stream(stream::iter(vec![vec![1u8]]));

        route(response, &in_voice(), &mock.boxed())
            .await
            .settle()
            .await;
        assert!(mock.sent().is_empty());
        assert!(mock.played().is_empty());
    }

    #[test]
    fn test_warning_format() {
        assert_eq!(warning("nope"), ":warning: nope");
    }
}
