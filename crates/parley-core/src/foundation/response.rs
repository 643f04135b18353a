//! Handler response values.
//!
//! A handler's return value decides how the reply reaches the chat. Instead of
//! inspecting the value at runtime, handlers return a [`Response`] whose
//! variant selects the routing branch:
//!
//! | Variant | Routing |
//! |---|---|
//! | [`Response::None`] | nothing is sent |
//! | [`Response::Text`] | sent to the originating channel right away |
//! | [`Response::Deferred`] | sent once the future resolves; failures become a warning |
//! | [`Response::Stream`] | piped into the author's voice channel |
//!
//! Most handlers never name the variants directly:
//!
//! ```rust
//! use parley_core::Response;
//!
//! let none: Response = ().into();
//! let text: Response = "pong".into();
//! let maybe: Response = Some(String::from("hi")).into();
//! let later = Response::deferred(async { Ok::<_, String>("done") });
//!
//! assert!(none.is_none());
//! assert!(matches!(text, Response::Text(_)));
//! assert!(matches!(maybe, Response::Text(_)));
//! assert!(matches!(later, Response::Deferred(_)));
//! ```

use std::fmt;
use std::future::Future;

use futures::future::BoxFuture;
use futures::stream::BoxStream;
use futures::{FutureExt, Stream, StreamExt};

/// A continuous byte stream, consumed by piping into an audio sink.
pub type AudioStream = BoxStream<'static, Vec<u8>>;

/// A value that eventually resolves to reply text or fails with a reason.
pub type DeferredText = BoxFuture<'static, Result<String, String>>;

/// The value returned by a command handler.
#[derive(Default)]
pub enum Response {
    /// No reply.
    #[default]
    None,
    /// Reply with text immediately.
    Text(String),
    /// Reply once the future resolves.
    Deferred(DeferredText),
    /// Play the stream in the author's voice channel.
    Stream(AudioStream),
}

impl Response {
    /// Wraps a fallible future as a deferred reply.
    ///
    /// The success value becomes the reply text; the error's `Display` output
    /// becomes the failure reason.
    pub fn deferred<F, T, E>(future: F) -> Self
    where
        F: Future<Output = Result<T, E>> + Send + 'static,
        T: Into<String>,
        E: fmt::Display,
    {
        Self::Deferred(
            future
                .map(|result| result.map(Into::into).map_err(|e| e.to_string()))
                .boxed(),
        )
    }

    /// Wraps a byte stream as a voice reply.
    pub fn stream<S>(stream: S) -> Self
    where
        S: Stream<Item = Vec<u8>> + Send + 'static,
    {
        Self::Stream(stream.boxed())
    }

    /// Returns `true` for responses that produce no output at all.
    ///
    /// Empty text counts as nothing to send.
    pub fn is_none(&self) -> bool {
        match self {
            Self::None => true,
            Self::Text(text) => text.is_empty(),
            _ => false,
        }
    }

    /// Short tag used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Text(_) => "text",
            Self::Deferred(_) => "deferred",
            Self::Stream(_) => "stream",
        }
    }
}

impl fmt::Debug for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.debug_tuple("Text").field(text).finish(),
            other => f.write_str(other.kind()),
        }
    }
}

impl From<()> for Response {
    fn from(_: ()) -> Self {
        Self::None
    }
}

impl From<String> for Response {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<&str> for Response {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl<T: Into<Response>> From<Option<T>> for Response {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::None, Into::into)
    }
}
