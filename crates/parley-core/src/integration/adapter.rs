//! Adapter trait and event channel.
//!
//! An adapter owns the platform connection. When started it:
//!
//! 1. Connects and logs in (however the platform requires)
//! 2. Emits [`PlatformEvent`]s into the [`EventSink`] it was given
//! 3. Returns a [`BoxedPlatform`] the framework uses to reply
//!
//! ```rust,ignore
//! #[async_trait]
//! impl Adapter for MyAdapter {
//!     fn name() -> &'static str { "my-platform" }
//!
//!     async fn on_start(&self, events: EventSink) -> AdapterResult<BoxedPlatform> {
//!         let client = self.connect().await?;
//!         tokio::spawn(pump_events(client.clone(), events));
//!         Ok(client)
//!     }
//! }
//! ```

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::foundation::error::{AdapterError, AdapterResult};
use crate::foundation::event::PlatformEvent;
use crate::integration::platform::BoxedPlatform;

// =============================================================================
// Event Channel
// =============================================================================

/// Adapter side of the event channel.
#[derive(Debug, Clone)]
pub struct EventSink {
    tx: mpsc::Sender<PlatformEvent>,
}

impl EventSink {
    /// Delivers an event to the runtime, waiting for buffer space.
    pub async fn emit(&self, event: impl Into<PlatformEvent>) -> AdapterResult<()> {
        self.tx
            .send(event.into())
            .await
            .map_err(|_| AdapterError::ChannelClosed)
    }

    /// Returns `true` once the runtime has stopped receiving.
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// Runtime side of the event channel.
pub type EventStream = mpsc::Receiver<PlatformEvent>;

/// Creates a bounded event channel between an adapter and the runtime.
pub fn create_event_channel(buffer_size: usize) -> (EventSink, EventStream) {
    let (tx, rx) = mpsc::channel(buffer_size);
    (EventSink { tx }, rx)
}

// =============================================================================
// Adapter
// =============================================================================

/// The core adapter trait.
///
/// Adapters bridge a concrete chat platform with the Parley framework.
#[async_trait]
pub trait Adapter: Send + Sync {
    /// Returns the adapter name (e.g., "console").
    ///
    /// This name locates the adapter's configuration section:
    ///
    /// ```toml
    /// [adapters.console]  # <- returned by Adapter::name()
    /// bot_name = "parley"
    /// ```
    fn name() -> &'static str
    where
        Self: Sized;

    /// Called when the adapter should connect and start emitting events.
    async fn on_start(&self, events: EventSink) -> AdapterResult<BoxedPlatform>;

    /// Called when the runtime is shutting down.
    async fn on_shutdown(&self) -> AdapterResult<()> {
        Ok(())
    }
}

/// A boxed adapter trait object.
pub type BoxedAdapter = Arc<dyn Adapter>;

/// Trait for adapters that can be created from configuration.
///
/// This is a separate trait to keep [`Adapter`] usable as a trait object.
pub trait ConfigurableAdapter: Adapter {
    /// The configuration type for this adapter.
    type Config: serde::de::DeserializeOwned + Default;

    /// Creates an adapter from its configuration.
    fn from_config(config: Self::Config) -> AdapterResult<Arc<Self>>
    where
        Self: Sized;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::event::{BotIdentity, ReadyEvent};

    #[tokio::test]
    async fn test_event_channel_roundtrip() {
        let (sink, mut stream) = create_event_channel(4);
        sink.emit(ReadyEvent::new(BotIdentity::new("bot", "1")))
            .await
            .unwrap();

        let event = stream.recv().await.unwrap();
        assert_eq!(event.event_name(), "ready");
    }

    #[tokio::test]
    async fn test_emit_after_close_fails() {
        let (sink, stream) = create_event_channel(1);
        drop(stream);

        assert!(sink.is_closed());
        let result = sink
            .emit(ReadyEvent::new(BotIdentity::new("bot", "1")))
            .await;
        assert!(matches!(result, Err(AdapterError::ChannelClosed)));
    }
}
