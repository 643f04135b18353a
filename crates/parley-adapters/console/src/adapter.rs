//! Console adapter for the Parley framework.
//!
//! Every line read from the input becomes one [`IncomingMessage`] authored by
//! the configured user. A line holding a JSON object overrides the defaults
//! for that message only:
//!
//! ```text
//! .ping
//! {"text": ".tone", "voice": "lounge"}
//! {"text": "hi", "author": "1"}          <- authored by the bot itself, ignored
//! {"text": ".tone", "voice": ""}         <- empty voice: not connected
//! ```
//!
//! The event stream closes at end of input, which stops the runtime.
//!
//! ```rust,ignore
//! use parley_adapter_console::ConsoleAdapter;
//! use parley_runtime::ParleyRuntime;
//!
//! let mut runtime = ParleyRuntime::new();
//! runtime.register_adapter::<ConsoleAdapter>()?;
//! runtime.run(Arc::new(bot)).await?;
//! ```

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use parley_core::{
    Adapter, AdapterError, AdapterResult, BotIdentity, BoxedPlatform, ConfigurableAdapter,
    EventSink, IncomingMessage, ReadyEvent, VoiceChannel,
};
use serde::Deserialize;
use serde_json::Value;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, BufReader};
use tokio::task::JoinHandle;
use tracing::{debug, info, trace, warn};
use uuid::Uuid;

use crate::config::ConsoleConfig;
use crate::platform::ConsolePlatform;

/// Boxed line source.
pub type BoxedInput = Box<dyn AsyncBufRead + Send + Unpin>;

/// Boxed reply destination.
pub type BoxedOutput = Box<dyn AsyncWrite + Send + Unpin>;

/// The console adapter.
///
/// Reads stdin and writes stdout unless other streams are supplied with
/// [`ConsoleAdapter::with_io`].
pub struct ConsoleAdapter {
    config: ConsoleConfig,
    io: Mutex<Option<(BoxedInput, BoxedOutput)>>,
    reader: Mutex<Option<JoinHandle<()>>>,
}

impl ConsoleAdapter {
    /// Creates an adapter on stdin and stdout.
    pub fn new(config: ConsoleConfig) -> Self {
        Self {
            config,
            io: Mutex::new(None),
            reader: Mutex::new(None),
        }
    }

    /// Creates an adapter on the given streams.
    pub fn with_io<R, W>(config: ConsoleConfig, input: R, output: W) -> Self
    where
        R: AsyncBufRead + Send + Unpin + 'static,
        W: AsyncWrite + Send + Unpin + 'static,
    {
        Self {
            config,
            io: Mutex::new(Some((Box::new(input), Box::new(output)))),
            reader: Mutex::new(None),
        }
    }

    /// Returns the adapter configuration.
    pub fn config(&self) -> &ConsoleConfig {
        &self.config
    }
}

impl Default for ConsoleAdapter {
    fn default() -> Self {
        Self::new(ConsoleConfig::default())
    }
}

#[async_trait]
impl Adapter for ConsoleAdapter {
    fn name() -> &'static str {
        "console"
    }

    async fn on_start(&self, events: EventSink) -> AdapterResult<BoxedPlatform> {
        let mut reader = self.reader.lock();
        if reader.is_some() {
            return Err(AdapterError::internal("console adapter already started"));
        }

        let (input, output) = self.io.lock().take().unwrap_or_else(|| {
            let input: BoxedInput = Box::new(BufReader::new(tokio::io::stdin()));
            let output: BoxedOutput = Box::new(tokio::io::stdout());
            (input, output)
        });

        let config = self.config.clone();
        *reader = Some(tokio::spawn(async move {
            match pump(&config, input, events).await {
                Ok(()) => info!("Console input closed"),
                Err(AdapterError::ChannelClosed) => debug!("Runtime stopped listening"),
                Err(e) => warn!(error = %e, "Console reader failed"),
            }
        }));

        info!(
            bot = %self.config.bot_name,
            user = %self.config.user_name,
            channel = %self.config.channel,
            "Console adapter started"
        );
        Ok(Arc::new(ConsolePlatform::new(
            self.config.bot_name.clone(),
            output,
        )))
    }

    async fn on_shutdown(&self) -> AdapterResult<()> {
        if let Some(handle) = self.reader.lock().take() {
            handle.abort();
        }
        Ok(())
    }
}

impl ConfigurableAdapter for ConsoleAdapter {
    type Config = ConsoleConfig;

    fn from_config(config: Self::Config) -> AdapterResult<Arc<Self>> {
        config.validate().map_err(AdapterError::internal)?;
        Ok(Arc::new(Self::new(config)))
    }
}

/// Announces the bot, then forwards input lines until end of input.
async fn pump(config: &ConsoleConfig, input: BoxedInput, events: EventSink) -> AdapterResult<()> {
    let identity = BotIdentity::new(config.bot_name.as_str(), config.bot_id.as_str());
    events.emit(ReadyEvent::new(identity)).await?;

    let mut lines = input.lines();
    while let Some(line) = lines.next_line().await? {
        match parse_line(config, &line) {
            Some(msg) => events.emit(msg).await?,
            None => trace!("Skipped blank line"),
        }
    }
    Ok(())
}

/// Per-line overrides accepted as a JSON object.
#[derive(Debug, Deserialize)]
struct LineFields {
    text: String,
    author: Option<String>,
    author_name: Option<String>,
    channel: Option<String>,
    voice: Option<String>,
}

/// Turns one input line into a message, or `None` for blank lines.
pub fn parse_line(config: &ConsoleConfig, line: &str) -> Option<IncomingMessage> {
    let line = line.trim_end_matches('\r');
    if line.trim().is_empty() {
        return None;
    }

    let (fields, raw) = match parse_fields(line) {
        Some(parsed) => parsed,
        None => (
            LineFields {
                text: line.to_string(),
                author: None,
                author_name: None,
                channel: None,
                voice: None,
            },
            Value::Null,
        ),
    };

    let voice = fields
        .voice
        .or_else(|| config.voice_channel.clone())
        .filter(|v| !v.is_empty())
        .map(VoiceChannel::new);

    let msg = IncomingMessage::new(
        fields.author.unwrap_or_else(|| config.user_id.clone()),
        fields.channel.unwrap_or_else(|| config.channel.clone()),
        fields.text,
    )
    .with_id(Uuid::new_v4().to_string())
    .with_author_name(
        fields
            .author_name
            .unwrap_or_else(|| config.user_name.clone()),
    )
    .with_raw(raw);

    Some(match voice {
        Some(voice) => msg.with_voice(voice),
        None => msg,
    })
}

fn parse_fields(line: &str) -> Option<(LineFields, Value)> {
    if !line.trim_start().starts_with('{') {
        return None;
    }
    let value: Value = serde_json::from_str(line).ok()?;
    match serde_json::from_value::<LineFields>(value.clone()) {
        Ok(fields) => Some((fields, value)),
        Err(e) => {
            warn!(error = %e, "JSON line without usable fields, sending it as text");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parley_core::{ChannelId, Platform, PlatformEvent, create_event_channel};
    use tokio::io::duplex;

    fn config_in_voice() -> ConsoleConfig {
        ConsoleConfig {
            voice_channel: Some("lounge".into()),
            ..Default::default()
        }
    }

    #[test]
    fn test_plain_line_uses_defaults() {
        let msg = parse_line(&ConsoleConfig::default(), ".ping a b\r").unwrap();
        assert_eq!(msg.text, ".ping a b");
        assert_eq!(msg.author.as_str(), "100");
        assert_eq!(msg.author_name, "you");
        assert_eq!(msg.channel.as_str(), "console");
        assert!(msg.voice.is_none());
        assert!(Uuid::parse_str(&msg.id).is_ok());
        assert_eq!(msg.raw, Value::Null);
    }

    #[test]
    fn test_blank_lines_skipped() {
        assert!(parse_line(&ConsoleConfig::default(), "").is_none());
        assert!(parse_line(&ConsoleConfig::default(), "   ").is_none());
    }

    #[test]
    fn test_json_line_overrides() {
        let line = r#"{"text": "hi", "author": "1", "channel": "ops", "voice": "stage"}"#;
        let msg = parse_line(&ConsoleConfig::default(), line).unwrap();
        assert_eq!(msg.text, "hi");
        assert_eq!(msg.author.as_str(), "1");
        assert_eq!(msg.channel.as_str(), "ops");
        assert_eq!(msg.voice, Some(VoiceChannel::new("stage")));
        assert_eq!(msg.raw["channel"], "ops");
    }

    #[test]
    fn test_empty_voice_leaves_channel() {
        let msg = parse_line(&config_in_voice(), r#"{"text": ".tone", "voice": ""}"#).unwrap();
        assert!(msg.voice.is_none());

        let msg = parse_line(&config_in_voice(), ".tone").unwrap();
        assert_eq!(msg.voice, Some(VoiceChannel::new("lounge")));
    }

    #[test]
    fn test_malformed_json_is_text() {
        let msg = parse_line(&ConsoleConfig::default(), "{not json").unwrap();
        assert_eq!(msg.text, "{not json");

        let msg = parse_line(&ConsoleConfig::default(), r#"{"body": "x"}"#).unwrap();
        assert_eq!(msg.text, r#"{"body": "x"}"#);
        assert_eq!(msg.raw, Value::Null);
    }

    #[tokio::test]
    async fn test_start_emits_ready_then_lines() {
        let input: &'static [u8] = b".ping\n\n@parley hello\n";
        let adapter = ConsoleAdapter::with_io(ConsoleConfig::default(), input, tokio::io::sink());
        let (sink, mut events) = create_event_channel(8);

        let platform = adapter.on_start(sink).await.unwrap();
        assert_eq!(platform.name(), "console");

        let Some(PlatformEvent::Ready(ready)) = events.recv().await else {
            panic!("expected ready first");
        };
        assert_eq!(ready.identity, BotIdentity::new("parley", "1"));

        let texts: Vec<String> = [events.recv().await, events.recv().await]
            .into_iter()
            .map(|event| match event {
                Some(PlatformEvent::Message(msg)) => msg.text,
                other => panic!("unexpected {other:?}"),
            })
            .collect();
        assert_eq!(texts, vec![".ping", "@parley hello"]);

        // End of input closes the stream.
        assert!(events.recv().await.is_none());
        adapter.on_shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_platform_writes_to_output() {
        let (writer, reader) = duplex(256);
        let input: &'static [u8] = b"";
        let adapter = ConsoleAdapter::with_io(ConsoleConfig::default(), input, writer);
        let (sink, _events) = create_event_channel(4);

        let platform = adapter.on_start(sink).await.unwrap();
        platform
            .send(&ChannelId::new("console"), "pong")
            .await
            .unwrap();

        let mut lines = BufReader::new(reader).lines();
        assert_eq!(
            lines.next_line().await.unwrap().as_deref(),
            Some("[#console] parley: pong")
        );
    }

    #[tokio::test]
    async fn test_second_start_rejected() {
        let input: &'static [u8] = b"";
        let adapter = ConsoleAdapter::with_io(ConsoleConfig::default(), input, tokio::io::sink());

        let (sink, _events) = create_event_channel(4);
        adapter.on_start(sink).await.unwrap();

        let (sink, _events) = create_event_channel(4);
        let result = adapter.on_start(sink).await;
        assert!(matches!(result, Err(AdapterError::Internal(_))));
    }

    #[test]
    fn test_from_config_validates() {
        assert_eq!(<ConsoleAdapter as Adapter>::name(), "console");

        let bad = ConsoleConfig {
            user_id: "1".into(),
            ..Default::default()
        };
        assert!(ConsoleAdapter::from_config(bad).is_err());

        let adapter = ConsoleAdapter::from_config(config_in_voice()).unwrap();
        assert_eq!(adapter.config().voice_channel.as_deref(), Some("lounge"));
    }
}
