//! The console reply surface.
//!
//! Replies are written as `[#channel] name: text` lines. Joining voice hands
//! out a sink that drains the stream and reports how much it played.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use futures::StreamExt;
use parley_core::{
    AudioSink, AudioStream, BoxedAudioSink, ChannelId, Platform, PlatformError, PlatformResult,
    PlayOptions, VoiceChannel,
};
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::Mutex;
use tracing::{debug, trace};

/// Writes replies to any async writer, stdout by default.
pub struct ConsolePlatform<W> {
    bot_name: String,
    out: Arc<Mutex<W>>,
}

impl<W> ConsolePlatform<W>
where
    W: AsyncWrite + Send + Unpin + 'static,
{
    /// Creates a platform that speaks as `bot_name`.
    pub fn new(bot_name: impl Into<String>, out: W) -> Self {
        Self {
            bot_name: bot_name.into(),
            out: Arc::new(Mutex::new(out)),
        }
    }
}

async fn write_line<W>(out: &Mutex<W>, line: &str) -> std::io::Result<()>
where
    W: AsyncWrite + Send + Unpin,
{
    let mut out = out.lock().await;
    out.write_all(line.as_bytes()).await?;
    out.write_all(b"\n").await?;
    out.flush().await
}

#[async_trait]
impl<W> Platform for ConsolePlatform<W>
where
    W: AsyncWrite + Send + Unpin + 'static,
{
    fn name(&self) -> &str {
        "console"
    }

    async fn send(&self, channel: &ChannelId, text: &str) -> PlatformResult<()> {
        trace!(channel = %channel, len = text.len(), "Writing reply");
        let line = format!("[#{}] {}: {}", channel, self.bot_name, text);
        write_line(&self.out, &line)
            .await
            .map_err(|e| PlatformError::send_failed(channel.as_str(), e.to_string()))
    }

    async fn join_voice(&self, channel: &VoiceChannel) -> PlatformResult<BoxedAudioSink> {
        debug!(voice = %channel.id, "Joining voice channel");
        Ok(Box::new(ConsoleSink {
            channel: channel.clone(),
            out: Arc::clone(&self.out),
            closed: AtomicBool::new(false),
        }))
    }
}

/// Voice sink that consumes the stream without playing it.
struct ConsoleSink<W> {
    channel: VoiceChannel,
    out: Arc<Mutex<W>>,
    closed: AtomicBool,
}

impl<W> ConsoleSink<W> {
    fn label(&self) -> &str {
        self.channel.name.as_deref().unwrap_or(self.channel.id.as_str())
    }
}

#[async_trait]
impl<W> AudioSink for ConsoleSink<W>
where
    W: AsyncWrite + Send + Unpin + 'static,
{
    async fn play_stream(
        &self,
        mut stream: AudioStream,
        options: PlayOptions,
    ) -> PlatformResult<()> {
        if self.closed.load(Ordering::Acquire) {
            return Err(PlatformError::Playback(format!(
                "not connected to '{}'",
                self.label()
            )));
        }

        let (mut chunks, mut bytes) = (0usize, 0usize);
        while let Some(chunk) = stream.next().await {
            chunks += 1;
            bytes += chunk.len();
        }
        debug!(
            voice = %self.channel.id,
            chunks,
            bytes,
            seek = options.seek,
            "Stream finished"
        );

        let line = format!("[~{}] played {} bytes in {} chunks", self.label(), bytes, chunks);
        write_line(&self.out, &line)
            .await
            .map_err(|e| PlatformError::Playback(e.to_string()))
    }

    async fn close(&self) -> PlatformResult<()> {
        if !self.closed.swap(true, Ordering::AcqRel) {
            debug!(voice = %self.channel.id, "Left voice channel");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::stream;
    use tokio::io::{AsyncBufReadExt, BufReader, duplex};

    #[tokio::test]
    async fn test_send_formats_line() {
        let (writer, reader) = duplex(256);
        let platform = ConsolePlatform::new("parley", writer);
        let mut lines = BufReader::new(reader).lines();

        platform.send(&ChannelId::new("general"), "pong").await.unwrap();
        assert_eq!(
            lines.next_line().await.unwrap().as_deref(),
            Some("[#general] parley: pong")
        );
    }

    #[tokio::test]
    async fn test_sink_drains_stream() {
        let (writer, reader) = duplex(256);
        let platform = ConsolePlatform::new("parley", writer);
        let mut lines = BufReader::new(reader).lines();

        let sink = platform
            .join_voice(&VoiceChannel::new("v1").with_name("Lounge"))
            .await
            .unwrap();
        let audio = stream::iter(vec![vec![0u8; 3], vec![0u8; 5]]).boxed();
        sink.play_stream(audio, PlayOptions::default()).await.unwrap();
        sink.close().await.unwrap();

        assert_eq!(
            lines.next_line().await.unwrap().as_deref(),
            Some("[~Lounge] played 8 bytes in 2 chunks")
        );
    }

    #[tokio::test]
    async fn test_play_after_close_fails() {
        let platform = ConsolePlatform::new("parley", tokio::io::sink());
        let sink = platform.join_voice(&VoiceChannel::new("v1")).await.unwrap();
        sink.close().await.unwrap();
        // Closing twice is harmless.
        sink.close().await.unwrap();

        let result = sink
            .play_stream(stream::empty::<Vec<u8>>().boxed(), PlayOptions::default())
            .await;
        assert!(matches!(result, Err(PlatformError::Playback(msg)) if msg.contains("v1")));
    }
}
