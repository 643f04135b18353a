//! Recording platform for framework tests.

use std::sync::Arc;

use async_trait::async_trait;
use futures::StreamExt;
use parking_lot::Mutex;
use parley_core::{
    AudioSink, AudioStream, BoxedAudioSink, BoxedPlatform, ChannelId, Platform, PlatformError,
    PlatformResult, PlayOptions, VoiceChannel,
};

#[derive(Debug, Default)]
pub(crate) struct Recorded {
    pub sent: Vec<(String, String)>,
    pub joined: Vec<String>,
    pub played: Vec<(PlayOptions, Vec<u8>)>,
    pub closed: usize,
}

#[derive(Default)]
pub(crate) struct MockPlatform {
    pub log: Arc<Mutex<Recorded>>,
    pub fail_join: bool,
    pub fail_send: bool,
}

impl MockPlatform {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn failing_join() -> Arc<Self> {
        Arc::new(Self {
            fail_join: true,
            ..Self::default()
        })
    }

    pub fn failing_send() -> Arc<Self> {
        Arc::new(Self {
            fail_send: true,
            ..Self::default()
        })
    }

    pub fn boxed(self: &Arc<Self>) -> BoxedPlatform {
        self.clone()
    }

    pub fn sent(&self) -> Vec<(String, String)> {
        self.log.lock().sent.clone()
    }

    pub fn sent_texts(&self) -> Vec<String> {
        self.log.lock().sent.iter().map(|(_, t)| t.clone()).collect()
    }

    pub fn joined(&self) -> Vec<String> {
        self.log.lock().joined.clone()
    }

    pub fn played(&self) -> Vec<(PlayOptions, Vec<u8>)> {
        self.log.lock().played.clone()
    }

    pub fn closed(&self) -> usize {
        self.log.lock().closed
    }
}

#[async_trait]
impl Platform for MockPlatform {
    fn name(&self) -> &str {
        "mock"
    }

    async fn send(&self, channel: &ChannelId, text: &str) -> PlatformResult<()> {
        if self.fail_send {
            return Err(PlatformError::send_failed(channel.as_str(), "offline"));
        }
        self.log
            .lock()
            .sent
            .push((channel.to_string(), text.to_string()));
        Ok(())
    }

    async fn join_voice(&self, channel: &VoiceChannel) -> PlatformResult<BoxedAudioSink> {
        if self.fail_join {
            return Err(PlatformError::voice_join_failed(
                channel.id.as_str(),
                "no permission",
            ));
        }
        self.log.lock().joined.push(channel.id.to_string());
        Ok(Box::new(MockSink {
            log: self.log.clone(),
        }))
    }
}

struct MockSink {
    log: Arc<Mutex<Recorded>>,
}

#[async_trait]
impl AudioSink for MockSink {
    async fn play_stream(&self, stream: AudioStream, options: PlayOptions) -> PlatformResult<()> {
        let bytes: Vec<u8> = stream.flat_map(futures::stream::iter).collect().await;
        self.log.lock().played.push((options, bytes));
        Ok(())
    }

    async fn close(&self) -> PlatformResult<()> {
        self.log.lock().closed += 1;
        Ok(())
    }
}
