//! Echo Bot Example
//!
//! A console bot with one command per kind of reply:
//!
//! | Command | Reply |
//! |---|---|
//! | `.ping` | text, right away |
//! | `.echo <words>` | the words back, or nothing when there are none |
//! | `.slow [ms]` | text, after a delay |
//! | `.fail` | a deferred reply that fails, shown as a warning |
//! | `.tone [tenths]` | a generated tone, played in your voice channel |
//! | `.stats` | how many messages the wildcard handler has seen |
//!
//! Every message is also seen by the wildcard handler, which logs it.
//! The bot answers to `@echo ping`, `<@1> ping` and `echo ping` as well.
//!
//! # Usage
//!
//! ```bash
//! cargo run --package echo-bot
//! ```
//!
//! Type `{"text": ".tone", "voice": ""}` to try a stream while outside voice.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use anyhow::Result;
use futures::stream;
use parley::prelude::*;
use tracing::info;

const SAMPLE_RATE: u32 = 8_000;
const TONE_HZ: f32 = 440.0;

#[derive(Default)]
struct EchoBot {
    seen: AtomicUsize,
}

impl EchoBot {
    fn ping(&self, _args: Arguments, _msg: &IncomingMessage) -> &'static str {
        "pong"
    }

    fn echo(&self, args: Arguments, _msg: &IncomingMessage) -> Option<String> {
        (!args.is_empty()).then(|| args.joined())
    }

    fn slow(&self, args: Arguments, _msg: &IncomingMessage) -> Response {
        let millis = args.get(0).and_then(|ms| ms.parse().ok()).unwrap_or(500);
        Response::deferred(async move {
            tokio::time::sleep(Duration::from_millis(millis)).await;
            Ok::<_, String>(format!("done after {millis} ms"))
        })
    }

    fn fail(&self, _args: Arguments, _msg: &IncomingMessage) -> Response {
        Response::deferred(async { Err::<String, _>("upstream timed out") })
    }

    fn tone(&self, args: Arguments, _msg: &IncomingMessage) -> Response {
        let tenths = args
            .get(0)
            .and_then(|n| n.parse().ok())
            .unwrap_or(10usize)
            .min(100);
        Response::stream(stream::iter((0..tenths).map(tone_chunk)))
    }

    fn stats(&self, _args: Arguments, _msg: &IncomingMessage) -> String {
        format!("seen {} messages", self.seen.load(Ordering::Relaxed))
    }

    fn audit(&self, args: Arguments, msg: &IncomingMessage) {
        let n = self.seen.fetch_add(1, Ordering::Relaxed) + 1;
        info!(
            "[{}] {} ({}): {}",
            msg.channel,
            msg.author_name,
            n,
            args.text().unwrap_or_default()
        );
    }
}

/// One tenth of a second of a sine tone as signed 16-bit little-endian PCM.
fn tone_chunk(index: usize) -> Vec<u8> {
    let samples = SAMPLE_RATE / 10;
    let offset = index as u32 * samples;
    (0..samples)
        .flat_map(|i| {
            let t = (offset + i) as f32 / SAMPLE_RATE as f32;
            let sample = (t * TONE_HZ * std::f32::consts::TAU).sin() * f32::from(i16::MAX / 4);
            (sample as i16).to_le_bytes()
        })
        .collect()
}

fn build_bot() -> Bot<EchoBot> {
    commands!(Bot::builder(EchoBot::default()),
        EchoBot::ping,
        EchoBot::echo,
        EchoBot::slow,
        EchoBot::fail,
        EchoBot::tone,
        EchoBot::stats,
        "*" => EchoBot::audit,
    )
    .build()
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logging is set up from parley.toml when the runtime is built.
    let mut runtime = ParleyRuntime::builder()
        .search_path(env!("CARGO_MANIFEST_DIR"))
        .build()?;
    runtime.register_adapter::<ConsoleAdapter>()?;

    let bot = build_bot();
    info!(commands = ?bot.registry().commands(), "Echo bot ready");

    runtime.run(Arc::new(bot)).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(text: &str) -> IncomingMessage {
        IncomingMessage::new("100", "console", text)
    }

    #[test]
    fn test_all_commands_registered() {
        let bot = build_bot();
        assert_eq!(
            bot.registry().commands(),
            vec!["echo", "fail", "ping", "slow", "stats", "tone"]
        );
        assert!(bot.registry().wildcard().is_some());
    }

    #[test]
    fn test_echo_without_words_is_silent() {
        let bot = EchoBot::default();
        assert_eq!(bot.echo(Arguments::from(vec![]), &message(".echo")), None);
        assert_eq!(
            bot.echo(
                Arguments::from(vec!["a".to_string(), "b".to_string()]),
                &message(".echo a b")
            ),
            Some("a b".to_string())
        );
    }

    #[test]
    fn test_audit_counts_messages() {
        let bot = EchoBot::default();
        bot.audit(Arguments::Text("hi".into()), &message("hi"));
        bot.audit(Arguments::Text("yo".into()), &message("yo"));
        assert_eq!(
            bot.stats(Arguments::from(vec![]), &message(".stats")),
            "seen 2 messages"
        );
    }

    #[tokio::test]
    async fn test_fail_resolves_to_error() {
        let bot = EchoBot::default();
        let Response::Deferred(reply) = bot.fail(Arguments::from(vec![]), &message(".fail")) else {
            panic!("expected deferred");
        };
        assert_eq!(reply.await, Err("upstream timed out".to_string()));
    }

    #[test]
    fn test_tone_chunk_size() {
        // 800 samples of two bytes each.
        assert_eq!(tone_chunk(0).len(), 1600);
        assert_eq!(tone_chunk(3).len(), 1600);
    }
}
