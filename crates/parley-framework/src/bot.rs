//! The bot façade.
//!
//! [`Bot`] ties a user-defined state type to the command registry and to the
//! platform's event stream. The state type is where handlers live: each
//! command is usually a method on it, registered while building the bot.
//!
//! # Example
//!
//! ```rust
//! use parley_core::IncomingMessage;
//! use parley_framework::{Arguments, Bot};
//!
//! struct Dice;
//!
//! impl Dice {
//!     fn roll(&self, args: Arguments, _msg: &IncomingMessage) -> String {
//!         format!("rolling {}", args.joined())
//!     }
//! }
//!
//! let bot = Bot::builder(Dice)
//!     .command("roll", Dice::roll)
//!     .prefix("!")
//!     .build();
//!
//! assert_eq!(bot.prefix(), "!");
//! assert!(bot.is_registered_message("!roll 2d6"));
//! assert!(!bot.is_registered_message(".roll 2d6"));
//! ```
//!
//! The prefix can be changed while the bot runs. If it is empty when the
//! platform reports ready, it falls back to [`DEFAULT_PREFIX`].

use std::fmt;

use parking_lot::RwLock;
use parley_core::{
    BotIdentity, BoxedPlatform, IncomingMessage, PlatformEvent, ReadyEvent, Response,
};
use tracing::info;

use crate::dispatcher::{DispatchReport, Dispatcher};
use crate::handler::{Arguments, BoxedHandler, into_handler};
use crate::registry::{Registry, WILDCARD};

/// The prefix used when none is configured.
pub const DEFAULT_PREFIX: &str = ".";

// =============================================================================
// Bot
// =============================================================================

/// A command bot over handler state `S`.
pub struct Bot<S> {
    state: S,
    dispatcher: Dispatcher<S>,
    prefix: RwLock<String>,
    identity: RwLock<Option<BotIdentity>>,
}

impl<S> Bot<S> {
    /// Starts building a bot around `state`.
    pub fn builder(state: S) -> BotBuilder<S> {
        BotBuilder::new(state)
    }

    /// Returns the handler state.
    pub fn state(&self) -> &S {
        &self.state
    }

    /// Returns the current command prefix.
    pub fn prefix(&self) -> String {
        self.prefix.read().clone()
    }

    /// Replaces the command prefix.
    pub fn set_prefix(&self, prefix: impl Into<String>) {
        *self.prefix.write() = prefix.into();
    }

    /// Returns the bot's own identity once the platform is ready.
    pub fn identity(&self) -> Option<BotIdentity> {
        self.identity.read().clone()
    }

    /// Returns the command registry.
    pub fn registry(&self) -> &Registry<BoxedHandler<S>> {
        self.dispatcher.registry()
    }

    /// Returns `true` if the first token of `text`, minus the prefix, is a
    /// registered command.
    ///
    /// The prefix itself is not checked: only its length is stripped.
    pub fn is_registered_message(&self, text: &str) -> bool {
        let prefix_len = self.prefix.read().len();
        text.split(' ')
            .next()
            .and_then(|first| first.get(prefix_len..))
            .is_some_and(|name| self.registry().is_registered(name))
    }

    /// Handles the platform becoming ready.
    pub fn on_ready(&self, event: &ReadyEvent) {
        let identity = &event.identity;
        info!("Logged in as {} - {}", identity.name, identity.id);

        *self.identity.write() = Some(identity.clone());

        let mut prefix = self.prefix.write();
        if prefix.is_empty() {
            *prefix = DEFAULT_PREFIX.to_string();
        }
    }

    /// Handles one incoming message.
    pub async fn on_message(
        &self,
        message: &IncomingMessage,
        platform: &BoxedPlatform,
    ) -> DispatchReport {
        let identity = self.identity();
        let prefix = self.prefix();
        self.dispatcher
            .dispatch(&self.state, message, identity.as_ref(), &prefix, platform)
            .await
    }

    /// Handles any platform event.
    ///
    /// Returns the dispatch report for messages and `None` for ready events.
    pub async fn handle(
        &self,
        event: PlatformEvent,
        platform: &BoxedPlatform,
    ) -> Option<DispatchReport> {
        match event {
            PlatformEvent::Ready(ready) => {
                self.on_ready(&ready);
                None
            }
            PlatformEvent::Message(message) => Some(self.on_message(&message, platform).await),
        }
    }
}

impl<S> fmt::Debug for Bot<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bot")
            .field("prefix", &*self.prefix.read())
            .field("identity", &*self.identity.read())
            .field("registry", self.registry())
            .finish()
    }
}

// =============================================================================
// Builder
// =============================================================================

/// Builder for [`Bot`].
pub struct BotBuilder<S> {
    state: S,
    registry: Registry<BoxedHandler<S>>,
    prefix: String,
}

impl<S> BotBuilder<S> {
    fn new(state: S) -> Self {
        Self {
            state,
            registry: Registry::new(),
            prefix: DEFAULT_PREFIX.to_string(),
        }
    }
}

impl<S: 'static> BotBuilder<S> {
    /// Registers `handler` under `name`, replacing any previous binding.
    pub fn command<F, R>(mut self, name: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&S, Arguments, &IncomingMessage) -> R + Send + Sync + 'static,
        R: Into<Response>,
    {
        self.registry.register(name, into_handler(handler));
        self
    }

    /// Registers the handler that runs on every message.
    ///
    /// Same as `command("*", handler)`.
    pub fn wildcard<F, R>(self, handler: F) -> Self
    where
        F: Fn(&S, Arguments, &IncomingMessage) -> R + Send + Sync + 'static,
        R: Into<Response>,
    {
        self.command(WILDCARD, handler)
    }

    /// Sets the initial command prefix.
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Finishes the bot. The registry is frozen from here on.
    pub fn build(self) -> Bot<S> {
        Bot {
            state: self.state,
            dispatcher: Dispatcher::new(self.registry),
            prefix: RwLock::new(self.prefix),
            identity: RwLock::new(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::MockPlatform;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct Greeter {
        greeted: AtomicUsize,
    }

    impl Greeter {
        fn hello(&self, args: Arguments, msg: &IncomingMessage) -> String {
            self.greeted.fetch_add(1, Ordering::SeqCst);
            format!("hello {} ({})", msg.author_name, args.joined())
        }

        fn bye(&self, _args: Arguments, _msg: &IncomingMessage) -> &'static str {
            "bye"
        }
    }

    fn bot() -> Bot<Greeter> {
        Bot::builder(Greeter::default())
            .command("hello", Greeter::hello)
            .command("bye", Greeter::bye)
            .build()
    }

    fn ready(bot: &Bot<Greeter>) {
        bot.on_ready(&ReadyEvent::new(BotIdentity::new("greeter", "99")));
    }

    #[test]
    fn test_default_prefix() {
        assert_eq!(bot().prefix(), ".");
    }

    #[test]
    fn test_ready_sets_identity_and_keeps_prefix() {
        let bot = bot();
        bot.set_prefix("!");
        ready(&bot);

        assert_eq!(bot.identity().unwrap().name, "greeter");
        assert_eq!(bot.prefix(), "!");
    }

    #[test]
    fn test_ready_resets_empty_prefix() {
        let bot = Bot::builder(Greeter::default()).prefix("").build();
        ready(&bot);
        assert_eq!(bot.prefix(), DEFAULT_PREFIX);
    }

    #[test]
    fn test_is_registered_message() {
        let bot = bot();
        assert!(bot.is_registered_message(".hello world"));
        assert!(!bot.is_registered_message(".nope"));
        // Only the prefix length is stripped.
        assert!(bot.is_registered_message("!bye"));
        assert!(!bot.is_registered_message(""));
    }

    #[test]
    fn test_reregistration_replaces_handler() {
        let bot = Bot::builder(Greeter::default())
            .command("hello", Greeter::hello)
            .command("hello", Greeter::bye)
            .build();

        let mock = MockPlatform::new();
        let message = IncomingMessage::new("1", "c", ".hello");
        tokio_test::block_on(bot.on_message(&message, &mock.boxed()));

        assert_eq!(mock.sent_texts(), vec!["bye"]);
        assert_eq!(bot.state().greeted.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_handle_events() {
        let bot = bot();
        let mock = MockPlatform::new();
        let platform = mock.boxed();

        let ready_event = ReadyEvent::new(BotIdentity::new("greeter", "99"));
        assert!(bot.handle(ready_event.into(), &platform).await.is_none());

        let message = IncomingMessage::new("1", "c", "@greeter hello a b").with_author_name("ann");
        let report = bot.handle(message.into(), &platform).await.unwrap();

        assert!(report.dispatched());
        assert_eq!(mock.sent_texts(), vec!["hello ann (a b)"]);
        assert_eq!(bot.state().greeted.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_own_messages_after_ready_are_ignored() {
        let bot = bot();
        ready(&bot);
        let mock = MockPlatform::new();

        let message = IncomingMessage::new("99", "c", ".hello");
        let report = bot.on_message(&message, &mock.boxed()).await;

        assert!(report.ignored);
        assert!(mock.sent().is_empty());
    }

    #[tokio::test]
    async fn test_prefix_change_at_runtime() {
        let bot = bot();
        let mock = MockPlatform::new();
        bot.set_prefix("~");

        bot.on_message(&IncomingMessage::new("1", "c", ".bye"), &mock.boxed())
            .await;
        bot.on_message(&IncomingMessage::new("1", "c", "~bye"), &mock.boxed())
            .await;

        assert_eq!(mock.sent_texts(), vec!["bye"]);
    }
}
