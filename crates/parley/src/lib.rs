//! # Parley
//!
//! Command dispatch for chat bots: decide whether a message is addressed to
//! the bot, pick the handler, and route whatever it returns back to the chat.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────┐     ┌────────────┐     ┌──────────┐
//! │   Adapter   │────▶│ Runtime │────▶│ Dispatcher │────▶│ Handlers │
//! └─────────────┘     └─────────┘     └────────────┘     └────┬─────┘
//!        ▲                                                     │ Response
//!        └────────────── Router (text / deferred / voice) ◀────┘
//! ```
//!
//! - **Adapters**: connect to a chat platform and emit events
//! - **Runtime**: loads configuration, sets up logging, runs the event loop
//! - **Dispatcher**: classifies the trigger and invokes the matching handler
//! - **Router**: sends the handler's reply where it belongs
//!
//! A message reaches a handler when it:
//!
//! - mentions the bot by name (`@parley ping`)
//! - mentions the bot by id (`<@1234> ping`)
//! - starts with the bot's bare name (`parley ping`)
//! - starts with the prefix and a registered command (`.ping`)
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use parley::prelude::*;
//!
//! struct Greeter;
//!
//! impl Greeter {
//!     fn hello(&self, args: Arguments, msg: &IncomingMessage) -> String {
//!         format!("hello {}", msg.author_name)
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let mut runtime = ParleyRuntime::new();
//!     runtime.register_adapter::<ConsoleAdapter>()?;
//!
//!     let bot = command!(Bot::builder(Greeter), Greeter::hello).build();
//!     runtime.run(Arc::new(bot)).await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - `console`: Enable the terminal adapter (default)
//! - `toml-config`: Read `parley.toml` (default)
//! - `yaml-config`: Read `parley.yaml`
//! - `json-log`: Enable JSON log output

#[cfg(feature = "console")]
pub use parley_adapter_console as console;
pub use parley_core as core;
pub use parley_framework as framework;
pub use parley_runtime as runtime;

pub use parley_framework::{command, commands};

/// Prelude module for convenient imports.
///
/// ```rust,ignore
/// use parley::prelude::*;
/// ```
pub mod prelude {
    // Runtime - main entry point
    pub use parley_runtime::{ParleyRuntime, RuntimeError, RuntimeResult};

    // Building a bot
    pub use parley_framework::{Arguments, Bot, BotBuilder, DEFAULT_PREFIX, WILDCARD};
    pub use parley_framework::{command, commands};

    // What handlers see and return
    pub use parley_core::{IncomingMessage, Response, VoiceChannel};

    #[cfg(feature = "console")]
    pub use parley_adapter_console::{ConsoleAdapter, ConsoleConfig};
}
