//! # Parley Framework
//!
//! The command engine that sits between a platform's message stream and
//! user-defined handlers.
//!
//! This layer provides:
//! - A command [`Registry`] owned by the bot, with a `"*"` wildcard entry
//! - The [trigger classifier](trigger) for mention and prefix commands
//! - The [`Dispatcher`] that invokes the classified and wildcard handlers
//! - The [response router](router) for text, deferred and stream replies
//! - The [`Bot`] façade and its builder, plus the [`command!`] macro
//! - A tower [`DispatchService`] the runtime drives events through
//!
//! Data flows one way:
//!
//! ```text
//! PlatformEvent ─▶ Bot ─▶ classify ─▶ Dispatcher ─▶ handler ─▶ route ─▶ Platform::send
//! ```

pub mod bot;
pub mod dispatcher;
pub mod error;
pub mod handler;
mod macros;
pub mod registry;
pub mod router;
pub mod service;
pub mod trigger;

#[cfg(test)]
mod test_util;

pub use bot::{Bot, BotBuilder, DEFAULT_PREFIX};
pub use dispatcher::{DispatchReport, Dispatched, Dispatcher};
pub use error::{DispatchError, DispatchResult};
pub use handler::{Arguments, BoxedHandler, into_handler};
pub use registry::{Registry, WILDCARD};
pub use router::{NOT_IN_VOICE_NOTICE, RouteOutcome, WARNING_MARKER, route};
pub use service::{BoxedDispatchService, DispatchService};
pub use trigger::{Trigger, TriggerKind, classify};
