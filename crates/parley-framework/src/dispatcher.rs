//! Message dispatcher for the Parley framework.
//!
//! The [`Dispatcher`] owns the command [`Registry`] and turns one incoming
//! message into at most two handler invocations:
//!
//! 1. The **classified** command, if the [trigger classifier](crate::trigger)
//!    found one and it is registered. The handler gets the argument tokens.
//! 2. The **wildcard** handler (`"*"`), if registered. It runs for every
//!    message and gets the whole raw text.
//!
//! Each result goes through the [router](crate::router) on its own. Messages
//! written by the bot itself are dropped before classification.
//!
//! ```rust,ignore
//! let report = dispatcher
//!     .dispatch(&state, &message, Some(&identity), ".", &platform)
//!     .await;
//!
//! if let Some(cmd) = &report.command {
//!     println!("ran {} -> {:?}", cmd.name, cmd.result);
//! }
//! ```

use parley_core::{BotIdentity, BoxedPlatform, IncomingMessage};
use tracing::{Instrument, Level, debug, error, span};

use crate::error::DispatchResult;
use crate::handler::{Arguments, BoxedHandler, invoke};
use crate::registry::{Registry, WILDCARD};
use crate::router::{RouteOutcome, route};
use crate::trigger::{TriggerKind, classify};

// =============================================================================
// Dispatch Report
// =============================================================================

/// One handler invocation and what became of its response.
#[derive(Debug)]
pub struct Dispatched {
    /// The registry name that was invoked (`"*"` for the wildcard).
    pub name: String,
    /// The routing outcome, or the reason the handler produced none.
    pub result: DispatchResult<RouteOutcome>,
}

impl Dispatched {
    /// Waits for any continuation spawned by the router.
    pub async fn settle(self) {
        if let Ok(outcome) = self.result {
            outcome.settle().await;
        }
    }
}

/// Everything that happened while dispatching one message.
#[derive(Debug, Default)]
pub struct DispatchReport {
    /// The message was written by the bot and skipped.
    pub ignored: bool,
    /// The trigger form that matched, if any.
    pub trigger: Option<TriggerKind>,
    /// The classified command invocation.
    pub command: Option<Dispatched>,
    /// The wildcard invocation.
    pub wildcard: Option<Dispatched>,
}

impl DispatchReport {
    fn ignored() -> Self {
        Self {
            ignored: true,
            ..Self::default()
        }
    }

    /// Returns `true` if any handler ran.
    pub fn dispatched(&self) -> bool {
        self.command.is_some() || self.wildcard.is_some()
    }

    /// Waits for every continuation spawned while routing.
    pub async fn settle(self) {
        if let Some(command) = self.command {
            command.settle().await;
        }
        if let Some(wildcard) = self.wildcard {
            wildcard.settle().await;
        }
    }
}

// =============================================================================
// Dispatcher
// =============================================================================

/// Resolves and invokes handlers for incoming messages.
pub struct Dispatcher<S> {
    registry: Registry<BoxedHandler<S>>,
}

impl<S> Default for Dispatcher<S> {
    fn default() -> Self {
        Self::new(Registry::new())
    }
}

impl<S> Dispatcher<S> {
    /// Creates a dispatcher over a filled registry.
    pub fn new(registry: Registry<BoxedHandler<S>>) -> Self {
        Self { registry }
    }

    /// Returns the registry.
    pub fn registry(&self) -> &Registry<BoxedHandler<S>> {
        &self.registry
    }

    /// Dispatches one message.
    ///
    /// `identity` is the bot's own identity, unknown before the platform is
    /// ready. Handlers run on the calling task; deferred and stream replies
    /// continue on spawned tasks.
    pub async fn dispatch(
        &self,
        state: &S,
        message: &IncomingMessage,
        identity: Option<&BotIdentity>,
        prefix: &str,
        platform: &BoxedPlatform,
    ) -> DispatchReport {
        if identity.is_some_and(|me| me.id == message.author) {
            return DispatchReport::ignored();
        }

        let span = span!(
            Level::DEBUG,
            "dispatch",
            channel = %message.channel,
            author = %message.author,
        );

        async {
            let mut report = DispatchReport::default();

            let trigger = classify(&message.text, identity, prefix, |name| {
                self.registry.is_registered(name)
            });

            if let Some(trigger) = trigger {
                debug!(
                    trigger = %trigger.kind,
                    command = trigger.command.as_deref().unwrap_or(""),
                    args = trigger.args.len(),
                    "Classified message"
                );
                report.trigger = Some(trigger.kind);

                if let Some(name) = trigger.command {
                    match self.registry.resolve(&name) {
                        Some(handler) => {
                            let args = Arguments::Tokens(trigger.args);
                            report.command =
                                Some(self.run(name, handler, state, args, message, platform).await);
                        }
                        None => debug!(command = %name, "Unknown command"),
                    }
                }
            }

            if let Some(handler) = self.registry.wildcard() {
                let args = Arguments::Text(message.text.clone());
                report.wildcard = Some(
                    self.run(WILDCARD.to_string(), handler, state, args, message, platform)
                        .await,
                );
            }

            report
        }
        .instrument(span)
        .await
    }

    async fn run(
        &self,
        name: String,
        handler: &BoxedHandler<S>,
        state: &S,
        args: Arguments,
        message: &IncomingMessage,
        platform: &BoxedPlatform,
    ) -> Dispatched {
        let result = match invoke(&name, handler, state, args, message) {
            Ok(response) => {
                let outcome = route(response, message, platform).await;
                debug!(command = %name, outcome = outcome.as_str(), "Handled");
                Ok(outcome)
            }
            Err(e) => {
                error!(command = %name, error = %e, "Handler failed");
                Err(e)
            }
        };
        Dispatched { name, result }
    }
}
