//! Tower integration.
//!
//! [`DispatchService`] exposes a [`Bot`] bound to a platform as a
//! `tower::Service<PlatformEvent>`. The runtime drives every event through it,
//! which lets callers stack ordinary tower layers in front of the bot:
//!
//! ```rust,ignore
//! use tower::{ServiceBuilder, ServiceExt};
//!
//! let svc = ServiceBuilder::new()
//!     .map_request(|event: PlatformEvent| event)
//!     .service(DispatchService::new(bot, platform));
//!
//! svc.oneshot(event).await?;
//! ```

use std::sync::Arc;
use std::task::{Context, Poll};

use futures::future::BoxFuture;
use parley_core::{BoxedPlatform, PlatformEvent};
use tower::util::BoxCloneSyncService;
use tower::{BoxError, Service};

use crate::bot::Bot;
use crate::dispatcher::DispatchReport;

/// A type-erased dispatch service, e.g. a [`DispatchService`] behind layers.
pub type BoxedDispatchService =
    BoxCloneSyncService<PlatformEvent, Option<DispatchReport>, BoxError>;

/// A [`Bot`] bound to the platform it replies through.
pub struct DispatchService<S> {
    bot: Arc<Bot<S>>,
    platform: BoxedPlatform,
}

impl<S> DispatchService<S> {
    /// Binds `bot` to `platform`.
    pub fn new(bot: Arc<Bot<S>>, platform: BoxedPlatform) -> Self {
        Self { bot, platform }
    }

    /// Returns the bot.
    pub fn bot(&self) -> &Arc<Bot<S>> {
        &self.bot
    }
}

impl<S> Clone for DispatchService<S> {
    fn clone(&self) -> Self {
        Self {
            bot: self.bot.clone(),
            platform: self.platform.clone(),
        }
    }
}

impl<S> Service<PlatformEvent> for DispatchService<S>
where
    S: Send + Sync + 'static,
{
    type Response = Option<DispatchReport>;
    type Error = BoxError;
    type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, event: PlatformEvent) -> Self::Future {
        let bot = self.bot.clone();
        let platform = self.platform.clone();
        Box::pin(async move { Ok(bot.handle(event, &platform).await) })
    }
}
