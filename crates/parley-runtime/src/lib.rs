//! Parley Runtime - orchestration layer for the Parley command framework.
//!
//! This crate provides:
//! - Layered configuration loading (`ConfigLoader`, `ParleyConfig`)
//! - Logging setup (`LoggingBuilder`, `SpanEvents`)
//! - The event loop (`ParleyRuntime`) that connects an adapter to a bot
//!
//! ```ignore
//! use std::sync::Arc;
//! use parley_runtime::ParleyRuntime;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let mut runtime = ParleyRuntime::new();
//!     runtime.register_adapter::<ConsoleAdapter>()?;
//!
//!     // Run until Ctrl+C or the adapter hangs up
//!     runtime.run(Arc::new(bot)).await?;
//!
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod logging;
pub mod runtime;

// Re-exports
pub use config::{ConfigError, ConfigLoader, ConfigResult, LoggingConfig, ParleyConfig};
pub use error::{RuntimeError, RuntimeResult};
pub use logging::{LoggingBuilder, SpanEvents};
pub use runtime::{ParleyRuntime, RuntimeBuilder};

// Re-export tracing for use by other crates
pub use tracing;
pub use tracing_subscriber;

/// Prelude module for convenient imports.
///
/// This provides all the commonly used logging macros:
/// - `trace!`, `debug!`, `info!`, `warn!`, `error!`
/// - `span`, `event`
/// - `instrument` attribute
/// - `Level` for span creation
pub mod prelude {
    pub use tracing::{Level, debug, error, event, info, instrument, span, trace, warn};
}
