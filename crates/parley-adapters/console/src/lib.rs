//! # Parley Console Adapter
//!
//! A terminal stand-in for a chat platform. It lets a bot be driven by
//! typing lines, which makes it handy for local development and for
//! scripted end-to-end checks (pipe a file into stdin).
//!
//! - Each input line is a message from the configured user
//! - Replies print as `[#channel] bot: text`
//! - Voice streams are drained and summarised as `[~voice] played N bytes`
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use parley_adapter_console::ConsoleAdapter;
//! use parley_runtime::ParleyRuntime;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let mut runtime = ParleyRuntime::new();
//!     runtime.register_adapter::<ConsoleAdapter>()?;
//!     runtime.run(Arc::new(bot)).await?;
//!     Ok(())
//! }
//! ```

mod adapter;
pub mod config;
mod platform;

pub use adapter::{BoxedInput, BoxedOutput, ConsoleAdapter, parse_line};
pub use config::ConsoleConfig;
pub use platform::ConsolePlatform;
