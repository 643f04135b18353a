//! Configuration module for the Parley runtime.
//!
//! Layered loading with figment (defaults, files, `PARLEY_*` environment
//! variables, programmatic merges) followed by validation.

pub mod error;
pub mod loader;
pub mod schema;
pub mod validation;

pub use error::{ConfigError, ConfigResult};
pub use loader::{ConfigLoader, Profile, load_config_from_file};
pub use schema::{
    BotConfig, LogFormat, LogLevel, LogOutput, LogRotation, LoggingConfig, ParleyConfig,
    RuntimeConfig, SpanEventConfig,
};
pub use validation::validate_config;
