//! Main runtime orchestration.
//!
//! The runtime starts the registered adapter, then feeds every event it emits
//! through the bot one at a time until shutdown.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use parley_runtime::ParleyRuntime;
//!
//! // Auto-loads parley.toml from the current directory
//! let mut runtime = ParleyRuntime::new();
//! runtime.register_adapter::<ConsoleAdapter>()?;
//! runtime.run(Arc::new(bot)).await?;
//!
//! // Custom configuration path
//! let runtime = ParleyRuntime::builder()
//!     .config_file("config/parley.toml")
//!     .build()?;
//! ```

use std::future::Future;
use std::sync::Arc;

use parley_core::{BoxedAdapter, ConfigurableAdapter, PlatformEvent, create_event_channel};
use parley_framework::{Bot, DispatchService};
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tower::{Service, ServiceExt};
use tracing::{debug, error, info, warn};

use crate::config::{ConfigLoader, ConfigResult, ParleyConfig};
use crate::error::{RuntimeError, RuntimeResult};
use crate::logging;

/// The main Parley runtime that drives one adapter and one bot.
///
/// # Custom Configuration
///
/// ```rust,ignore
/// let runtime = ParleyRuntime::builder()
///     .config_file("config/production.toml")
///     .profile("production")
///     .build()?;
///
/// // Or use pre-loaded config
/// let config = load_config_from_file("parley.toml")?;
/// let runtime = ParleyRuntime::from_config(&config);
/// ```
pub struct ParleyRuntime {
    config: ParleyConfig,
    adapter: Option<(String, BoxedAdapter)>,
    shutdown: CancellationToken,
}

impl ParleyRuntime {
    /// Creates a new runtime with automatic configuration loading.
    ///
    /// This will:
    /// 1. Search for `parley.toml` in the current directory
    /// 2. Initialize logging based on the configuration
    ///
    /// If no configuration file is found or it is invalid, default settings
    /// are used.
    pub fn new() -> Self {
        let config = ConfigLoader::new()
            .with_current_dir()
            .load()
            .unwrap_or_else(|e| {
                eprintln!("Warning: Failed to load config ({e}), using defaults");
                ParleyConfig::default()
            });

        Self::from_config(&config)
    }

    /// Creates a runtime builder for custom configuration.
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    /// Creates a new runtime from configuration and initializes logging.
    pub fn from_config(config: &ParleyConfig) -> Self {
        logging::init_from_config(&config.logging);

        info!(
            log_level = %config.logging.level,
            log_format = ?config.logging.format,
            "Runtime initialized from configuration"
        );

        Self {
            config: config.clone(),
            adapter: None,
            shutdown: CancellationToken::new(),
        }
    }

    /// Returns a reference to the configuration.
    pub fn config(&self) -> &ParleyConfig {
        &self.config
    }

    /// Returns a token that stops the event loop when cancelled.
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    /// Creates and registers an adapter from its configuration section.
    ///
    /// This will:
    /// 1. Look for configuration under `adapters.<name>` (from `A::name()`)
    /// 2. If found, deserialize it into `A::Config`
    /// 3. If not found, use `A::Config::default()`
    /// 4. Call `A::from_config(config)` to create the adapter
    pub fn register_adapter<A>(&mut self) -> RuntimeResult<()>
    where
        A: ConfigurableAdapter + 'static,
    {
        let adapter_name = A::name();

        let config: A::Config = match self.config.adapter_config(adapter_name) {
            Ok(Some(config)) => config,
            Ok(None) => {
                warn!(
                    adapter = adapter_name,
                    "No configuration found for adapter, using default"
                );
                Default::default()
            }
            Err(e) => return Err(RuntimeError::AdapterConfigDeserialize(e.to_string())),
        };

        let adapter = A::from_config(config)?;
        self.add_adapter(adapter_name, adapter)
    }

    /// Registers an already constructed adapter.
    pub fn add_adapter(
        &mut self,
        name: impl Into<String>,
        adapter: BoxedAdapter,
    ) -> RuntimeResult<()> {
        let name = name.into();
        if let Some((existing, _)) = &self.adapter {
            return Err(RuntimeError::AdapterExists(existing.clone()));
        }
        info!(adapter = %name, "Registered adapter");
        self.adapter = Some((name, adapter));
        Ok(())
    }

    /// Runs the bot until Ctrl+C, SIGTERM, the shutdown token, or the adapter
    /// closing its event stream.
    pub async fn run<S>(&self, bot: Arc<Bot<S>>) -> RuntimeResult<()>
    where
        S: Send + Sync + 'static,
    {
        info!("Parley runtime is now running. Press Ctrl+C to stop.");
        self.run_until(bot, wait_for_signal()).await
    }

    /// Runs the bot until `shutdown` resolves (or any of the conditions of
    /// [`run`](Self::run) other than signals).
    pub async fn run_until<S, F>(
        &self,
        bot: Arc<Bot<S>>,
        shutdown: F,
    ) -> RuntimeResult<()>
    where
        S: Send + Sync + 'static,
        F: Future<Output = ()>,
    {
        let (name, adapter) = self.adapter.as_ref().ok_or(RuntimeError::NoAdapter)?;

        if let Some(prefix) = &self.config.bot.prefix {
            debug!(prefix = %prefix, "Applying configured prefix");
            bot.set_prefix(prefix.clone());
        }

        let (sink, mut events) = create_event_channel(self.config.runtime.event_buffer);
        let platform = adapter.on_start(sink).await?;
        info!(adapter = %name, platform = platform.name(), "Adapter started");

        let mut service = DispatchService::new(bot, platform);
        let mut shutdown = std::pin::pin!(shutdown);

        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    info!("Shutdown requested");
                    break;
                }
                _ = self.shutdown.cancelled() => {
                    info!("Shutdown token cancelled");
                    break;
                }
                event = events.recv() => match event {
                    Some(event) => process(&mut service, event).await,
                    None => {
                        info!(adapter = %name, "Event stream closed");
                        break;
                    }
                },
            }
        }

        events.close();
        if let Err(e) = adapter.on_shutdown().await {
            error!(adapter = %name, error = %e, "Error during adapter shutdown");
        }
        info!("Runtime stopped");

        Ok(())
    }
}

impl Default for ParleyRuntime {
    fn default() -> Self {
        Self::new()
    }
}

async fn process<S>(service: &mut DispatchService<S>, event: PlatformEvent)
where
    S: Send + Sync + 'static,
{
    let event_name = event.event_name();
    let result = match ServiceExt::<PlatformEvent>::ready(service).await {
        Ok(svc) => svc.call(event).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(Some(report)) if report.ignored => {
            debug!(event = event_name, "Ignored own message");
        }
        Ok(Some(report)) => {
            debug!(
                event = event_name,
                trigger = ?report.trigger,
                command = report.command.as_ref().map(|c| c.name.as_str()),
                wildcard = report.wildcard.is_some(),
                "Dispatched"
            );
        }
        Ok(None) => debug!(event = event_name, "Handled"),
        Err(e) => error!(event = event_name, error = %e, "Dispatch failed"),
    }
}

/// Waits for shutdown signals (Ctrl+C or SIGTERM).
async fn wait_for_signal() {
    #[cfg(unix)]
    {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = signal::ctrl_c() => info!("Received Ctrl+C, shutting down"),
                    _ = sigterm.recv() => info!("Received SIGTERM, shutting down"),
                }
            }
            Err(e) => {
                warn!(error = %e, "Failed to register SIGTERM handler");
                ctrl_c().await;
            }
        }
    }

    #[cfg(not(unix))]
    ctrl_c().await;
}

async fn ctrl_c() {
    match signal::ctrl_c().await {
        Ok(()) => info!("Received Ctrl+C, shutting down"),
        Err(e) => {
            error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    }
}

// =============================================================================
// RuntimeBuilder
// =============================================================================

/// Builder for creating a [`ParleyRuntime`] with custom configuration.
pub struct RuntimeBuilder {
    config_loader: ConfigLoader,
}

impl RuntimeBuilder {
    /// Creates a new runtime builder.
    pub fn new() -> Self {
        Self {
            config_loader: ConfigLoader::new().with_current_dir(),
        }
    }

    /// Sets a specific configuration file to load.
    pub fn config_file<P: AsRef<std::path::Path>>(mut self, path: P) -> Self {
        self.config_loader = self.config_loader.file(path);
        self
    }

    /// Sets the configuration profile (e.g., "development", "production").
    pub fn profile(mut self, profile: impl Into<String>) -> Self {
        self.config_loader = self.config_loader.profile(profile);
        self
    }

    /// Adds a search path for configuration files.
    pub fn search_path<P: AsRef<std::path::Path>>(mut self, path: P) -> Self {
        self.config_loader = self.config_loader.search_path(path);
        self
    }

    /// Disables loading environment variables.
    pub fn without_env(mut self) -> Self {
        self.config_loader = self.config_loader.without_env();
        self
    }

    /// Overrides one configuration key on top of files and environment.
    pub fn set<V: serde::Serialize>(mut self, key: &str, value: V) -> Self {
        self.config_loader = self.config_loader.set(key, value);
        self
    }

    /// Merges a figment provider on top of files and environment.
    pub fn merge<P: figment::Provider>(mut self, provider: P) -> Self {
        self.config_loader = self.config_loader.merge(provider);
        self
    }

    /// Builds the runtime.
    pub fn build(self) -> ConfigResult<ParleyRuntime> {
        let config = self.config_loader.load()?;
        Ok(ParleyRuntime::from_config(&config))
    }
}

impl Default for RuntimeBuilder {
    fn default() -> Self {
        Self::new()
    }
}
