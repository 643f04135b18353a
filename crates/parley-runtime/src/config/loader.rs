//! Layered configuration loading with figment.
//!
//! Sources, lowest priority first:
//!
//! 1. Built-in defaults ([`ParleyConfig::default`])
//! 2. Profile file (`parley.{profile}.toml`), next to the main file
//! 3. Main file (`parley.toml` or `config.toml`; YAML names behind `yaml-config`)
//! 4. `PARLEY_*` environment variables, `__` separating nested keys
//! 5. Programmatic overrides ([`ConfigLoader::set`], [`ConfigLoader::merge`])
//!
//! Environment examples:
//!
//! - `PARLEY_BOT__PREFIX=!` sets `bot.prefix`
//! - `PARLEY_LOGGING__LEVEL=debug` sets `logging.level`
//! - `PARLEY_ADAPTERS__CONSOLE__BOT_NAME=dice` sets `adapters.console.bot_name`
//!
//! `PARLEY_PROFILE` selects the profile and is not read as a key.
//!
//! ```rust,ignore
//! use parley_runtime::config::ConfigLoader;
//!
//! let config = ConfigLoader::new()
//!     .profile("production")
//!     .file("./config/parley.toml")
//!     .set("bot.prefix", "!")
//!     .load()?;
//! ```

use std::path::{Path, PathBuf};

use figment::providers::{Env, Serialized};
#[cfg(any(feature = "yaml-config", feature = "toml-config"))]
use figment::providers::Format;
#[cfg(feature = "toml-config")]
use figment::providers::Toml;
#[cfg(feature = "yaml-config")]
use figment::providers::Yaml;
use figment::{Figment, Provider};
use serde::Serialize;
use tracing::{debug, info, trace, warn};

use super::error::{ConfigError, ConfigResult};
use super::schema::ParleyConfig;
use super::validation::validate_config;

const ENV_PREFIX: &str = "PARLEY_";
const PROFILE_ENV: &str = "PARLEY_PROFILE";

/// File names tried in each search path, in order, per enabled format.
#[cfg(feature = "toml-config")]
const TOML_NAMES: &[&str] = &["parley.toml", "config.toml"];
#[cfg(feature = "yaml-config")]
const YAML_NAMES: &[&str] = &["parley.yaml", "parley.yml", "config.yaml", "config.yml"];

/// Configuration profile, used to pick `parley.{profile}.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Profile {
    #[default]
    Development,
    Production,
    Custom(String),
}

impl Profile {
    /// Returns the profile name as used in file names.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Development => "development",
            Self::Production => "production",
            Self::Custom(name) => name,
        }
    }

    /// Parses a profile name, accepting the short forms `dev` and `prod`.
    pub fn parse(name: &str) -> Self {
        match name.to_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            "development" | "dev" => Self::Development,
            other => Self::Custom(other.to_string()),
        }
    }

    /// Reads the profile from `PARLEY_PROFILE`, defaulting to development.
    pub fn from_env() -> Self {
        std::env::var(PROFILE_ENV)
            .map(|p| Self::parse(&p))
            .unwrap_or_default()
    }
}

impl std::fmt::Display for Profile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Builds a [`ParleyConfig`] from layered sources.
pub struct ConfigLoader {
    profile: Profile,
    search_paths: Vec<PathBuf>,
    config_file: Option<PathBuf>,
    load_env: bool,
    /// Applied on top of every other source.
    overrides: Figment,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    /// Creates a loader with the profile taken from `PARLEY_PROFILE`.
    pub fn new() -> Self {
        Self {
            profile: Profile::from_env(),
            search_paths: Vec::new(),
            config_file: None,
            load_env: true,
            overrides: Figment::new(),
        }
    }

    /// Sets the configuration profile.
    pub fn profile(mut self, profile: impl Into<String>) -> Self {
        self.profile = Profile::parse(&profile.into());
        self
    }

    /// Adds a directory to search for configuration files.
    ///
    /// Without any search path the current directory and the user config
    /// directory (e.g. `~/.config/parley`) are searched.
    pub fn search_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.search_paths.push(path.as_ref().to_path_buf());
        self
    }

    /// Adds the current directory to the search paths.
    pub fn with_current_dir(self) -> Self {
        match std::env::current_dir() {
            Ok(cwd) => self.search_path(cwd),
            Err(_) => self,
        }
    }

    /// Loads exactly this file instead of searching. It must exist.
    pub fn file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config_file = Some(path.as_ref().to_path_buf());
        self
    }

    /// Skips the `PARLEY_*` environment variables.
    pub fn without_env(mut self) -> Self {
        self.load_env = false;
        self
    }

    /// Overrides one key, e.g. `set("bot.prefix", "!")`.
    pub fn set<V: Serialize>(self, key: &str, value: V) -> Self {
        self.merge(Serialized::default(key, value))
    }

    /// Merges any figment provider on top of files and environment.
    ///
    /// `Serialized::defaults(config)` replaces every key with the values of
    /// `config`, defaults included; use [`set`](Self::set) to change only
    /// some keys.
    pub fn merge<P: Provider>(mut self, provider: P) -> Self {
        self.overrides = self.overrides.merge(provider);
        self
    }

    /// Loads, validates and returns the configuration.
    pub fn load(self) -> ConfigResult<ParleyConfig> {
        let profile = self.profile.clone();
        let config: ParleyConfig = self.build_figment()?.extract()?;
        validate_config(&config)?;

        debug!(
            profile = %profile,
            logging_level = %config.logging.level,
            adapters = config.adapters.len(),
            "Configuration loaded"
        );
        Ok(config)
    }

    fn build_figment(self) -> ConfigResult<Figment> {
        let mut figment = Figment::from(Serialized::defaults(ParleyConfig::default()));

        figment = match &self.config_file {
            Some(path) if !path.exists() => return Err(ConfigError::FileNotFound(path.clone())),
            Some(path) => {
                info!(path = %path.display(), "Loading configuration file");
                merge_file(figment, path)?
            }
            None => self.merge_found_files(figment),
        };

        if self.load_env {
            trace!("Reading PARLEY_ environment variables");
            figment = figment.merge(Env::prefixed(ENV_PREFIX).ignore(&["PROFILE"]).split("__"));
        }

        Ok(figment.merge(self.overrides))
    }

    fn resolve_search_paths(&self) -> Vec<PathBuf> {
        if !self.search_paths.is_empty() {
            return self.search_paths.clone();
        }
        std::env::current_dir()
            .ok()
            .into_iter()
            .chain(dirs::config_dir().map(|dir| dir.join("parley")))
            .collect()
    }

    /// Merges the profile variant and the first main file found for each
    /// enabled format.
    fn merge_found_files(&self, mut figment: Figment) -> Figment {
        let search_paths = self.resolve_search_paths();
        let mut found = false;

        #[cfg(feature = "toml-config")]
        if let Some(f) = self.merge_first(figment.clone(), &search_paths, TOML_NAMES) {
            figment = f;
            found = true;
        }

        #[cfg(feature = "yaml-config")]
        if let Some(f) = self.merge_first(figment.clone(), &search_paths, YAML_NAMES) {
            figment = f;
            found = true;
        }

        if !found {
            warn!("No configuration file found, using defaults");
        }
        figment
    }

    /// Looks for `names` in `search_paths`. For the first main file found,
    /// merges its profile variant (if present) and then the file itself.
    #[cfg(any(feature = "toml-config", feature = "yaml-config"))]
    fn merge_first(
        &self,
        mut figment: Figment,
        search_paths: &[PathBuf],
        names: &[&str],
    ) -> Option<Figment> {
        let main = search_paths
            .iter()
            .flat_map(|dir| names.iter().map(move |name| dir.join(name)))
            .find(|path| path.exists())?;

        let profiled = profile_variant(&main, &self.profile);
        if let Some(profiled) = profiled.filter(|p| p.exists()) {
            debug!(path = %profiled.display(), "Loading profile configuration");
            figment = merge_file(figment, &profiled).ok()?;
        }

        info!(path = %main.display(), "Loading configuration file");
        merge_file(figment, &main).ok()
    }
}

/// `dir/parley.toml` becomes `dir/parley.{profile}.toml`.
#[cfg(any(feature = "toml-config", feature = "yaml-config"))]
fn profile_variant(path: &Path, profile: &Profile) -> Option<PathBuf> {
    let stem = path.file_stem()?.to_str()?;
    let ext = path.extension()?.to_str()?;
    Some(path.with_file_name(format!("{stem}.{}.{ext}", profile.as_str())))
}

/// Merges one file, choosing the format by extension.
fn merge_file(figment: Figment, path: &Path) -> ConfigResult<Figment> {
    match path.extension().and_then(|e| e.to_str()).unwrap_or("") {
        #[cfg(feature = "toml-config")]
        "toml" => Ok(figment.merge(Toml::file(path))),
        #[cfg(feature = "yaml-config")]
        "yaml" | "yml" => Ok(figment.merge(Yaml::file(path))),
        ext => {
            let _ = figment;
            Err(ConfigError::ParseError(format!(
                "Unsupported or disabled configuration file format: .{ext}"
            )))
        }
    }
}

/// Loads one file plus `PARLEY_*` environment variables.
pub fn load_config_from_file<P: AsRef<Path>>(path: P) -> ConfigResult<ParleyConfig> {
    ConfigLoader::new().file(path).load()
}
