//! Configuration validation utilities.

use super::error::{ConfigError, ConfigResult};
use super::schema::{BotConfig, LogOutput, LoggingConfig, ParleyConfig, RuntimeConfig};

/// Validates the entire configuration.
pub fn validate_config(config: &ParleyConfig) -> ConfigResult<()> {
    validate_bot_config(&config.bot)?;
    validate_runtime_config(&config.runtime)?;
    validate_logging_config(&config.logging)?;
    Ok(())
}

fn validate_bot_config(bot: &BotConfig) -> ConfigResult<()> {
    if let Some(prefix) = &bot.prefix {
        // Commands are split on spaces, so such a prefix could never match.
        if prefix.contains(' ') {
            return Err(ConfigError::validation(format!(
                "Command prefix cannot contain spaces: {prefix:?}"
            )));
        }
    }
    Ok(())
}

fn validate_runtime_config(runtime: &RuntimeConfig) -> ConfigResult<()> {
    if runtime.event_buffer == 0 {
        return Err(ConfigError::validation(
            "Event buffer must be greater than 0",
        ));
    }
    Ok(())
}

fn validate_logging_config(logging: &LoggingConfig) -> ConfigResult<()> {
    if logging.output == LogOutput::File && logging.file_path.is_none() {
        return Err(ConfigError::missing_field("logging.file_path"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&ParleyConfig::default()).is_ok());
    }

    #[test]
    fn test_prefix_with_space_is_rejected() {
        let mut config = ParleyConfig::default();
        config.bot.prefix = Some("hey bot".into());
        assert!(matches!(
            validate_config(&config),
            Err(ConfigError::ValidationError { .. })
        ));

        config.bot.prefix = Some("!".into());
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_zero_event_buffer_is_rejected() {
        let mut config = ParleyConfig::default();
        config.runtime.event_buffer = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_file_output_requires_path() {
        let mut config = ParleyConfig::default();
        config.logging.output = LogOutput::File;
        assert!(matches!(
            validate_config(&config),
            Err(ConfigError::MissingField { .. })
        ));

        config.logging.file_path = Some("parley.log".into());
        assert!(validate_config(&config).is_ok());
    }
}
