//! Post-merge configuration validation.

use crate::error::{ConfigError, ConfigResult};
use crate::types::Config;

/// Upper bound on `dispatcher.queue_capacity`.
pub const MAX_QUEUE_CAPACITY: usize = 1_000_000;

/// Upper bound on `demo.step_delay_ms` (one minute).
pub const MAX_STEP_DELAY_MS: u64 = 60_000;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];
const LOG_FORMATS: &[&str] = &["pretty", "compact", "json", "full"];
const LOG_TARGETS: &[&str] = &["stderr", "stdout", "file"];
const LOG_ROTATIONS: &[&str] = &["daily", "hourly", "never"];

/// Validate a fully merged and deserialized configuration.
///
/// # Errors
///
/// Returns the first validation error found.
pub fn validate(config: &Config) -> ConfigResult<()> {
    validate_dispatcher(config)?;
    validate_logging(config)?;
    validate_demo(config)?;
    Ok(())
}

fn invalid(field: &str, message: String) -> ConfigError {
    ConfigError::ValidationError {
        field: field.to_owned(),
        message,
    }
}

fn validate_dispatcher(config: &Config) -> ConfigResult<()> {
    let d = &config.dispatcher;

    if d.queue_capacity == 0 || d.queue_capacity > MAX_QUEUE_CAPACITY {
        return Err(invalid(
            "dispatcher.queue_capacity",
            format!(
                "{} is out of range; must be between 1 and {MAX_QUEUE_CAPACITY}",
                d.queue_capacity
            ),
        ));
    }

    if d.handler_timeout_ms == Some(0) {
        return Err(invalid(
            "dispatcher.handler_timeout_ms",
            "must be greater than 0; remove the key to disable the timeout".to_owned(),
        ));
    }

    Ok(())
}

fn validate_logging(config: &Config) -> ConfigResult<()> {
    let l = &config.logging;

    if !LOG_LEVELS.contains(&l.level.to_ascii_lowercase().as_str()) {
        return Err(invalid(
            "logging.level",
            format!(
                "unsupported level '{}'; expected one of: {}",
                l.level,
                LOG_LEVELS.join(", ")
            ),
        ));
    }

    if !LOG_FORMATS.contains(&l.format.to_ascii_lowercase().as_str()) {
        return Err(invalid(
            "logging.format",
            format!(
                "unsupported format '{}'; expected one of: {}",
                l.format,
                LOG_FORMATS.join(", ")
            ),
        ));
    }

    if let Some(empty) = l.directives.iter().position(|d| d.trim().is_empty()) {
        return Err(invalid(
            "logging.directives",
            format!("directive #{empty} is empty"),
        ));
    }

    let target = l.target.to_ascii_lowercase();
    if !LOG_TARGETS.contains(&target.as_str()) {
        return Err(invalid(
            "logging.target",
            format!(
                "unsupported target '{}'; expected one of: {}",
                l.target,
                LOG_TARGETS.join(", ")
            ),
        ));
    }

    if target == "file" && l.directory.is_none() {
        return Err(invalid(
            "logging.directory",
            "required when logging.target is \"file\"".to_owned(),
        ));
    }

    if !LOG_ROTATIONS.contains(&l.rotation.to_ascii_lowercase().as_str()) {
        return Err(invalid(
            "logging.rotation",
            format!(
                "unsupported rotation '{}'; expected one of: {}",
                l.rotation,
                LOG_ROTATIONS.join(", ")
            ),
        ));
    }

    if l.file_prefix.trim().is_empty() {
        return Err(invalid(
            "logging.file_prefix",
            "must not be empty".to_owned(),
        ));
    }

    Ok(())
}

fn validate_demo(config: &Config) -> ConfigResult<()> {
    if config.demo.step_delay_ms > MAX_STEP_DELAY_MS {
        return Err(invalid(
            "demo.step_delay_ms",
            format!(
                "{} exceeds the {MAX_STEP_DELAY_MS} ms limit",
                config.demo.step_delay_ms
            ),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field_of(result: ConfigResult<()>) -> String {
        match result {
            Err(ConfigError::ValidationError { field, .. }) => field,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate(&Config::default()).is_ok());
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let mut config = Config::default();
        config.dispatcher.queue_capacity = 0;
        assert_eq!(field_of(validate(&config)), "dispatcher.queue_capacity");
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let mut config = Config::default();
        config.dispatcher.handler_timeout_ms = Some(0);
        assert_eq!(field_of(validate(&config)), "dispatcher.handler_timeout_ms");

        config.dispatcher.handler_timeout_ms = Some(1);
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_logging_values() {
        let mut config = Config::default();
        config.logging.level = "WARN".to_owned();
        assert!(validate(&config).is_ok());

        config.logging.level = "loud".to_owned();
        assert_eq!(field_of(validate(&config)), "logging.level");

        config.logging.level = "info".to_owned();
        config.logging.format = "xml".to_owned();
        assert_eq!(field_of(validate(&config)), "logging.format");

        config.logging.format = "json".to_owned();
        config.logging.directives = vec![" ".to_owned()];
        assert_eq!(field_of(validate(&config)), "logging.directives");
    }

    #[test]
    fn test_file_target_requires_directory() {
        let mut config = Config::default();
        config.logging.target = "file".to_owned();
        assert_eq!(field_of(validate(&config)), "logging.directory");

        config.logging.directory = Some("/tmp/courier".into());
        assert!(validate(&config).is_ok());

        config.logging.rotation = "weekly".to_owned();
        assert_eq!(field_of(validate(&config)), "logging.rotation");

        config.logging.rotation = "never".to_owned();
        config.logging.file_prefix = String::new();
        assert_eq!(field_of(validate(&config)), "logging.file_prefix");

        config.logging.file_prefix = "courier".to_owned();
        config.logging.target = "syslog".to_owned();
        assert_eq!(field_of(validate(&config)), "logging.target");
    }

    #[test]
    fn test_step_delay_limit() {
        let mut config = Config::default();
        config.demo.step_delay_ms = MAX_STEP_DELAY_MS.saturating_add(1);
        assert_eq!(field_of(validate(&config)), "demo.step_delay_ms");
    }
}
