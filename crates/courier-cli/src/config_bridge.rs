//! Bridge from `courier_config::Config` to dispatcher, handler and logging
//! types.

use std::time::Duration;

use courier_config::{Config, SubmitModeSetting};
use courier_events::{DispatcherConfig, SubmitMode};
use courier_handlers::Latency;
use courier_telemetry::{FileRotation, LogConfig, LogFormat, LogTarget};

/// Convert config to [`DispatcherConfig`].
#[must_use]
pub(crate) fn to_dispatcher_config(cfg: &Config) -> DispatcherConfig {
    let submit_mode = match cfg.dispatcher.submit_mode {
        SubmitModeSetting::Blocking => SubmitMode::Blocking,
        SubmitModeSetting::Detached => SubmitMode::Detached,
    };

    let mut dispatcher = DispatcherConfig::default()
        .with_queue_capacity(cfg.dispatcher.queue_capacity)
        .with_submit_mode(submit_mode);

    if let Some(ms) = cfg.dispatcher.handler_timeout_ms {
        dispatcher = dispatcher.with_handler_timeout(Duration::from_millis(ms));
    }

    dispatcher
}

/// Convert config to [`LogConfig`].
#[must_use]
pub(crate) fn to_log_config(cfg: &Config) -> LogConfig {
    let format = cfg
        .logging
        .format
        .parse::<LogFormat>()
        .unwrap_or(LogFormat::Compact);

    let log = LogConfig::new(cfg.logging.level.to_ascii_lowercase())
        .with_format(format)
        .with_directives(cfg.logging.directives.iter().cloned());

    match (
        cfg.logging.target.to_ascii_lowercase().as_str(),
        &cfg.logging.directory,
    ) {
        ("stdout", _) => log.with_target(LogTarget::Stdout),
        ("file", Some(directory)) => {
            let rotation = cfg
                .logging
                .rotation
                .parse::<FileRotation>()
                .unwrap_or_default();
            log.with_file_logging(directory.clone(), cfg.logging.file_prefix.clone())
                .with_file_rotation(rotation, cfg.logging.max_files)
        },
        _ => log,
    }
}

/// Latency behavior for the domain handlers.
#[must_use]
pub(crate) fn to_latency(cfg: &Config) -> Latency {
    Latency::from_flag(cfg.demo.simulate_latency)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_dispatcher_config() {
        let dispatcher = to_dispatcher_config(&Config::default());
        assert_eq!(dispatcher, DispatcherConfig::default());
    }

    #[test]
    fn test_dispatcher_overrides() {
        let mut cfg = Config::default();
        cfg.dispatcher.queue_capacity = 3;
        cfg.dispatcher.submit_mode = SubmitModeSetting::Detached;
        cfg.dispatcher.handler_timeout_ms = Some(250);

        let dispatcher = to_dispatcher_config(&cfg);
        assert_eq!(dispatcher.queue_capacity, 3);
        assert_eq!(dispatcher.submit_mode, SubmitMode::Detached);
        assert_eq!(dispatcher.handler_timeout, Some(Duration::from_millis(250)));
    }

    #[test]
    fn test_log_config() {
        let mut cfg = Config::default();
        cfg.logging.level = "DEBUG".to_owned();
        cfg.logging.format = "json".to_owned();
        cfg.logging.directives = vec!["courier_events=trace".to_owned()];

        let log = to_log_config(&cfg);
        assert_eq!(log.level, "debug");
        assert_eq!(log.format, LogFormat::Json);
        assert_eq!(log.directives, vec!["courier_events=trace"]);
    }

    #[test]
    fn test_file_log_target() {
        let mut cfg = Config::default();
        cfg.logging.target = "file".to_owned();
        cfg.logging.directory = Some("/tmp/courier-logs".into());
        cfg.logging.file_prefix = "demo".to_owned();
        cfg.logging.rotation = "hourly".to_owned();
        cfg.logging.max_files = 6;

        let log = to_log_config(&cfg);
        assert_eq!(log.target, LogTarget::File("/tmp/courier-logs".into()));
        assert_eq!(log.file.prefix, "demo");
        assert_eq!(log.file.rotation, FileRotation::Hourly);
        assert_eq!(log.file.max_files, 6);
        assert!(!log.ansi);
    }

    #[test]
    fn test_console_log_targets() {
        let mut cfg = Config::default();
        assert_eq!(to_log_config(&cfg).target, LogTarget::Stderr);

        cfg.logging.target = "STDOUT".to_owned();
        assert_eq!(to_log_config(&cfg).target, LogTarget::Stdout);
    }

    #[test]
    fn test_queue_limits_agree() {
        assert_eq!(
            courier_config::validate::MAX_QUEUE_CAPACITY,
            courier_events::MAX_QUEUE_CAPACITY
        );
    }

    #[test]
    fn test_latency_flag() {
        let mut cfg = Config::default();
        assert_eq!(to_latency(&cfg), Latency::Simulated);
        cfg.demo.simulate_latency = false;
        assert_eq!(to_latency(&cfg), Latency::Disabled);
    }
}
