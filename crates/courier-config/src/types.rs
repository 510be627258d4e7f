//! Configuration types for Courier.
//!
//! These types do not depend on other courier crates. Domain types such as
//! the dispatcher's submit mode are mirrored here and converted at the
//! binary's boundary. Every struct implements [`Default`] matching
//! `defaults.toml`, so a bare `[section]` header produces a working value.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Queue and dispatch behavior.
    pub dispatcher: DispatcherSection,
    /// Log level, format and per-crate directives.
    pub logging: LoggingSection,
    /// Settings for the bundled demo scenario.
    pub demo: DemoSection,
}

// ---------------------------------------------------------------------------
// Dispatcher
// ---------------------------------------------------------------------------

/// How `submit` behaves when the queue is full.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubmitModeSetting {
    /// Caller waits for queue space.
    #[default]
    Blocking,
    /// Caller returns at once; a background task waits for space.
    Detached,
}

/// `[dispatcher]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatcherSection {
    /// Maximum number of events buffered between submitters and the loop.
    pub queue_capacity: usize,
    /// Back-pressure behavior of `submit`.
    pub submit_mode: SubmitModeSetting,
    /// Per-invocation time limit. Unset means no limit.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub handler_timeout_ms: Option<u64>,
}

impl Default for DispatcherSection {
    fn default() -> Self {
        Self {
            queue_capacity: 50,
            submit_mode: SubmitModeSetting::default(),
            handler_timeout_ms: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Logging
// ---------------------------------------------------------------------------

/// `[logging]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Base level: `trace`, `debug`, `info`, `warn` or `error`.
    pub level: String,
    /// Output format: `pretty`, `compact`, `json` or `full`.
    pub format: String,
    /// Extra filter directives such as `courier_events=debug`.
    pub directives: Vec<String>,
    /// Where logs go: `stderr`, `stdout` or `file`.
    pub target: String,
    /// Log directory. Required when `target = "file"`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub directory: Option<PathBuf>,
    /// Log file name prefix.
    pub file_prefix: String,
    /// File rotation: `daily`, `hourly` or `never`.
    pub rotation: String,
    /// Rotated files to keep. 0 keeps all of them.
    pub max_files: usize,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
            format: "pretty".to_owned(),
            directives: Vec::new(),
            target: "stderr".to_owned(),
            directory: None,
            file_prefix: "courier".to_owned(),
            rotation: "daily".to_owned(),
            max_files: 0,
        }
    }
}

// ---------------------------------------------------------------------------
// Demo
// ---------------------------------------------------------------------------

/// `[demo]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoSection {
    /// Pause between scenario events.
    pub step_delay_ms: u64,
    /// Whether domain handlers sleep to imitate real work.
    pub simulate_latency: bool,
}

impl Default for DemoSection {
    fn default() -> Self {
        Self {
            step_delay_ms: 800,
            simulate_latency: true,
        }
    }
}
