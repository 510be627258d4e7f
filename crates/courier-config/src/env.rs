//! Environment variable fallbacks.
//!
//! Env vars are a fallback, not an override: they only fill fields that no
//! config file set.

use std::collections::HashMap;
use std::hash::BuildHasher;

use tracing::debug;

use crate::merge::{ConfigLayer, FieldSources};

struct EnvMapping {
    var_name: &'static str,
    field_path: &'static str,
    kind: ValueKind,
}

#[derive(Clone, Copy)]
enum ValueKind {
    Integer,
    Boolean,
    Text,
}

/// Supported `COURIER_*` variables.
const ENV_MAPPINGS: &[EnvMapping] = &[
    EnvMapping {
        var_name: "COURIER_QUEUE_CAPACITY",
        field_path: "dispatcher.queue_capacity",
        kind: ValueKind::Integer,
    },
    EnvMapping {
        var_name: "COURIER_SUBMIT_MODE",
        field_path: "dispatcher.submit_mode",
        kind: ValueKind::Text,
    },
    EnvMapping {
        var_name: "COURIER_HANDLER_TIMEOUT_MS",
        field_path: "dispatcher.handler_timeout_ms",
        kind: ValueKind::Integer,
    },
    EnvMapping {
        var_name: "COURIER_LOG_LEVEL",
        field_path: "logging.level",
        kind: ValueKind::Text,
    },
    EnvMapping {
        var_name: "COURIER_LOG_FORMAT",
        field_path: "logging.format",
        kind: ValueKind::Text,
    },
    EnvMapping {
        var_name: "COURIER_LOG_TARGET",
        field_path: "logging.target",
        kind: ValueKind::Text,
    },
    EnvMapping {
        var_name: "COURIER_LOG_DIR",
        field_path: "logging.directory",
        kind: ValueKind::Text,
    },
    EnvMapping {
        var_name: "COURIER_DEMO_STEP_DELAY_MS",
        field_path: "demo.step_delay_ms",
        kind: ValueKind::Integer,
    },
    EnvMapping {
        var_name: "COURIER_DEMO_SIMULATE_LATENCY",
        field_path: "demo.simulate_latency",
        kind: ValueKind::Boolean,
    },
];

/// Names of every variable consulted by [`apply_env_fallbacks`].
#[must_use]
pub fn supported_vars() -> Vec<&'static str> {
    ENV_MAPPINGS.iter().map(|m| m.var_name).collect()
}

/// Apply environment fallbacks to fields not set by a config file.
///
/// Returns the number of variables applied.
pub fn apply_env_fallbacks<S: BuildHasher>(
    merged: &mut toml::Value,
    sources: &mut FieldSources,
    env_vars: &HashMap<String, String, S>,
) -> usize {
    let mut count: usize = 0;

    for mapping in ENV_MAPPINGS {
        let set_by_file = sources
            .get(mapping.field_path)
            .is_some_and(|layer| *layer == ConfigLayer::File);
        if set_by_file {
            continue;
        }

        if let Some(val) = env_vars.get(mapping.var_name) {
            debug!(
                var = mapping.var_name,
                field = mapping.field_path,
                "applying env var fallback"
            );
            set_field(merged, mapping.field_path, coerce(mapping.kind, val));
            sources.insert(mapping.field_path.to_owned(), ConfigLayer::Environment);
            count = count.saturating_add(1);
        }
    }

    count
}

/// Unparseable numbers and booleans stay strings, so deserialization reports
/// them against the right field.
fn coerce(kind: ValueKind, val: &str) -> toml::Value {
    let trimmed = val.trim();
    match kind {
        ValueKind::Integer => trimmed
            .parse::<i64>()
            .map_or_else(|_| toml::Value::String(val.to_owned()), toml::Value::Integer),
        ValueKind::Boolean => trimmed
            .parse::<bool>()
            .map_or_else(|_| toml::Value::String(val.to_owned()), toml::Value::Boolean),
        ValueKind::Text => toml::Value::String(trimmed.to_owned()),
    }
}

fn set_field(root: &mut toml::Value, path: &str, value: toml::Value) {
    let Some((parents, leaf)) = path.rsplit_once('.') else {
        if let Some(table) = root.as_table_mut() {
            table.insert(path.to_owned(), value);
        }
        return;
    };

    let mut current = root;
    for segment in parents.split('.') {
        let Some(table) = current.as_table_mut() else {
            return;
        };
        current = table
            .entry(segment.to_owned())
            .or_insert_with(|| toml::Value::Table(toml::map::Map::new()));
    }

    if let Some(table) = current.as_table_mut() {
        table.insert(leaf.to_owned(), value);
    }
}

/// Collect all current environment variables into a map.
#[must_use]
pub fn collect_env_vars() -> HashMap<String, String> {
    std::env::vars().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect()
    }

    #[test]
    fn test_env_fills_default_fields() {
        let mut merged: toml::Value = toml::from_str("[logging]\nlevel = \"info\"").unwrap();
        let mut sources = FieldSources::new();
        sources.insert("logging.level".to_owned(), ConfigLayer::Defaults);
        let env = make_env(&[
            ("COURIER_LOG_LEVEL", "debug"),
            ("COURIER_QUEUE_CAPACITY", "7"),
        ]);

        let count = apply_env_fallbacks(&mut merged, &mut sources, &env);

        assert_eq!(count, 2);
        assert_eq!(merged["logging"]["level"].as_str(), Some("debug"));
        assert_eq!(merged["dispatcher"]["queue_capacity"].as_integer(), Some(7));
        assert_eq!(
            sources.get("dispatcher.queue_capacity"),
            Some(&ConfigLayer::Environment)
        );
    }

    #[test]
    fn test_env_skips_file_fields() {
        let mut merged: toml::Value = toml::from_str("[logging]\nlevel = \"warn\"").unwrap();
        let mut sources = FieldSources::new();
        sources.insert("logging.level".to_owned(), ConfigLayer::File);
        let env = make_env(&[("COURIER_LOG_LEVEL", "debug")]);

        let count = apply_env_fallbacks(&mut merged, &mut sources, &env);

        assert_eq!(count, 0);
        assert_eq!(merged["logging"]["level"].as_str(), Some("warn"));
    }

    #[test]
    fn test_coerce() {
        assert_eq!(coerce(ValueKind::Integer, " 12 ").as_integer(), Some(12));
        assert_eq!(coerce(ValueKind::Integer, "many").as_str(), Some("many"));
        assert_eq!(coerce(ValueKind::Boolean, "false").as_bool(), Some(false));
        assert_eq!(coerce(ValueKind::Text, " detached ").as_str(), Some("detached"));
    }

    #[test]
    fn test_supported_vars() {
        let vars = supported_vars();
        assert!(vars.contains(&"COURIER_SUBMIT_MODE"));
        assert!(vars.iter().all(|v| v.starts_with("COURIER_")));
    }
}
