//! Source-annotated display for `courier config show`.

use std::fmt::Write as _;
use std::str::FromStr;

use crate::error::{ConfigError, ConfigResult};
use crate::merge::FieldSources;
use crate::types::Config;

/// A resolved configuration together with where each value came from.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// The final merged configuration.
    pub config: Config,
    /// Dotted field path to the layer that set it.
    pub field_sources: FieldSources,
    /// Config files that were merged, in order.
    pub loaded_files: Vec<String>,
    /// Number of environment fallbacks applied.
    pub env_applied: usize,
}

/// Output format for `config show`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ShowFormat {
    /// TOML with a trailing comment naming each value's source.
    #[default]
    Toml,
    /// Plain JSON.
    Json,
}

impl FromStr for ShowFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "toml" => Ok(Self::Toml),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::RenderError(format!(
                "unknown output format `{other}`; expected toml or json"
            ))),
        }
    }
}

impl ResolvedConfig {
    /// Render the resolved configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::RenderError`] if serialization fails.
    pub fn show(&self, format: ShowFormat) -> ConfigResult<String> {
        match format {
            ShowFormat::Toml => self.show_toml(),
            ShowFormat::Json => serde_json::to_string_pretty(&self.config)
                .map_err(|e| ConfigError::RenderError(e.to_string())),
        }
    }

    fn show_toml(&self) -> ConfigResult<String> {
        let body = toml::to_string_pretty(&self.config)
            .map_err(|e| ConfigError::RenderError(e.to_string()))?;

        let mut output = String::new();
        output.push_str("# Resolved Courier configuration\n");
        output.push_str("# Source annotations: [defaults] [file] [env]\n");
        for path in &self.loaded_files {
            let _ = writeln!(output, "# Loaded: {path}");
        }
        output.push('\n');

        let mut section = String::new();
        for line in body.lines() {
            let trimmed = line.trim();
            if let Some(name) = trimmed.strip_prefix('[').and_then(|s| s.strip_suffix(']')) {
                section = name.to_owned();
            }
            match self.annotate(trimmed, &section) {
                Some(layer) => {
                    let _ = writeln!(output, "{line}  # [{layer}]");
                },
                None => {
                    output.push_str(line);
                    output.push('\n');
                },
            }
        }

        Ok(output)
    }

    fn annotate(&self, line: &str, section: &str) -> Option<String> {
        if line.is_empty() || line.starts_with('#') || line.starts_with('[') {
            return None;
        }
        let key = line.split('=').next()?.trim();
        let path = if section.is_empty() {
            key.to_owned()
        } else {
            format!("{section}.{key}")
        };
        self.field_sources.get(&path).map(ToString::to_string)
    }
}
