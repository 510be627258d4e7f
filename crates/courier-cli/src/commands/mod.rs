//! CLI commands.

pub(crate) mod config;
pub(crate) mod run;
pub(crate) mod types;
