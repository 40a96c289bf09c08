//! TOML configuration file parsing

use super::RunConfig;
use crate::config::cli::RunArgs;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// Parse TOML configuration file
pub fn parse_toml_file(path: &Path) -> Result<RunConfig> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    parse_toml_string(&contents)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Parse TOML configuration from string
pub fn parse_toml_string(contents: &str) -> Result<RunConfig> {
    let config: RunConfig =
        ::toml::from_str(contents).context("Failed to parse TOML configuration")?;

    Ok(config)
}

/// Merge CLI arguments with a configuration (CLI takes precedence)
pub fn merge_cli_with_config(args: &RunArgs, mut config: RunConfig) -> RunConfig {
    if let Some(tasks) = args.tasks {
        config.tasks = tasks;
    }
    if let Some(ref host) = args.host {
        config.host = host.clone();
    }
    if let Some(port) = args.port {
        config.port = port;
    }
    if let Some(ref workload) = args.workload {
        config.workload = workload.clone();
    }
    if args.output.is_some() {
        config.output = args.output.clone();
    }
    if args.results_csv.is_some() {
        config.results_csv = args.results_csv.clone();
    }
    if let Some(capacity) = args.queue_capacity {
        config.queue_capacity = capacity;
    }
    if args.timeout.is_some() {
        config.timeout_secs = args.timeout;
    }

    config
}

/// Build the run configuration: config file (if any), then CLI overrides
pub fn load_run_config(args: &RunArgs) -> Result<RunConfig> {
    let base = match args.config {
        Some(ref path) => parse_toml_file(path)?,
        None => RunConfig::default(),
    };

    let config = merge_cli_with_config(args, base);
    super::validator::validate_run_config(&config)?;
    Ok(config)
}
