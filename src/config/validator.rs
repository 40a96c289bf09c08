//! Configuration validation

use super::*;
use anyhow::Result;
use std::collections::HashSet;

/// Validate run configuration
pub fn validate_run_config(config: &RunConfig) -> Result<()> {
    if config.tasks == 0 {
        anyhow::bail!("tasks must be at least 1");
    }

    if config.queue_capacity == 0 {
        anyhow::bail!("queue_capacity must be at least 1");
    }

    if config.host.trim().is_empty() {
        anyhow::bail!("host must not be empty");
    }

    if config.port == 0 {
        anyhow::bail!("port must be between 1 and 65535");
    }

    if config.timeout_secs == Some(0) {
        anyhow::bail!("timeout must be at least 1 second");
    }

    Ok(())
}

/// Validate a decoded workload
pub fn validate_workload(workload: &Workload) -> Result<()> {
    for (i, call) in workload.calls.iter().enumerate() {
        if call.name.is_empty() {
            anyhow::bail!("calls[{}]: name must not be empty", i);
        }
    }

    let mut seen = HashSet::new();
    for (i, func) in workload.funcs.iter().enumerate() {
        validate_function_name(&func.name)
            .map_err(|e| anyhow::anyhow!("funcs[{}]: {}", i, e))?;
        if !seen.insert(func.name.as_str()) {
            anyhow::bail!("funcs[{}]: duplicate function name '{}'", i, func.name);
        }
    }

    if workload.calls.is_empty() {
        tracing::warn!("Workload contains no calls");
    }

    Ok(())
}

/// Function names become registry file names, so they must be a single
/// path component
fn validate_function_name(name: &str) -> Result<()> {
    if name.is_empty() {
        anyhow::bail!("name must not be empty");
    }
    if name == "." || name == ".." || name.contains('/') || name.contains('\\') {
        anyhow::bail!("invalid function name '{}'", name);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_default_run_config() {
        assert!(validate_run_config(&RunConfig::default()).is_ok());
    }

    #[test]
    fn test_validate_run_config_rejects_bad_values() {
        let bad = [
            RunConfig { tasks: 0, ..RunConfig::default() },
            RunConfig { queue_capacity: 0, ..RunConfig::default() },
            RunConfig { host: " ".to_string(), ..RunConfig::default() },
            RunConfig { port: 0, ..RunConfig::default() },
            RunConfig { timeout_secs: Some(0), ..RunConfig::default() },
        ];
        for config in &bad {
            assert!(validate_run_config(config).is_err(), "accepted {:?}", config);
        }
    }

    #[test]
    fn test_validate_workload_function_names() {
        let mut workload = Workload::default();
        workload.funcs.push(FunctionDescriptor {
            name: "../escape".to_string(),
            code: vec![],
        });
        assert!(validate_workload(&workload).is_err());
    }

    #[test]
    fn test_validate_workload_duplicate_functions() {
        let func = FunctionDescriptor {
            name: "fn0".to_string(),
            code: vec![],
        };
        let workload = Workload {
            calls: vec![Call::new("fn0")],
            funcs: vec![func.clone(), func],
        };
        let err = validate_workload(&workload).unwrap_err();
        assert!(err.to_string().contains("duplicate"));
    }

    #[test]
    fn test_validate_workload_allows_repeated_calls() {
        let workload = Workload {
            calls: vec![Call::new("fn0"), Call::new("fn0")],
            funcs: vec![],
        };
        assert!(validate_workload(&workload).is_ok());
    }
}
