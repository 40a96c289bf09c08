//! Workload definition structures
//!
//! A workload file is a JSON document with an ordered list of calls to replay
//! and, separately, the function bodies used by registration:
//!
//! ```json
//! {
//!   "funcs": [{"name": "fn0", "code": ["def f(event):\n", "    return 'fn0'"]}],
//!   "calls": [{"name": "fn0"}]
//! }
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;

/// One invocation request to the benchmark target
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Call {
    /// Name of the target function
    pub name: String,
}

impl Call {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl fmt::Display for Call {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Named function body, consumed by registration only
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionDescriptor {
    /// Function name (also the registry file name)
    pub name: String,
    /// Source lines, joined with newlines when written
    #[serde(default)]
    pub code: Vec<String>,
}

impl FunctionDescriptor {
    /// Source text as written to the registry
    pub fn source(&self) -> String {
        self.code.join("\n")
    }
}

/// Complete workload: calls to replay plus functions to register
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Workload {
    #[serde(default)]
    pub calls: Vec<Call>,
    #[serde(default)]
    pub funcs: Vec<FunctionDescriptor>,
}

impl Workload {
    /// Load and validate a workload file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read workload file: {}", path.display()))?;

        let workload = Self::from_json(&contents)
            .with_context(|| format!("Failed to parse workload file: {}", path.display()))?;

        tracing::debug!(
            path = %path.display(),
            calls = workload.calls.len(),
            funcs = workload.funcs.len(),
            "Use workload"
        );
        Ok(workload)
    }

    /// Decode and validate a workload from a JSON string
    pub fn from_json(contents: &str) -> Result<Self> {
        let workload: Workload =
            serde_json::from_str(contents).context("Failed to decode workload JSON")?;
        super::validator::validate_workload(&workload)?;
        Ok(workload)
    }

    /// Write the workload as pretty-printed JSON
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("Failed to encode workload")?;
        fs::write(path, json)
            .with_context(|| format!("Failed to write workload file: {}", path.display()))?;
        tracing::info!(path = %path.display(), "Dump workload");
        Ok(())
    }

    /// Name for the next generated function
    fn next_name(&self) -> String {
        format!("fn{}", self.funcs.len())
    }

    /// Append a generated function that installs `packages` and imports
    /// `imports`, returning its name
    pub fn add_func(&mut self, packages: &[String], imports: &[String]) -> String {
        let name = self.next_name();
        let mut code = Vec::new();
        if !packages.is_empty() {
            code.push(format!("# ol-install: {}\n", packages.join(", ")));
        }
        if !imports.is_empty() {
            code.push(format!("import {}\n", imports.join(", ")));
        }
        code.push("def f(event):\n".to_string());
        code.push(format!("    return '{}'", name));

        self.funcs.push(FunctionDescriptor {
            name: name.clone(),
            code,
        });
        name
    }

    /// Append a call to a function
    pub fn add_call(&mut self, name: impl Into<String>) {
        self.calls.push(Call::new(name));
    }

    /// One function and one call per package
    pub fn each_package_once(packages: &[String]) -> Self {
        let mut workload = Self::default();
        for package in packages {
            let name = workload.add_func(std::slice::from_ref(package), &[]);
            workload.add_call(name);
        }
        workload
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_from_json_full() {
        let workload = Workload::from_json(
            r#"{
                "funcs": [{"name": "fn0", "code": ["def f(event):", "    return 1"]}],
                "calls": [{"name": "fn0"}, {"name": "fn0", "data": {}}]
            }"#,
        )
        .unwrap();

        assert_eq!(workload.calls, vec![Call::new("fn0"), Call::new("fn0")]);
        assert_eq!(workload.funcs.len(), 1);
        assert_eq!(workload.funcs[0].source(), "def f(event):\n    return 1");
    }

    #[test]
    fn test_from_json_missing_sections_default_to_empty() {
        let workload = Workload::from_json("{}").unwrap();
        assert!(workload.calls.is_empty());
        assert!(workload.funcs.is_empty());
    }

    #[test]
    fn test_from_json_rejects_untyped_call() {
        assert!(Workload::from_json(r#"{"calls": [{"name": 7}]}"#).is_err());
        assert!(Workload::from_json(r#"{"calls": [{}]}"#).is_err());
    }

    #[test]
    fn test_from_json_rejects_empty_call_name() {
        assert!(Workload::from_json(r#"{"calls": [{"name": ""}]}"#).is_err());
    }

    #[test]
    fn test_add_func_code_lines() {
        let mut workload = Workload::default();
        let name = workload.add_func(&["numpy".to_string()], &["numpy".to_string()]);

        assert_eq!(name, "fn0");
        assert_eq!(
            workload.funcs[0].code,
            vec![
                "# ol-install: numpy\n".to_string(),
                "import numpy\n".to_string(),
                "def f(event):\n".to_string(),
                "    return 'fn0'".to_string(),
            ]
        );
    }

    #[test]
    fn test_each_package_once() {
        let packages = vec!["flask".to_string(), "six".to_string()];
        let workload = Workload::each_package_once(&packages);

        assert_eq!(workload.funcs.len(), 2);
        assert_eq!(workload.calls, vec![Call::new("fn0"), Call::new("fn1")]);
        assert_eq!(workload.funcs[1].code[0], "# ol-install: six\n");
    }

    #[test]
    fn test_save_then_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("workload.json");
        let workload = Workload::each_package_once(&["requests".to_string()]);

        workload.save(&path).unwrap();
        assert_eq!(Workload::load(&path).unwrap(), workload);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = Workload::load(&dir.path().join("nope.json")).unwrap_err();
        assert!(err.to_string().contains("Failed to read workload file"));
    }
}
