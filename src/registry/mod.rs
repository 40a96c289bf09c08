//! Function registration
//!
//! Writes each function body of a workload to `{base}/registry/{name}` before
//! a benchmark run. Registration never overwrites: a function whose file
//! already exists is skipped, so re-running it is harmless. New files are
//! created owner-read-only (`0400`).

use crate::config::FunctionDescriptor;
use anyhow::{Context, Result};
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

/// Name of the registry directory under the environment base path
pub const REGISTRY_DIR: &str = "registry";

/// Permission bits of registered function files
pub const REGISTERED_FILE_MODE: u32 = 0o400;

/// What a registration pass did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistrationSummary {
    /// Functions written
    pub registered: Vec<String>,
    /// Functions whose file already existed
    pub skipped: Vec<String>,
}

/// Registry directory for an environment base path
pub fn registry_dir(base: &Path) -> PathBuf {
    base.join(REGISTRY_DIR)
}

/// Register every function under `base`
///
/// Creates the registry directory when missing. Stops at the first write
/// error; functions registered before it stay on disk.
pub fn register(funcs: &[FunctionDescriptor], base: &Path) -> Result<RegistrationSummary> {
    let dir = registry_dir(base);
    tracing::debug!(path = %dir.display(), "Registry base path");
    fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create registry directory: {}", dir.display()))?;

    let mut summary = RegistrationSummary::default();
    for func in funcs {
        let path = dir.join(&func.name);
        if write_new(&path, func.source().as_bytes())? {
            tracing::debug!(name = %func.name, path = %path.display(), "Register function");
            summary.registered.push(func.name.clone());
        } else {
            tracing::debug!(name = %func.name, path = %path.display(), "Skip existing function");
            summary.skipped.push(func.name.clone());
        }
    }

    tracing::info!(
        registered = summary.registered.len(),
        skipped = summary.skipped.len(),
        "Registration complete"
    );
    Ok(summary)
}

/// Create `path` with `contents` unless it exists. Returns whether it wrote.
fn write_new(path: &Path, contents: &[u8]) -> Result<bool> {
    let mut options = OpenOptions::new();
    options.write(true).create_new(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(REGISTERED_FILE_MODE);
    }

    let mut file = match options.open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::AlreadyExists => return Ok(false),
        Err(e) => {
            return Err(e).with_context(|| format!("Failed to create {}", path.display()));
        }
    };

    file.write_all(contents)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(true)
}
