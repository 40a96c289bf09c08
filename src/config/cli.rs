//! CLI argument parsing using clap

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// olbench - Benchmark tool for OpenLambda
#[derive(Parser, Debug)]
#[command(name = "olbench")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Register functions from a workload JSON file
    Register(RegisterArgs),
    /// Run the calls of a workload JSON file against the target
    Run(RunArgs),
    /// Generate a workload with one function and call per package
    Generate(GenerateArgs),
}

#[derive(Args, Debug)]
pub struct RegisterArgs {
    /// Workload file
    #[arg(short, long, default_value = "workload.json")]
    pub workload: PathBuf,

    /// Path location for the OpenLambda environment
    #[arg(short, long, default_value = "default-ol")]
    pub path: PathBuf,
}

/// Run options
///
/// Every setting is optional so that values from `--config` are only
/// overridden by flags actually given.
#[derive(Args, Debug, Default)]
pub struct RunArgs {
    /// TOML file with run settings
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Workload file [default: workload.json]
    #[arg(short, long)]
    pub workload: Option<PathBuf>,

    /// Target port [default: 5000]
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Target host [default: localhost]
    #[arg(long)]
    pub host: Option<String>,

    /// Number of concurrent workers [default: 1]
    #[arg(short, long)]
    pub tasks: Option<usize>,

    /// Write the run summary to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Write one CSV row per completed call
    #[arg(long)]
    pub results_csv: Option<PathBuf>,

    /// Request queue capacity [default: 8]
    #[arg(long)]
    pub queue_capacity: Option<usize>,

    /// Per-request timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,
}

#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Packages to generate functions for (comma-separated)
    #[arg(long, value_delimiter = ',', required = true)]
    pub packages: Vec<String>,

    /// Output workload file
    #[arg(short, long, default_value = "workload.json")]
    pub out: PathBuf,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate CLI arguments
    pub fn validate(&self) -> anyhow::Result<()> {
        match &self.command {
            Command::Run(args) => {
                if args.tasks == Some(0) {
                    anyhow::bail!("tasks must be at least 1");
                }
                if args.queue_capacity == Some(0) {
                    anyhow::bail!("queue_capacity must be at least 1");
                }
            }
            Command::Generate(args) => {
                if args.packages.iter().any(|p| p.trim().is_empty()) {
                    anyhow::bail!("package names must not be empty");
                }
            }
            Command::Register(_) => {}
        }
        Ok(())
    }
}
