//! olbench CLI entry point

use anyhow::{Context, Result};
use olbench::config::cli::{Cli, Command, GenerateArgs, RegisterArgs, RunArgs};
use olbench::config::toml::load_run_config;
use olbench::config::Workload;
use olbench::coordinator::Dispatcher;
use olbench::output::json::{emit_summary, SummarySink};
use olbench::output::{csv, text};
use olbench::transport::http::HttpTransport;
use olbench::util::logging;
use std::sync::Arc;

fn main() -> Result<()> {
    let cli = Cli::parse_args();
    cli.validate()?;
    logging::init(cli.verbose);

    match cli.command {
        Command::Register(args) => run_register(args),
        Command::Run(args) => run_benchmark(args),
        Command::Generate(args) => run_generate(args),
    }
}

/// Write the workload's functions into the environment registry
fn run_register(args: RegisterArgs) -> Result<()> {
    let workload = Workload::load(&args.workload)?;
    olbench::registry::register(&workload.funcs, &args.path)
        .context("Function registration failed")?;
    Ok(())
}

/// Run the workload's calls and report throughput
fn run_benchmark(args: RunArgs) -> Result<()> {
    let config = load_run_config(&args).context("Configuration validation failed")?;
    tracing::debug!("Run configuration:\n{}", config);

    let workload = Workload::load(&config.workload)?;
    let transport = HttpTransport::new(config.base_url(), config.timeout())
        .context("Failed to create HTTP client")?;

    let logger = tracing::info_span!("run", url = %config.base_url(), tasks = config.tasks);
    let dispatcher = Dispatcher::from_config(&config, Arc::new(transport), logger);

    let report = dispatcher
        .run(workload.calls)
        .context("Benchmark run failed")?;

    if let Some(ref path) = config.results_csv {
        csv::write_results(path, &report.results)?;
    }
    text::log_results(&report);
    emit_summary(&SummarySink::from_output(config.output.as_deref()), &report.summary)
}

/// Generate a workload with one function and one call per package
fn run_generate(args: GenerateArgs) -> Result<()> {
    let packages: Vec<String> = args.packages.iter().map(|p| p.trim().to_string()).collect();
    let workload = Workload::each_package_once(&packages);
    workload.save(&args.out)
}
