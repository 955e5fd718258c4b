use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use todc_contention::bench::{render_reports, thread_heading, Benchmark};
use todc_contention::config::BenchConfig;

/// Replays synthetic workloads against a record of independently-locked
/// fields and reports how the accesses were spread.
#[derive(Debug, Parser)]
#[command(name = "todc-contention", version, about)]
struct Cli {
    /// TOML configuration file. Built-in scenarios are used when omitted.
    #[arg(long, env = "TODC_CONTENTION_CONFIG")]
    config: Option<PathBuf>,

    /// Number of fields in the shared record.
    #[arg(long)]
    fields: Option<usize>,

    /// Number of operations generated per scenario.
    #[arg(long)]
    operations: Option<usize>,

    /// Largest number of concurrent executors to run.
    #[arg(long)]
    max_threads: Option<usize>,

    /// Directory for generated workload logs.
    #[arg(long)]
    output_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Write a workload log for every scenario without running them.
    Generate,
    /// Generate every workload log, then run each with 1..=max-threads executors.
    Run,
    /// Run a single existing workload log.
    Replay {
        log: PathBuf,
        #[arg(long, default_value_t = 1)]
        threads: usize,
    },
}

impl Cli {
    fn bench_config(&self) -> Result<BenchConfig> {
        let mut config = match &self.config {
            Some(path) => BenchConfig::from_file(path)
                .with_context(|| format!("failed to load config from {}", path.display()))?,
            None => BenchConfig::default(),
        };
        if let Some(fields) = self.fields {
            config.fields = fields;
        }
        if let Some(operations) = self.operations {
            config.operations = operations;
        }
        if let Some(max_threads) = self.max_threads {
            config.max_threads = max_threads;
        }
        if let Some(output_dir) = &self.output_dir {
            config.output_dir = output_dir.clone();
        }
        Ok(config)
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let benchmark = Benchmark::new(cli.bench_config()?);

    match cli.command.unwrap_or(Command::Run) {
        Command::Generate => {
            benchmark
                .generate_logs()
                .context("failed to generate workload logs")?;
        }
        Command::Run => {
            let reports = benchmark.run_all().context("failed to run benchmark")?;
            println!("{}", render_reports(&reports));
        }
        Command::Replay { log, threads } => {
            let report = benchmark
                .run_log(&log, threads)
                .with_context(|| format!("failed to run {}", log.display()))?;
            println!("{}", thread_heading(threads));
            println!("{report}");
        }
    }
    Ok(())
}
