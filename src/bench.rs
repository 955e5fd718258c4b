//! Drives whole benchmark runs: generating workload logs, replaying them with
//! increasing numbers of threads and timing each replay.
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{info, info_span};

use crate::config::{BenchConfig, Scenario};
use crate::stats::StatsReport;
use crate::workload::{executor, log, Operation, WorkloadGenerator};
use crate::{Error, FieldStore};

/// The outcome of replaying one workload log with a fixed number of threads.
#[derive(Clone, Debug)]
pub struct RunReport {
    /// File name of the replayed log.
    pub scenario: String,
    pub threads: usize,
    /// Time spent replaying, excluding reading the log.
    pub elapsed: Duration,
    pub stats: StatsReport,
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} time: {:.6} s",
            self.scenario,
            self.elapsed.as_secs_f64()
        )?;
        writeln!(f, "{}", self.stats)?;
        write!(f, "-----------------------")
    }
}

/// Returns the heading printed before the runs that use `threads` executors.
pub fn thread_heading(threads: usize) -> String {
    match threads {
        1 => "Single thread execution".to_owned(),
        n => format!("{n} threads execution"),
    }
}

/// Renders reports in order, starting a new section under a
/// [`thread_heading`] whenever the thread count changes.
pub fn render_reports(reports: &[RunReport]) -> String {
    let mut lines = Vec::with_capacity(reports.len() * 2);
    let mut current_threads = None;
    for report in reports {
        if current_threads != Some(report.threads) {
            lines.push(thread_heading(report.threads));
            current_threads = Some(report.threads);
        }
        lines.push(report.to_string());
    }
    lines.join("\n")
}

/// A benchmark over every scenario of a [`BenchConfig`].
#[derive(Clone, Debug)]
pub struct Benchmark {
    config: BenchConfig,
}

impl Benchmark {
    pub fn new(config: BenchConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &BenchConfig {
        &self.config
    }

    /// Returns where the workload log of `scenario` is stored.
    pub fn log_path(&self, scenario: &Scenario) -> PathBuf {
        self.config
            .output_dir
            .join(format!("{}.txt", scenario.name))
    }

    /// Generates and writes one workload log per scenario, returning their
    /// paths in scenario order.
    pub fn generate_logs(&self) -> Result<Vec<PathBuf>, Error> {
        fs::create_dir_all(&self.config.output_dir)?;
        let mut generator = WorkloadGenerator::new();
        self.config
            .scenarios
            .iter()
            .map(|scenario| -> Result<PathBuf, Error> {
                let path = self.log_path(scenario);
                let operations = generator.generate(self.config.operations, &scenario.percents);
                log::write_log(&path, &operations)?;
                info!(
                    scenario = %scenario.name,
                    path = %path.display(),
                    operations = operations.len(),
                    "wrote workload log"
                );
                Ok(path)
            })
            .collect()
    }

    /// Replays the log at `path` from `threads` threads against a fresh store.
    pub fn run_log(&self, path: &Path, threads: usize) -> Result<RunReport, Error> {
        let scenario = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let _span = info_span!("run", %scenario, threads).entered();

        let operations: Arc<[Operation]> = log::read_log(path)?.into();
        let store = Arc::new(FieldStore::new(self.config.fields));

        let start = Instant::now();
        executor::execute_concurrently(&store, &operations, threads)?;
        let elapsed = start.elapsed();

        info!(elapsed_ms = elapsed.as_millis() as u64, "run finished");
        Ok(RunReport {
            scenario,
            threads,
            elapsed,
            stats: store.stats(),
        })
    }

    /// Generates every log, then replays each with 1 up to `max_threads`
    /// threads. Runs are ordered by thread count, then by scenario.
    pub fn run_all(&self) -> Result<Vec<RunReport>, Error> {
        let paths = self.generate_logs()?;
        let mut reports = Vec::with_capacity(paths.len() * self.config.max_threads);
        for threads in 1..=self.config.max_threads {
            for path in &paths {
                reports.push(self.run_log(path, threads)?);
            }
        }
        Ok(reports)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thread_headings() {
        assert_eq!(thread_heading(1), "Single thread execution");
        assert_eq!(thread_heading(3), "3 threads execution");
    }

    fn report(scenario: &str, threads: usize) -> RunReport {
        RunReport {
            scenario: scenario.to_owned(),
            threads,
            elapsed: Duration::ZERO,
            stats: StatsReport::default(),
        }
    }

    #[test]
    fn render_reports_heads_each_thread_count_once() {
        let reports = [report("a", 1), report("b", 1), report("a", 2), report("b", 2)];
        let rendered = render_reports(&reports);
        let headings: Vec<_> = rendered
            .lines()
            .filter(|line| line.ends_with("execution"))
            .collect();
        assert_eq!(headings, ["Single thread execution", "2 threads execution"]);
        assert!(rendered.starts_with("Single thread execution\na time: "));
        assert_eq!(rendered.matches("b time: ").count(), 2);
    }

    #[test]
    fn render_no_reports_is_empty() {
        assert_eq!(render_reports(&[]), "");
    }

    #[test]
    fn log_path_uses_scenario_name() {
        let config = BenchConfig {
            output_dir: PathBuf::from("out"),
            ..BenchConfig::default()
        };
        let benchmark = Benchmark::new(config);
        let scenario = &benchmark.config().scenarios[0];
        assert_eq!(benchmark.log_path(scenario), PathBuf::from("out/file_a.txt"));
    }

    #[test]
    fn report_display() {
        let report = RunReport {
            scenario: "file_a.txt".to_owned(),
            threads: 1,
            elapsed: Duration::from_millis(1500),
            stats: StatsReport::default(),
        };
        assert_eq!(
            report.to_string(),
            "file_a.txt time: 1.500000 s\n\
             Field stats (Read%, Write%):\n\
             Snapshot requests: 0.00%\n\
             -----------------------"
        );
    }
}
