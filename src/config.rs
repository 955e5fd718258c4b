//! Benchmark configuration.
//!
//! Configuration is read from TOML. Every key is optional:
//!
//! ```toml
//! fields = 3
//! operations = 100000
//! max_threads = 3
//! output_dir = "."
//!
//! [[scenarios]]
//! name = "file_a"
//!
//! [scenarios.percents]
//! read_field0 = 10
//! write_field0 = 10
//! read_field1 = 50
//! write_field1 = 10
//! read_field2 = 5
//! write_field2 = 5
//! snapshot = 10
//! ```
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{Error, OpsPercent};

/// One workload to generate and benchmark.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Scenario {
    /// Used as the file stem of the scenario's workload log.
    pub name: String,
    #[serde(default)]
    pub percents: OpsPercent,
}

impl Scenario {
    pub fn new(name: impl Into<String>, percents: OpsPercent) -> Self {
        Self {
            name: name.into(),
            percents,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BenchConfig {
    /// Number of fields in each store.
    pub fields: usize,
    /// Number of operations generated per scenario.
    pub operations: usize,
    /// Every scenario is run with 1, 2, ..., `max_threads` executors.
    pub max_threads: usize,
    /// Directory that workload logs are written to.
    pub output_dir: PathBuf,
    pub scenarios: Vec<Scenario>,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            fields: 3,
            operations: 100_000,
            max_threads: 3,
            output_dir: PathBuf::from("."),
            scenarios: default_scenarios(),
        }
    }
}

/// Three workloads: one dominated by reads of field 1, one spread evenly and
/// one dominated by reads of field 0.
fn default_scenarios() -> Vec<Scenario> {
    vec![
        Scenario::new(
            "file_a",
            OpsPercent {
                read_field0: 10.0,
                write_field0: 10.0,
                read_field1: 50.0,
                write_field1: 10.0,
                read_field2: 5.0,
                write_field2: 5.0,
                snapshot: 10.0,
            },
        ),
        Scenario::new("file_b", OpsPercent::uniform(14.29)),
        Scenario::new(
            "file_c",
            OpsPercent {
                read_field0: 40.0,
                write_field0: 5.0,
                read_field1: 30.0,
                write_field1: 5.0,
                read_field2: 10.0,
                write_field2: 5.0,
                snapshot: 5.0,
            },
        ),
    ]
}

impl BenchConfig {
    /// Parses a configuration, filling missing keys with their defaults.
    ///
    /// # Examples
    ///
    /// ```
    /// use todc_contention::config::BenchConfig;
    ///
    /// let config = BenchConfig::from_toml_str("operations = 10\nmax_threads = 1").unwrap();
    /// assert_eq!(config.operations, 10);
    /// assert_eq!(config.fields, 3);
    /// assert_eq!(config.scenarios.len(), 3);
    /// ```
    pub fn from_toml_str(contents: &str) -> Result<Self, Error> {
        Ok(toml::from_str(contents)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, Error> {
        Self::from_toml_str(&fs::read_to_string(path)?)
    }
}
