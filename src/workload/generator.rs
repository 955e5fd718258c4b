//! Workload generation from a target distribution.
use std::iter;

use rand::rngs::{SmallRng, ThreadRng};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tracing::{debug, warn};

use super::{Operation, OpsPercent};

/// Indices of the fields addressed by the per-field categories of [`OpsPercent`].
pub const FIELDS: [usize; 3] = [0, 1, 2];

/// The value carried by every generated write.
pub const WRITE_VALUE: i64 = 1;

/// How far the percentages may stray from 100 before a warning is logged.
const PERCENT_TOLERANCE: f64 = 0.5;

/// Generates shuffled workloads.
///
/// # Examples
///
/// ```
/// use todc_contention::workload::WorkloadGenerator;
/// use todc_contention::{Operation, OpsPercent};
///
/// let percents = OpsPercent {
///     read_field0: 50.0,
///     snapshot: 25.0,
///     ..OpsPercent::default()
/// };
/// let operations = WorkloadGenerator::seeded(42).generate(8, &percents);
///
/// let reads = operations.iter().filter(|op| **op == Operation::Read(0)).count();
/// assert_eq!(operations.len(), 8);
/// assert_eq!(reads, 4);
/// ```
pub struct WorkloadGenerator<R: Rng> {
    rng: R,
}

impl WorkloadGenerator<ThreadRng> {
    /// Creates a generator backed by the thread-local random number generator.
    pub fn new() -> Self {
        Self::with_rng(rand::thread_rng())
    }
}

impl Default for WorkloadGenerator<ThreadRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl WorkloadGenerator<SmallRng> {
    /// Creates a generator whose shuffles are reproducible for a given seed.
    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(SmallRng::seed_from_u64(seed))
    }
}

impl<R: Rng> WorkloadGenerator<R> {
    pub fn with_rng(rng: R) -> Self {
        Self { rng }
    }

    /// Returns a shuffled sequence of operations following `percents`.
    ///
    /// Each category contributes `floor(target_count * percent / 100)`
    /// operations. If that leaves the sequence shorter than `target_count`,
    /// it is padded with [`Operation::Snapshot`], so the realized snapshot
    /// share can exceed the configured one. Percentages adding up to more than
    /// 100 yield a sequence longer than `target_count`.
    pub fn generate(&mut self, target_count: usize, percents: &OpsPercent) -> Vec<Operation> {
        let total = percents.total();
        if (total - 100.0).abs() > PERCENT_TOLERANCE {
            warn!(total, "operation percentages do not add up to 100");
        }

        let mut operations = Vec::with_capacity(target_count);
        for (operation, percent) in percents.categories() {
            operations.extend(iter::repeat(operation).take(share(target_count, percent)));
        }

        let padding = target_count.saturating_sub(operations.len());
        if padding > 0 {
            debug!(padding, "padding workload with snapshots");
            operations.resize(target_count, Operation::Snapshot);
        }

        operations.shuffle(&mut self.rng);
        operations
    }
}

/// Generates a workload with a fresh thread-local generator.
pub fn generate(target_count: usize, percents: &OpsPercent) -> Vec<Operation> {
    WorkloadGenerator::new().generate(target_count, percents)
}

/// Number of operations a category receives, rounded down.
///
/// Negative and NaN percentages contribute nothing.
fn share(target_count: usize, percent: f64) -> usize {
    (target_count as f64 * percent / 100.0) as usize
}
