//! Percentage breakdowns of store activity.
use std::fmt;

/// The raw access counters of a [`FieldStore`](crate::FieldStore).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Counters {
    /// Reads per field, in field order.
    pub reads: Vec<usize>,
    /// Writes per field, in field order.
    pub writes: Vec<usize>,
    pub snapshots: usize,
    pub total_ops: usize,
}

/// Share of all operations that read or wrote one field.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FieldStats {
    pub read_percent: f64,
    pub write_percent: f64,
}

/// Share of all operations spent on each field and on snapshots.
///
/// Percentages are relative to the store's total operation count. The report
/// is advisory: counters copied while operations were in flight need not add
/// up to exactly 100%.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StatsReport {
    pub fields: Vec<FieldStats>,
    pub snapshot_percent: f64,
    pub total_ops: usize,
}

impl StatsReport {
    /// Derives a report from a copy of the store's counters.
    ///
    /// An unused store reports 0% everywhere rather than dividing by zero.
    ///
    /// # Examples
    ///
    /// ```
    /// use todc_contention::stats::{Counters, StatsReport};
    ///
    /// let counters = Counters {
    ///     reads: vec![2, 0],
    ///     writes: vec![1, 1],
    ///     snapshots: 4,
    ///     total_ops: 8,
    /// };
    /// let report = StatsReport::from_counters(&counters);
    /// assert_eq!(report.fields[0].read_percent, 25.0);
    /// assert_eq!(report.snapshot_percent, 50.0);
    /// ```
    pub fn from_counters(counters: &Counters) -> Self {
        let total = counters.total_ops.max(1) as f64;
        let percent = |count: usize| 100.0 * count as f64 / total;
        Self {
            fields: counters
                .reads
                .iter()
                .zip(&counters.writes)
                .map(|(&reads, &writes)| FieldStats {
                    read_percent: percent(reads),
                    write_percent: percent(writes),
                })
                .collect(),
            snapshot_percent: percent(counters.snapshots),
            total_ops: counters.total_ops,
        }
    }
}

impl fmt::Display for StatsReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Field stats (Read%, Write%):")?;
        for (i, field) in self.fields.iter().enumerate() {
            writeln!(
                f,
                "Field {i}: {:.2}% / {:.2}%",
                field.read_percent, field.write_percent
            )?;
        }
        write!(f, "Snapshot requests: {:.2}%", self.snapshot_percent)
    }
}
