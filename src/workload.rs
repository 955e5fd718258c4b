//! Synthetic workloads for a [`FieldStore`](crate::FieldStore).
//!
//! A workload is a sequence of [`Operation`]s. The [`generator`] builds one
//! from an [`OpsPercent`] distribution, the [`log`] module stores it as text
//! and the [`executor`] replays it against a shared store.
use serde::{Deserialize, Serialize};

pub mod executor;
pub mod generator;
pub mod log;

pub use self::generator::{generate, WorkloadGenerator};

/// A single access to a [`FieldStore`](crate::FieldStore).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Read the field at the given index.
    Read(usize),
    /// Write a value to the field at the given index.
    Write(usize, i64),
    /// Render the whole record.
    Snapshot,
}

/// Target share, in percent, of each kind of operation in a generated
/// workload.
///
/// Per-field categories address fields 0, 1 and 2. The values are not required
/// to add up to 100; see [`WorkloadGenerator::generate`] for how a shortfall is
/// filled.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OpsPercent {
    pub read_field0: f64,
    pub write_field0: f64,
    pub read_field1: f64,
    pub write_field1: f64,
    pub read_field2: f64,
    pub write_field2: f64,
    pub snapshot: f64,
}

impl OpsPercent {
    /// Returns the same percentage for every category.
    pub fn uniform(percent: f64) -> Self {
        Self {
            read_field0: percent,
            write_field0: percent,
            read_field1: percent,
            write_field1: percent,
            read_field2: percent,
            write_field2: percent,
            snapshot: percent,
        }
    }

    /// Returns the sum of all seven percentages.
    pub fn total(&self) -> f64 {
        self.categories().iter().map(|(_, percent)| percent).sum()
    }

    /// Pairs each category with the operation it generates, in a fixed order.
    pub(crate) fn categories(&self) -> [(Operation, f64); 7] {
        use self::generator::{FIELDS, WRITE_VALUE};
        use Operation::*;
        [
            (Read(FIELDS[0]), self.read_field0),
            (Write(FIELDS[0], WRITE_VALUE), self.write_field0),
            (Read(FIELDS[1]), self.read_field1),
            (Write(FIELDS[1], WRITE_VALUE), self.write_field1),
            (Read(FIELDS[2]), self.read_field2),
            (Write(FIELDS[2], WRITE_VALUE), self.write_field2),
            (Snapshot, self.snapshot),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_total() {
        let total = OpsPercent::uniform(10.0).total();
        assert!((total - 70.0).abs() < 1e-9);
    }

    #[test]
    fn categories_follow_field_order() {
        let percents = OpsPercent {
            write_field1: 3.0,
            ..OpsPercent::default()
        };
        let categories = percents.categories();
        assert_eq!(categories[3], (Operation::Write(1, 1), 3.0));
        assert_eq!(categories[6].0, Operation::Snapshot);
    }
}
