//! Lock contention microbenchmarks for a shared record of independently-locked
//! fields.
//!
//! A [`FieldStore`] is a fixed-size record where every field is guarded by its
//! own reader-writer lock. Workloads of [`Operation`]s are generated from a
//! target distribution, replayed against a shared store from any number of
//! threads, and the store's access counters are turned into a
//! [`StatsReport`](stats::StatsReport).
//!
//! ```
//! use std::sync::Arc;
//! use todc_contention::workload::{executor, WorkloadGenerator};
//! use todc_contention::{FieldStore, OpsPercent};
//!
//! let percents = OpsPercent {
//!     read_field0: 50.0,
//!     write_field0: 50.0,
//!     ..OpsPercent::default()
//! };
//! let operations: Arc<[_]> = WorkloadGenerator::seeded(7).generate(100, &percents).into();
//!
//! let store = Arc::new(FieldStore::new(3));
//! executor::execute_concurrently(&store, &operations, 2).unwrap();
//!
//! assert_eq!(store.counters().total_ops, 200);
//! ```
pub mod bench;
pub mod config;
mod error;
pub mod stats;
pub mod store;
pub(crate) mod sync;
pub mod workload;

pub use error::{Error, ParseOperationError};
pub use store::FieldStore;
pub use workload::{Operation, OpsPercent};
