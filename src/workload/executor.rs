//! Replaying workloads against a shared [`FieldStore`].
use std::sync::Arc;

use tracing::{debug, warn};

use super::Operation;
use crate::sync::thread;
use crate::{Error, FieldStore};

/// Performs a single operation, discarding its result.
pub fn apply(store: &FieldStore, operation: &Operation) -> Result<(), Error> {
    match *operation {
        Operation::Read(index) => {
            store.read(index)?;
        }
        Operation::Write(index, value) => store.write(index, value)?,
        Operation::Snapshot => {
            store.snapshot();
        }
    }
    Ok(())
}

/// Replays `operations` in order.
///
/// Stops at the first operation that addresses a field outside the store and
/// returns its error. Operations before it have already been applied.
pub fn execute(store: &FieldStore, operations: &[Operation]) -> Result<(), Error> {
    operations
        .iter()
        .try_for_each(|operation| apply(store, operation))
}

/// Replays the same `operations` from `num_threads` threads at once.
///
/// Every thread runs to completion or to its own first error; a failing
/// replay never stops the others. Once all threads have been joined, returns
/// the error of the lowest-numbered thread that failed.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use todc_contention::workload::executor::execute_concurrently;
/// use todc_contention::{FieldStore, Operation};
///
/// let store = Arc::new(FieldStore::new(1));
/// let operations: Arc<[Operation]> = Arc::new([Operation::Write(0, 5), Operation::Read(0)]);
///
/// execute_concurrently(&store, &operations, 4).unwrap();
/// assert_eq!(store.counters().writes, vec![4]);
/// ```
pub fn execute_concurrently(
    store: &Arc<FieldStore>,
    operations: &Arc<[Operation]>,
    num_threads: usize,
) -> Result<(), Error> {
    debug!(num_threads, operations = operations.len(), "starting executors");
    let handles: Vec<_> = (0..num_threads)
        .map(|executor| {
            let store = Arc::clone(store);
            let operations = Arc::clone(operations);
            thread::spawn(move || {
                let result = execute(&store, &operations);
                if let Err(error) = &result {
                    warn!(executor, %error, "executor aborted its replay");
                }
                result
            })
        })
        .collect();

    let mut outcome = Ok(());
    for handle in handles {
        let result = handle.join().unwrap_or(Err(Error::ExecutorPanicked));
        if outcome.is_ok() {
            outcome = result;
        }
    }
    outcome
}
