//! A shared record of independently-locked fields.
//!
//! See [`FieldStore`].
mod field;

use self::field::Field;
use crate::stats::{Counters, StatsReport};
use crate::sync::{AtomicUsize, Ordering};
use crate::Error;

/// A fixed-size record of integer fields, each behind its own reader-writer
/// lock.
///
/// Operations on different fields never block each other. Operations on the
/// same field follow the usual reader-writer rules: any number of concurrent
/// reads, or a single write.
///
/// Every field keeps its own read and write counters, and the store counts
/// snapshots and the total number of completed operations. Once no operation
/// is in flight,
///
/// ```text
/// total_ops == sum(reads) + sum(writes) + snapshots
/// ```
///
/// # Snapshots are not atomic
///
/// [`snapshot`](FieldStore::snapshot) locks one field at a time. A writer may
/// slip in between two fields of the same snapshot, so the rendered record can
/// mix values from before and after that write. Each value was really held by
/// its field at some point during the call, but the combination may never have
/// existed as a whole.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use std::thread;
/// use todc_contention::FieldStore;
///
/// let store = Arc::new(FieldStore::new(3));
///
/// let handles: Vec<_> = (0..3)
///     .map(|i| {
///         let store = Arc::clone(&store);
///         thread::spawn(move || store.write(i, i as i64 + 1).unwrap())
///     })
///     .collect();
///
/// for handle in handles {
///     handle.join().unwrap();
/// }
///
/// assert_eq!(store.snapshot(), "1, 2, 3");
/// ```
pub struct FieldStore {
    fields: Box<[Field]>,
    snapshots: AtomicUsize,
    total_ops: AtomicUsize,
}

impl FieldStore {
    /// Creates a store with `field_count` fields, all set to zero.
    ///
    /// A store with no fields is allowed; every read or write on it fails.
    pub fn new(field_count: usize) -> Self {
        Self {
            fields: (0..field_count).map(|_| Field::new()).collect(),
            snapshots: AtomicUsize::new(0),
            total_ops: AtomicUsize::new(0),
        }
    }

    /// Returns the number of fields in the store.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    fn field(&self, index: usize) -> Result<&Field, Error> {
        self.fields.get(index).ok_or(Error::IndexOutOfRange {
            index,
            field_count: self.fields.len(),
        })
    }

    /// Returns the value of the `index`th field.
    ///
    /// Takes the field's lock in shared mode, so concurrent reads of the same
    /// field proceed in parallel.
    ///
    /// # Examples
    ///
    /// ```
    /// use todc_contention::{Error, FieldStore};
    ///
    /// let store = FieldStore::new(2);
    /// assert_eq!(store.read(1).unwrap(), 0);
    /// assert!(matches!(store.read(2), Err(Error::IndexOutOfRange { index: 2, .. })));
    /// ```
    pub fn read(&self, index: usize) -> Result<i64, Error> {
        Ok(self.field(index)?.read(&self.total_ops))
    }

    /// Sets the `index`th field to `value`.
    ///
    /// Takes the field's lock in exclusive mode, which excludes readers and
    /// writers of that field only.
    ///
    /// # Examples
    ///
    /// ```
    /// use todc_contention::FieldStore;
    ///
    /// let store = FieldStore::new(1);
    /// store.write(0, 42).unwrap();
    /// assert_eq!(store.read(0).unwrap(), 42);
    /// ```
    pub fn write(&self, index: usize, value: i64) -> Result<(), Error> {
        self.field(index)?.write(value, &self.total_ops);
        Ok(())
    }

    /// Renders every field value, in index order, separated by `", "`.
    ///
    /// Field locks are taken and released one after the other, never held
    /// together. The snapshot is counted once all fields have been read.
    pub fn snapshot(&self) -> String {
        let rendered = self
            .fields
            .iter()
            .map(|field| field.peek().to_string())
            .collect::<Vec<_>>()
            .join(", ");
        self.snapshots.fetch_add(1, Ordering::Relaxed);
        self.total_ops.fetch_add(1, Ordering::Relaxed);
        rendered
    }

    /// Returns a copy of the raw access counters.
    ///
    /// No locks are taken. While operations are in flight the counters are
    /// loaded one by one and may not add up.
    pub fn counters(&self) -> Counters {
        Counters {
            reads: self.fields.iter().map(Field::reads).collect(),
            writes: self.fields.iter().map(Field::writes).collect(),
            snapshots: self.snapshots.load(Ordering::Relaxed),
            total_ops: self.total_ops.load(Ordering::Relaxed),
        }
    }

    /// Returns the share of all operations that went to each kind of access.
    pub fn stats(&self) -> StatsReport {
        StatsReport::from_counters(&self.counters())
    }
}

impl std::fmt::Debug for FieldStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldStore")
            .field("len", &self.len())
            .field("counters", &self.counters())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod new {
        use super::*;

        #[test]
        fn initializes_every_field_to_zero() {
            let store = FieldStore::new(4);
            for i in 0..4 {
                assert_eq!(store.read(i).unwrap(), 0);
            }
        }

        #[test]
        fn initializes_counters_to_zero() {
            let counters = FieldStore::new(2).counters();
            assert_eq!(counters.reads, vec![0, 0]);
            assert_eq!(counters.writes, vec![0, 0]);
            assert_eq!(counters.snapshots, 0);
            assert_eq!(counters.total_ops, 0);
        }

        #[test]
        fn allows_empty_store() {
            let store = FieldStore::new(0);
            assert!(store.is_empty());
            assert_eq!(store.len(), 0);
        }
    }

    mod read {
        use super::*;

        #[test]
        fn returns_previously_written_value() {
            let store = FieldStore::new(3);
            store.write(1, 99).unwrap();
            assert_eq!(store.read(1).unwrap(), 99);
        }

        #[test]
        fn counts_field_read_and_total() {
            let store = FieldStore::new(2);
            store.read(1).unwrap();
            store.read(1).unwrap();
            let counters = store.counters();
            assert_eq!(counters.reads, vec![0, 2]);
            assert_eq!(counters.total_ops, 2);
        }

        #[test]
        fn out_of_range_is_an_error() {
            for size in 0..4 {
                let store = FieldStore::new(size);
                assert!(matches!(
                    store.read(size),
                    Err(Error::IndexOutOfRange { index, field_count })
                        if index == size && field_count == size
                ));
            }
        }

        #[test]
        fn out_of_range_is_not_counted() {
            let store = FieldStore::new(1);
            assert!(store.read(5).is_err());
            assert_eq!(store.counters().total_ops, 0);
        }
    }

    mod write {
        use super::*;

        #[test]
        fn only_changes_addressed_field() {
            let store = FieldStore::new(3);
            store.write(2, 7).unwrap();
            assert_eq!(store.snapshot(), "0, 0, 7");
        }

        #[test]
        fn counts_field_write_and_total() {
            let store = FieldStore::new(2);
            store.write(0, 1).unwrap();
            let counters = store.counters();
            assert_eq!(counters.writes, vec![1, 0]);
            assert_eq!(counters.total_ops, 1);
        }

        #[test]
        fn out_of_range_is_an_error() {
            for size in 0..4 {
                let store = FieldStore::new(size);
                assert!(matches!(
                    store.write(size, 0),
                    Err(Error::IndexOutOfRange { .. })
                ));
            }
        }
    }

    mod snapshot {
        use super::*;

        #[test]
        fn separates_values_with_commas() {
            let store = FieldStore::new(3);
            for (i, value) in [1, 2, 3].into_iter().enumerate() {
                store.write(i, value).unwrap();
            }
            assert_eq!(store.snapshot(), "1, 2, 3");
        }

        #[test]
        fn single_field_has_no_separator() {
            let store = FieldStore::new(1);
            store.write(0, 1).unwrap();
            assert_eq!(store.snapshot(), "1");
        }

        #[test]
        fn empty_store_renders_empty_string() {
            assert_eq!(FieldStore::new(0).snapshot(), "");
        }

        #[test]
        fn renders_negative_values() {
            let store = FieldStore::new(2);
            store.write(0, -12).unwrap();
            assert_eq!(store.snapshot(), "-12, 0");
        }

        #[test]
        fn counts_once_without_touching_field_counters() {
            let store = FieldStore::new(3);
            store.snapshot();
            let counters = store.counters();
            assert_eq!(counters.snapshots, 1);
            assert_eq!(counters.total_ops, 1);
            assert_eq!(counters.reads, vec![0, 0, 0]);
        }
    }

    mod independence {
        use std::sync::{mpsc, Arc};
        use std::thread;
        use std::time::Duration;

        use super::*;

        const PROMPTLY: Duration = Duration::from_secs(5);

        #[test]
        fn held_write_lock_does_not_block_other_fields() {
            let store = Arc::new(FieldStore::new(2));
            let guard = store.fields[0].lock_exclusive();

            let (sender, receiver) = mpsc::channel();
            let other = Arc::clone(&store);
            let handle = thread::spawn(move || {
                other.write(1, 8).unwrap();
                sender.send(other.read(1).unwrap()).unwrap();
            });

            assert_eq!(receiver.recv_timeout(PROMPTLY), Ok(8));
            drop(guard);
            handle.join().unwrap();
        }

        #[test]
        fn held_read_lock_admits_other_readers() {
            let store = Arc::new(FieldStore::new(1));
            let guard = store.fields[0].lock_shared();

            let (sender, receiver) = mpsc::channel();
            let other = Arc::clone(&store);
            let handle = thread::spawn(move || {
                sender.send(other.read(0).unwrap()).unwrap();
            });

            assert_eq!(receiver.recv_timeout(PROMPTLY), Ok(0));
            drop(guard);
            handle.join().unwrap();
        }

        #[test]
        fn blocked_snapshot_releases_earlier_fields() {
            let store = Arc::new(FieldStore::new(2));
            let guard = store.fields[1].lock_exclusive();

            let snapshotter = {
                let store = Arc::clone(&store);
                thread::spawn(move || store.snapshot())
            };
            // Let the snapshot read field 0 and block on field 1.
            thread::sleep(Duration::from_millis(100));

            let (sender, receiver) = mpsc::channel();
            let writer = {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    store.write(0, 5).unwrap();
                    sender.send(()).unwrap();
                })
            };

            assert_eq!(receiver.recv_timeout(PROMPTLY), Ok(()));
            drop(guard);
            writer.join().unwrap();
            let snapshot = snapshotter.join().unwrap();
            assert!(snapshot == "0, 0" || snapshot == "5, 0");
        }

        #[test]
        fn held_write_lock_blocks_same_field() {
            let store = Arc::new(FieldStore::new(2));
            let guard = store.fields[0].lock_exclusive();

            let (sender, receiver) = mpsc::channel();
            let other = Arc::clone(&store);
            let handle = thread::spawn(move || {
                sender.send(other.read(0).unwrap()).unwrap();
            });

            assert!(receiver.recv_timeout(Duration::from_millis(100)).is_err());
            drop(guard);
            assert_eq!(receiver.recv_timeout(PROMPTLY), Ok(0));
            handle.join().unwrap();
        }
    }
}
