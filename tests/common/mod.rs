use todc_contention::stats::Counters;

/// Asserts that every completed operation is accounted for exactly once.
///
/// # Panics
///
/// Panics if `total_ops` differs from `expected` or from the sum of the
/// per-field and snapshot counters.
pub fn assert_conserved(counters: &Counters, expected: usize) {
    let sum: usize = counters.reads.iter().sum::<usize>()
        + counters.writes.iter().sum::<usize>()
        + counters.snapshots;
    assert_eq!(counters.total_ops, expected);
    assert_eq!(sum, counters.total_ops);
}
