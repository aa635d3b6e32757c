//! Operation tallies: per-worker locals and the shared totals.

use std::sync::Mutex;

use crossbeam_utils::CachePadded;
use serde::Serialize;

use crate::concurrency::sync::lock;
use crate::workload::config::Operation;

/// Counts of dispatched operations by kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct OpCounters {
    /// Lookups.
    pub member: usize,
    /// Insert attempts.
    pub insert: usize,
    /// Delete attempts.
    pub delete: usize,
}

impl OpCounters {
    /// Counts one operation of kind `op`.
    #[inline]
    pub fn record(&mut self, op: Operation) {
        match op {
            Operation::Member => self.member += 1,
            Operation::Insert => self.insert += 1,
            Operation::Delete => self.delete += 1,
        }
    }

    /// Sum over all kinds.
    pub fn total(&self) -> usize {
        self.member + self.insert + self.delete
    }
}

/// Totals shared by all workers.
///
/// Guarded by its own padded mutex, separate from every lock inside the set,
/// so bookkeeping never contends with list traversal. Each worker merges
/// exactly once, when it finishes.
#[derive(Debug, Default)]
pub struct SharedCounters {
    totals: CachePadded<Mutex<OpCounters>>,
}

impl SharedCounters {
    /// Creates zeroed totals.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a worker's local counts to the totals.
    pub fn merge(&self, local: &OpCounters) {
        let mut totals = lock(&self.totals);
        totals.member += local.member;
        totals.insert += local.insert;
        totals.delete += local.delete;
    }

    /// Consumes the shared totals once every worker has joined.
    pub fn into_totals(self) -> OpCounters {
        CachePadded::into_inner(self.totals)
            .into_inner()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn record_counts_by_kind() {
        let mut local = OpCounters::default();
        for op in [Operation::Member, Operation::Member, Operation::Insert, Operation::Delete] {
            local.record(op);
        }
        assert_eq!(
            local,
            OpCounters {
                member: 2,
                insert: 1,
                delete: 1
            }
        );
        assert_eq!(local.total(), 4);
    }

    #[test]
    fn merges_from_many_threads() {
        let shared = SharedCounters::new();
        thread::scope(|s| {
            for _ in 0..8 {
                s.spawn(|| {
                    shared.merge(&OpCounters {
                        member: 3,
                        insert: 2,
                        delete: 1,
                    });
                });
            }
        });
        let totals = shared.into_totals();
        assert_eq!((totals.member, totals.insert, totals.delete), (24, 16, 8));
    }
}
