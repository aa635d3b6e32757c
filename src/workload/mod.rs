//! The benchmark harness around the set.
//!
//! [`WorkloadDriver`] preloads a [`ConcurrentOrderedSet`](crate::ConcurrentOrderedSet),
//! spawns `thread_count` workers that each draw a weighted mix of lookups,
//! inserts and deletes from their own [`KeyRng`], and reports the merged
//! counts with the elapsed time.

pub mod config;
pub mod counters;
pub mod driver;
pub mod report;
pub mod rng;

pub use config::{ConfigError, Operation, PolicyKind, WorkloadConfig};
pub use counters::{OpCounters, SharedCounters};
pub use driver::{BenchError, RunOutcome, WorkloadDriver};
pub use report::RunReport;
pub use rng::{KeyRng, MAX_KEY};
