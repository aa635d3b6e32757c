//! `WorkloadDriver` - preloads the set, runs the worker pool and times it.

use std::fmt;
use std::thread;
use std::time::{Duration, Instant};

use crate::alloc::AllocError;
use crate::collections::ConcurrentOrderedSet;
use crate::concurrency::sync::{CoarseLock, FineGrainedLock, ReaderWriterLock, SyncPolicy};
use crate::workload::config::{ConfigError, Operation, PolicyKind, WorkloadConfig};
use crate::workload::counters::{OpCounters, SharedCounters};
use crate::workload::report::RunReport;
use crate::workload::rng::KeyRng;

/// Seed of the generator the main thread preloads with; workers use
/// `rank + 1`.
const PRELOAD_SEED: u64 = 1;

/// Counts and wall time of the timed region.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunOutcome {
    /// Operations dispatched, by kind.
    pub counters: OpCounters,
    /// Time from the first spawn to the last join.
    pub elapsed: Duration,
}

/// Drives one benchmark run against a [`ConcurrentOrderedSet`].
#[derive(Debug, Clone)]
pub struct WorkloadDriver {
    config: WorkloadConfig,
}

impl WorkloadDriver {
    /// Validates `config` and builds a driver for it.
    ///
    /// # Errors
    /// Returns the validation error; no thread has been spawned.
    pub fn new(config: WorkloadConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The validated configuration.
    pub fn config(&self) -> &WorkloadConfig {
        &self.config
    }

    /// Inserts up to `initial_insert_count` random keys from the calling
    /// thread, giving up after twice that many attempts.
    ///
    /// Returns the number of keys actually inserted.
    ///
    /// # Errors
    /// Returns `AllocError` if a node could not be allocated.
    pub fn preload<P: SyncPolicy>(&self, set: &ConcurrentOrderedSet<P>) -> Result<usize, AllocError> {
        let target = self.config.initial_insert_count;
        let mut rng = KeyRng::new(PRELOAD_SEED);
        let mut inserted = 0;
        let mut attempts = 0;
        while inserted < target && attempts < 2 * target {
            if set.try_insert(rng.next_key())? {
                inserted += 1;
            }
            attempts += 1;
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(inserted, attempts, "preload finished");
        Ok(inserted)
    }

    /// Spawns the workers, waits for all of them and returns the merged
    /// counts with the elapsed time.
    ///
    /// # Errors
    /// Returns `BenchError::Spawn` if a worker thread could not be created
    /// and `BenchError::Alloc` if any worker failed to allocate a node. The
    /// workers that did start are always joined first.
    pub fn execute<P: SyncPolicy>(&self, set: &ConcurrentOrderedSet<P>) -> Result<RunOutcome, BenchError> {
        let threads = self.config.thread_count;
        let ops = self.config.ops_per_thread();
        let counters = SharedCounters::new();

        #[cfg(feature = "tracing")]
        {
            if ops == 0 && self.config.total_ops > 0 {
                tracing::warn!(
                    total_ops = self.config.total_ops,
                    threads,
                    "fewer operations than threads; workers have nothing to do"
                );
            }
            tracing::debug!(policy = P::NAME, threads, ops_per_thread = ops, "spawning workers");
        }

        let start = Instant::now();
        let results = thread::scope(|s| {
            let counters = &counters;
            let mut handles = Vec::with_capacity(threads);
            let mut spawn_error = None;
            for rank in 0..threads {
                let spawned = thread::Builder::new()
                    .name(format!("worker-{rank}"))
                    .spawn_scoped(s, move || self.work(set, rank, ops, counters));
                match spawned {
                    Ok(handle) => handles.push(handle),
                    Err(err) => {
                        spawn_error = Some(err);
                        break;
                    }
                }
            }

            let joined: Vec<Result<(), AllocError>> = handles
                .into_iter()
                .map(|h| h.join().unwrap_or_else(|payload| std::panic::resume_unwind(payload)))
                .collect();
            (joined, spawn_error)
        });
        let elapsed = start.elapsed();

        let (joined, spawn_error) = results;
        if let Some(err) = spawn_error {
            return Err(BenchError::Spawn(err));
        }
        joined.into_iter().collect::<Result<(), AllocError>>()?;

        #[cfg(feature = "tracing")]
        tracing::debug!(elapsed = ?elapsed, "workers joined");

        Ok(RunOutcome {
            counters: counters.into_totals(),
            elapsed,
        })
    }

    fn work<P: SyncPolicy>(
        &self,
        set: &ConcurrentOrderedSet<P>,
        rank: usize,
        ops: usize,
        counters: &SharedCounters,
    ) -> Result<(), AllocError> {
        let mut rng = KeyRng::new(rank as u64 + 1);
        let mut local = OpCounters::default();

        for _ in 0..ops {
            let op = self.config.choose(rng.next_f64());
            let key = rng.next_key();
            #[cfg_attr(not(feature = "tracing"), allow(unused_variables))]
            let hit = match op {
                Operation::Member => set.member(key),
                Operation::Insert => set.try_insert(key)?,
                Operation::Delete => set.delete(key),
            };

            #[cfg(feature = "tracing")]
            tracing::trace!(rank, ?op, key, hit);

            local.record(op);
        }

        counters.merge(&local);
        Ok(())
    }

    /// Assembles the report for a finished run.
    pub fn report(
        &self,
        policy: &str,
        preloaded: usize,
        outcome: &RunOutcome,
        final_len: usize,
    ) -> RunReport {
        RunReport {
            policy: policy.to_owned(),
            thread_count: self.config.thread_count,
            preloaded,
            total_ops: self.config.dispatched_ops(),
            elapsed_secs: outcome.elapsed.as_secs_f64(),
            member_total: outcome.counters.member,
            insert_total: outcome.counters.insert,
            delete_total: outcome.counters.delete,
            final_len,
        }
    }

    /// Runs the whole benchmark on a fresh set guarded by `P`: preload,
    /// timed run, report, then drain the set.
    ///
    /// # Errors
    /// See [`execute`](Self::execute).
    pub fn run<P: SyncPolicy>(&self) -> Result<RunReport, BenchError> {
        let mut set = ConcurrentOrderedSet::<P>::new();
        let preloaded = self.preload(&set)?;
        let outcome = self.execute(&set)?;
        let report = self.report(P::NAME, preloaded, &outcome, set.len());
        set.clear();
        Ok(report)
    }

    /// [`run`](Self::run) with the policy named in the configuration.
    ///
    /// # Errors
    /// See [`execute`](Self::execute).
    pub fn run_configured(&self) -> Result<RunReport, BenchError> {
        match self.config.policy {
            PolicyKind::Coarse => self.run::<CoarseLock>(),
            PolicyKind::FineGrained => self.run::<FineGrainedLock>(),
            PolicyKind::RwLock => self.run::<ReaderWriterLock>(),
        }
    }
}

/// Why a benchmark run stopped.
#[derive(Debug)]
pub enum BenchError {
    /// The configuration was rejected.
    Config(ConfigError),
    /// A node could not be allocated.
    Alloc(AllocError),
    /// A worker thread could not be spawned.
    Spawn(std::io::Error),
}

impl fmt::Display for BenchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BenchError::Config(_) => f.write_str("invalid workload configuration"),
            BenchError::Alloc(_) => f.write_str("out of memory while inserting"),
            BenchError::Spawn(_) => f.write_str("failed to spawn worker thread"),
        }
    }
}

impl std::error::Error for BenchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BenchError::Config(err) => Some(err),
            BenchError::Alloc(err) => Some(err),
            BenchError::Spawn(err) => Some(err),
        }
    }
}

impl From<ConfigError> for BenchError {
    fn from(err: ConfigError) -> Self {
        BenchError::Config(err)
    }
}

impl From<AllocError> for BenchError {
    fn from(err: AllocError) -> Self {
        BenchError::Alloc(err)
    }
}
