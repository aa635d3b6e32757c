//! # `listset` - Sorted Sets Under Three Locking Disciplines
//!
//! A sorted set of unique `i64` keys that many threads insert into, search
//! and delete from at once, together with the harness that measures it.
//!
//! ## Policies
//!
//! The same [`ConcurrentOrderedSet`] is parameterized by a [`SyncPolicy`]:
//!
//! - [`CoarseLock`]: one mutex around every operation. The baseline.
//! - [`FineGrainedLock`]: a head lock plus one mutex per node, acquired
//!   hand-over-hand. Operations on different parts of the list overlap.
//! - [`ReaderWriterLock`]: lookups share a read lock, mutations take it
//!   exclusively.
//!
//! ## Safety Model
//!
//! **No raw pointers.** Nodes live in arenas and link to each other through
//! [`NodeId`] indices. A reclaimed slot may be reused, but it is never freed
//! while the set is shared, so no thread can touch released memory.
//!
//! **Lock order.** The fine-grained policy takes locks head first and then
//! strictly down the list, holding at most two at a time. Every thread waits
//! only on a lock later in that order than any it holds, so a waiting cycle
//! cannot form.
//!
//! **Quiescence by type.** `clear`, `keys` and `len` take `&mut self`. A set
//! shared with running workers is only reachable through `&`, so these
//! operations cannot race with them.
//!
//! ## Example
//!
//! ```rust
//! use listset::{ConcurrentOrderedSet, FineGrainedLock};
//! use std::thread;
//!
//! let mut set = ConcurrentOrderedSet::<FineGrainedLock>::new();
//! thread::scope(|s| {
//!     for t in 0..4 {
//!         let set = &set;
//!         s.spawn(move || {
//!             for k in (t * 100)..(t * 100 + 100) {
//!                 assert!(set.insert(k));
//!             }
//!         });
//!     }
//! });
//! assert_eq!(set.len(), 400);
//! ```

#![warn(missing_docs, clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod alloc;
pub mod collections;
pub mod concurrency;
pub mod workload;

pub use alloc::{AllocError, NodeArena};
pub use collections::{ConcurrentOrderedSet, Key, KeysView, Link, NodeId, SortedList};
pub use concurrency::{CoarseLock, FineGrainedLock, ReaderWriterLock, SyncPolicy};
pub use workload::{
    BenchError, ConfigError, KeyRng, OpCounters, PolicyKind, RunReport, WorkloadConfig,
    WorkloadDriver,
};
