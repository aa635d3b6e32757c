//! Concurrency policies for the ordered set.
//!
//! Every policy implements [`SyncPolicy`], the "synchronize-traversal"
//! contract: it decides which locks are taken around a list traversal.
//!
//! - [`CoarseLock`]: one mutex around the whole list.
//! - [`FineGrainedLock`]: a head lock plus one lock per node, taken
//!   hand-over-hand through a [`cursor`](self::cursor).
//! - [`ReaderWriterLock`]: one read/write lock; `member` reads, mutators write.
//!
//! Lock poisoning is ignored: each critical section leaves the list
//! consistent before it can panic, so a poisoned guard is recovered with
//! [`PoisonError::into_inner`].

pub mod coarse;
pub(crate) mod cursor;
pub mod fine_grained;
pub mod rw_lock;


pub use coarse::CoarseLock;
pub use fine_grained::FineGrainedLock;
pub use rw_lock::ReaderWriterLock;

use std::sync::{Mutex, MutexGuard, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::alloc::AllocError;
use crate::collections::node::Key;

/// The capability every concurrency policy provides.
///
/// `insert`/`member`/`delete` take `&self` and may run from any number of
/// threads at once. Operations that need the list to be quiescent take
/// `&mut self`, so the borrow checker proves no concurrent mutator exists.
pub trait SyncPolicy: Default + Send + Sync {
    /// Short name used in reports and on the command line.
    const NAME: &'static str;

    /// Inserts `key` if absent. Returns `Ok(false)` for a duplicate.
    ///
    /// # Errors
    /// Returns `AllocError` if no node could be allocated. Every lock the
    /// operation took has been released by the time the error is returned.
    fn try_insert(&self, key: Key) -> Result<bool, AllocError>;

    /// Returns `true` if `key` is present.
    fn member(&self, key: Key) -> bool;

    /// Removes `key`, returning whether it was present.
    fn delete(&self, key: Key) -> bool;

    /// Destroys every node and resets the head.
    fn clear(&mut self);

    /// Collects the keys in list order.
    fn keys(&mut self) -> Vec<Key>;

    /// Number of keys in the set.
    fn len(&mut self) -> usize {
        self.keys().len()
    }
}

#[inline]
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[inline]
pub(crate) fn read<T>(rw: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    rw.read().unwrap_or_else(PoisonError::into_inner)
}

#[inline]
pub(crate) fn write<T>(rw: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    rw.write().unwrap_or_else(PoisonError::into_inner)
}
