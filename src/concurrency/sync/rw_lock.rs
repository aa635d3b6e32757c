//! `ReaderWriterLock` - shared lookups, exclusive mutation.

use std::sync::{PoisonError, RwLock};

use super::{read, write, SyncPolicy};
use crate::alloc::AllocError;
use crate::collections::node::Key;
use crate::collections::SortedList;

/// Read/write-lock policy.
///
/// `member` takes the lock in shared mode, so any number of lookups run
/// together; `insert` and `delete` take it exclusively and run the same
/// unsynchronized traversal as [`CoarseLock`](super::CoarseLock).
#[derive(Debug, Default)]
pub struct ReaderWriterLock {
    list: RwLock<SortedList>,
}

impl ReaderWriterLock {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    fn list_mut(&mut self) -> &mut SortedList {
        self.list.get_mut().unwrap_or_else(PoisonError::into_inner)
    }
}

impl SyncPolicy for ReaderWriterLock {
    const NAME: &'static str = "rw-lock";

    fn try_insert(&self, key: Key) -> Result<bool, AllocError> {
        write(&self.list).try_insert(key)
    }

    fn member(&self, key: Key) -> bool {
        read(&self.list).contains(key)
    }

    fn delete(&self, key: Key) -> bool {
        write(&self.list).remove(key)
    }

    fn clear(&mut self) {
        self.list_mut().clear();
    }

    fn keys(&mut self) -> Vec<Key> {
        self.list_mut().iter().collect()
    }

    fn len(&mut self) -> usize {
        self.list_mut().len()
    }
}
