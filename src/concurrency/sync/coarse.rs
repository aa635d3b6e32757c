//! `CoarseLock` - one mutex serializes every operation.

use std::sync::{Mutex, PoisonError};

use super::{lock, SyncPolicy};
use crate::alloc::AllocError;
use crate::collections::node::Key;
use crate::collections::SortedList;

/// Single-mutex policy: the correctness baseline.
///
/// The lock is held for the full traversal and released by guard drop on
/// every exit path, including the duplicate-insert and missing-key paths.
#[derive(Debug, Default)]
pub struct CoarseLock {
    list: Mutex<SortedList>,
}

impl CoarseLock {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    fn list_mut(&mut self) -> &mut SortedList {
        self.list.get_mut().unwrap_or_else(PoisonError::into_inner)
    }
}

impl SyncPolicy for CoarseLock {
    const NAME: &'static str = "coarse";

    fn try_insert(&self, key: Key) -> Result<bool, AllocError> {
        lock(&self.list).try_insert(key)
    }

    fn member(&self, key: Key) -> bool {
        lock(&self.list).contains(key)
    }

    fn delete(&self, key: Key) -> bool {
        lock(&self.list).remove(key)
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
