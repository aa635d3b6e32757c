//! `FineGrainedLock` - hand-over-hand locking with one mutex per node.
//!
//! Operations on disjoint stretches of the list proceed in parallel. Two
//! operations that touch the same nodes are ordered by the lock window of
//! [`Cursor`]: locks are taken head first and then strictly down the list, so
//! no cycle of waiting threads can form.

use std::sync::{Mutex, PoisonError};

use crossbeam_utils::CachePadded;

use super::cursor::Cursor;
use super::SyncPolicy;
use crate::alloc::{AllocError, NodeArena};
use crate::collections::node::{Key, NodeId};

/// Per-node locking policy.
#[derive(Debug, Default)]
pub struct FineGrainedLock {
    /// Padded so the head lock, taken by every operation, does not share a
    /// line with the arena's free-list lock.
    head: CachePadded<Mutex<Option<NodeId>>>,
    arena: NodeArena,
}

impl FineGrainedLock {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    fn cursor(&self) -> Cursor<'_> {
        Cursor::new(&self.head, &self.arena)
    }

    /// Number of node slots currently allocated from the arena.
    pub fn live_nodes(&self) -> usize {
        self.arena.live()
    }
}

impl SyncPolicy for FineGrainedLock {
    const NAME: &'static str = "fine-grained";

    fn try_insert(&self, key: Key) -> Result<bool, AllocError> {
        let mut cursor = self.cursor();
        if cursor.seek(key) {
            return Ok(false);
        }
        cursor.insert(key)?;
        Ok(true)
    }

    fn member(&self, key: Key) -> bool {
        self.cursor().seek(key)
    }

    fn delete(&self, key: Key) -> bool {
        let mut cursor = self.cursor();
        cursor.seek(key) && cursor.unlink().is_some()
    }

    fn clear(&mut self) {
        *self.head.get_mut().unwrap_or_else(PoisonError::into_inner) = None;
        self.arena.clear();
    }

    fn keys(&mut self) -> Vec<Key> {
        let mut keys = Vec::new();
        let mut curr = *self.head.get_mut().unwrap_or_else(PoisonError::into_inner);
        while let Some(id) = curr {
            let link = *self.arena.get_mut(id);
            keys.push(link.key);
            curr = link.next;
        }
        keys
    }
}
