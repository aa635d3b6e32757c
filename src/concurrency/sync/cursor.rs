//! Hand-over-hand traversal cursor.
//!
//! A cursor owns the lock window `(pred, curr)`: the head lock or the lock of
//! the node before the search position, and the lock of the node at it. Locks
//! are only ever taken in list order (head, node 0, node 1, ...) and the
//! window never holds more than two of them.
//!
//! [`Cursor::advance`] is the only place the window moves. It releases the
//! old predecessor first and then locks `curr.next` while `curr` is still
//! held. Holding `curr` pins its `next` field (it is only written under that
//! lock) and keeps the node ahead from being unlinked, since unlinking it
//! requires `curr` as its predecessor.

use std::sync::{Mutex, MutexGuard};

use super::lock;
use crate::alloc::{AllocError, NodeArena};
use crate::collections::node::{Key, Link, NodeId};

/// The locked slot behind the search position.
enum Behind<'a> {
    Head(MutexGuard<'a, Option<NodeId>>),
    Node(MutexGuard<'a, Link>),
}

impl Behind<'_> {
    #[inline]
    fn set_next(&mut self, next: Option<NodeId>) {
        match self {
            Behind::Head(head) => **head = next,
            Behind::Node(link) => link.next = next,
        }
    }
}

pub(crate) struct Cursor<'a> {
    arena: &'a NodeArena,
    pred: Behind<'a>,
    curr: Option<(NodeId, MutexGuard<'a, Link>)>,
}

impl<'a> Cursor<'a> {
    /// Locks the head, then the first node (if any), keeping both.
    ///
    /// The head lock is held until the first `advance`, so an insert or
    /// delete at the front always owns the head pointer it rewrites.
    pub(crate) fn new(head: &'a Mutex<Option<NodeId>>, arena: &'a NodeArena) -> Self {
        let head = lock(head);
        let first = *head;
        let curr = first.map(|id| (id, lock(arena.slot(id))));
        Self {
            arena,
            pred: Behind::Head(head),
            curr,
        }
    }

    /// Moves the window one node forward.
    ///
    /// Returns `false` (and does nothing) if the cursor is past the last node.
    pub(crate) fn advance(&mut self) -> bool {
        let Some((_, guard)) = self.curr.take() else {
            return false;
        };
        let next = guard.next;
        // Dropping the old predecessor here; `guard` stays locked.
        self.pred = Behind::Node(guard);
        self.curr = next.map(|next| (next, lock(self.arena.slot(next))));
        true
    }

    /// Advances while `curr.key < key`.
    ///
    /// Stops on the first node with `curr.key >= key` or at the end, and
    /// returns whether that node holds `key`.
    pub(crate) fn seek(&mut self, key: Key) -> bool {
        loop {
            let here = match &self.curr {
                Some((_, link)) => link.key,
                None => return false,
            };
            if here >= key {
                return here == key;
            }
            self.advance();
        }
    }

    /// Links a new node holding `key` between `pred` and `curr`.
    pub(crate) fn insert(mut self, key: Key) -> Result<NodeId, AllocError> {
        let next = self.curr.as_ref().map(|(id, _)| *id);
        // The fresh slot is unreachable, so locking it inside the window
        // does not take part in the list order.
        let id = self.arena.alloc(Link::new(key, next))?;
        self.pred.set_next(Some(id));
        Ok(id)
    }

    /// Unlinks `curr`, releases both locks and reclaims the node.
    ///
    /// Returns `None` if the cursor is past the last node.
    pub(crate) fn unlink(self) -> Option<NodeId> {
        let Cursor {
            arena,
            mut pred,
            curr,
        } = self;
        let (id, link) = curr?;
        pred.set_next(link.next);
        drop(link);
        drop(pred);
        // No thread can hold or wait on `id` now: reaching it required the
        // predecessor lock, which we held while repointing around it.
        arena.free(id);
        Some(id)
    }

    /// Keys of `(pred, curr)`, with `None` for `pred` meaning the head lock.
    #[cfg(test)]
    pub(crate) fn window(&self) -> (Option<Key>, Option<Key>) {
        let pred = match &self.pred {
            Behind::Head(_) => None,
            Behind::Node(link) => Some(link.key),
        };
        (pred, self.curr.as_ref().map(|(_, link)| link.key))
    }
}
