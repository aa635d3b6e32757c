//! `SortedList` - the unsynchronized ordered-set core.
//!
//! A singly linked list of unique keys in ascending order, stored in a `Vec`
//! of [`Link`]s addressed by [`NodeId`]. Reclaimed slots form an intrusive free
//! list threaded through their `next` field, so removing never allocates.
//!
//! `CoarseLock` and `ReaderWriterLock` run exactly these algorithms under
//! their global lock.

use crate::alloc::AllocError;
use crate::collections::node::{Key, Link, NodeId};

/// An ordered set of unique keys backed by an index-linked list.
#[derive(Debug, Default)]
pub struct SortedList {
    nodes: Vec<Link>,
    head: Option<NodeId>,
    free_head: Option<NodeId>,
    len: usize,
}

impl SortedList {
    /// Creates an empty list.
    pub const fn new() -> Self {
        Self {
            nodes: Vec::new(),
            head: None,
            free_head: None,
            len: 0,
        }
    }

    /// Creates an empty list with room for `capacity` nodes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity),
            ..Self::new()
        }
    }

    /// Number of keys in the list.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the list holds no keys.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    #[inline]
    fn link(&self, id: NodeId) -> &Link {
        &self.nodes[id.index()]
    }

    #[inline]
    fn link_mut(&mut self, id: NodeId) -> &mut Link {
        &mut self.nodes[id.index()]
    }

    /// Finds the insertion/deletion point for `key`.
    ///
    /// Returns `(pred, curr)` where `curr` is the first node with
    /// `curr.key >= key` (or `None` at the end) and `pred` is the node before
    /// it (or `None` when `curr` is the head position).
    fn locate(&self, key: Key) -> (Option<NodeId>, Option<NodeId>) {
        let mut pred = None;
        let mut curr = self.head;
        while let Some(id) = curr {
            let link = self.link(id);
            if link.key >= key {
                break;
            }
            pred = curr;
            curr = link.next;
        }
        (pred, curr)
    }

    #[inline]
    fn holds(&self, curr: Option<NodeId>, key: Key) -> bool {
        curr.is_some_and(|id| self.link(id).key == key)
    }

    /// Returns `true` if `key` is in the list.
    pub fn contains(&self, key: Key) -> bool {
        let (_, curr) = self.locate(key);
        self.holds(curr, key)
    }

    /// Inserts `key` in sorted position.
    ///
    /// Returns `Ok(false)` and leaves the list untouched if `key` is already
    /// present.
    ///
    /// # Errors
    /// Returns `AllocError` if the node storage cannot grow.
    pub fn try_insert(&mut self, key: Key) -> Result<bool, AllocError> {
        let (pred, curr) = self.locate(key);
        if self.holds(curr, key) {
            return Ok(false);
        }

        let id = self.alloc(Link::new(key, curr))?;
        self.set_next(pred, Some(id));
        self.len += 1;
        Ok(true)
    }

    /// Removes `key`, returning whether it was present.
    pub fn remove(&mut self, key: Key) -> bool {
        let (pred, curr) = self.locate(key);
        let Some(id) = curr.filter(|&id| self.link(id).key == key) else {
            return false;
        };

        let next = self.link(id).next;
        self.set_next(pred, next);
        self.release(id);
        self.len -= 1;
        true
    }

    /// Drops every node and resets the head.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.head = None;
        self.free_head = None;
        self.len = 0;
    }

    /// Iterates over the keys in ascending order.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            list: self,
            curr: self.head,
        }
    }

    /// Repoints `pred.next`, or the head when `pred` is `None`.
    #[inline]
    fn set_next(&mut self, pred: Option<NodeId>, next: Option<NodeId>) {
        match pred {
            None => self.head = next,
            Some(p) => self.link_mut(p).next = next,
        }
    }

    fn alloc(&mut self, link: Link) -> Result<NodeId, AllocError> {
        if let Some(id) = self.free_head {
            self.free_head = self.link(id).next;
            *self.link_mut(id) = link;
            return Ok(id);
        }

        self.nodes.try_reserve(1).map_err(|_| AllocError)?;
        let id = NodeId::new(self.nodes.len());
        self.nodes.push(link);
        Ok(id)
    }

    #[inline]
    fn release(&mut self, id: NodeId) {
        let free_head = self.free_head;
        self.link_mut(id).next = free_head;
        self.free_head = Some(id);
    }
}

/// Iterator over the keys of a [`SortedList`].
#[derive(Debug)]
pub struct Iter<'a> {
    list: &'a SortedList,
    curr: Option<NodeId>,
}

impl Iterator for Iter<'_> {
    type Item = Key;

    fn next(&mut self) -> Option<Key> {
        let link = self.list.link(self.curr?);
        self.curr = link.next;
        Some(link.key)
    }
}

impl<'a> IntoIterator for &'a SortedList {
    type Item = Key;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
