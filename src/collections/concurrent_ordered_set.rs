//! `ConcurrentOrderedSet` - a sorted integer set shared between threads.

use core::alloc::Layout;
use core::fmt;

use crate::alloc::AllocError;
use crate::collections::node::{Key, Link};
use crate::concurrency::sync::{FineGrainedLock, SyncPolicy};

/// A set of unique `i64` keys kept in ascending order.
///
/// `insert`, `member` and `delete` take `&self` and are safe to call from any
/// number of threads; how they synchronize is decided by the policy `P`.
/// `clear`, `keys` and `len` take `&mut self` and therefore only run when no
/// other thread can be touching the set.
///
/// ```
/// use listset::{ConcurrentOrderedSet, CoarseLock};
///
/// let mut set = ConcurrentOrderedSet::<CoarseLock>::new();
/// assert!(set.insert(5));
/// assert!(set.insert(3));
/// assert!(!set.insert(5));
/// assert!(set.member(3));
/// assert_eq!(set.keys(), vec![3, 5]);
/// ```
#[derive(Debug, Default)]
pub struct ConcurrentOrderedSet<P = FineGrainedLock> {
    policy: P,
}

impl<P: SyncPolicy> ConcurrentOrderedSet<P> {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self {
            policy: P::default(),
        }
    }

    /// Name of the concurrency policy in use.
    pub fn policy_name(&self) -> &'static str {
        P::NAME
    }

    /// Borrows the underlying policy.
    pub fn policy(&self) -> &P {
        &self.policy
    }

    /// Inserts `key`, returning `false` if it was already present.
    ///
    /// Running out of memory for a node is fatal, as it is for `Box::new`:
    /// the locks taken by the operation are released first, then
    /// [`handle_alloc_error`](std::alloc::handle_alloc_error) is called.
    pub fn insert(&self, key: Key) -> bool {
        match self.policy.try_insert(key) {
            Ok(inserted) => inserted,
            Err(AllocError) => std::alloc::handle_alloc_error(Layout::new::<Link>()),
        }
    }

    /// Inserts `key`, reporting allocation failure instead of aborting.
    ///
    /// # Errors
    /// Returns `AllocError` if no node could be allocated.
    pub fn try_insert(&self, key: Key) -> Result<bool, AllocError> {
        self.policy.try_insert(key)
    }

    /// Returns `true` if `key` is present.
    pub fn member(&self, key: Key) -> bool {
        self.policy.member(key)
    }

    /// Removes `key`, returning whether it was present.
    pub fn delete(&self, key: Key) -> bool {
        self.policy.delete(key)
    }

    /// Destroys every node.
    pub fn clear(&mut self) {
        self.policy.clear();
    }

    /// The keys in ascending order.
    pub fn keys(&mut self) -> Vec<Key> {
        self.policy.keys()
    }

    /// A printable snapshot of the keys.
    pub fn keys_view(&mut self) -> KeysView {
        KeysView(self.keys())
    }

    /// Number of keys.
    pub fn len(&mut self) -> usize {
        self.policy.len()
    }

    /// Returns `true` if the set holds no keys.
    pub fn is_empty(&mut self) -> bool {
        self.len() == 0
    }
}

/// Keys of a set, printed as `list = k0 k1 ...`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeysView(pub Vec<Key>);

impl fmt::Display for KeysView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("list =")?;
        for key in &self.0 {
            write!(f, " {key}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::concurrency::sync::CoarseLock;

    #[test]
    fn keys_view_formats_like_a_listing() {
        let mut set = ConcurrentOrderedSet::<CoarseLock>::new();
        assert_eq!(set.keys_view().to_string(), "list =");
        for k in [8, 3, 5] {
            set.insert(k);
        }
        assert_eq!(set.keys_view().to_string(), "list = 3 5 8");
    }

    #[test]
    fn default_policy_is_fine_grained() {
        let set: ConcurrentOrderedSet = ConcurrentOrderedSet::new();
        assert_eq!(set.policy_name(), "fine-grained");
    }
}
