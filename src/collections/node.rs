//! Node handles shared by the plain and the per-node-locked stores.

/// Key type held by every set in this crate.
pub type Key = i64;

/// Stable handle to a node slot.
///
/// Lists link nodes through these indices instead of pointers, so a handle
/// that outlives its node can at worst observe a recycled slot, never freed
/// memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    #[inline]
    pub(crate) const fn new(index: usize) -> Self {
        Self(index)
    }

    /// Returns the slot index behind this handle.
    #[inline]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// The payload of one list element: its key and its successor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Link {
    /// The element's key.
    pub key: Key,
    /// The next element in ascending key order.
    pub next: Option<NodeId>,
}

impl Link {
    /// Creates a link for `key` pointing at `next`.
    #[inline]
    pub const fn new(key: Key, next: Option<NodeId>) -> Self {
        Self { key, next }
    }
}
