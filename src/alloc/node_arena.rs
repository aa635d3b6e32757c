//! `NodeArena` - per-node-locked storage for the hand-over-hand list.
//!
//! Slots live in segments that double in size (64, 128, 256, ...). A segment
//! is never moved or freed while the arena is shared, so a `&Mutex<Link>`
//! handed out by [`NodeArena::slot`] stays valid for the arena's lifetime and
//! lock guards can outlive the lock that was held when they were taken.
//!
//! Reclaimed indices go to a free list guarded by the arena's own mutex. That
//! mutex is a leaf: while holding it the arena never touches a slot lock, so
//! taking it with node locks held cannot close a cycle.

use std::sync::{Mutex, OnceLock, PoisonError};

use crate::alloc::AllocError;
use crate::collections::node::{Link, NodeId};
use crate::concurrency::sync::lock;

/// Slots in the first segment; segment `s` holds `BASE_SEGMENT << s`.
const BASE_SEGMENT: usize = 64;
const SEGMENTS: usize = 40;

type Segment = Box<[Mutex<Link>]>;

#[derive(Debug, Default)]
struct FreeList {
    /// Capacity is kept at least equal to the number of slots ever created,
    /// so pushing a reclaimed index never allocates.
    free: Vec<NodeId>,
    next_fresh: usize,
    live: usize,
}

/// Segmented arena of individually locked list nodes.
#[derive(Debug)]
pub struct NodeArena {
    segments: [OnceLock<Segment>; SEGMENTS],
    state: Mutex<FreeList>,
}

/// Maps a slot index to `(segment, offset)`.
#[inline]
fn locate(index: usize) -> (usize, usize) {
    let n = index / BASE_SEGMENT + 1;
    let segment = (usize::BITS - 1 - n.leading_zeros()) as usize;
    let start = BASE_SEGMENT * ((1 << segment) - 1);
    (segment, index - start)
}

impl NodeArena {
    /// Creates an arena with no segments allocated.
    pub fn new() -> Self {
        Self {
            segments: std::array::from_fn(|_| OnceLock::new()),
            state: Mutex::new(FreeList::default()),
        }
    }

    /// Returns the lock guarding node `id`.
    ///
    /// # Panics
    /// Panics if `id` was never handed out by this arena.
    #[inline]
    pub fn slot(&self, id: NodeId) -> &Mutex<Link> {
        let (segment, offset) = locate(id.index());
        match self.segments[segment].get() {
            Some(slots) => &slots[offset],
            None => unreachable!("{id:?} was never allocated"),
        }
    }

    /// Reserves a slot, stores `link` in it and returns its handle.
    ///
    /// # Errors
    /// Returns `AllocError` if a new segment is needed and cannot be allocated.
    pub fn alloc(&self, link: Link) -> Result<NodeId, AllocError> {
        let id = {
            let mut state = lock(&self.state);
            let id = match state.free.pop() {
                Some(id) => id,
                None => self.fresh(&mut state)?,
            };
            state.live += 1;
            id
        };

        // The slot is unreachable until the caller links it in.
        *lock(self.slot(id)) = link;
        Ok(id)
    }

    fn fresh(&self, state: &mut FreeList) -> Result<NodeId, AllocError> {
        let index = state.next_fresh;
        let (segment, offset) = locate(index);
        if segment >= SEGMENTS {
            return Err(AllocError);
        }

        if offset == 0 && self.segments[segment].get().is_none() {
            let len = BASE_SEGMENT << segment;
            let mut slots = Vec::new();
            slots.try_reserve_exact(len).map_err(|_| AllocError)?;
            slots.extend((0..len).map(|_| Mutex::new(Link::default())));

            let total = index + len;
            state
                .free
                .try_reserve(total - state.free.len())
                .map_err(|_| AllocError)?;

            self.segments[segment].get_or_init(|| slots.into_boxed_slice());

            #[cfg(feature = "tracing")]
            tracing::debug!(segment, slots = len, "node arena grew");
        }

        state.next_fresh += 1;
        Ok(NodeId::new(index))
    }

    /// Returns `id` to the free list.
    ///
    /// The caller must have unlinked the node and released its lock; nothing
    /// may reach `id` again until `alloc` hands it out.
    pub fn free(&self, id: NodeId) {
        let mut state = lock(&self.state);
        debug_assert!(state.free.len() < state.free.capacity());
        state.free.push(id);
        state.live -= 1;
    }

    /// Number of slots currently handed out.
    pub fn live(&self) -> usize {
        lock(&self.state).live
    }

    /// Reads node `id` through exclusive access, without locking.
    ///
    /// # Panics
    /// Panics if `id` was never handed out by this arena.
    pub fn get_mut(&mut self, id: NodeId) -> &mut Link {
        let (segment, offset) = locate(id.index());
        match self.segments[segment].get_mut() {
            Some(slots) => slots[offset]
                .get_mut()
                .unwrap_or_else(PoisonError::into_inner),
            None => unreachable!("{id:?} was never allocated"),
        }
    }

    /// Drops every segment and forgets every slot.
    pub fn clear(&mut self) {
        *self = Self::new();
    }
}

impl Default for NodeArena {
    fn default() -> Self {
        Self::new()
    }
}
