//! Node storage: the allocation error and the per-node-locked arena.

pub mod allocator;
pub mod node_arena;

pub use allocator::AllocError;
pub use node_arena::NodeArena;
