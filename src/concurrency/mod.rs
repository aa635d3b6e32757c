//! Concurrency control for the ordered set.
//!
//! Important: the policies here synchronize list traversal only. Anything
//! that must see the list at rest (clearing, listing keys) goes through
//! `&mut`, so quiescence is proven at compile time rather than checked.

pub mod sync;

pub use sync::{CoarseLock, FineGrainedLock, ReaderWriterLock, SyncPolicy};
