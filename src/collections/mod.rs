//! The ordered set: node handles, the unsynchronized core list and the
//! policy-parameterized concurrent wrapper.

pub mod concurrent_ordered_set;
pub mod node;
pub mod sorted_list;

pub use concurrent_ordered_set::{ConcurrentOrderedSet, KeysView};
pub use node::{Key, Link, NodeId};
pub use sorted_list::SortedList;
