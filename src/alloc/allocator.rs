//! Allocation failure shared by both node stores.

/// The error type for node allocation failures.
///
/// Returned when a node store cannot grow to hold one more element. Callers
/// see it only after every lock taken by the failed operation has been
/// released.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AllocError;

impl core::fmt::Display for AllocError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("node allocation failed")
    }
}

impl std::error::Error for AllocError {}
