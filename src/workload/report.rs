//! `RunReport` - what a finished run prints.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Outcome of one benchmark run.
///
/// `member_total + insert_total + delete_total == total_ops` always holds:
/// `total_ops` counts the operations actually dispatched, which is
/// `thread_count * (configured total / thread_count)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    /// Policy name.
    pub policy: String,
    /// Worker threads.
    pub thread_count: usize,
    /// Keys inserted before timing started.
    pub preloaded: usize,
    /// Operations dispatched by the workers.
    pub total_ops: usize,
    /// Wall time of the timed region.
    pub elapsed_secs: f64,
    /// Lookups dispatched.
    pub member_total: usize,
    /// Inserts dispatched.
    pub insert_total: usize,
    /// Deletes dispatched.
    pub delete_total: usize,
    /// Keys left in the set after the run.
    pub final_len: usize,
}

impl RunReport {
    /// Dispatched operations per second of wall time.
    pub fn throughput(&self) -> f64 {
        if self.elapsed_secs > 0.0 {
            self.total_ops as f64 / self.elapsed_secs
        } else {
            0.0
        }
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Inserted {} keys in empty list", self.preloaded)?;
        writeln!(f, "Policy = {}, threads = {}", self.policy, self.thread_count)?;
        writeln!(f, "Elapsed time = {:e} seconds", self.elapsed_secs)?;
        writeln!(f, "Total ops = {}", self.total_ops)?;
        writeln!(f, "member ops = {}", self.member_total)?;
        writeln!(f, "insert ops = {}", self.insert_total)?;
        writeln!(f, "delete ops = {}", self.delete_total)?;
        write!(f, "Final list size = {}", self.final_len)
    }
}
