// statistics.rs
//
// Per-level counters, printed at termination. Grounded on the teacher's
// `CacheStatistics`/`print_statistics` (src/timing_simulator/components.rs),
// narrowed to the five counters this simulator reports.

use std::fmt::Write as _;

#[derive(Debug, Clone, Copy, Default)]
pub struct Statistics {
    pub num_read: u64,
    pub num_write: u64,
    pub num_hit: u64,
    pub num_miss: u64,
    pub total_cycles: u64,
}

impl Statistics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Render this level's block of the stdout report.
    pub fn format_block(&self, label: &str, out: &mut String) {
        let _ = writeln!(out, "{} Cache:", label);
        let _ = writeln!(out, "-------- STATISTICS ----------");
        let _ = writeln!(out, "Num Read: {}", self.num_read);
        let _ = writeln!(out, "Num Write: {}", self.num_write);
        let _ = writeln!(out, "Num Hit: {}", self.num_hit);
        let _ = writeln!(out, "Num Miss: {}", self.num_miss);
        let _ = writeln!(out, "Total Cycles: {}", self.total_cycles);
    }
}
