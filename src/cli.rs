// cli.rs
//
// Command-line surface. Grounded on the teacher's `main.rs`
// `Cli`/`Commands` derive (`clap::Parser`/`Subcommand`), narrowed from
// the teacher's two functional/timing subcommands to this crate's single
// `run` subcommand.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "cachesim")]
#[command(about = "A trace-driven multi-level cache hierarchy simulator")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Replay a memory reference trace through the cache hierarchy
    Run {
        /// Path to the trace file (`<op> <hex-addr>` per line)
        #[arg(long)]
        trace: PathBuf,

        /// Load the full hierarchy configuration from a JSON file,
        /// overriding every size/associativity/policy flag below
        #[arg(long)]
        config: Option<PathBuf>,

        /// L1 cache size in bytes
        #[arg(long, default_value_t = 16 * 1024)]
        l1_size: usize,

        /// L1 block size in bytes
        #[arg(long, default_value_t = 64)]
        l1_block: usize,

        /// L1 associativity
        #[arg(long, default_value_t = 1)]
        l1_assoc: usize,

        /// L2 cache size in bytes
        #[arg(long, default_value_t = 128 * 1024)]
        l2_size: usize,

        /// L2 block size in bytes
        #[arg(long, default_value_t = 64)]
        l2_block: usize,

        /// L2 associativity
        #[arg(long, default_value_t = 8)]
        l2_assoc: usize,

        /// L3 cache size in bytes
        #[arg(long, default_value_t = 2 * 1024 * 1024)]
        l3_size: usize,

        /// L3 block size in bytes
        #[arg(long, default_value_t = 64)]
        l3_block: usize,

        /// L3 associativity
        #[arg(long, default_value_t = 16)]
        l3_assoc: usize,

        /// Disable write-back (use write-through) at every level
        #[arg(long)]
        no_write_back: bool,

        /// Disable write-allocate (use write-around) at every level
        #[arg(long)]
        no_write_allocate: bool,

        /// Disable the adaptive next-line/stride prefetcher
        #[arg(long)]
        no_prefetch: bool,

        /// Fill the entire block on a miss instead of one byte at a time
        #[arg(long)]
        full_block_fill: bool,

        /// Log level (error, warn, info, debug, trace)
        #[arg(long, default_value = "warn")]
        log_level: String,
    },
}
