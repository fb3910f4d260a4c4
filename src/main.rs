// Copyright (c) 2024 Mudit Bhargava
//
// Permission is hereby granted, free of charge, to any person obtaining a copy
// of this software and associated documentation files (the "Software"), to deal
// in the Software without restriction, including without limitation the rights
// to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
// copies of the Software, and to permit persons to whom the Software is
// furnished to do so, subject to the following conditions:
//
// The above copyright notice and this permission notice shall be included in all
// copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
// FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
// AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
// LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
// OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
// SOFTWARE.
//

// main.rs
//
// Entry point: parses the CLI, builds a cache hierarchy from it, replays
// a trace through it, and prints the statistics report.

use std::process::ExitCode;

use clap::Parser;

use cachesim::cli::{Cli, Commands};
use cachesim::errors::SimulatorError;
use cachesim::hierarchy::{Hierarchy, HierarchyConfig, LevelConfig};
use cachesim::prefetch::PrefetchController;
use cachesim::trace::{self, Op};

fn main() -> ExitCode {
    let cli = Cli::parse();
    let Commands::Run {
        trace: trace_path,
        config: config_path,
        l1_size,
        l1_block,
        l1_assoc,
        l2_size,
        l2_block,
        l2_assoc,
        l3_size,
        l3_block,
        l3_assoc,
        no_write_back,
        no_write_allocate,
        no_prefetch,
        full_block_fill,
        log_level,
    } = cli.command;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let config = match config_path {
        Some(path) => HierarchyConfig::from_json_file(&path),
        None => Ok(HierarchyConfig {
            levels: vec![
                LevelConfig {
                    cache_size: l1_size,
                    block_size: l1_block,
                    associativity: l1_assoc,
                    hit_latency: 1,
                    miss_latency: 1,
                },
                LevelConfig {
                    cache_size: l2_size,
                    block_size: l2_block,
                    associativity: l2_assoc,
                    hit_latency: 8,
                    miss_latency: 8,
                },
                LevelConfig {
                    cache_size: l3_size,
                    block_size: l3_block,
                    associativity: l3_assoc,
                    hit_latency: 20,
                    miss_latency: 100,
                },
            ],
            write_back: !no_write_back,
            write_allocate: !no_write_allocate,
            full_block_fill,
        }),
    };
    let config = match config {
        Ok(config) => config,
        Err(err) => {
            eprintln!("error: {}", err);
            return exit_code_for(&err);
        },
    };

    match run(&config, &trace_path, !no_prefetch) {
        Ok(report) => {
            print!("{}", report);
            ExitCode::SUCCESS
        },
        Err(err) => {
            eprintln!("error: {}", err);
            exit_code_for(&err)
        },
    }
}

fn run(
    config: &HierarchyConfig,
    trace_path: &std::path::Path,
    prefetch_enabled: bool,
) -> Result<String, SimulatorError> {
    let mut hierarchy = Hierarchy::build(config)?;

    let events = trace::read_trace(trace_path)?;
    log::info!("loaded {} trace events from {:?}", events.len(), trace_path);

    let mut prefetcher = PrefetchController::new();

    for event in events {
        log::debug!("line {}: {:?} 0x{:08X}", event.line, event.op, event.addr);
        match event.op {
            Op::Read => {
                let _ = hierarchy.top().get_byte(event.addr, None, false)?;
            },
            Op::Write => {
                hierarchy.top().set_byte(event.addr, 0, None)?;
            },
        }

        if prefetch_enabled {
            for target in prefetcher.on_access(event.addr) {
                log::debug!("prefetch issued: 0x{:08X}", target);
                // Prefetch failures must never surface as trace errors.
                let _ = hierarchy.top().get_byte(target, None, true);
            }
        }
    }

    Ok(hierarchy.report())
}

fn exit_code_for(err: &SimulatorError) -> ExitCode {
    match err {
        SimulatorError::InvalidPolicy(_) => ExitCode::from(2),
        SimulatorError::UnknownOp(_) | SimulatorError::MalformedTrace(_) => ExitCode::from(3),
        SimulatorError::Io(_) => ExitCode::from(4),
        SimulatorError::InvariantViolation(_) => ExitCode::from(70),
    }
}
