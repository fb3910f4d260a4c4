// trace.rs
//
// Parses memory reference traces: whitespace-separated records of
// `<op> <hex-addr>`, one per line, blank lines skipped. `op` is exactly
// `r` or `w`; anything else is fatal. Grounded on the teacher's
// `utils/parser.rs` whitespace-split-then-match style, adapted from MIPS
// instruction mnemonics to this two-character trace op alphabet.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use crate::errors::SimulatorError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Read,
    Write,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraceEvent {
    pub op: Op,
    pub addr: u32,
    pub line: usize,
}

/// Parses one trace line, 1-indexed `line` used only for error messages.
pub fn parse_line(raw: &str, line: usize) -> Result<Option<TraceEvent>, SimulatorError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    let mut parts = trimmed.split_whitespace();
    let op_str = parts.next().ok_or_else(|| {
        SimulatorError::MalformedTrace(format!("line {}: missing operation", line))
    })?;
    let addr_str = parts.next().ok_or_else(|| {
        SimulatorError::MalformedTrace(format!("line {}: missing address", line))
    })?;
    if parts.next().is_some() {
        return Err(SimulatorError::MalformedTrace(format!(
            "line {}: too many fields",
            line
        )));
    }

    let op = match op_str {
        "r" => Op::Read,
        "w" => Op::Write,
        other => {
            let c = other.chars().next().unwrap_or('?');
            return Err(SimulatorError::UnknownOp(c));
        }
    };

    let addr_str = addr_str.trim_start_matches("0x").trim_start_matches("0X");
    let addr = u32::from_str_radix(addr_str, 16).map_err(|_| {
        SimulatorError::MalformedTrace(format!("line {}: invalid hex address '{}'", line, addr_str))
    })?;

    Ok(Some(TraceEvent { op, addr, line }))
}

/// Reads and parses an entire trace file into an ordered event list.
pub fn read_trace(path: &Path) -> Result<Vec<TraceEvent>, SimulatorError> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let mut events = Vec::new();

    for (idx, raw_line) in reader.lines().enumerate() {
        let raw_line: String = raw_line.map_err(io::Error::from)?;
        if let Some(event) = parse_line(&raw_line, idx + 1)? {
            events.push(event);
        }
    }

    Ok(events)
}
