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

use std::error::Error;
use std::fmt;

#[derive(Debug)]
pub enum SimulatorError {
    // Configuration errors
    InvalidPolicy(String),

    // Structural invariant violations - should be unreachable
    InvariantViolation(String),

    // Trace/input errors
    UnknownOp(char),
    MalformedTrace(String),

    // System errors
    Io(std::io::Error),
}

impl fmt::Display for SimulatorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimulatorError::InvalidPolicy(msg) => {
                write!(f, "invalid cache policy: {}", msg)
            },
            SimulatorError::InvariantViolation(msg) => {
                write!(f, "internal invariant violation: {}", msg)
            },
            SimulatorError::UnknownOp(c) => {
                write!(f, "unrecognized trace operation: '{}'", c)
            },
            SimulatorError::MalformedTrace(msg) => {
                write!(f, "malformed trace record: {}", msg)
            },
            SimulatorError::Io(err) => write!(f, "I/O error: {}", err),
        }
    }
}

impl Error for SimulatorError {}

impl From<std::io::Error> for SimulatorError {
    fn from(error: std::io::Error) -> Self {
        SimulatorError::Io(error)
    }
}
