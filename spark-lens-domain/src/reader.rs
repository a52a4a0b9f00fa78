// /////////////////////////////////////////////////////////////////////////////
// Spark Lens
// Copyright (c) 2026 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Event Stream Reader
//!
//! Component A of the pipeline (§4.1): a lazy, line-oriented reader over an
//! event log file at rest. Decode failures are swallowed line by line; only
//! the initial `open` and subsequent `read` calls can fail the stream.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use crate::error::SparkLensError;
use crate::event::{parse_event, ParsedEvent};

/// Iterates a newline-delimited JSON event log, yielding one [`ParsedEvent`]
/// per valid, recognized line.
///
/// Lines that are blank, fail to parse as JSON, or carry an unrecognized
/// `Event` discriminator are skipped transparently — they never surface as
/// `Err` from [`Iterator::next`]. Only a read error against the underlying
/// file does.
pub struct EventReader {
    lines: io::Lines<BufReader<File>>,
}

impl EventReader {
    /// Opens `path` for streaming. Fails only if the file cannot be opened.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, SparkLensError> {
        let file = File::open(path)?;
        Ok(Self {
            lines: BufReader::new(file).lines(),
        })
    }
}

impl Iterator for EventReader {
    type Item = Result<ParsedEvent, SparkLensError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = match self.lines.next()? {
                Ok(line) => line,
                Err(err) => return Some(Err(SparkLensError::from(err))),
            };
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            if let Some(event) = parse_event(trimmed) {
                return Some(Ok(event));
            }
            // Malformed or unrecognized line: skip and keep reading.
        }
    }
}
