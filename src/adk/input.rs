// SPDX-License-Identifier: MIT

//! Human-input collector
//!
//! The only place the workflow waits on real-time input. Reads are blocking
//! and line based: a block of input ends at the first empty line, and end of
//! input counts as an empty line.

use std::collections::VecDeque;
use std::io::{self, BufRead, Write};
use std::sync::Mutex;

pub trait InputCollector: Send + Sync {
    /// Present text to the operator
    fn show(&self, text: &str);

    /// Read one block of lines, stopping at an empty line or end of input
    fn read_block(&self) -> io::Result<String>;
}

/// Read lines until an empty line or EOF, joined with newlines
pub fn read_block_from<R: BufRead>(reader: &mut R) -> io::Result<String> {
    let mut lines = Vec::new();
    loop {
        let mut line = String::new();
        if reader.read_line(&mut line)? == 0 {
            break;
        }
        let line = line.trim_end_matches(['\r', '\n']);
        if line.is_empty() {
            break;
        }
        lines.push(line.to_string());
    }
    Ok(lines.join("\n"))
}

/// Console collector backed by stdin/stdout
pub struct StdinCollector;

impl InputCollector for StdinCollector {
    fn show(&self, text: &str) {
        let mut out = io::stdout().lock();
        let _ = writeln!(out, "{}", text);
        let _ = out.flush();
    }

    fn read_block(&self) -> io::Result<String> {
        read_block_from(&mut io::stdin().lock())
    }
}

/// Collector that replays canned answer blocks; runs dry as empty answers
#[derive(Default)]
pub struct ScriptedCollector {
    answers: Mutex<VecDeque<String>>,
    shown: Mutex<Vec<String>>,
    reads: Mutex<usize>,
}

impl ScriptedCollector {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: Mutex::new(answers.into_iter().map(Into::into).collect()),
            shown: Mutex::new(Vec::new()),
            reads: Mutex::new(0),
        }
    }

    /// Number of blocks requested so far
    pub fn reads(&self) -> usize {
        self.reads.lock().map(|r| *r).unwrap_or(0)
    }

    /// Everything passed to `show`
    pub fn shown(&self) -> Vec<String> {
        self.shown.lock().map(|s| s.clone()).unwrap_or_default()
    }
}

impl InputCollector for ScriptedCollector {
    fn show(&self, text: &str) {
        if let Ok(mut shown) = self.shown.lock() {
            shown.push(text.to_string());
        }
    }

    fn read_block(&self) -> io::Result<String> {
        if let Ok(mut reads) = self.reads.lock() {
            *reads += 1;
        }
        let next = self
            .answers
            .lock()
            .ok()
            .and_then(|mut answers| answers.pop_front());
        Ok(next.unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_block_stops_at_empty_line() {
        let mut input = Cursor::new("first\nsecond\n\nnext block\n");
        assert_eq!(read_block_from(&mut input).unwrap(), "first\nsecond");
        assert_eq!(read_block_from(&mut input).unwrap(), "next block");
    }

    #[test]
    fn test_eof_is_empty_answer() {
        let mut input = Cursor::new("");
        assert_eq!(read_block_from(&mut input).unwrap(), "");

        let mut input = Cursor::new("no trailing newline");
        assert_eq!(read_block_from(&mut input).unwrap(), "no trailing newline");
        assert_eq!(read_block_from(&mut input).unwrap(), "");
    }

    #[test]
    fn test_crlf_lines() {
        let mut input = Cursor::new("yes\r\n\r\n");
        assert_eq!(read_block_from(&mut input).unwrap(), "yes");
    }

    #[test]
    fn test_scripted_collector_runs_dry() {
        let collector = ScriptedCollector::new(["a"]);
        assert_eq!(collector.read_block().unwrap(), "a");
        assert_eq!(collector.read_block().unwrap(), "");
        assert_eq!(collector.reads(), 2);

        collector.show("Q1");
        assert_eq!(collector.shown(), vec!["Q1".to_string()]);
    }
}
