//! Chunk filter: stream one log file, keep lines matching a date prefix.
//!
//! Reads the input line by line and writes every line whose first 10 bytes
//! equal the target date, verbatim (terminator included), to the output.
//! Line order and byte content are preserved exactly.
//!
//! # Memory
//!
//! O(longest line): one reused line buffer plus fixed 10 MiB stream buffers
//! on each side, regardless of chunk size.

use crate::error::{ExtractError, Result};
use crate::line::{matches_date, LineReader};
use std::fs::File;
use std::io::{self, BufWriter, Read, Write};
use std::path::Path;

/// Stream buffer size for chunk reads and filtered writes (10 MiB).
///
/// Chunks are multi-gigabyte; a large buffer amortizes syscall overhead.
pub const IO_BUF_SIZE: usize = 10 * 1024 * 1024;

/// Filter command configuration.
#[derive(Debug, Clone)]
pub struct FilterCommand {
    /// Target date prefix, compared byte-for-byte against each line.
    pub date: String,
}

impl FilterCommand {
    pub fn new(date: impl Into<String>) -> Self {
        Self { date: date.into() }
    }

    /// Filter `input_path` into a new file at `output_path`.
    ///
    /// The input is opened before the output is created, so a missing or
    /// unreadable input never leaves an output file behind.
    pub fn run_file<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        input_path: P,
        output_path: Q,
    ) -> Result<FilterStats> {
        let input = File::open(input_path.as_ref())
            .map_err(|e| ExtractError::from_io(e, input_path.as_ref()))?;
        let mut output = File::create(output_path.as_ref())
            .map_err(|e| ExtractError::from_io(e, output_path.as_ref()))?;
        let reader = LineReader::with_capacity(input, IO_BUF_SIZE);
        self.run_streaming(reader, &mut output)
    }

    /// Filter `input_path` into any writer.
    pub fn run<P: AsRef<Path>, W: Write>(
        &self,
        input_path: P,
        output: &mut W,
    ) -> Result<FilterStats> {
        let input = File::open(input_path.as_ref())
            .map_err(|e| ExtractError::from_io(e, input_path.as_ref()))?;
        let reader = LineReader::with_capacity(input, IO_BUF_SIZE);
        self.run_streaming(reader, output)
    }

    /// Filter standard input into any writer.
    pub fn run_stdin<W: Write>(&self, output: &mut W) -> Result<FilterStats> {
        let stdin = io::stdin();
        let reader = LineReader::new(stdin.lock());
        self.run_streaming(reader, output)
    }

    /// Core streaming filter over an already-open line reader.
    pub fn run_streaming<R: Read, W: Write>(
        &self,
        mut reader: LineReader<R>,
        output: &mut W,
    ) -> Result<FilterStats> {
        let mut stats = FilterStats::default();
        let mut writer = BufWriter::with_capacity(IO_BUF_SIZE, output);
        let date = self.date.as_bytes();

        while let Some(line) = reader.next_line()? {
            stats.lines_read += 1;
            stats.bytes_read += line.len() as u64;
            if matches_date(line, date) {
                writer.write_all(line)?;
                stats.lines_matched += 1;
                stats.bytes_written += line.len() as u64;
            }
        }

        writer.flush()?;
        Ok(stats)
    }
}

/// Statistics from one filter pass.
#[derive(Debug, Default, Clone)]
pub struct FilterStats {
    /// Number of lines read
    pub lines_read: u64,
    /// Number of lines that matched the date
    pub lines_matched: u64,
    /// Bytes read from the input
    pub bytes_read: u64,
    /// Bytes written to the output
    pub bytes_written: u64,
}

impl FilterStats {
    /// Fraction of read lines that matched.
    pub fn match_rate(&self) -> f64 {
        if self.lines_read == 0 {
            0.0
        } else {
            self.lines_matched as f64 / self.lines_read as f64
        }
    }
}

impl std::fmt::Display for FilterStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Matched {} of {} lines ({} bytes)",
            self.lines_matched, self.lines_read, self.bytes_written
        )
    }
}
