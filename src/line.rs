//! Line-level primitives: date-prefix matching and buffered line iteration.
//!
//! Log lines are treated as raw bytes. The first [`DATE_WIDTH`] bytes of a
//! line form its date prefix (`YYYY-MM-DD`); no parsing happens beyond a
//! byte-for-byte comparison, so malformed or short lines simply never match.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::path::Path;

/// Width of the date prefix at the start of each log line.
pub const DATE_WIDTH: usize = 10;

/// Returns true iff the first [`DATE_WIDTH`] bytes of `line` equal `date`.
///
/// Comparison is exact-width, byte-for-byte, and case-sensitive. A line
/// shorter than [`DATE_WIDTH`] bytes never matches, and a `date` that is not
/// exactly [`DATE_WIDTH`] bytes matches nothing.
#[inline]
pub fn matches_date(line: &[u8], date: &[u8]) -> bool {
    date.len() == DATE_WIDTH && line.len() >= DATE_WIDTH && &line[..DATE_WIDTH] == date
}

/// A buffered reader that yields one line at a time as a byte slice.
///
/// Unlike `BufRead::lines`, the yielded slice keeps the line terminator
/// (`\n` or `\r\n`) so lines can be copied to an output verbatim. The
/// internal buffer is reused across lines; no per-line allocation.
pub struct LineReader<R: Read> {
    reader: BufReader<R>,
    buf: Vec<u8>,
}

impl LineReader<File> {
    /// Open a log file from a path.
    pub fn from_path<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let file = File::open(path)?;
        Ok(Self::new(file))
    }
}

impl<R: Read> LineReader<R> {
    /// Create a line reader from any readable source.
    pub fn new(reader: R) -> Self {
        Self {
            reader: BufReader::new(reader),
            buf: Vec::with_capacity(1024),
        }
    }

    /// Create a line reader with a custom stream buffer capacity.
    pub fn with_capacity(reader: R, capacity: usize) -> Self {
        Self {
            reader: BufReader::with_capacity(capacity, reader),
            buf: Vec::with_capacity(1024),
        }
    }

    /// Read the next line, terminator included.
    ///
    /// Returns `Ok(None)` at end of input. A final line with no trailing
    /// terminator is still yielded.
    pub fn next_line(&mut self) -> io::Result<Option<&[u8]>> {
        self.buf.clear();
        let bytes_read = self.reader.read_until(b'\n', &mut self.buf)?;
        if bytes_read == 0 {
            return Ok(None);
        }
        Ok(Some(&self.buf))
    }
}
