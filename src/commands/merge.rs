//! Merger: concatenate filtered chunk files into one final output.
//!
//! Inputs are copied in the given order, opening one reader at a time, so
//! at most two file handles are ever held (the current input plus the
//! output). A missing or unreadable input aborts the whole merge.
//!
//! The output is staged in a temporary file inside the destination
//! directory and persisted to the final path only after every input has
//! been copied, so a failed merge never leaves a partial file at the
//! output path.

use crate::error::{ExtractError, Result};
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Stream buffer size for merge reads and writes (10 MiB).
const IO_BUF_SIZE: usize = 10 * 1024 * 1024;

/// Merge command.
#[derive(Debug, Clone, Copy, Default)]
pub struct MergeCommand;

impl MergeCommand {
    pub fn new() -> Self {
        Self
    }

    /// Concatenate `inputs` into `output_path`, preserving input order.
    pub fn run<P: AsRef<Path>>(&self, inputs: &[PathBuf], output_path: P) -> Result<MergeStats> {
        let output_path = output_path.as_ref();
        let dir = match output_path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut temp = NamedTempFile::new_in(dir)?;
        let mut stats = MergeStats::default();

        {
            let mut writer = BufWriter::with_capacity(IO_BUF_SIZE, temp.as_file_mut());
            for path in inputs {
                // One input reader open at a time.
                let file = File::open(path).map_err(|e| ExtractError::from_io(e, path))?;
                let mut reader = BufReader::with_capacity(IO_BUF_SIZE, file);
                stats.bytes_written += io::copy(&mut reader, &mut writer)?;
                stats.files_merged += 1;
            }
            writer.flush()?;
        }

        temp.persist(output_path)
            .map_err(|e| ExtractError::Io(e.error))?;
        Ok(stats)
    }
}

/// Statistics from one merge.
#[derive(Debug, Default, Clone)]
pub struct MergeStats {
    /// Number of input files copied
    pub files_merged: usize,
    /// Total bytes written to the output
    pub bytes_written: u64,
}

impl std::fmt::Display for MergeStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Merged {} files ({} bytes)",
            self.files_merged, self.bytes_written
        )
    }
}
