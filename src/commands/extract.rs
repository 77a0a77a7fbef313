//! Full extraction pipeline: split, filter in parallel, merge.
//!
//! The driver owns the working-directory layout. It probes the input before
//! creating anything, splits the input into chunks, fans the chunks out to
//! the filter pool, and merges the filtered outputs in chunk order into
//! `output_<date>.txt`. Intermediate chunk and filtered files are left in
//! place after a run; only the final output is replaced atomically.

use crate::chunk::{self, DEFAULT_CHUNK_SIZE};
use crate::commands::merge::MergeCommand;
use crate::commands::split::SplitCommand;
use crate::error::{ExtractError, Result};
use crate::parallel::{self, FilterPool, DEFAULT_WORKERS};
use std::fs;
use std::path::PathBuf;
use std::time::Instant;

/// Configuration for one pipeline run.
#[derive(Debug, Clone)]
pub struct ExtractConfig {
    /// Input log file.
    pub input: PathBuf,
    /// Target date prefix (`YYYY-MM-DD`).
    pub date: String,
    /// Directory for chunks, filtered chunks, and the final output.
    pub output_dir: PathBuf,
    /// Nominal chunk size in bytes (default: 10 GiB)
    pub chunk_size: u64,
    /// Number of filter workers (default: 4)
    pub workers: usize,
    /// Align chunk boundaries to line boundaries (default: true)
    pub line_aligned: bool,
    /// Report per-stage progress on stderr (default: quiet)
    pub progress: bool,
}

impl ExtractConfig {
    pub fn new(
        input: impl Into<PathBuf>,
        date: impl Into<String>,
        output_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            input: input.into(),
            date: date.into(),
            output_dir: output_dir.into(),
            chunk_size: DEFAULT_CHUNK_SIZE,
            workers: DEFAULT_WORKERS,
            line_aligned: true,
            progress: false,
        }
    }
}

/// Extract command: the pipeline driver.
#[derive(Debug, Clone)]
pub struct ExtractCommand {
    config: ExtractConfig,
}

impl ExtractCommand {
    pub fn new(config: ExtractConfig) -> Self {
        Self { config }
    }

    /// Run the whole pipeline and return the final output path with totals.
    pub fn run(&self) -> Result<ExtractStats> {
        let start = Instant::now();
        let cfg = &self.config;

        if cfg.chunk_size == 0 {
            return Err(ExtractError::InvalidConfig(
                "chunk size must be at least 1 byte".to_string(),
            ));
        }
        if cfg.workers == 0 {
            return Err(ExtractError::InvalidConfig(
                "worker count must be at least 1".to_string(),
            ));
        }

        // Probe the input before creating anything, so a bad path leaves
        // no artifacts behind.
        let input_bytes = match fs::metadata(&cfg.input) {
            Ok(metadata) => metadata.len(),
            Err(e) => return Err(ExtractError::from_io(e, &cfg.input)),
        };

        fs::create_dir_all(&cfg.output_dir)?;
        let output_path = chunk::final_output_path(&cfg.output_dir, &cfg.date);

        // Empty input: nothing to split or filter, just an empty output.
        if input_bytes == 0 {
            MergeCommand::new().run(&[], &output_path)?;
            return Ok(ExtractStats {
                output_path,
                chunks: 0,
                lines_read: 0,
                lines_matched: 0,
                bytes_written: 0,
                input_bytes: 0,
                elapsed_secs: start.elapsed().as_secs_f64(),
            });
        }

        if cfg.progress {
            eprintln!(
                "Splitting {} into {} chunks...",
                cfg.input.display(),
                chunk::format_size(cfg.chunk_size)
            );
        }
        let split = SplitCommand::new()
            .with_chunk_size(cfg.chunk_size)
            .with_line_aligned(cfg.line_aligned)
            .run(&cfg.input, &cfg.output_dir)?;
        if split.chunks.is_empty() {
            return Err(ExtractError::NoChunks(cfg.input.clone()));
        }
        if cfg.progress {
            eprintln!("Split: {split}");
            eprintln!(
                "Filtering {} chunks with {} workers...",
                split.chunks.len(),
                cfg.workers
            );
        }

        let filtered = FilterPool::new()
            .with_workers(cfg.workers)
            .with_progress(cfg.progress)
            .run(&split.chunks, &cfg.date)?;
        let totals = parallel::total_stats(&filtered);

        if cfg.progress {
            eprintln!(
                "Merging {} filtered chunks into {}...",
                filtered.len(),
                output_path.display()
            );
        }
        let paths: Vec<PathBuf> = filtered.iter().map(|c| c.path.clone()).collect();
        let merge = MergeCommand::new().run(&paths, &output_path)?;

        Ok(ExtractStats {
            output_path,
            chunks: split.chunks.len(),
            lines_read: totals.lines_read,
            lines_matched: totals.lines_matched,
            bytes_written: merge.bytes_written,
            input_bytes,
            elapsed_secs: start.elapsed().as_secs_f64(),
        })
    }
}

/// Statistics from one pipeline run.
#[derive(Debug, Clone)]
pub struct ExtractStats {
    /// Path of the final merged output.
    pub output_path: PathBuf,
    /// Number of chunks the input was split into.
    pub chunks: usize,
    pub lines_read: u64,
    pub lines_matched: u64,
    /// Bytes in the final output.
    pub bytes_written: u64,
    pub input_bytes: u64,
    pub elapsed_secs: f64,
}

impl std::fmt::Display for ExtractStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Matched {} of {} lines across {} chunks ({} bytes) in {:.1}s",
            self.lines_matched, self.lines_read, self.chunks, self.bytes_written, self.elapsed_secs
        )
    }
}
