//! Worker pool for parallel chunk filtering.
//!
//! One filter task per chunk, distributed over a fixed-size rayon thread
//! pool, with a full join barrier before returning. Results come back in
//! chunk order, never completion order. Tasks share nothing: each reads one
//! chunk file and writes one filtered file, so no locking is needed beyond
//! the filesystem namespace.
//!
//! A failing task never aborts its siblings. Every task runs to completion,
//! and any failures are returned together as a single aggregate error, in
//! which case the caller should not merge (the filtered set is incomplete).

use crate::chunk::{self, ChunkFile};
use crate::commands::filter::{FilterCommand, FilterStats};
use crate::error::{ExtractError, Result};
use crossbeam_channel::{unbounded, Sender};
use rayon::prelude::*;
use std::path::PathBuf;
use std::thread;

/// Default number of filter workers.
pub const DEFAULT_WORKERS: usize = 4;

/// One filtered output produced from exactly one chunk.
#[derive(Debug, Clone)]
pub struct FilteredChunk {
    /// Index of the source chunk.
    pub index: usize,
    pub path: PathBuf,
    pub stats: FilterStats,
}

/// Per-chunk progress events, sent from workers to the printer thread.
#[derive(Debug, Clone, Copy)]
enum Progress {
    Started(usize),
    Finished(usize, u64),
    Failed(usize),
}

/// Filter pool configuration.
#[derive(Debug, Clone)]
pub struct FilterPool {
    /// Number of worker threads (default: 4)
    pub workers: usize,
    /// Report per-chunk progress on stderr
    pub progress: bool,
}

impl Default for FilterPool {
    fn default() -> Self {
        Self::new()
    }
}

impl FilterPool {
    pub fn new() -> Self {
        Self {
            workers: DEFAULT_WORKERS,
            progress: false,
        }
    }

    /// Set the worker thread count.
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    /// Enable per-chunk progress reporting on stderr.
    pub fn with_progress(mut self, progress: bool) -> Self {
        self.progress = progress;
        self
    }

    /// Filter every chunk in parallel, writing each chunk's matches to its
    /// filtered-output path next to the chunk file.
    ///
    /// Blocks until all tasks have finished. On success the filtered chunks
    /// are returned in chunk order; if any task failed, all failures are
    /// aggregated into [`ExtractError::TaskFailures`] after the barrier.
    pub fn run(&self, chunks: &[ChunkFile], date: &str) -> Result<Vec<FilteredChunk>> {
        if self.workers == 0 {
            return Err(ExtractError::InvalidConfig(
                "worker count must be at least 1".to_string(),
            ));
        }
        if chunks.is_empty() {
            return Ok(Vec::new());
        }

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.workers)
            .build()
            .map_err(|e| ExtractError::WorkerPool(e.to_string()))?;

        // Workers never print; events go over a channel to one printer thread.
        let (tx, printer) = if self.progress {
            let (tx, rx) = unbounded::<Progress>();
            let handle = thread::spawn(move || {
                while let Ok(event) = rx.recv() {
                    match event {
                        Progress::Started(index) => {
                            eprintln!("  chunk {index:04}: filtering...");
                        }
                        Progress::Finished(index, lines) => {
                            eprintln!("  chunk {index:04}: {lines} lines matched");
                        }
                        Progress::Failed(index) => {
                            eprintln!("  chunk {index:04}: failed");
                        }
                    }
                }
            });
            (Some(tx), Some(handle))
        } else {
            (None, None)
        };

        let command = FilterCommand::new(date);
        let total = chunks.len();

        // Indexed collect keeps chunk order regardless of completion order.
        let results: Vec<std::result::Result<FilteredChunk, (usize, ExtractError)>> =
            pool.install(|| {
                chunks
                    .par_iter()
                    .map(|chunk| self.filter_one(&command, chunk, tx.as_ref()))
                    .collect()
            });

        drop(tx);
        if let Some(handle) = printer {
            let _ = handle.join();
        }

        let mut filtered = Vec::with_capacity(total);
        let mut failures = Vec::new();
        for result in results {
            match result {
                Ok(chunk) => filtered.push(chunk),
                Err(failure) => failures.push(failure),
            }
        }

        if !failures.is_empty() {
            return Err(ExtractError::TaskFailures {
                failed: failures.len(),
                total,
                failures,
            });
        }
        Ok(filtered)
    }

    fn filter_one(
        &self,
        command: &FilterCommand,
        chunk: &ChunkFile,
        tx: Option<&Sender<Progress>>,
    ) -> std::result::Result<FilteredChunk, (usize, ExtractError)> {
        if let Some(tx) = tx {
            let _ = tx.send(Progress::Started(chunk.index));
        }

        let path = chunk::filtered_path(&chunk.path);
        match command.run_file(&chunk.path, &path) {
            Ok(stats) => {
                if let Some(tx) = tx {
                    let _ = tx.send(Progress::Finished(chunk.index, stats.lines_matched));
                }
                Ok(FilteredChunk {
                    index: chunk.index,
                    path,
                    stats,
                })
            }
            Err(err) => {
                if let Some(tx) = tx {
                    let _ = tx.send(Progress::Failed(chunk.index));
                }
                Err((chunk.index, err))
            }
        }
    }
}

/// Sum of per-chunk filter stats, for pipeline-level reporting.
pub fn total_stats(filtered: &[FilteredChunk]) -> FilterStats {
    let mut total = FilterStats::default();
    for chunk in filtered {
        total.lines_read += chunk.stats.lines_read;
        total.lines_matched += chunk.stats.lines_matched;
        total.bytes_read += chunk.stats.bytes_read;
        total.bytes_written += chunk.stats.bytes_written;
    }
    total
}
