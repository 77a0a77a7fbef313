//! Crate-wide error type for the extraction pipeline.

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur while splitting, filtering, or merging log files.
#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("file not found: {0}")]
    NotFound(PathBuf),

    #[error("permission denied: {0}")]
    PermissionDenied(PathBuf),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("splitting produced no chunks for {0}")]
    NoChunks(PathBuf),

    #[error("worker pool error: {0}")]
    WorkerPool(String),

    #[error("{failed} of {total} filter tasks failed")]
    TaskFailures {
        failed: usize,
        total: usize,
        /// Chunk index and cause for each failed task, in chunk order.
        failures: Vec<(usize, ExtractError)>,
    },
}

pub type Result<T> = std::result::Result<T, ExtractError>;

impl ExtractError {
    /// Classify an I/O error from a file operation, attaching the path for
    /// the kinds where the path is the whole story.
    pub fn from_io(err: io::Error, path: &Path) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => ExtractError::NotFound(path.to_path_buf()),
            io::ErrorKind::PermissionDenied => ExtractError::PermissionDenied(path.to_path_buf()),
            _ => ExtractError::Io(err),
        }
    }
}
