//! logsieve: parallel date-prefix extraction from very large log files.
//!
//! This library splits a huge log file into fixed-size chunks, filters each
//! chunk in parallel for lines matching a 10-character date prefix, and
//! merges the per-chunk results into one deterministic output file.
//!
//! # Features
//!
//! - **Parallel filtering**: one task per chunk over a fixed-size Rayon pool
//! - **Bounded memory**: streaming I/O with fixed buffers, mmap for splitting
//! - **Deterministic output**: chunk order then original line order, always
//!
//! # Example
//!
//! ```rust,no_run
//! use logsieve::commands::{ExtractCommand, ExtractConfig};
//!
//! let mut config = ExtractConfig::new("logs_2024.log", "2024-12-01", "output");
//! config.workers = 8;
//! let stats = ExtractCommand::new(config).run().unwrap();
//! println!("{}", stats.output_path.display());
//! ```

pub mod chunk;
pub mod commands;
pub mod error;
pub mod line;
pub mod parallel;

// Re-export commonly used types
pub use chunk::ChunkFile;
pub use error::{ExtractError, Result};
pub use line::{matches_date, LineReader};
pub use parallel::{FilterPool, FilteredChunk};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::chunk::ChunkFile;
    pub use crate::commands::{
        ExtractCommand, ExtractConfig, FilterCommand, GenerateCommand, GenerateConfig,
        MergeCommand, SplitCommand,
    };
    pub use crate::error::{ExtractError, Result};
    pub use crate::line::{matches_date, LineReader};
    pub use crate::parallel::{FilterPool, FilteredChunk};
}
