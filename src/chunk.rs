//! Chunk records, on-disk naming scheme, and chunk-size parsing.
//!
//! All intermediate artifacts of one pipeline run live in a single output
//! directory. Chunk files share the [`CHUNK_PREFIX`] plus a zero-padded
//! creation index so directory listings sort in byte-range order; each
//! filtered file appends [`FILTERED_SUFFIX`] to its chunk's name; the final
//! merged file embeds the target date. The chunk list itself flows by value
//! from stage to stage, so stale files from earlier runs are never picked up
//! as inputs.

use std::path::{Path, PathBuf};

/// Shared file-name prefix for chunk files.
pub const CHUNK_PREFIX: &str = "chunk_";

/// Suffix appended to a chunk's file name to form its filtered output name.
pub const FILTERED_SUFFIX: &str = "_filtered.txt";

/// Zero-padding width of the chunk index in chunk file names.
pub const CHUNK_INDEX_WIDTH: usize = 4;

/// Default chunk size: 10 GiB.
pub const DEFAULT_CHUNK_SIZE: u64 = 10 * 1024 * 1024 * 1024;

/// One contiguous byte range of the input, materialized as a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkFile {
    /// Creation-order index, starting at 0.
    pub index: usize,
    pub path: PathBuf,
    /// Length of this chunk in bytes.
    pub bytes: u64,
}

/// Path of the chunk file with the given creation index.
pub fn chunk_path(dir: &Path, index: usize) -> PathBuf {
    dir.join(format!(
        "{}{:0width$}",
        CHUNK_PREFIX,
        index,
        width = CHUNK_INDEX_WIDTH
    ))
}

/// Filtered-output path for a chunk: the chunk's own name plus
/// [`FILTERED_SUFFIX`], in the same directory.
pub fn filtered_path(chunk: &Path) -> PathBuf {
    let mut name = chunk
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(FILTERED_SUFFIX);
    chunk.with_file_name(name)
}

/// Path of the final merged output for `date`, inside `dir`.
pub fn final_output_path(dir: &Path, date: &str) -> PathBuf {
    dir.join(format!("output_{date}.txt"))
}

/// Parse a byte size with an optional `B`/`K`/`M`/`G` suffix (1024-based),
/// e.g. "10G", "512M", "4096". Returns `None` for anything unparseable.
pub fn parse_size(s: &str) -> Option<u64> {
    let s = s.trim().to_uppercase();
    if s.is_empty() {
        return None;
    }

    let (num_part, multiplier) = if s.ends_with('G') {
        (s[..s.len() - 1].to_string(), 1024 * 1024 * 1024)
    } else if s.ends_with('M') {
        (s[..s.len() - 1].to_string(), 1024 * 1024)
    } else if s.ends_with('K') {
        (s[..s.len() - 1].to_string(), 1024)
    } else if s.ends_with('B') {
        (s[..s.len() - 1].to_string(), 1)
    } else {
        (s.clone(), 1)
    };

    num_part.trim().parse::<u64>().ok().map(|n| n * multiplier)
}

/// Format a byte size for display, using the largest exact suffix.
pub fn format_size(bytes: u64) -> String {
    const K: u64 = 1024;
    const M: u64 = 1024 * 1024;
    const G: u64 = 1024 * 1024 * 1024;

    if bytes >= G && bytes % G == 0 {
        format!("{}G", bytes / G)
    } else if bytes >= M && bytes % M == 0 {
        format!("{}M", bytes / M)
    } else if bytes >= K && bytes % K == 0 {
        format!("{}K", bytes / K)
    } else {
        format!("{bytes}B")
    }
}
