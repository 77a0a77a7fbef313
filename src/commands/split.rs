//! In-process splitter: partition a log file into fixed-size chunk files.
//!
//! The input is divided into consecutive byte ranges of `chunk_size` bytes
//! (the last chunk may be shorter) and each range is written to its own
//! file under the output directory, named so listings sort in range order.
//!
//! # Boundary modes
//!
//! - **Line-aligned** (default): each boundary is pushed forward to just
//!   past the next newline, so no line is ever split across two chunks and
//!   every line lands in exactly one chunk. Chunks may exceed the nominal
//!   size by up to one line.
//! - **Byte-exact**: boundaries fall at exact byte offsets; a line crossing
//!   a boundary is cut in two, and neither half carries the full date
//!   prefix, so downstream filtering will not match it.
//!
//! Large inputs are memory-mapped; small ones are read whole. Chunk files
//! are written through one handle at a time.

use crate::chunk::{self, ChunkFile};
use crate::error::{ExtractError, Result};
use memchr::memchr;
use memmap2::Mmap;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

/// Minimum file size to use mmap (smaller files are read whole).
const MMAP_THRESHOLD: usize = 64 * 1024;

/// Split command configuration.
#[derive(Debug, Clone)]
pub struct SplitCommand {
    /// Nominal chunk size in bytes (default: 10 GiB)
    pub chunk_size: u64,
    /// Align chunk boundaries to line boundaries (default: true)
    pub line_aligned: bool,
}

impl Default for SplitCommand {
    fn default() -> Self {
        Self::new()
    }
}

impl SplitCommand {
    pub fn new() -> Self {
        Self {
            chunk_size: chunk::DEFAULT_CHUNK_SIZE,
            line_aligned: true,
        }
    }

    /// Set the nominal chunk size in bytes.
    pub fn with_chunk_size(mut self, bytes: u64) -> Self {
        self.chunk_size = bytes;
        self
    }

    /// Enable or disable line-aligned boundaries.
    pub fn with_line_aligned(mut self, aligned: bool) -> Self {
        self.line_aligned = aligned;
        self
    }

    /// Split `input_path` into chunk files under `output_dir`.
    ///
    /// Returns the chunks in byte-range order. An empty input yields zero
    /// chunks and no error; the caller decides what that means.
    pub fn run<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        input_path: P,
        output_dir: Q,
    ) -> Result<SplitResult> {
        if self.chunk_size == 0 {
            return Err(ExtractError::InvalidConfig(
                "chunk size must be at least 1 byte".to_string(),
            ));
        }

        let path = input_path.as_ref();
        let mut file = File::open(path).map_err(|e| ExtractError::from_io(e, path))?;
        let metadata = file.metadata().map_err(|e| ExtractError::from_io(e, path))?;
        let file_size = metadata.len() as usize;

        if file_size >= MMAP_THRESHOLD {
            // Memory-mapped I/O for large files
            let mmap = unsafe { Mmap::map(&file)? };
            let chunks = self.split_bytes(&mmap, output_dir.as_ref())?;
            Ok(SplitResult {
                chunks,
                input_bytes: file_size as u64,
                used_mmap: true,
            })
        } else {
            // Buffered I/O for small files
            let mut data = Vec::with_capacity(file_size);
            file.read_to_end(&mut data)?;
            let chunks = self.split_bytes(&data, output_dir.as_ref())?;
            Ok(SplitResult {
                chunks,
                input_bytes: data.len() as u64,
                used_mmap: false,
            })
        }
    }

    /// Core range computation and chunk writing over in-memory bytes.
    fn split_bytes(&self, data: &[u8], output_dir: &Path) -> Result<Vec<ChunkFile>> {
        let chunk_size = self.chunk_size as usize;
        let mut chunks = Vec::new();
        let mut start = 0usize;

        while start < data.len() {
            let nominal_end = start.saturating_add(chunk_size).min(data.len());
            let end = if self.line_aligned {
                align_to_line(data, nominal_end)
            } else {
                nominal_end
            };

            let index = chunks.len();
            let path = chunk::chunk_path(output_dir, index);
            write_chunk(&path, &data[start..end])?;
            chunks.push(ChunkFile {
                index,
                path,
                bytes: (end - start) as u64,
            });
            start = end;
        }

        Ok(chunks)
    }
}

/// Move `pos` forward to the first position just past a newline.
///
/// A `pos` already sitting right after a newline stays put; otherwise the
/// boundary extends to include the rest of the current line. No following
/// newline means the rest of the input belongs to this chunk.
fn align_to_line(data: &[u8], pos: usize) -> usize {
    if pos >= data.len() {
        return data.len();
    }
    if pos > 0 && data[pos - 1] == b'\n' {
        return pos;
    }
    match memchr(b'\n', &data[pos..]) {
        Some(offset) => pos + offset + 1,
        None => data.len(),
    }
}

fn write_chunk(path: &Path, data: &[u8]) -> Result<()> {
    let mut file = File::create(path).map_err(|e| ExtractError::from_io(e, path))?;
    file.write_all(data)?;
    Ok(())
}

/// Outcome of one split: the ordered chunk list plus run statistics.
#[derive(Debug, Clone)]
pub struct SplitResult {
    /// Chunks in byte-range order.
    pub chunks: Vec<ChunkFile>,
    /// Total input bytes.
    pub input_bytes: u64,
    pub used_mmap: bool,
}

impl SplitResult {
    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }
}

impl std::fmt::Display for SplitResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} chunks from {} (mmap: {})",
            self.chunks.len(),
            chunk::format_size(self.input_bytes),
            if self.used_mmap { "yes" } else { "no" }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn split_content(
        content: &[u8],
        chunk_size: u64,
        aligned: bool,
    ) -> (tempfile::TempDir, SplitResult) {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("input.log");
        fs::write(&input, content).unwrap();

        let result = SplitCommand::new()
            .with_chunk_size(chunk_size)
            .with_line_aligned(aligned)
            .run(&input, dir.path())
            .unwrap();
        (dir, result)
    }

    fn read_chunks(result: &SplitResult) -> Vec<Vec<u8>> {
        result
            .chunks
            .iter()
            .map(|c| fs::read(&c.path).unwrap())
            .collect()
    }

    #[test]
    fn test_byte_exact_ranges() {
        let (_dir, result) = split_content(b"abcdefghij", 4, false);
        let chunks = read_chunks(&result);

        assert_eq!(chunks, vec![b"abcd".to_vec(), b"efgh".to_vec(), b"ij".to_vec()]);
        assert_eq!(result.input_bytes, 10);
        assert!(!result.used_mmap);
        for (i, chunk) in result.chunks.iter().enumerate() {
            assert_eq!(chunk.index, i);
            assert_eq!(chunk.bytes, chunks[i].len() as u64);
        }
    }

    #[test]
    fn test_chunk_files_are_named_in_order() {
        let (_dir, result) = split_content(b"abcdefghij", 4, false);
        let names: Vec<String> = result
            .chunks
            .iter()
            .map(|c| c.path.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["chunk_0000", "chunk_0001", "chunk_0002"]);
    }

    #[test]
    fn test_line_aligned_boundaries_end_on_newlines() {
        let (_dir, result) = split_content(b"aaaa\nbbbbbb\ncc\n", 6, true);
        let chunks = read_chunks(&result);

        assert_eq!(chunks, vec![b"aaaa\nbbbbbb\n".to_vec(), b"cc\n".to_vec()]);
    }

    #[test]
    fn test_line_aligned_keeps_exact_boundary() {
        // A boundary already falling after a newline must not be extended.
        let (_dir, result) = split_content(b"aaaa\nbbbb\n", 5, true);
        let chunks = read_chunks(&result);

        assert_eq!(chunks, vec![b"aaaa\n".to_vec(), b"bbbb\n".to_vec()]);
    }

    #[test]
    fn test_line_longer_than_chunk_size_stays_whole() {
        let (_dir, result) = split_content(b"0123456789abcdef\nxy\n", 4, true);
        let chunks = read_chunks(&result);

        assert_eq!(chunks, vec![b"0123456789abcdef\n".to_vec(), b"xy\n".to_vec()]);
    }

    #[test]
    fn test_chunks_reconstruct_input_in_both_modes() {
        let content = b"2024-12-01,a\n2024-12-02,b\n2024-12-01,c\nshort\n";
        for aligned in [false, true] {
            for chunk_size in [1u64, 3, 7, 100] {
                let (_dir, result) = split_content(content, chunk_size, aligned);
                let joined: Vec<u8> = read_chunks(&result).concat();
                assert_eq!(joined, content.to_vec(), "size {chunk_size} aligned {aligned}");
            }
        }
    }

    #[test]
    fn test_single_chunk_when_size_exceeds_input() {
        let (_dir, result) = split_content(b"2024-12-01,a\n", 1024, true);
        assert_eq!(result.chunk_count(), 1);
        assert_eq!(read_chunks(&result), vec![b"2024-12-01,a\n".to_vec()]);
    }

    #[test]
    fn test_empty_input_yields_no_chunks() {
        let (_dir, result) = split_content(b"", 1024, true);
        assert_eq!(result.chunk_count(), 0);
        assert_eq!(result.input_bytes, 0);
    }

    #[test]
    fn test_trailing_line_without_newline() {
        let (_dir, result) = split_content(b"ab\ncd", 3, true);
        let chunks = read_chunks(&result);
        assert_eq!(chunks, vec![b"ab\n".to_vec(), b"cd".to_vec()]);
    }

    #[test]
    fn test_large_input_uses_mmap() {
        let line = b"2024-12-01,payload payload payload\n";
        let mut content = Vec::new();
        while content.len() < 2 * MMAP_THRESHOLD {
            content.extend_from_slice(line);
        }

        let (_dir, result) = split_content(&content, 16 * 1024, true);
        assert!(result.used_mmap);
        let joined: Vec<u8> = read_chunks(&result).concat();
        assert_eq!(joined, content);
    }

    #[test]
    fn test_zero_chunk_size_is_invalid() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("input.log");
        fs::write(&input, b"x\n").unwrap();

        let err = SplitCommand::new()
            .with_chunk_size(0)
            .run(&input, dir.path())
            .unwrap_err();
        assert!(matches!(err, ExtractError::InvalidConfig(_)));
    }

    #[test]
    fn test_missing_input_reports_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = SplitCommand::new()
            .run(dir.path().join("absent.log"), dir.path())
            .unwrap_err();
        assert!(matches!(err, ExtractError::NotFound(_)));
    }

    #[test]
    fn test_display() {
        let result = SplitResult {
            chunks: vec![],
            input_bytes: 64 * 1024,
            used_mmap: false,
        };
        assert_eq!(result.to_string(), "0 chunks from 64K (mmap: no)");
    }
}
