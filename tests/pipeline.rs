//! End-to-end pipeline tests against the library API.
//!
//! These tests verify:
//! 1. The pipeline output equals a single sequential filter of the whole input
//! 2. Worker count never changes the output bytes
//! 3. Byte-exact splitting agrees with line-aligned splitting when every
//!    boundary lands on a line ending
//! 4. Generated logs round-trip with exact per-date counts
//! 5. Filtering is idempotent over its own output

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use logsieve::commands::{
    ExtractCommand, ExtractConfig, ExtractStats, FilterCommand, GenerateCommand, GenerateConfig,
};
use logsieve::line::matches_date;

// =============================================================================
// Helper functions
// =============================================================================

fn write_input(dir: &Path, content: &[u8]) -> PathBuf {
    let path = dir.join("input.log");
    fs::write(&path, content).unwrap();
    path
}

fn extract(
    input: &Path,
    date: &str,
    output_dir: &Path,
    chunk_size: u64,
    workers: usize,
    line_aligned: bool,
) -> ExtractStats {
    let mut config = ExtractConfig::new(input, date, output_dir);
    config.chunk_size = chunk_size;
    config.workers = workers;
    config.line_aligned = line_aligned;
    ExtractCommand::new(config).run().unwrap()
}

/// Filter the whole input in one pass, without splitting.
fn sequential_filter(input: &Path, date: &str) -> Vec<u8> {
    let mut out = Vec::new();
    FilterCommand::new(date).run(input, &mut out).unwrap();
    out
}

fn count_matching(content: &[u8], date: &str) -> u64 {
    content
        .split_inclusive(|&b| b == b'\n')
        .filter(|line| matches_date(line, date.as_bytes()))
        .count() as u64
}

// =============================================================================
// Pipeline output vs sequential filter
// =============================================================================

#[test]
fn test_pipeline_matches_sequential_filter_for_any_chunk_size() {
    let dir = TempDir::new().unwrap();
    let content: &[u8] =
        b"2024-12-01,a\n2024-12-02,bb\n2024-12-01,ccc\nshort\n2024-12-01,d\n2024-12-03,e\n";
    let input = write_input(dir.path(), content);
    let expected = sequential_filter(&input, "2024-12-01");

    for chunk_size in [1, 2, 5, 13, 64, 4096] {
        let out_dir = dir.path().join(format!("out_{chunk_size}"));
        let stats = extract(&input, "2024-12-01", &out_dir, chunk_size, 3, true);
        assert_eq!(
            fs::read(&stats.output_path).unwrap(),
            expected,
            "chunk size {} diverged from sequential filter",
            chunk_size
        );
        assert_eq!(stats.lines_read, 6, "chunk size {}", chunk_size);
        assert_eq!(stats.lines_matched, 3, "chunk size {}", chunk_size);
    }
}

#[test]
fn test_unterminated_final_line_survives_the_pipeline() {
    let dir = TempDir::new().unwrap();
    let input = write_input(dir.path(), b"2024-12-01,a\n2024-12-02,b\n2024-12-01,end");
    let expected = sequential_filter(&input, "2024-12-01");

    let stats = extract(&input, "2024-12-01", &dir.path().join("out"), 13, 2, true);

    assert_eq!(fs::read(&stats.output_path).unwrap(), expected);
    assert_eq!(expected, b"2024-12-01,a\n2024-12-01,end");
}

// =============================================================================
// Determinism
// =============================================================================

#[test]
fn test_worker_count_does_not_change_output() {
    let dir = TempDir::new().unwrap();
    let content: &[u8] = b"2024-12-01,a\n2024-12-02,b\n2024-12-01,c\n2024-12-01,d\n2024-12-02,e\n";
    let input = write_input(dir.path(), content);

    let baseline = extract(&input, "2024-12-01", &dir.path().join("w1"), 16, 1, true);
    let baseline_bytes = fs::read(&baseline.output_path).unwrap();

    for workers in [2, 4, 8] {
        let out_dir = dir.path().join(format!("w{workers}"));
        let stats = extract(&input, "2024-12-01", &out_dir, 16, workers, true);
        assert_eq!(
            fs::read(&stats.output_path).unwrap(),
            baseline_bytes,
            "{} workers diverged from single-worker output",
            workers
        );
    }
}

#[test]
fn test_byte_chunks_agree_when_boundaries_fall_on_line_endings() {
    // Every line is exactly 13 bytes, so a 26-byte chunk size cuts only at
    // line endings and byte-exact mode loses nothing.
    let dir = TempDir::new().unwrap();
    let content: &[u8] = b"2024-12-01,a\n2024-12-02,b\n2024-12-01,c\n2024-12-01,d\n";
    let input = write_input(dir.path(), content);

    let aligned = extract(&input, "2024-12-01", &dir.path().join("aligned"), 26, 2, true);
    let exact = extract(&input, "2024-12-01", &dir.path().join("exact"), 26, 2, false);

    assert_eq!(aligned.chunks, exact.chunks);
    assert_eq!(
        fs::read(&aligned.output_path).unwrap(),
        fs::read(&exact.output_path).unwrap()
    );
}

// =============================================================================
// Generate -> extract round trip
// =============================================================================

#[test]
fn test_generated_log_round_trips_with_exact_counts() {
    let dir = TempDir::new().unwrap();
    let log = dir.path().join("app.log");
    let dates = ["2024-12-01", "2024-12-02", "2024-12-03"];

    let config = GenerateConfig {
        output: log.clone(),
        lines: 600,
        dates: dates.iter().map(|d| d.to_string()).collect(),
        seed: 7,
        force: false,
    };
    let generated = GenerateCommand::new(config).run().unwrap();
    assert_eq!(generated.lines, 600);

    let content = fs::read(&log).unwrap();
    let mut recovered = 0;
    for date in dates {
        let out_dir = dir.path().join(format!("out_{date}"));
        let stats = extract(&log, date, &out_dir, 4096, 4, true);

        assert_eq!(stats.lines_matched, count_matching(&content, date));
        let output = fs::read(&stats.output_path).unwrap();
        for line in output.split_inclusive(|&b| b == b'\n') {
            assert!(
                matches_date(line, date.as_bytes()),
                "line escaped into the wrong output: {}",
                String::from_utf8_lossy(line)
            );
        }
        recovered += stats.lines_matched;
    }

    assert_eq!(recovered, 600, "per-date outputs must partition the log");
}

// =============================================================================
// Idempotence
// =============================================================================

#[test]
fn test_filter_is_idempotent_over_its_own_output() {
    let dir = TempDir::new().unwrap();
    let input = write_input(
        dir.path(),
        b"2024-12-01,a\n2024-12-02,b\n2024-12-01,c\nnoise\n",
    );

    let stats = extract(&input, "2024-12-01", &dir.path().join("out"), 13, 2, true);
    let first = fs::read(&stats.output_path).unwrap();

    let mut second = Vec::new();
    FilterCommand::new("2024-12-01")
        .run(&stats.output_path, &mut second)
        .unwrap();

    assert_eq!(second, first);
}
