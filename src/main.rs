//! logsieve: parallel date-prefix extraction from very large log files.
//!
//! Usage: logsieve <COMMAND> [OPTIONS]

use clap::{Parser, Subcommand};
use std::fs::{self, File};
use std::io;
use std::path::PathBuf;
use std::process;

use logsieve::chunk;
use logsieve::commands::{
    ExtractCommand, ExtractConfig, FilterCommand, GenerateCommand, GenerateConfig, MergeCommand,
    SplitCommand,
};
use logsieve::error::{ExtractError, Result};
use logsieve::parallel::DEFAULT_WORKERS;

#[derive(Parser)]
#[command(name = "logsieve")]
#[command(version)]
#[command(
    about = "Parallel date-prefix extraction from very large log files",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full pipeline: split, filter in parallel, merge
    Extract {
        /// Input log file
        input: PathBuf,

        /// Target date prefix, exactly 10 characters (e.g. 2024-12-01)
        #[arg(short, long, value_parser = parse_date)]
        date: String,

        /// Output directory for chunks, filtered chunks, and the final file
        #[arg(short, long, default_value = "output")]
        output_dir: PathBuf,

        /// Chunk size in bytes (accepts B/K/M/G suffixes)
        #[arg(short = 'c', long, default_value = "10G", value_parser = parse_chunk_size)]
        chunk_size: u64,

        /// Number of filter workers
        #[arg(short, long, default_value_t = DEFAULT_WORKERS)]
        workers: usize,

        /// Split at exact byte offsets; a line crossing a chunk boundary
        /// is not matched in either chunk
        #[arg(long)]
        byte_chunks: bool,

        /// Print progress and summary statistics to stderr
        #[arg(long)]
        stats: bool,
    },

    /// Split a file into fixed-size chunks
    Split {
        /// Input log file
        input: PathBuf,

        /// Output directory for chunk files
        #[arg(short, long, default_value = "output")]
        output_dir: PathBuf,

        /// Chunk size in bytes (accepts B/K/M/G suffixes)
        #[arg(short = 'c', long, default_value = "10G", value_parser = parse_chunk_size)]
        chunk_size: u64,

        /// Split at exact byte offsets instead of line boundaries
        #[arg(long)]
        byte_chunks: bool,

        /// Print split statistics to stderr
        #[arg(long)]
        stats: bool,
    },

    /// Filter lines matching a date prefix from one file
    Filter {
        /// Input log file (use - for stdin)
        input: PathBuf,

        /// Target date prefix, exactly 10 characters
        #[arg(short, long, value_parser = parse_date)]
        date: String,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print filter statistics to stderr
        #[arg(long)]
        stats: bool,
    },

    /// Concatenate files in the given order
    Merge {
        /// Input files, merged in argument order
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Output file
        #[arg(short, long)]
        output: PathBuf,

        /// Print merge statistics to stderr
        #[arg(long)]
        stats: bool,
    },

    /// Generate a synthetic log file for benchmarks and testing
    Generate {
        /// Output log file
        output: PathBuf,

        /// Number of lines to generate
        #[arg(short, long, default_value_t = 100_000)]
        lines: u64,

        /// Comma-separated 10-character dates to sample from
        #[arg(
            long,
            value_delimiter = ',',
            default_value = "2024-12-01,2024-12-02,2024-12-03"
        )]
        dates: Vec<String>,

        /// RNG seed
        #[arg(short, long, default_value_t = 42)]
        seed: u64,

        /// Overwrite an existing output file
        #[arg(short, long)]
        force: bool,

        /// Print generation statistics to stderr
        #[arg(long)]
        stats: bool,
    },
}

/// Dates are opaque 10-character strings; only the width is enforced here.
fn parse_date(s: &str) -> std::result::Result<String, String> {
    if s.len() == 10 {
        Ok(s.to_string())
    } else {
        Err(format!(
            "date must be exactly 10 characters, got {} ('{s}')",
            s.len()
        ))
    }
}

fn parse_chunk_size(s: &str) -> std::result::Result<u64, String> {
    match chunk::parse_size(s) {
        Some(0) => Err("chunk size must be at least 1 byte".to_string()),
        Some(bytes) => Ok(bytes),
        None => Err(format!("invalid size '{s}' (use formats like 512M, 10G)")),
    }
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Extract {
            input,
            date,
            output_dir,
            chunk_size,
            workers,
            byte_chunks,
            stats,
        } => run_extract(input, date, output_dir, chunk_size, workers, byte_chunks, stats),
        Commands::Split {
            input,
            output_dir,
            chunk_size,
            byte_chunks,
            stats,
        } => run_split(input, output_dir, chunk_size, byte_chunks, stats),
        Commands::Filter {
            input,
            date,
            output,
            stats,
        } => run_filter(input, date, output, stats),
        Commands::Merge {
            inputs,
            output,
            stats,
        } => run_merge(inputs, output, stats),
        Commands::Generate {
            output,
            lines,
            dates,
            seed,
            force,
            stats,
        } => run_generate(output, lines, dates, seed, force, stats),
    };

    if let Err(e) = result {
        if let ExtractError::TaskFailures { ref failures, .. } = e {
            for (index, cause) in failures {
                eprintln!("  chunk {index:04}: {cause}");
            }
        }
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run_extract(
    input: PathBuf,
    date: String,
    output_dir: PathBuf,
    chunk_size: u64,
    workers: usize,
    byte_chunks: bool,
    stats: bool,
) -> Result<()> {
    let mut config = ExtractConfig::new(input, date, output_dir);
    config.chunk_size = chunk_size;
    config.workers = workers;
    config.line_aligned = !byte_chunks;
    config.progress = stats;

    let result = ExtractCommand::new(config).run()?;

    if stats {
        eprintln!("Extract stats: {}", result);
    }
    println!("{}", result.output_path.display());
    Ok(())
}

fn run_split(
    input: PathBuf,
    output_dir: PathBuf,
    chunk_size: u64,
    byte_chunks: bool,
    stats: bool,
) -> Result<()> {
    fs::create_dir_all(&output_dir)?;

    let cmd = SplitCommand::new()
        .with_chunk_size(chunk_size)
        .with_line_aligned(!byte_chunks);
    let result = cmd.run(&input, &output_dir)?;

    if stats {
        eprintln!("Split stats: {}", result);
    }
    for chunk in &result.chunks {
        println!("{}", chunk.path.display());
    }
    Ok(())
}

fn run_filter(input: PathBuf, date: String, output: Option<PathBuf>, stats: bool) -> Result<()> {
    let cmd = FilterCommand::new(date);
    let use_stdin = input.to_string_lossy() == "-";

    let result = match output {
        Some(path) => {
            if use_stdin {
                let mut file =
                    File::create(&path).map_err(|e| ExtractError::from_io(e, &path))?;
                cmd.run_stdin(&mut file)?
            } else {
                cmd.run_file(&input, &path)?
            }
        }
        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            if use_stdin {
                cmd.run_stdin(&mut handle)?
            } else {
                cmd.run(&input, &mut handle)?
            }
        }
    };

    if stats {
        eprintln!("Filter stats: {}", result);
    }
    Ok(())
}

fn run_merge(inputs: Vec<PathBuf>, output: PathBuf, stats: bool) -> Result<()> {
    let result = MergeCommand::new().run(&inputs, &output)?;

    if stats {
        eprintln!("Merge stats: {}", result);
    }
    Ok(())
}

fn run_generate(
    output: PathBuf,
    lines: u64,
    dates: Vec<String>,
    seed: u64,
    force: bool,
    stats: bool,
) -> Result<()> {
    let config = GenerateConfig {
        output,
        lines,
        dates,
        seed,
        force,
    };
    let result = GenerateCommand::new(config).run()?;

    if stats {
        eprintln!("Generate stats: {}", result);
    }
    Ok(())
}
