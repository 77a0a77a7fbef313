//! Command implementations for logsieve.

pub mod extract;
pub mod filter;
pub mod generate;
pub mod merge;
pub mod split;

pub use extract::{ExtractCommand, ExtractConfig, ExtractStats};
pub use filter::{FilterCommand, FilterStats};
pub use generate::{GenerateCommand, GenerateConfig, GenerateStats};
pub use merge::{MergeCommand, MergeStats};
pub use split::{SplitCommand, SplitResult};
