/*!
 * codebase-extractor - Extract a codebase into one text file for LLM context
 *
 * This library walks a directory tree, decides which files to list and which
 * to embed, and writes a directory tree, file listings and file contents into
 * a single text artifact with a token count.
 */

pub mod assembler;
pub mod classifier;
pub mod config;
pub mod error;
pub mod extractor;
pub mod logger;
pub mod pattern;
pub mod report;
pub mod scanner;
pub mod tokenizer;
pub mod types;
pub mod utils;
pub mod writer;


// Re-export main components for easier access
pub use assembler::{Assembly, ContentAssembler, ContentSection};
pub use classifier::{Encoding, FileClassifier, FileContent};
pub use config::{Args, Config};
pub use error::{ExtractError, Result, SkipReason};
pub use extractor::{Extraction, Extractor};
pub use pattern::{PatternKind, PatternMatcher, PatternSet};
pub use report::{ReportFormat, Reporter, ScanReport};
pub use scanner::Scanner;
pub use types::{DirectoryNode, FileNode, Node, PathEntry, ScanResult};
pub use writer::{Report, ReportWriter};

/// Version of the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
