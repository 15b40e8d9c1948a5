/*!
 * Content section assembly
 */

use std::sync::Arc;

use indicatif::ProgressBar;
use log::warn;

use crate::classifier::{Classification, Encoding, FileClassifier, FileContent};
use crate::error::SkipReason;
use crate::types::ScanResult;

/// Line framing each content section
pub const SECTION_SEPARATOR: &str =
    "================================================================================";

/// Decoded content of one file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentSection {
    /// Relative path shown between the separators
    pub rel_path: String,
    /// Decoded file text
    pub text: String,
    /// Encoding that decoded the text
    pub encoding: Encoding,
}

impl ContentSection {
    /// Number of lines in the text
    pub fn lines(&self) -> usize {
        self.text.lines().count()
    }

    /// Number of characters in the text
    pub fn chars(&self) -> usize {
        self.text.chars().count()
    }

    /// Append the delimited section to `out`
    pub fn render(&self, out: &mut String) {
        out.push_str(SECTION_SEPARATOR);
        out.push('\n');
        out.push_str(&self.rel_path);
        out.push('\n');
        out.push_str(SECTION_SEPARATOR);
        out.push('\n');
        out.push_str(&self.text);
        if !self.text.is_empty() && !self.text.ends_with('\n') {
            out.push('\n');
        }
        out.push('\n');
    }
}

/// A content-selected file whose content was left out
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedFile {
    pub rel_path: String,
    pub reason: SkipReason,
}

/// Rendered sections plus the files that could not be rendered
#[derive(Debug, Clone, Default)]
pub struct Assembly {
    /// Sections in traversal order
    pub sections: Vec<ContentSection>,
    /// Selected files whose content was dropped
    pub skipped: Vec<SkippedFile>,
}

impl Assembly {
    /// Relative paths that got a content section
    pub fn content_paths(&self) -> impl Iterator<Item = &str> {
        self.sections.iter().map(|s| s.rel_path.as_str())
    }
}

/// Reads content-selected files and produces their sections
pub struct ContentAssembler {
    classifier: FileClassifier,
    progress: Arc<ProgressBar>,
}

impl ContentAssembler {
    /// Create a new assembler
    pub fn new(classifier: FileClassifier, progress: Arc<ProgressBar>) -> Self {
        Self {
            classifier,
            progress,
        }
    }

    /// Read every content-selected file in traversal order. Entries are
    /// updated with their binary flag and skip reason; nothing here fails
    /// the run.
    pub fn assemble(&self, scan: &mut ScanResult) -> Assembly {
        let mut assembly = Assembly::default();

        let total = scan.content_candidates().count() as u64;
        self.progress.set_length(total);
        self.progress.set_position(0);

        for entry in scan
            .entries
            .iter_mut()
            .filter(|e| e.is_file() && e.content_included)
        {
            self.progress.set_message(format!("Processing {}", entry.rel_path));

            let content = self.classifier.read(&entry.abs_path);
            entry.record(Classification::from(&content));

            match content {
                FileContent::Text { text, encoding } => {
                    assembly.sections.push(ContentSection {
                        rel_path: entry.rel_path.clone(),
                        text,
                        encoding,
                    });
                }
                FileContent::Skipped(reason) => {
                    warn!("Skipping content of {}: {}", entry.rel_path, reason);
                    assembly.skipped.push(SkippedFile {
                        rel_path: entry.rel_path.clone(),
                        reason,
                    });
                }
            }

            self.progress.inc(1);
        }

        assembly
    }
}
