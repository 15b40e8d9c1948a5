/*!
 * Core types and data structures for the extractor
 */

use std::path::PathBuf;

use crate::classifier::Classification;
use crate::error::SkipReason;

/// One surviving (non-excluded) filesystem entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathEntry {
    /// Path relative to the scan root, `/`-separated
    pub rel_path: String,
    /// Absolute path used for I/O
    pub abs_path: PathBuf,
    /// Whether this is a directory (symlinked directories included)
    pub is_directory: bool,
    /// Whether the content section should carry this file
    pub content_included: bool,
    /// Size in bytes at scan time
    pub size_bytes: u64,
    /// Unset until the file is read
    pub is_binary: Option<bool>,
    /// Why content was dropped, once known
    pub skip_reason: Option<SkipReason>,
}

impl PathEntry {
    /// Whether the entry is a regular file (or a link to one)
    pub fn is_file(&self) -> bool {
        !self.is_directory
    }

    /// Store a read outcome. `is_binary` stays unset when the bytes were
    /// never probed (too large, unreadable).
    pub fn record(&mut self, classification: Classification) {
        self.is_binary = match (&classification.skip_reason, classification.encoding) {
            (Some(SkipReason::BinaryDetected), _) => Some(true),
            (Some(SkipReason::DecodeFailure), _) | (None, Some(_)) => Some(false),
            _ => None,
        };
        self.skip_reason = classification.skip_reason;
    }
}

/// Represents a directory in the rendered tree
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectoryNode {
    /// Directory name
    pub name: String,
    /// Relative path from scan root (empty for the root)
    pub rel_path: String,
    /// Directory contents, sorted by name
    pub contents: Vec<Node>,
}

/// Represents a file in the rendered tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileNode {
    /// File name
    pub name: String,
    /// Relative path from scan root
    pub rel_path: String,
}

/// A generic tree node
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// Directory node
    Directory(DirectoryNode),
    /// File node
    File(FileNode),
}

impl Node {
    /// Display name of the node
    pub fn name(&self) -> &str {
        match self {
            Node::Directory(dir) => &dir.name,
            Node::File(file) => &file.name,
        }
    }
}

/// Output of a single traversal
#[derive(Debug, Clone, Default)]
pub struct ScanResult {
    /// Hierarchical view used for the tree drawing
    pub root: DirectoryNode,
    /// Every surviving entry in depth-first, lexicographic order
    pub entries: Vec<PathEntry>,
    /// Relative paths pruned by exclusion (subtrees are not descended)
    pub excluded: Vec<String>,
}

impl ScanResult {
    /// Files only, in traversal order
    pub fn files(&self) -> impl Iterator<Item = &PathEntry> {
        self.entries.iter().filter(|e| e.is_file())
    }

    /// Files selected for content, before any read attempt
    pub fn content_candidates(&self) -> impl Iterator<Item = &PathEntry> {
        self.files().filter(|e| e.content_included)
    }

    /// Files whose content was actually rendered
    pub fn content_files(&self) -> impl Iterator<Item = &PathEntry> {
        self.content_candidates().filter(|e| e.skip_reason.is_none())
    }

    /// Number of directories below the root
    pub fn directory_count(&self) -> usize {
        self.entries.iter().filter(|e| e.is_directory).count()
    }
}
