/*!
 * Directory traversal
 *
 * One depth-first walk from the root. Children are visited in lexicographic
 * order and excluded directories are pruned before they are opened.
 */

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use ignore::WalkBuilder;
use indicatif::ProgressBar;
use log::{debug, warn};
use walkdir::WalkDir;

use crate::config::Config;
use crate::error::Result;
use crate::pattern::PatternMatcher;
use crate::types::{DirectoryNode, FileNode, Node, PathEntry, ScanResult};

/// A directory child as reported by either walker
struct Child {
    path: PathBuf,
    name: String,
    is_symlink: bool,
}

/// Scanner for directory contents
pub struct Scanner {
    /// Scanner configuration
    config: Config,
    /// Exclusion and inclusion rules
    matcher: PatternMatcher,
    /// Progress bar
    pub progress: Arc<ProgressBar>,
}

impl Scanner {
    /// Create a new scanner
    pub fn new(config: Config, progress: Arc<ProgressBar>) -> Result<Self> {
        let matcher = config.matcher()?;
        Ok(Self {
            config,
            matcher,
            progress,
        })
    }

    /// Rules used by this scanner
    pub fn matcher(&self) -> &PatternMatcher {
        &self.matcher
    }

    /// Walk the root once and return the tree plus the flat entry list
    pub fn scan(&self) -> Result<ScanResult> {
        let abs_root = fs::canonicalize(&self.config.root_dir)?;
        let mut result = ScanResult::default();

        result.root = DirectoryNode {
            name: abs_root
                .file_name()
                .unwrap_or_default()
                .to_string_lossy()
                .to_string(),
            rel_path: String::new(),
            contents: Vec::new(),
        };

        let mut contents = Vec::new();
        self.scan_directory(&abs_root, "", &mut contents, &mut result)?;
        result.root.contents = contents;

        debug!(
            "Scanned {} entries, pruned {}",
            result.entries.len(),
            result.excluded.len()
        );
        Ok(result)
    }

    /// Scan one directory level, recursing into surviving subdirectories
    fn scan_directory(
        &self,
        abs_path: &Path,
        rel_path: &str,
        contents: &mut Vec<Node>,
        result: &mut ScanResult,
    ) -> Result<()> {
        self.progress
            .set_message(format!("Scanning {}", display_rel(rel_path)));

        for child in self.list_children(abs_path) {
            let child_rel = if rel_path.is_empty() {
                child.name.clone()
            } else {
                format!("{}/{}", rel_path, child.name)
            };

            // Follows symlinks; a broken link is treated as a file
            let metadata = fs::metadata(&child.path).ok();
            let is_directory = metadata.as_ref().is_some_and(|m| m.is_dir());

            if self.is_output_file(&child, is_directory)
                || self.matcher.is_excluded(&child_rel, is_directory)
            {
                debug!("Excluded {}", child_rel);
                result.excluded.push(child_rel);
                continue;
            }

            result.entries.push(PathEntry {
                rel_path: child_rel.clone(),
                abs_path: child.path.clone(),
                is_directory,
                content_included: !is_directory && self.matcher.is_content_included(&child_rel),
                size_bytes: metadata.as_ref().map_or(0, |m| m.len()),
                is_binary: None,
                skip_reason: None,
            });

            if is_directory {
                let mut dir_node = DirectoryNode {
                    name: child.name,
                    rel_path: child_rel.clone(),
                    contents: Vec::new(),
                };

                // Linked directories are listed but never descended
                if !child.is_symlink {
                    self.scan_directory(&child.path, &child_rel, &mut dir_node.contents, result)?;
                }
                contents.push(Node::Directory(dir_node));
            } else {
                contents.push(Node::File(FileNode {
                    name: child.name,
                    rel_path: child_rel,
                }));
            }
        }

        Ok(())
    }

    /// Whether the child is the run's output, either literally or as a
    /// link that resolves to it
    fn is_output_file(&self, child: &Child, is_directory: bool) -> bool {
        if self.matcher.is_output_file(&child.path) {
            return true;
        }
        !is_directory
            && child.is_symlink
            && fs::canonicalize(&child.path)
                .is_ok_and(|target| self.matcher.is_output_file(&target))
    }

    /// Immediate children of `dir`, sorted by file name. Unreadable
    /// directories and entries are logged and skipped.
    fn list_children(&self, dir: &Path) -> Vec<Child> {
        if self.config.respect_gitignore {
            let mut walker = WalkBuilder::new(dir);
            walker
                .max_depth(Some(1)) // Limit depth to just the current directory
                .hidden(false)
                .parents(true)
                .git_ignore(true)
                .git_exclude(false)
                .git_global(false)
                .ignore(false)
                .require_git(false)
                .sort_by_file_name(|a, b| a.cmp(b));

            walker
                .build()
                .filter_map(|entry| match entry {
                    Ok(entry) => Some(entry),
                    Err(e) => {
                        warn!("Skipping unreadable entry in {}: {}", dir.display(), e);
                        None
                    }
                })
                .filter(|e| e.depth() > 0)
                .map(|e| Child {
                    name: e.file_name().to_string_lossy().to_string(),
                    is_symlink: e.path_is_symlink(),
                    path: e.into_path(),
                })
                .collect()
        } else {
            WalkDir::new(dir)
                .min_depth(1)
                .max_depth(1)
                .sort_by_file_name()
                .into_iter()
                .filter_map(|entry| match entry {
                    Ok(entry) => Some(entry),
                    Err(e) => {
                        warn!("Skipping unreadable entry in {}: {}", dir.display(), e);
                        None
                    }
                })
                .map(|e| Child {
                    name: e.file_name().to_string_lossy().to_string(),
                    is_symlink: e.path_is_symlink(),
                    path: e.into_path(),
                })
                .collect()
        }
    }
}

fn display_rel(rel_path: &str) -> &str {
    if rel_path.is_empty() {
        "."
    } else {
        rel_path
    }
}
