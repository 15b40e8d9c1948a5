/*!
 * Exclude/include pattern matching
 *
 * Patterns are classified once when parsed. Matching then only dispatches on
 * the stored kind, it never looks at the raw pattern text again.
 */

use std::path::{Path, PathBuf};

use glob_match::glob_match;

/// A single parsed pattern
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatternKind {
    /// Shell glob (`*.py`, `src/*.rs`), matched against basename or full path
    Glob(String),
    /// Directory and its whole subtree (`node_modules/`), stored without the slash
    DirectoryPrefix(String),
    /// Bare file name or root-relative path
    Exact(String),
}

impl PatternKind {
    /// Classify a raw pattern. Returns `None` for patterns that are empty
    /// after normalization.
    pub fn parse(raw: &str) -> Option<Self> {
        let mut pattern = raw.trim().replace('\\', "/");
        while let Some(rest) = pattern.strip_prefix("./") {
            pattern = rest.to_string();
        }

        if let Some(dir) = pattern.strip_suffix('/') {
            let dir = dir.trim_end_matches('/');
            if dir.is_empty() {
                return None;
            }
            return Some(PatternKind::DirectoryPrefix(dir.to_string()));
        }

        if pattern.is_empty() {
            None
        } else if is_glob(&pattern) {
            Some(PatternKind::Glob(pattern))
        } else {
            Some(PatternKind::Exact(pattern))
        }
    }

    /// Pattern text as the user would write it
    pub fn as_pattern(&self) -> String {
        match self {
            PatternKind::Glob(p) | PatternKind::Exact(p) => p.clone(),
            PatternKind::DirectoryPrefix(d) => format!("{}/", d),
        }
    }

    /// Check a root-relative, `/`-separated path against this pattern
    pub fn matches(&self, rel_path: &str, is_directory: bool) -> bool {
        let name = basename(rel_path);
        match self {
            PatternKind::Glob(glob) => {
                // a literal name such as `[id].tsx` also matches itself
                rel_path == glob
                    || name == glob
                    || glob_match(glob, name)
                    || glob_match(glob, rel_path)
            }
            PatternKind::Exact(exact) => rel_path == exact || name == exact,
            PatternKind::DirectoryPrefix(dir) => matches_directory(dir, rel_path, is_directory),
        }
    }
}

fn is_glob(pattern: &str) -> bool {
    pattern.contains(['*', '?', '[', '{'])
}

fn basename(rel_path: &str) -> &str {
    rel_path.rsplit('/').next().unwrap_or(rel_path)
}

fn segment_matches(pattern: &str, candidate: &str) -> bool {
    pattern == candidate || (is_glob(pattern) && glob_match(pattern, candidate))
}

/// Directory patterns cover a directory and everything beneath it. A
/// single-segment pattern matches that directory name at any depth, a
/// multi-segment pattern is anchored at the root.
fn matches_directory(dir: &str, rel_path: &str, is_directory: bool) -> bool {
    // Directory portions of the path: every ancestor, plus the path itself
    // when it names a directory.
    let mut prefixes: Vec<&str> = rel_path
        .match_indices('/')
        .map(|(idx, _)| &rel_path[..idx])
        .collect();
    if is_directory {
        prefixes.push(rel_path);
    }

    if prefixes.iter().any(|prefix| segment_matches(dir, prefix)) {
        return true;
    }

    if dir.contains('/') {
        return false;
    }

    prefixes
        .iter()
        .any(|prefix| segment_matches(dir, basename(prefix)))
}

/// Ordered collection of parsed patterns
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatternSet {
    patterns: Vec<PatternKind>,
}

impl PatternSet {
    /// Parse raw pattern strings, dropping empty ones
    pub fn parse<I, S>(raw: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            patterns: raw
                .into_iter()
                .filter_map(|p| PatternKind::parse(p.as_ref()))
                .collect(),
        }
    }

    /// Append all patterns of another set
    pub fn extend(&mut self, other: PatternSet) {
        self.patterns.extend(other.patterns);
    }

    /// Turn exact patterns that name an existing directory under `root` into
    /// directory patterns, so `-i src` selects everything below `src/`.
    pub fn normalize_directories(mut self, root: &Path) -> Self {
        for pattern in &mut self.patterns {
            if let PatternKind::Exact(exact) = pattern {
                if root.join(exact.as_str()).is_dir() {
                    *pattern = PatternKind::DirectoryPrefix(exact.clone());
                }
            }
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PatternKind> {
        self.patterns.iter()
    }

    /// True if any pattern matches
    pub fn matches(&self, rel_path: &str, is_directory: bool) -> bool {
        self.patterns
            .iter()
            .any(|p| p.matches(rel_path, is_directory))
    }

    /// Patterns joined for display
    pub fn display(&self) -> String {
        self.patterns
            .iter()
            .map(PatternKind::as_pattern)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Decides exclusion and content inclusion for paths under the scan root
#[derive(Debug, Clone)]
pub struct PatternMatcher {
    excludes: PatternSet,
    includes: Option<PatternSet>,
    output_path: Option<PathBuf>,
}

impl PatternMatcher {
    /// Create a matcher. An empty include set behaves like no include set.
    pub fn new(excludes: PatternSet, includes: Option<PatternSet>) -> Self {
        Self {
            excludes,
            includes: includes.filter(|set| !set.is_empty()),
            output_path: None,
        }
    }

    /// Always exclude the file at this absolute path (the run's own output)
    pub fn with_output_path(mut self, output_path: PathBuf) -> Self {
        self.output_path = Some(output_path);
        self
    }

    /// Whether the entry is removed from every listing
    pub fn is_excluded(&self, rel_path: &str, is_directory: bool) -> bool {
        self.excludes.matches(rel_path, is_directory)
    }

    /// Whether the absolute path is the configured output file
    pub fn is_output_file(&self, abs_path: &Path) -> bool {
        self.output_path.as_deref() == Some(abs_path)
    }

    /// Whether the file matches at least one include pattern
    pub fn matches_include(&self, rel_path: &str) -> bool {
        self.includes
            .as_ref()
            .is_some_and(|set| set.matches(rel_path, false))
    }

    /// Whether a non-excluded file gets its content rendered
    pub fn is_content_included(&self, rel_path: &str) -> bool {
        self.includes.is_none() || self.matches_include(rel_path)
    }

    pub fn has_includes(&self) -> bool {
        self.includes.is_some()
    }

    pub fn includes(&self) -> Option<&PatternSet> {
        self.includes.as_ref()
    }
}
