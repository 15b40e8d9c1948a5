/*!
 * Configuration handling for codebase-extractor
 */

use std::env;
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};

use clap::Parser;
use clap_complete::Shell;
use once_cell::sync::Lazy;

use crate::classifier::{Encoding, DEFAULT_ENCODINGS, DEFAULT_MAX_FILE_SIZE};
use crate::error::{ExtractError, Result};
use crate::pattern::{PatternMatcher, PatternSet};
use crate::tokenizer::Model;
use crate::{bail, ensure};

/// Built-in exclusions: compiled artifacts, media, archives, VCS and
/// dependency directories
pub const DEFAULT_EXCLUSIONS: &[&str] = &[
    "*.pyc", "*.pyo", "*.so", "*.o", "*.a", "*.dll", "*.lib", "*.dylib",
    "*.exe", "*.bin", "*.pkl", "*.dat", "*.db", "*.sqlite", "*.sqlite3",
    "*.jpg", "*.jpeg", "*.png", "*.gif", "*.bmp", "*.svg", "*.ico",
    "*.mp3", "*.mp4", "*.wav", "*.flac", "*.ogg", "*.avi", "*.mov",
    "*.zip", "*.tar", "*.gz", "*.bz2", "*.xz", "*.rar", "*.7z",
    "*.pdf", "*.doc", "*.docx", "*.ppt", "*.pptx", "*.xls", "*.xlsx",
    ".git/", ".svn/", ".hg/", ".idea/", ".vscode/", "__pycache__/", "node_modules/",
    "venv/", "env/", ".env/", ".venv/", "build/", "dist/", "site-packages/",
    ".DS_Store", "Thumbs.db",
];

/// Default exclusions, parsed once
static DEFAULT_EXCLUDE_SET: Lazy<PatternSet> = Lazy::new(|| PatternSet::parse(DEFAULT_EXCLUSIONS));

/// Default output file name
pub const DEFAULT_OUTPUT_FILE: &str = "codebase_extract.txt";

/// Command-line arguments
#[derive(Parser, Debug, Clone)]
#[clap(
    name = "codebase-extractor",
    version = env!("CARGO_PKG_VERSION"),
    about = "Extract code from an entire codebase into a single file",
    long_about = "Writes a directory tree, a file listing and the contents of selected files into one text file, with a token count for LLM cost estimation."
)]
pub struct Args {
    /// Root directory to start extraction
    #[clap(short = 'r', long = "root", default_value = ".")]
    pub root_dir: String,

    /// Output file name
    #[clap(short = 'o', long = "output", default_value = DEFAULT_OUTPUT_FILE)]
    pub output_file: String,

    /// Exclude pattern (repeatable)
    #[clap(short = 'e', long = "exclude")]
    pub exclusions: Vec<String>,

    /// Only include content for these files or directories (space or comma separated)
    #[clap(short = 'i', long = "include")]
    pub include: Vec<String>,

    /// Don't use default exclusions
    #[clap(long)]
    pub no_defaults: bool,

    /// Don't show progress bar
    #[clap(long)]
    pub no_progress: bool,

    /// Force overwrite if output file exists
    #[clap(short = 'f', long)]
    pub force: bool,

    /// Skip content of files larger than this many bytes
    #[clap(long, default_value_t = DEFAULT_MAX_FILE_SIZE)]
    pub max_size: u64,

    /// Encodings tried, in order, when decoding file content
    #[clap(long, value_enum, value_delimiter = ',', default_values_t = DEFAULT_ENCODINGS.to_vec())]
    pub encodings: Vec<Encoding>,

    /// Model used for exact token counting (whitespace estimate otherwise)
    #[clap(long, value_enum)]
    pub model: Option<Model>,

    /// Also skip paths ignored by .gitignore files
    #[clap(long)]
    pub respect_gitignore: bool,

    /// Generate shell completions
    #[clap(long = "generate", value_enum)]
    pub generate: Option<Shell>,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[clap(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Split an include argument on commas, or on whitespace when it has no comma
pub fn parse_include_patterns(arg: &str) -> Vec<String> {
    let patterns: Vec<&str> = if arg.contains(',') {
        arg.split(',').collect()
    } else {
        arg.split_whitespace().collect()
    };

    patterns
        .into_iter()
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect()
}

/// Extraction configuration, fixed for the duration of a run
#[derive(Clone, Debug)]
pub struct Config {
    /// Directory to extract
    pub root_dir: PathBuf,

    /// Output text file path
    pub output_file: PathBuf,

    /// Default plus user exclusions
    pub exclude_patterns: PatternSet,

    /// Content selection; `None` means every non-excluded file
    pub include_patterns: Option<PatternSet>,

    /// Content size ceiling in bytes
    pub max_file_size: u64,

    /// Decode fallback order
    pub encodings: Vec<Encoding>,

    /// Model for exact token counting
    pub model: Option<Model>,

    /// Whether to honor .gitignore files
    pub respect_gitignore: bool,
}

impl Config {
    /// Configuration with default exclusions and no include patterns
    pub fn new(root_dir: impl Into<PathBuf>, output_file: impl Into<PathBuf>) -> Self {
        Self {
            root_dir: root_dir.into(),
            output_file: output_file.into(),
            exclude_patterns: DEFAULT_EXCLUDE_SET.clone(),
            include_patterns: None,
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            encodings: DEFAULT_ENCODINGS.to_vec(),
            model: None,
            respect_gitignore: false,
        }
    }

    /// Replace exclusions with `patterns`, preceded by the defaults if requested
    pub fn with_excludes<I, S>(mut self, patterns: I, use_defaults: bool) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut excludes = if use_defaults {
            DEFAULT_EXCLUDE_SET.clone()
        } else {
            PatternSet::default()
        };
        excludes.extend(PatternSet::parse(patterns));
        self.exclude_patterns = excludes;
        self
    }

    /// Set include patterns; names of existing directories under the root
    /// become directory patterns
    pub fn with_includes<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let includes = PatternSet::parse(patterns).normalize_directories(&self.root_dir);
        self.include_patterns = (!includes.is_empty()).then_some(includes);
        self
    }

    /// Create configuration from command-line arguments
    pub fn from_args(args: &Args) -> Self {
        let includes: Vec<String> = args
            .include
            .iter()
            .flat_map(|arg| parse_include_patterns(arg))
            .collect();

        let mut config = Self::new(&args.root_dir, &args.output_file)
            .with_excludes(&args.exclusions, !args.no_defaults)
            .with_includes(includes);
        config.max_file_size = args.max_size;
        config.encodings = args.encodings.clone();
        config.model = args.model;
        config.respect_gitignore = args.respect_gitignore;
        config
    }

    /// Validate the configuration. Errors here are fatal and happen before
    /// any traversal.
    pub fn validate(&self) -> Result<()> {
        if !self.root_dir.is_dir() {
            return Err(ExtractError::RootNotFound(self.root_dir.clone()));
        }

        if let Some(parent) = self.output_file.parent() {
            ensure!(
                parent.as_os_str().is_empty() || parent.is_dir(),
                OutputUnwritable,
                "output directory not found: {}",
                parent.display()
            );
        }

        if self.output_file.is_dir() {
            bail!(
                OutputUnwritable,
                "{} is a directory",
                self.output_file.display()
            );
        }

        self.check_output_writable()?;

        ensure!(
            !self.encodings.is_empty(),
            Config,
            "at least one encoding is required"
        );

        Ok(())
    }

    /// Open the output for appending so an existing file is left intact,
    /// and remove it again if this created it
    fn check_output_writable(&self) -> Result<()> {
        let existed = fs::symlink_metadata(&self.output_file).is_ok();

        OpenOptions::new()
            .write(true)
            .create(true)
            .append(true)
            .open(&self.output_file)
            .map_err(|e| {
                ExtractError::OutputUnwritable(format!("{}: {}", self.output_file.display(), e))
            })?;

        if !existed {
            fs::remove_file(&self.output_file)?;
        }
        Ok(())
    }

    /// Fails with `OutputPathConflict` when the output exists and overwriting
    /// was not forced. Resolving the conflict is left to the caller.
    pub fn check_output(&self, force: bool) -> Result<()> {
        if !force && self.output_file.exists() {
            return Err(ExtractError::OutputPathConflict(self.output_file.clone()));
        }
        Ok(())
    }

    /// Absolute, symlink-resolved output path, even if the file does not exist yet
    pub fn resolved_output_path(&self) -> Result<PathBuf> {
        if let Ok(path) = self.output_file.canonicalize() {
            return Ok(path);
        }

        let file_name = self.output_file.file_name().ok_or_else(|| {
            ExtractError::OutputUnwritable(format!(
                "{} has no file name",
                self.output_file.display()
            ))
        })?;

        let parent = match self.output_file.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => env::current_dir()?,
        };

        Ok(resolve_dir(&parent)?.join(file_name))
    }

    /// Matcher built from this configuration's patterns and output path
    pub fn matcher(&self) -> Result<PatternMatcher> {
        Ok(
            PatternMatcher::new(self.exclude_patterns.clone(), self.include_patterns.clone())
                .with_output_path(self.resolved_output_path()?),
        )
    }
}

fn resolve_dir(dir: &Path) -> Result<PathBuf> {
    dir.canonicalize().map_err(|e| {
        ExtractError::OutputUnwritable(format!("{}: {}", dir.display(), e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_parse_include_patterns() {
        assert_eq!(parse_include_patterns("a.py,lib/"), vec!["a.py", "lib/"]);
        assert_eq!(parse_include_patterns("a.py lib/  *.rs"), vec!["a.py", "lib/", "*.rs"]);
        assert_eq!(parse_include_patterns(" a.py , , b.py "), vec!["a.py", "b.py"]);
        assert!(parse_include_patterns("  ").is_empty());
    }

    #[test]
    fn test_from_args() {
        let args = Args::parse_from([
            "codebase-extractor",
            "--root",
            "/tmp",
            "-e",
            "*.log",
            "-e",
            "target/",
            "-i",
            "src/ docs/",
            "--no-defaults",
            "--max-size",
            "42",
        ]);
        let config = Config::from_args(&args);

        assert_eq!(config.root_dir, PathBuf::from("/tmp"));
        assert_eq!(config.output_file, PathBuf::from(DEFAULT_OUTPUT_FILE));
        assert_eq!(config.exclude_patterns.display(), "*.log, target/");
        assert_eq!(
            config.include_patterns.as_ref().map(PatternSet::display),
            Some("src/, docs/".to_string())
        );
        assert_eq!(config.max_file_size, 42);
        assert_eq!(config.encodings, DEFAULT_ENCODINGS.to_vec());
    }

    #[test]
    fn test_exclude_brace_glob_kept_whole() {
        let args = Args::parse_from(["codebase-extractor", "-e", "*.{js,ts}", "--no-defaults"]);
        assert_eq!(args.exclusions, vec!["*.{js,ts}".to_string()]);

        let config = Config::from_args(&args);
        assert_eq!(config.exclude_patterns.len(), 1);
        assert!(config.exclude_patterns.matches("a.ts", false));
        assert!(config.exclude_patterns.matches("web/app.js", false));
        assert!(!config.exclude_patterns.matches("a.rs", false));
    }

    #[test]
    fn test_defaults_merged_with_user_excludes() {
        let config = Config::new(".", "out.txt").with_excludes(["secrets/"], true);
        assert_eq!(config.exclude_patterns.len(), DEFAULT_EXCLUSIONS.len() + 1);
        assert!(config.exclude_patterns.matches("node_modules", true));
        assert!(config.exclude_patterns.matches("secrets/key.pem", false));

        let config = Config::new(".", "out.txt").with_excludes(["secrets/"], false);
        assert_eq!(config.exclude_patterns.len(), 1);
    }

    #[test]
    fn test_validate() -> std::io::Result<()> {
        let temp = tempdir()?;

        let config = Config::new(temp.path(), temp.path().join("out.txt"));
        assert!(config.validate().is_ok());

        let missing_root = Config::new(temp.path().join("nope"), temp.path().join("out.txt"));
        assert!(matches!(
            missing_root.validate(),
            Err(ExtractError::RootNotFound(_))
        ));

        let missing_parent = Config::new(temp.path(), temp.path().join("nope").join("out.txt"));
        assert!(matches!(
            missing_parent.validate(),
            Err(ExtractError::OutputUnwritable(_))
        ));

        let output_is_dir = Config::new(temp.path(), temp.path());
        assert!(matches!(
            output_is_dir.validate(),
            Err(ExtractError::OutputUnwritable(_))
        ));

        Ok(())
    }

    #[test]
    fn test_validate_leaves_output_untouched() -> std::io::Result<()> {
        let temp = tempdir()?;
        let output = temp.path().join("out.txt");

        Config::new(temp.path(), &output).validate().unwrap();
        assert!(!output.exists());

        fs::write(&output, "keep me")?;
        Config::new(temp.path(), &output).validate().unwrap();
        assert_eq!(fs::read_to_string(&output)?, "keep me");

        Ok(())
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_validate_rejects_unwritable_output() -> std::io::Result<()> {
        let temp = tempdir()?;
        // procfs refuses new files, even for root
        let config = Config::new(temp.path(), "/proc/codebase_extract.txt");
        assert!(matches!(
            config.validate(),
            Err(ExtractError::OutputUnwritable(_))
        ));

        Ok(())
    }

    #[test]
    fn test_output_conflict_and_resolution() -> std::io::Result<()> {
        let temp = tempdir()?;
        let output = temp.path().join("out.txt");
        let config = Config::new(temp.path(), &output);

        assert!(config.check_output(false).is_ok());
        let resolved = config.resolved_output_path().unwrap();
        assert_eq!(resolved, temp.path().canonicalize()?.join("out.txt"));

        fs::write(&output, "old")?;
        assert!(matches!(
            config.check_output(false),
            Err(ExtractError::OutputPathConflict(path)) if path == output
        ));
        assert!(config.check_output(true).is_ok());
        assert_eq!(config.resolved_output_path().unwrap(), resolved);

        Ok(())
    }
}
