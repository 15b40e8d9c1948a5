//! Global error handling for codebase-extractor
//!
//! Two kinds of failure exist. [`ExtractError`] is fatal and aborts the run
//! before any traversal happens. [`SkipReason`] is local to one file: the file
//! stays in the structure listings and only its content is dropped.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Global error type for extraction runs
#[derive(Error, Debug)]
pub enum ExtractError {
    /// Root directory is missing or not a directory
    #[error("Root directory not found: {}", .0.display())]
    RootNotFound(PathBuf),

    /// Output file cannot be created at the configured location
    #[error("Output path not writable: {0}")]
    OutputUnwritable(String),

    /// Output file already exists and overwriting was not allowed
    #[error("Output file already exists: {}", .0.display())]
    OutputPathConflict(PathBuf),

    /// File system errors
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Specialized Result type for extraction operations
pub type Result<T> = std::result::Result<T, ExtractError>;

/// Why a file's content was left out of the content section.
///
/// None of these abort a run.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// File size exceeds the configured ceiling
    #[error("file too large ({size} bytes, limit {limit} bytes)")]
    TooLarge { size: u64, limit: u64 },

    /// Probe looked like binary data
    #[error("binary file")]
    BinaryDetected,

    /// No encoding in the fallback list decoded the bytes
    #[error("no supported encoding could decode the file")]
    DecodeFailure,

    /// Not readable by the current user
    #[error("permission denied")]
    PermissionDenied,

    /// Any other I/O failure
    #[error("unreadable: {0}")]
    Unreadable(String),
}

impl From<io::Error> for SkipReason {
    fn from(err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::PermissionDenied => SkipReason::PermissionDenied,
            _ => SkipReason::Unreadable(err.to_string()),
        }
    }
}

/// Creates an ExtractError with a formatted message
#[macro_export]
macro_rules! error {
    ($error_type:ident, $($arg:tt)*) => {
        $crate::error::ExtractError::$error_type(format!($($arg)*))
    };
}

/// Returns an error result with a formatted message
#[macro_export]
macro_rules! bail {
    ($error_type:ident, $($arg:tt)*) => {
        return Err($crate::error!($error_type, $($arg)*))
    };
}

/// Ensures a condition is true, otherwise returns an error
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $error_type:ident, $($arg:tt)*) => {
        if !($cond) {
            $crate::bail!($error_type, $($arg)*)
        }
    };
}

// main returns io::Result
impl From<ExtractError> for io::Error {
    fn from(err: ExtractError) -> Self {
        let kind = match &err {
            ExtractError::RootNotFound(_) => io::ErrorKind::NotFound,
            ExtractError::OutputPathConflict(_) => io::ErrorKind::AlreadyExists,
            ExtractError::Io(e) => e.kind(),
            _ => io::ErrorKind::Other,
        };
        io::Error::new(kind, err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skip_reason_from_io_error() {
        let denied = io::Error::new(io::ErrorKind::PermissionDenied, "nope");
        assert_eq!(SkipReason::from(denied), SkipReason::PermissionDenied);

        let other = io::Error::new(io::ErrorKind::NotFound, "gone");
        assert!(matches!(SkipReason::from(other), SkipReason::Unreadable(_)));
    }

    #[test]
    fn test_error_macros() {
        fn check(value: usize) -> Result<usize> {
            crate::ensure!(value < 10, Config, "value {} out of range", value);
            Ok(value)
        }

        assert_eq!(check(3).unwrap(), 3);
        let err = check(12).unwrap_err();
        assert_eq!(err.to_string(), "Configuration error: value 12 out of range");
    }

    #[test]
    fn test_into_io_error_keeps_kind() {
        let err: io::Error = ExtractError::RootNotFound(PathBuf::from("/missing")).into();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);

        let err: io::Error = ExtractError::OutputPathConflict(PathBuf::from("out.txt")).into();
        assert_eq!(err.kind(), io::ErrorKind::AlreadyExists);
    }
}
