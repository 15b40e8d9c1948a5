/*!
 * Per-file eligibility: size ceiling, binary detection and text decoding
 *
 * Every failure here degrades to a [`SkipReason`], nothing propagates.
 */

use std::fs;
use std::path::Path;

use clap::ValueEnum;
use strum::Display;

use crate::error::SkipReason;

/// Default content size ceiling (10 MiB)
pub const DEFAULT_MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// Number of leading bytes inspected for binary detection
pub const BINARY_PROBE_SIZE: usize = 8192;

/// Control bytes above this share of the probe mark a file as binary
const BINARY_RATIO_THRESHOLD: f32 = 0.1;

/// Text encodings tried when decoding file content
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, ValueEnum)]
pub enum Encoding {
    #[value(name = "utf-8")]
    #[strum(serialize = "utf-8")]
    Utf8,
    #[value(name = "latin-1")]
    #[strum(serialize = "latin-1")]
    Latin1,
    #[value(name = "windows-1252")]
    #[strum(serialize = "windows-1252")]
    Windows1252,
    #[value(name = "ascii")]
    #[strum(serialize = "ascii")]
    Ascii,
}

/// Fallback order used when none is configured
pub const DEFAULT_ENCODINGS: [Encoding; 4] = [
    Encoding::Utf8,
    Encoding::Latin1,
    Encoding::Windows1252,
    Encoding::Ascii,
];

// 0x80..=0x9F; `None` marks the five bytes windows-1252 leaves undefined
const WINDOWS_1252_HIGH: [Option<char>; 32] = [
    Some('\u{20AC}'),
    None,
    Some('\u{201A}'),
    Some('\u{0192}'),
    Some('\u{201E}'),
    Some('\u{2026}'),
    Some('\u{2020}'),
    Some('\u{2021}'),
    Some('\u{02C6}'),
    Some('\u{2030}'),
    Some('\u{0160}'),
    Some('\u{2039}'),
    Some('\u{0152}'),
    None,
    Some('\u{017D}'),
    None,
    None,
    Some('\u{2018}'),
    Some('\u{2019}'),
    Some('\u{201C}'),
    Some('\u{201D}'),
    Some('\u{2022}'),
    Some('\u{2013}'),
    Some('\u{2014}'),
    Some('\u{02DC}'),
    Some('\u{2122}'),
    Some('\u{0161}'),
    Some('\u{203A}'),
    Some('\u{0153}'),
    None,
    Some('\u{017E}'),
    Some('\u{0178}'),
];

impl Encoding {
    /// Decode bytes, or `None` if they are not valid in this encoding
    pub fn decode(self, bytes: &[u8]) -> Option<String> {
        match self {
            Encoding::Utf8 => std::str::from_utf8(bytes).ok().map(str::to_owned),
            Encoding::Latin1 => Some(bytes.iter().map(|&b| char::from(b)).collect()),
            Encoding::Windows1252 => bytes
                .iter()
                .map(|&b| match b {
                    0x80..=0x9F => WINDOWS_1252_HIGH[usize::from(b - 0x80)],
                    _ => Some(char::from(b)),
                })
                .collect(),
            Encoding::Ascii => bytes
                .is_ascii()
                .then(|| bytes.iter().map(|&b| char::from(b)).collect()),
        }
    }
}

/// Outcome of reading one file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileContent {
    /// Decoded text and the encoding that worked
    Text { text: String, encoding: Encoding },
    /// Content left out, with the reason
    Skipped(SkipReason),
}

/// Classification without the decoded text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub skip_reason: Option<SkipReason>,
    pub encoding: Option<Encoding>,
}

impl From<&FileContent> for Classification {
    fn from(content: &FileContent) -> Self {
        match content {
            FileContent::Text { encoding, .. } => Self {
                skip_reason: None,
                encoding: Some(*encoding),
            },
            FileContent::Skipped(reason) => Self {
                skip_reason: Some(reason.clone()),
                encoding: None,
            },
        }
    }
}

/// Decides whether a file's content can be embedded and decodes it
#[derive(Debug, Clone)]
pub struct FileClassifier {
    max_file_size: u64,
    encodings: Vec<Encoding>,
}

impl Default for FileClassifier {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_FILE_SIZE, DEFAULT_ENCODINGS.to_vec())
    }
}

impl FileClassifier {
    /// Create a classifier with a size ceiling and an encoding fallback order
    pub fn new(max_file_size: u64, encodings: Vec<Encoding>) -> Self {
        Self {
            max_file_size,
            encodings,
        }
    }

    /// Classify a file without keeping its text. The assembler calls
    /// [`read`](Self::read) instead and records the same [`Classification`]
    /// through `PathEntry::record`.
    pub fn classify(&self, path: &Path) -> Classification {
        Classification::from(&self.read(path))
    }

    /// Read and decode a file
    pub fn read(&self, path: &Path) -> FileContent {
        let size = match fs::metadata(path) {
            Ok(metadata) => metadata.len(),
            Err(e) => return FileContent::Skipped(e.into()),
        };

        if size > self.max_file_size {
            return FileContent::Skipped(SkipReason::TooLarge {
                size,
                limit: self.max_file_size,
            });
        }

        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) => return FileContent::Skipped(e.into()),
        };

        let probe = &bytes[..bytes.len().min(BINARY_PROBE_SIZE)];
        if is_binary(probe) {
            return FileContent::Skipped(SkipReason::BinaryDetected);
        }

        self.decode(&bytes)
    }

    /// Try each configured encoding in order
    pub fn decode(&self, bytes: &[u8]) -> FileContent {
        self.encodings
            .iter()
            .find_map(|&encoding| {
                encoding
                    .decode(bytes)
                    .map(|text| FileContent::Text { text, encoding })
            })
            .unwrap_or(FileContent::Skipped(SkipReason::DecodeFailure))
    }
}

/// Binary heuristic: any NUL byte, or too many control characters
pub fn is_binary(probe: &[u8]) -> bool {
    if probe.is_empty() {
        return false;
    }
    if probe.contains(&0) {
        return true;
    }

    // Count binary characters (0x00-0x08, 0x0E-0x1F), ESC is common in logs
    let binary_count = probe
        .iter()
        .filter(|&&b| b < 9 || (b > 13 && b < 32 && b != 0x1B))
        .count();
    let binary_ratio = binary_count as f32 / probe.len() as f32;

    binary_ratio > BINARY_RATIO_THRESHOLD
}
