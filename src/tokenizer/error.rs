//! Error types for the tokenizer module

use thiserror::Error;

/// Result type for tokenizer operations
pub type TokenizerResult<T> = Result<T, TokenizerError>;

/// Errors that can occur during tokenization
#[derive(Error, Debug)]
pub enum TokenizerError {
    /// Error from tokenizer library
    #[error("Tokenizer error: {0}")]
    TokenizerError(String),

    /// Model is not supported
    #[error("Unsupported model: {0}")]
    UnsupportedModel(String),
}
