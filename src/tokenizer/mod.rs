//! Tokenizer module for token counting
//!
//! Counting is pluggable: an exact BPE counter for OpenAI models, or a
//! whitespace approximation when no model is selected or the BPE data cannot
//! be loaded. Only the number differs between the two, never the output shape.

mod error;
mod model;
mod tiktoken;
mod whitespace;

// Re-exports for public API
pub use error::{TokenizerError, TokenizerResult};
pub use model::Model;
pub use tiktoken::TiktokenTokenizer;
pub use whitespace::WhitespaceTokenizer;

use log::warn;

/// Result of token counting operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenCount {
    /// Number of tokens in the text
    pub tokens: usize,
}

/// Trait defining the interface for tokenizers
pub trait Tokenizer: Send + Sync {
    /// Count tokens in the given text
    fn count_tokens(&self, text: &str) -> TokenizerResult<TokenCount>;

    /// Counting method shown next to the total, `None` for the approximation
    fn method(&self) -> Option<&'static str>;

    /// Get the context window size for this model, if one is known
    fn model_context_window(&self) -> Option<usize>;
}

/// Create a tokenizer for the selected model, falling back to whitespace
/// counting when the model's BPE cannot be loaded
pub fn create_tokenizer(model: Option<Model>) -> Box<dyn Tokenizer> {
    match model {
        None => Box::new(WhitespaceTokenizer),
        Some(model) => match TiktokenTokenizer::new(model) {
            Ok(tokenizer) => Box::new(tokenizer),
            Err(e) => {
                warn!("{}, falling back to whitespace token estimate", e);
                Box::new(WhitespaceTokenizer)
            }
        },
    }
}

/// Count with the given tokenizer, degrading to the whitespace estimate on error
pub fn count_or_estimate(tokenizer: &dyn Tokenizer, text: &str) -> TokenCount {
    tokenizer.count_tokens(text).unwrap_or_else(|e| {
        warn!("Token counting failed ({}), using whitespace estimate", e);
        TokenCount {
            tokens: text.split_whitespace().count(),
        }
    })
}
