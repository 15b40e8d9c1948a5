//! Approximate counting by whitespace-separated words

use super::{TokenCount, Tokenizer, TokenizerResult};

/// Counts whitespace-separated words, used when no model is selected
#[derive(Debug, Clone, Copy, Default)]
pub struct WhitespaceTokenizer;

impl Tokenizer for WhitespaceTokenizer {
    fn count_tokens(&self, text: &str) -> TokenizerResult<TokenCount> {
        Ok(TokenCount {
            tokens: text.split_whitespace().count(),
        })
    }

    fn method(&self) -> Option<&'static str> {
        None
    }

    fn model_context_window(&self) -> Option<usize> {
        None
    }
}
