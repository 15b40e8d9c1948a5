//! OpenAI tokenizer implementation using tiktoken

use tiktoken_rs::CoreBPE;

use super::{TokenCount, Tokenizer};
use crate::tokenizer::error::{TokenizerError, TokenizerResult};
use crate::tokenizer::model::Model;

/// Exact BPE counting for OpenAI models
pub struct TiktokenTokenizer {
    model: Model,
    encoding: CoreBPE,
}

impl TiktokenTokenizer {
    /// Load the BPE ranks for the model
    pub fn new(model: Model) -> TokenizerResult<Self> {
        let encoding = tiktoken_rs::get_bpe_from_model(model.model_id())
            .map_err(|e| TokenizerError::UnsupportedModel(format!("{}: {}", model.model_id(), e)))?;

        Ok(Self { model, encoding })
    }
}

impl Tokenizer for TiktokenTokenizer {
    fn count_tokens(&self, text: &str) -> TokenizerResult<TokenCount> {
        let tokens = self.encoding.encode_ordinary(text);
        Ok(TokenCount {
            tokens: tokens.len(),
        })
    }

    fn method(&self) -> Option<&'static str> {
        Some(self.model.model_id())
    }

    fn model_context_window(&self) -> Option<usize> {
        Some(self.model.context_window())
    }
}
