//! Model definitions and metadata

use clap::ValueEnum;
use strum::{Display, EnumIter, EnumProperty};

/// Supported LLM models for exact token counting
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, Display, ValueEnum, EnumProperty)]
pub enum Model {
    #[value(name = "gpt-3.5-turbo")]
    #[strum(props(model_id = "gpt-3.5-turbo", context_window = 16385))]
    Gpt35Turbo,

    #[value(name = "gpt-4")]
    #[strum(props(model_id = "gpt-4", context_window = 8192))]
    Gpt4,

    #[value(name = "gpt-4-turbo")]
    #[strum(props(model_id = "gpt-4-0125-preview", context_window = 128000))]
    Gpt4Turbo,

    #[value(name = "gpt-4o")]
    #[strum(props(model_id = "gpt-4o", context_window = 128000))]
    Gpt4o,
}

impl Model {
    /// Get the context window size for this model
    pub fn context_window(&self) -> usize {
        self.get_int("context_window").unwrap_or(0) as usize
    }

    /// Get the model identifier understood by tiktoken
    pub fn model_id(&self) -> &'static str {
        self.get_str("model_id").unwrap_or("unknown")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_every_model_has_metadata() {
        for model in Model::iter() {
            assert_ne!(model.model_id(), "unknown", "{} lacks a model id", model);
            assert!(model.context_window() > 0, "{} lacks a context window", model);
        }
    }

    #[test]
    fn test_cli_names() {
        let model = Model::from_str("gpt-4o", true).unwrap();
        assert_eq!(model, Model::Gpt4o);
        assert_eq!(model.model_id(), "gpt-4o");
    }
}
