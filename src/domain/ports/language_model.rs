use crate::domain::error::SynthesisFailure;
use serde::{Deserialize, Serialize};

/// Knobs passed with every completion request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionOptions {
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Default for CompletionOptions {
    fn default() -> Self {
        Self {
            model: "gpt-4.1-mini".to_string(),
            temperature: 0.2,
            max_tokens: 2000,
        }
    }
}

/// A chat prompt split the way chat-completion APIs expect it.
#[derive(Debug, Clone, PartialEq)]
pub struct Prompt {
    pub system: String,
    pub user: String,
}

#[async_trait::async_trait]
pub trait LanguageModel: Send + Sync {
    async fn complete(
        &self,
        prompt: &Prompt,
        options: &CompletionOptions,
    ) -> Result<String, SynthesisFailure>;

    fn name(&self) -> &str;
}
