use crate::domain::error::SynthesisFailure;
use crate::domain::ports::language_model::{CompletionOptions, LanguageModel, Prompt};

/// Stand-in model for data-only mode. Every completion fails, so reports
/// fall back to the raw market data.
pub struct OfflineModel;

#[async_trait::async_trait]
impl LanguageModel for OfflineModel {
    async fn complete(
        &self,
        _prompt: &Prompt,
        _options: &CompletionOptions,
    ) -> Result<String, SynthesisFailure> {
        Err(SynthesisFailure::Unavailable("offline mode".to_string()))
    }

    fn name(&self) -> &str {
        "offline"
    }
}
