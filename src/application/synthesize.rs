use crate::application::data_report;
use crate::application::digest::Digest;
use crate::domain::entities::query::Query;
use crate::domain::entities::report::{Report, DISCLAIMER};
use crate::domain::entities::snapshot::TickerSnapshot;
use crate::domain::error::SynthesisFailure;
use crate::domain::ports::language_model::{CompletionOptions, LanguageModel, Prompt};
use crate::domain::values::intent::Intent;
use crate::domain::values::intent_profile::IntentProfiles;
use crate::domain::values::ticker::TickerSet;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{info, warn};

const SYSTEM_PROMPT: &str = "\
You are a financial analysis assistant writing a short markdown report.

Rules:
1. Use only the figures that appear in the data digest. Never estimate, round into new figures, or recall numbers from memory.
2. When a field is marked UNAVAILABLE, say that the data is unavailable. Do not fill the gap.
3. Tickers marked NOT FOUND are unknown to the data provider; say so in one line.
4. Cover the tickers in the order given. Use a markdown heading per ticker, or a comparison table when comparing.
5. Mention at most 3 news items per ticker.
6. End the report with this exact line:
";

pub struct ReportSynthesizer {
    model: Arc<dyn LanguageModel>,
    options: CompletionOptions,
    timeout: Duration,
    profiles: Arc<IntentProfiles>,
}

impl ReportSynthesizer {
    pub fn new(
        model: Arc<dyn LanguageModel>,
        options: CompletionOptions,
        timeout: Duration,
        profiles: Arc<IntentProfiles>,
    ) -> Self {
        Self {
            model,
            options,
            timeout,
            profiles,
        }
    }

    /// Always produces a report. A failed or slow model call yields a
    /// data-only report with `degraded` set.
    pub async fn synthesize(
        &self,
        query: &Query,
        intent: Intent,
        tickers: &TickerSet,
        snapshots: &[TickerSnapshot],
    ) -> Report {
        let profile = self.profiles.for_intent(intent);
        let digest = Digest::build(intent, profile, tickers, snapshots);

        if !digest.has_data() {
            let reason = "no market data available for the requested tickers";
            info!(%intent, reason, "skipping language model");
            let body = data_report::render(tickers, snapshots, profile, None);
            return Report::new(intent, tickers.clone(), body, Some(reason.to_string()));
        }

        let missing = digest.missing();
        if !missing.is_empty() {
            info!(%intent, missing = missing.len(), "digest has unavailable fields");
        }

        let prompt = build_prompt(query, &digest);
        match self.complete(&prompt).await {
            Ok(text) => Report::new(intent, tickers.clone(), with_disclaimer(text), None),
            Err(failure) => {
                warn!(%intent, model = self.model.name(), error = %failure, "falling back to data-only report");
                let note = format!(
                    "AI analysis unavailable ({failure}); showing the raw market data."
                );
                let body = data_report::render(tickers, snapshots, profile, Some(&note));
                Report::new(intent, tickers.clone(), body, Some(failure.to_string()))
            }
        }
    }

    async fn complete(&self, prompt: &Prompt) -> Result<String, SynthesisFailure> {
        let started = Instant::now();
        let text = tokio::time::timeout(self.timeout, self.model.complete(prompt, &self.options))
            .await
            .map_err(|_| SynthesisFailure::Timeout(self.timeout))??;
        info!(
            model = %self.options.model,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "completion received"
        );
        if text.trim().is_empty() {
            return Err(SynthesisFailure::EmptyCompletion);
        }
        Ok(text)
    }
}

pub fn build_prompt(query: &Query, digest: &Digest) -> Prompt {
    let order: Vec<&str> = digest.sections.iter().map(|s| s.ticker.as_str()).collect();
    let user = format!(
        "User question: {}\n\nIntent: {} ({})\nTickers, in this order: {}\n\nData digest:\n{}",
        query.text(),
        digest.intent,
        digest.intent.label(),
        order.join(", "),
        digest.render()
    );
    Prompt {
        system: format!("{SYSTEM_PROMPT}{DISCLAIMER}"),
        user,
    }
}

fn with_disclaimer(text: String) -> String {
    let text = text.trim_end();
    if text.ends_with(DISCLAIMER) {
        text.to_string()
    } else {
        format!("{text}\n\n---\n{DISCLAIMER}")
    }
}
