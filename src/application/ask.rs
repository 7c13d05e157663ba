use crate::application::fetch::SnapshotFetcher;
use crate::application::interpret::{Interpretation, QueryInterpreter};
use crate::application::synthesize::ReportSynthesizer;
use crate::application::validate::Validator;
use crate::domain::entities::query::Query;
use crate::domain::entities::report::Report;
use crate::domain::entities::snapshot::TickerSnapshot;
use crate::domain::error::DomainError;
use serde::Serialize;
use std::time::Instant;
use tracing::info;

/// Longest query accepted, in characters.
pub const MAX_QUERY_CHARS: usize = 500;

/// Everything produced for one user turn.
#[derive(Debug, Clone, Serialize)]
pub struct Answer {
    pub query: String,
    pub interpretation: Interpretation,
    pub snapshots: Vec<TickerSnapshot>,
    pub report: Report,
}

pub struct AskUseCase {
    validator: Validator,
    interpreter: QueryInterpreter,
    fetcher: SnapshotFetcher,
    synthesizer: ReportSynthesizer,
}

impl AskUseCase {
    pub fn new(
        validator: Validator,
        interpreter: QueryInterpreter,
        fetcher: SnapshotFetcher,
        synthesizer: ReportSynthesizer,
    ) -> Self {
        Self {
            validator,
            interpreter,
            fetcher,
            synthesizer,
        }
    }

    /// Validation and interpretation only. Makes no network calls.
    pub fn interpret(&self, query: &Query) -> Result<Interpretation, DomainError> {
        let length = query.text().chars().count();
        if length > MAX_QUERY_CHARS {
            return Err(DomainError::InvalidInput(format!(
                "query is {length} characters; the limit is {MAX_QUERY_CHARS}"
            )));
        }
        self.validator.validate(query)?;
        Ok(self.interpreter.interpret(query))
    }

    pub async fn execute(&self, query: Query) -> Result<Answer, DomainError> {
        let started = Instant::now();
        let interpretation = self.interpret(&query)?;
        if interpretation.tickers.is_empty() {
            return Err(DomainError::TickerNotFound);
        }
        info!(
            intent = %interpretation.intent,
            tickers = %interpretation.tickers.join(","),
            "query interpreted"
        );

        let snapshots = self
            .fetcher
            .fetch_all(
                interpretation.intent,
                &interpretation.tickers,
                interpretation.horizon,
            )
            .await;
        let report = self
            .synthesizer
            .synthesize(
                &query,
                interpretation.intent,
                &interpretation.tickers,
                &snapshots,
            )
            .await;

        info!(
            report_id = %report.id,
            degraded = report.is_degraded(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "report ready"
        );
        Ok(Answer {
            query: query.text().to_string(),
            interpretation,
            snapshots,
            report,
        })
    }
}
