pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

use crate::application::ask::{Answer, AskUseCase};
use crate::application::decode;
use crate::application::fetch::SnapshotFetcher;
use crate::application::interpret::{Interpretation, QueryInterpreter};
use crate::application::synthesize::ReportSynthesizer;
use crate::application::validate::Validator;
use crate::config::{AppConfig, Settings};
use crate::domain::entities::market_status::MarketStatus;
use crate::domain::entities::query::Query;
use crate::domain::entities::report::Report;
use crate::domain::error::DomainError;
use crate::domain::ports::language_model::LanguageModel;
use crate::domain::ports::market_data::MarketDataGateway;
use crate::infrastructure::llm::offline::OfflineModel;
use crate::infrastructure::llm::openai::OpenAiChat;
use crate::infrastructure::market_data::polygon::PolygonGateway;
use crate::infrastructure::reports::markdown::ReportWriter;
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub struct MarketBrief {
    ask_uc: AskUseCase,
    writer: ReportWriter,
    gateway: Arc<dyn MarketDataGateway>,
}

impl MarketBrief {
    /// Wires the Polygon gateway and, unless no OpenAI key is configured,
    /// the OpenAI chat model. Without a key every report is data-only.
    pub fn new(config: &AppConfig) -> Result<Self, DomainError> {
        let settings = config.settings.clone();
        let gateway: Arc<dyn MarketDataGateway> = Arc::new(PolygonGateway::new(
            config.credentials.polygon_api_key.clone(),
            settings.polygon_base_url.clone(),
            settings.fetch_timeout,
        )?);
        let model: Arc<dyn LanguageModel> = match &config.credentials.openai_api_key {
            Some(key) => Arc::new(OpenAiChat::new(key.clone(), settings.openai_base_url.clone())?),
            None => Arc::new(OfflineModel),
        };
        Ok(Self::with_providers(settings, gateway, model))
    }

    pub fn with_providers(
        settings: Settings,
        gateway: Arc<dyn MarketDataGateway>,
        model: Arc<dyn LanguageModel>,
    ) -> Self {
        tracing::debug!(
            gateway = gateway.name(),
            model = model.name(),
            "market brief initialised"
        );
        let ask_uc = AskUseCase::new(
            Validator::new(settings.lexicon.clone()),
            QueryInterpreter::new(settings.lexicon.clone()),
            SnapshotFetcher::new(
                gateway.clone(),
                settings.profiles.clone(),
                settings.fetch_timeout,
            ),
            ReportSynthesizer::new(
                model,
                settings.completion.clone(),
                settings.synthesis_timeout,
                settings.profiles.clone(),
            ),
        );
        Self {
            ask_uc,
            writer: ReportWriter::new(settings.output_dir),
            gateway,
        }
    }

    /// One full turn: validate, interpret, fetch, synthesize.
    pub async fn ask(&self, text: &str) -> Result<Answer, DomainError> {
        self.ask_uc.execute(Query::new(text)).await
    }

    /// Validation and interpretation only; no network calls.
    pub fn interpret(&self, text: &str) -> Result<Interpretation, DomainError> {
        self.ask_uc.interpret(&Query::new(text))
    }

    pub fn save(&self, report: &Report) -> Result<PathBuf, DomainError> {
        self.writer.save(report)
    }

    pub fn output_dir(&self) -> &Path {
        self.writer.output_dir()
    }

    pub async fn market_status(&self) -> Result<MarketStatus, DomainError> {
        let raw = self.gateway.get_market_status().await?;
        Ok(decode::market_status(raw)?)
    }
}
