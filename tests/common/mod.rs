//! Shared test helpers.

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::NaiveDate;
use marketbrief::config::Settings;
use marketbrief::domain::error::{ApiError, SynthesisFailure};
use marketbrief::domain::ports::language_model::{CompletionOptions, LanguageModel, Prompt};
use marketbrief::domain::ports::market_data::MarketDataGateway;
use marketbrief::domain::values::ticker::Ticker;
use marketbrief::domain::values::timespan::Timespan;
use marketbrief::MarketBrief;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// 2023-11-14T22:13:20Z
const TRADE_NANOS: i64 = 1_700_000_000_000_000_000;
const DAY_MILLIS: i64 = 86_400_000;
const BAR_START_MILLIS: i64 = 1_699_920_000_000;

/// In-memory market data shaped like Polygon responses. Unknown tickers
/// get 404 on every endpoint.
pub struct FakeGateway {
    prices: HashMap<String, f64>,
    delays: HashMap<String, Duration>,
    failures: HashMap<String, u16>,
    trade_error: Option<u16>,
    news: bool,
    calls: Mutex<Vec<String>>,
}

impl FakeGateway {
    pub fn new(prices: &[(&str, f64)]) -> Self {
        Self {
            prices: prices.iter().map(|(t, p)| (t.to_string(), *p)).collect(),
            delays: HashMap::new(),
            failures: HashMap::new(),
            trade_error: None,
            news: true,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Latest-trade requests fail with `status` (403 = not in the plan).
    pub fn with_trade_error(mut self, status: u16) -> Self {
        self.trade_error = Some(status);
        self
    }

    /// Every call for `symbol` waits `delay` before answering.
    pub fn with_delay(mut self, symbol: &str, delay: Duration) -> Self {
        self.delays.insert(symbol.to_string(), delay);
        self
    }

    /// Every call for `symbol` fails with `status`.
    pub fn with_failure(mut self, symbol: &str, status: u16) -> Self {
        self.failures.insert(symbol.to_string(), status);
        self
    }

    pub fn without_news(mut self) -> Self {
        self.news = false;
        self
    }

    /// Recorded calls as `endpoint:TICKER`, in completion order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_to(&self, endpoint: &str) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|c| c.starts_with(&format!("{endpoint}:")))
            .collect()
    }

    async fn record(&self, endpoint: &str, ticker: &Ticker) -> Result<f64, ApiError> {
        if let Some(delay) = self.delays.get(ticker.as_str()) {
            tokio::time::sleep(*delay).await;
        }
        self.calls.lock().unwrap().push(format!("{endpoint}:{ticker}"));
        if let Some(status) = self.failures.get(ticker.as_str()) {
            return Err(ApiError::from_status(*status, "upstream failure"));
        }
        self.prices
            .get(ticker.as_str())
            .copied()
            .ok_or_else(|| ApiError::from_status(404, format!("{ticker} not found")))
    }
}

#[async_trait]
impl MarketDataGateway for FakeGateway {
    async fn get_company_details(&self, ticker: &Ticker) -> Result<Value, ApiError> {
        self.record("company", ticker).await?;
        Ok(json!({"status": "OK", "results": {
            "ticker": ticker.as_str(),
            "name": format!("{ticker} Holdings Inc."),
            "market": "stocks",
            "type": "CS",
            "currency_name": "usd",
            "primary_exchange": "XNAS",
            "market_cap": 1.25e12,
            "description": format!("{ticker} makes things.")
        }}))
    }

    async fn get_latest_trade(&self, ticker: &Ticker) -> Result<Value, ApiError> {
        let price = self.record("last_trade", ticker).await?;
        if let Some(status) = self.trade_error {
            return Err(ApiError::from_status(status, "NOT_AUTHORIZED"));
        }
        Ok(json!({"status": "OK", "results": {"p": price, "s": 100, "t": TRADE_NANOS}}))
    }

    async fn get_previous_close(&self, ticker: &Ticker) -> Result<Value, ApiError> {
        let price = self.record("previous_close", ticker).await?;
        Ok(json!({"status": "OK", "results": [{
            "o": price - 1.0, "h": price + 2.0, "l": price - 2.0, "c": price - 0.5,
            "v": 2_500_000.0, "vw": price, "t": BAR_START_MILLIS + 2 * DAY_MILLIS
        }]}))
    }

    async fn get_aggregates(
        &self,
        ticker: &Ticker,
        _from: NaiveDate,
        _to: NaiveDate,
        _timespan: Timespan,
    ) -> Result<Value, ApiError> {
        let price = self.record("aggregates", ticker).await?;
        let bars: Vec<Value> = [price - 10.0, price - 5.0, price - 0.5]
            .iter()
            .enumerate()
            .map(|(i, close)| {
                json!({
                    "o": close - 1.0, "h": close + 1.0, "l": close - 2.0, "c": close,
                    "v": 1_000_000.0, "t": BAR_START_MILLIS + i as i64 * DAY_MILLIS
                })
            })
            .collect();
        Ok(json!({"status": "OK", "resultsCount": bars.len(), "results": bars}))
    }

    async fn get_news(&self, ticker: &Ticker, limit: usize) -> Result<Value, ApiError> {
        self.record("news", ticker).await?;
        if !self.news {
            return Ok(json!({"status": "OK", "results": []}));
        }
        let articles: Vec<Value> = (1..=5)
            .take(limit)
            .map(|n| {
                json!({
                    "title": format!("{ticker} headline {n}"),
                    "published_utc": "2024-05-01T12:00:00Z",
                    "article_url": format!("https://news.example.com/{ticker}/{n}"),
                    "description": format!("Summary {n} for {ticker}."),
                    "publisher": {"name": "Example Wire"}
                })
            })
            .collect();
        Ok(json!({"status": "OK", "results": articles}))
    }

    async fn get_market_status(&self) -> Result<Value, ApiError> {
        self.calls.lock().unwrap().push("market_status:".to_string());
        Ok(json!({
            "market": "open",
            "serverTime": "2024-05-01T10:00:00-04:00",
            "earlyHours": false,
            "afterHours": false,
            "exchanges": {"nasdaq": "open", "nyse": "open", "otc": "open"}
        }))
    }

    fn name(&self) -> &str {
        "fake"
    }
}

/// Returns the user prompt verbatim, so tests can see exactly what the
/// model was given.
pub struct EchoModel {
    pub prompts: Mutex<Vec<Prompt>>,
}

impl EchoModel {
    pub fn new() -> Self {
        Self {
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn last_prompt(&self) -> Option<Prompt> {
        self.prompts.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl LanguageModel for EchoModel {
    async fn complete(
        &self,
        prompt: &Prompt,
        _options: &CompletionOptions,
    ) -> Result<String, SynthesisFailure> {
        self.prompts.lock().unwrap().push(prompt.clone());
        Ok(prompt.user.clone())
    }

    fn name(&self) -> &str {
        "echo"
    }
}

pub struct FailingModel;

#[async_trait]
impl LanguageModel for FailingModel {
    async fn complete(
        &self,
        _prompt: &Prompt,
        _options: &CompletionOptions,
    ) -> Result<String, SynthesisFailure> {
        Err(SynthesisFailure::Upstream("OpenAI API 500: boom".into()))
    }

    fn name(&self) -> &str {
        "failing"
    }
}

/// Sleeps well past any test timeout before answering.
pub struct SlowModel;

#[async_trait]
impl LanguageModel for SlowModel {
    async fn complete(
        &self,
        _prompt: &Prompt,
        _options: &CompletionOptions,
    ) -> Result<String, SynthesisFailure> {
        tokio::time::sleep(Duration::from_secs(30)).await;
        Ok("too late".into())
    }

    fn name(&self) -> &str {
        "slow"
    }
}

pub fn settings() -> Settings {
    Settings {
        fetch_timeout: Duration::from_secs(2),
        synthesis_timeout: Duration::from_millis(200),
        ..Settings::default()
    }
}

pub fn setup(
    gateway: Arc<FakeGateway>,
    model: Arc<dyn LanguageModel>,
) -> MarketBrief {
    MarketBrief::with_providers(settings(), gateway, model)
}

pub fn ticker(symbol: &str) -> Ticker {
    Ticker::new(symbol).unwrap()
}
