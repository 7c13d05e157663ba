use crate::domain::error::{ApiError, DomainError};
use crate::domain::ports::market_data::MarketDataGateway;
use crate::domain::values::ticker::Ticker;
use crate::domain::values::timespan::Timespan;
use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://api.polygon.io";

/// Polygon.io REST client. One request per call, no retries, no caching.
pub struct PolygonGateway {
    client: Client,
    api_key: String,
    base_url: String,
    timeout: Duration,
}

impl PolygonGateway {
    pub fn new(
        api_key: impl Into<String>,
        base_url: Option<String>,
        timeout: Duration,
    ) -> Result<Self, DomainError> {
        let client = Client::builder()
            .user_agent(concat!("marketbrief/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .map_err(|e| DomainError::Config(format!("HTTP client error: {e}")))?;
        Ok(Self {
            client,
            api_key: api_key.into(),
            base_url: base_url
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            timeout,
        })
    }

    async fn get(&self, path: &str, query: &[(&str, String)]) -> Result<Value, ApiError> {
        let url = format!("{}{}", self.base_url, path);
        let resp = self
            .client
            .get(&url)
            .bearer_auth(&self.api_key)
            .query(query)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ApiError::Timeout(self.timeout)
                } else {
                    ApiError::Transport(e.to_string())
                }
            })?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        let json: Option<Value> = serde_json::from_str(&body).ok();

        if !status.is_success() {
            let message = json
                .as_ref()
                .and_then(error_message)
                .unwrap_or_else(|| status.canonical_reason().unwrap_or("error").to_string());
            return Err(ApiError::from_status(status.as_u16(), message));
        }

        let json = json.ok_or_else(|| ApiError::Decode(truncate(&body, 200)))?;
        if json.get("status").and_then(Value::as_str) == Some("NOT_FOUND") {
            let message = error_message(&json).unwrap_or_else(|| "ticker not found".to_string());
            return Err(ApiError::NotFound { message });
        }
        Ok(json)
    }
}

fn error_message(json: &Value) -> Option<String> {
    json.get("message")
        .or_else(|| json.get("error"))
        .and_then(Value::as_str)
        .map(str::to_string)
}

fn truncate(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}

#[async_trait]
impl MarketDataGateway for PolygonGateway {
    async fn get_company_details(&self, ticker: &Ticker) -> Result<Value, ApiError> {
        self.get(&format!("/v3/reference/tickers/{ticker}"), &[]).await
    }

    async fn get_latest_trade(&self, ticker: &Ticker) -> Result<Value, ApiError> {
        self.get(&format!("/v2/last/trade/{ticker}"), &[]).await
    }

    async fn get_previous_close(&self, ticker: &Ticker) -> Result<Value, ApiError> {
        self.get(
            &format!("/v2/aggs/ticker/{ticker}/prev"),
            &[("adjusted", "true".to_string())],
        )
        .await
    }

    async fn get_aggregates(
        &self,
        ticker: &Ticker,
        from: NaiveDate,
        to: NaiveDate,
        timespan: Timespan,
    ) -> Result<Value, ApiError> {
        self.get(
            &format!("/v2/aggs/ticker/{ticker}/range/1/{timespan}/{from}/{to}"),
            &[
                ("adjusted", "true".to_string()),
                ("sort", "asc".to_string()),
                ("limit", "5000".to_string()),
            ],
        )
        .await
    }

    async fn get_news(&self, ticker: &Ticker, limit: usize) -> Result<Value, ApiError> {
        self.get(
            "/v2/reference/news",
            &[
                ("ticker", ticker.to_string()),
                ("limit", limit.to_string()),
                ("order", "desc".to_string()),
                ("sort", "published_utc".to_string()),
            ],
        )
        .await
    }

    async fn get_market_status(&self) -> Result<Value, ApiError> {
        self.get("/v1/marketstatus/now", &[]).await
    }

    fn name(&self) -> &str {
        "polygon"
    }
}
