use crate::domain::error::ApiError;
use crate::domain::values::ticker::Ticker;
use crate::domain::values::timespan::Timespan;
use chrono::NaiveDate;
use serde_json::Value;

/// Read-only market-data endpoints.
///
/// Each call is independent: nothing is cached or shared between tickers,
/// and nothing is retried here. Any non-2xx response or transport failure
/// comes back as an [`ApiError`], with 404 kept distinct so callers can say
/// "unknown ticker" instead of "service unavailable".
#[async_trait::async_trait]
pub trait MarketDataGateway: Send + Sync {
    async fn get_company_details(&self, ticker: &Ticker) -> Result<Value, ApiError>;

    async fn get_latest_trade(&self, ticker: &Ticker) -> Result<Value, ApiError>;

    async fn get_previous_close(&self, ticker: &Ticker) -> Result<Value, ApiError>;

    async fn get_aggregates(
        &self,
        ticker: &Ticker,
        from: NaiveDate,
        to: NaiveDate,
        timespan: Timespan,
    ) -> Result<Value, ApiError>;

    async fn get_news(&self, ticker: &Ticker, limit: usize) -> Result<Value, ApiError>;

    async fn get_market_status(&self) -> Result<Value, ApiError>;

    /// Provider name for logging.
    fn name(&self) -> &str;
}
