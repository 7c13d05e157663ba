use crate::application::decode;
use crate::domain::entities::snapshot::{MarketSnapshot, TickerSnapshot};
use crate::domain::error::ApiError;
use crate::domain::ports::market_data::MarketDataGateway;
use crate::domain::values::data_point::DataPoint;
use crate::domain::values::horizon::Horizon;
use crate::domain::values::intent::Intent;
use crate::domain::values::intent_profile::{IntentProfile, IntentProfiles, SnapshotField};
use crate::domain::values::ticker::{Ticker, TickerSet};
use crate::domain::values::timespan::Timespan;
use chrono::{Days, NaiveDate, Utc};
use futures::future::join_all;
use serde_json::Value;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

type Fetched = Option<Result<Value, ApiError>>;

/// Fetches one snapshot per ticker, concurrently, and returns them in
/// ticker-set order.
pub struct SnapshotFetcher {
    gateway: Arc<dyn MarketDataGateway>,
    profiles: Arc<IntentProfiles>,
    timeout: Duration,
}

impl SnapshotFetcher {
    pub fn new(
        gateway: Arc<dyn MarketDataGateway>,
        profiles: Arc<IntentProfiles>,
        timeout: Duration,
    ) -> Self {
        Self {
            gateway,
            profiles,
            timeout,
        }
    }

    pub async fn fetch_all(
        &self,
        intent: Intent,
        tickers: &TickerSet,
        horizon: Option<Horizon>,
    ) -> Vec<TickerSnapshot> {
        let profile = self.profiles.for_intent(intent);
        let lookback = horizon
            .map(|h| h.as_days())
            .unwrap_or(profile.bar_lookback_days);
        let timespan = Timespan::for_lookback(lookback);
        let to = Utc::now().date_naive();
        let from = to
            .checked_sub_days(Days::new(u64::from(lookback)))
            .unwrap_or(to);

        // join_all yields results in input order regardless of completion order.
        join_all(
            tickers
                .iter()
                .map(|ticker| self.fetch_one(ticker, profile, from, to, timespan)),
        )
        .await
    }

    async fn fetch_one(
        &self,
        ticker: &Ticker,
        profile: &IntentProfile,
        from: NaiveDate,
        to: NaiveDate,
        timespan: Timespan,
    ) -> TickerSnapshot {
        let started = Instant::now();
        let gw = &self.gateway;
        let (company, last_trade, previous_close, bars, news) = tokio::join!(
            self.call(profile.wants(SnapshotField::Company), "company", ticker, gw.get_company_details(ticker)),
            self.call(profile.wants(SnapshotField::LastTrade), "last_trade", ticker, gw.get_latest_trade(ticker)),
            self.call(profile.wants(SnapshotField::PreviousClose), "previous_close", ticker, gw.get_previous_close(ticker)),
            self.call(
                profile.wants(SnapshotField::DailyBars),
                "aggregates",
                ticker,
                gw.get_aggregates(ticker, from, to, timespan),
            ),
            self.call(profile.wants(SnapshotField::News), "news", ticker, gw.get_news(ticker, profile.news_limit)),
        );

        let outcome = classify(ticker, [&company, &last_trade, &previous_close, &bars, &news]);
        if let Some(outcome) = outcome {
            warn!(%ticker, ?outcome, "no usable market data for ticker");
            return outcome;
        }

        let mut snapshot = MarketSnapshot::empty(ticker.clone());
        snapshot.company = decode_field(company, decode::company);
        snapshot.last_trade = decode_field(last_trade, decode::last_trade);
        snapshot.previous_close = decode_field(previous_close, decode::previous_close);
        snapshot.daily_bars = decode_field(bars, decode::daily_bars);
        snapshot.news = decode_field(news, |r| decode::news(r, profile.news_limit));

        info!(
            %ticker,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "snapshot fetched"
        );
        TickerSnapshot::Found(snapshot)
    }

    /// Runs `request` under the fetch timeout, or skips it when the field
    /// is not part of the profile.
    async fn call<F>(&self, wanted: bool, endpoint: &str, ticker: &Ticker, request: F) -> Fetched
    where
        F: Future<Output = Result<Value, ApiError>>,
    {
        if !wanted {
            return None;
        }
        let started = Instant::now();
        let result = match tokio::time::timeout(self.timeout, request).await {
            Ok(result) => result,
            Err(_) => Err(ApiError::Timeout(self.timeout)),
        };
        debug!(
            %ticker,
            endpoint,
            ok = result.is_ok(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "market data call finished"
        );
        Some(result)
    }
}

fn decode_field<T>(
    fetched: Fetched,
    decode: impl FnOnce(Result<Value, ApiError>) -> DataPoint<T>,
) -> DataPoint<T> {
    match fetched {
        Some(result) => decode(result),
        None => DataPoint::NotRequested,
    }
}

/// `Some` when the ticker as a whole has to be reported instead of a
/// snapshot: an unknown ticker, or every request failing.
fn classify(ticker: &Ticker, results: [&Fetched; 5]) -> Option<TickerSnapshot> {
    let errors: Vec<&ApiError> = results
        .iter()
        .filter_map(|f| f.as_ref())
        .filter_map(|r| r.as_ref().err())
        .collect();
    let requested = results.iter().filter(|f| f.is_some()).count();

    let company_missing = matches!(results[0], Some(Err(e)) if e.is_not_found());
    if company_missing || (requested > 0 && errors.len() == requested && errors.iter().all(|e| e.is_not_found())) {
        return Some(TickerSnapshot::NotFound {
            ticker: ticker.clone(),
        });
    }
    if requested > 0 && errors.len() == requested {
        return Some(TickerSnapshot::Unavailable {
            ticker: ticker.clone(),
            reason: errors[0].unavailable_reason(),
        });
    }
    None
}
