//! Turns raw gateway JSON into typed snapshot fields.
//!
//! Every gap (error response, empty result, missing key) becomes an
//! explicit `DataPoint::Unavailable` with a short reason.

use crate::domain::entities::market_status::MarketStatus;
use crate::domain::entities::snapshot::{CompanyProfile, DailyBar, LastTrade, NewsItem};
use crate::domain::error::ApiError;
use crate::domain::values::data_point::DataPoint;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    results: Option<T>,
}

#[derive(Debug, Deserialize)]
struct RawDetails {
    name: Option<String>,
    market: Option<String>,
    #[serde(rename = "type")]
    kind: Option<String>,
    currency_name: Option<String>,
    primary_exchange: Option<String>,
    market_cap: Option<f64>,
    description: Option<String>,
    homepage_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawTrade {
    p: Option<f64>,
    s: Option<f64>,
    /// SIP timestamp, nanoseconds since epoch.
    t: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct RawBar {
    o: Option<f64>,
    h: Option<f64>,
    l: Option<f64>,
    c: Option<f64>,
    v: Option<f64>,
    vw: Option<f64>,
    /// Window start, milliseconds since epoch.
    t: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct RawArticle {
    title: Option<String>,
    published_utc: Option<String>,
    article_url: Option<String>,
    description: Option<String>,
    publisher: Option<RawPublisher>,
}

#[derive(Debug, Deserialize)]
struct RawPublisher {
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawMarketStatus {
    market: Option<String>,
    server_time: Option<String>,
    early_hours: Option<bool>,
    after_hours: Option<bool>,
    #[serde(default)]
    exchanges: BTreeMap<String, Value>,
}

fn parse<T: DeserializeOwned>(value: Value) -> Result<T, String> {
    serde_json::from_value(value).map_err(|e| e.to_string())
}

/// Unwrap the gateway result and the `results` envelope.
fn results<T: DeserializeOwned>(
    result: Result<Value, ApiError>,
    field: &str,
) -> Result<T, String> {
    let value = result.map_err(|e| {
        tracing::warn!(field, error = %e, "market data request failed");
        e.unavailable_reason()
    })?;
    let envelope: Envelope<T> = parse(value).map_err(|e| {
        tracing::warn!(field, error = %e, "unreadable market data response");
        "unreadable response".to_string()
    })?;
    envelope
        .results
        .ok_or_else(|| "no data returned".to_string())
}

pub fn company(result: Result<Value, ApiError>) -> DataPoint<CompanyProfile> {
    let raw: RawDetails = match results(result, "company") {
        Ok(r) => r,
        Err(reason) => return DataPoint::Unavailable(reason),
    };
    let Some(name) = raw.name else {
        return DataPoint::unavailable("company name missing from response");
    };
    DataPoint::Available(CompanyProfile {
        name,
        market: raw.market,
        kind: raw.kind,
        currency: raw.currency_name.map(|c| c.to_uppercase()),
        primary_exchange: raw.primary_exchange,
        market_cap: raw.market_cap,
        description: raw.description,
        homepage_url: raw.homepage_url,
    })
}

pub fn last_trade(result: Result<Value, ApiError>) -> DataPoint<LastTrade> {
    let raw: RawTrade = match results(result, "last_trade") {
        Ok(r) => r,
        Err(reason) => return DataPoint::Unavailable(reason),
    };
    let Some(price) = raw.p else {
        return DataPoint::unavailable("trade price missing from response");
    };
    DataPoint::Available(LastTrade {
        price,
        size: raw.s,
        timestamp: raw.t.map(DateTime::<Utc>::from_timestamp_nanos),
    })
}

pub fn previous_close(result: Result<Value, ApiError>) -> DataPoint<DailyBar> {
    let raw: Vec<RawBar> = match results(result, "previous_close") {
        Ok(r) => r,
        Err(reason) => return DataPoint::Unavailable(reason),
    };
    let bar = raw.into_iter().filter_map(to_bar).last();
    DataPoint::from_option(bar, "no previous session reported")
}

/// Bars sorted oldest first.
pub fn daily_bars(result: Result<Value, ApiError>) -> DataPoint<Vec<DailyBar>> {
    let raw: Vec<RawBar> = match results(result, "daily_bars") {
        Ok(r) => r,
        Err(reason) => return DataPoint::Unavailable(reason),
    };
    let total = raw.len();
    let mut bars: Vec<DailyBar> = raw.into_iter().filter_map(to_bar).collect();
    if bars.len() < total {
        tracing::debug!(dropped = total - bars.len(), "skipped incomplete bars");
    }
    if bars.is_empty() {
        return DataPoint::unavailable("no bars in the requested window");
    }
    bars.sort_by_key(|b| b.date);
    DataPoint::Available(bars)
}

pub fn news(result: Result<Value, ApiError>, limit: usize) -> DataPoint<Vec<NewsItem>> {
    let raw: Vec<RawArticle> = match results(result, "news") {
        Ok(r) => r,
        Err(reason) => return DataPoint::Unavailable(reason),
    };
    let items: Vec<NewsItem> = raw
        .into_iter()
        .filter_map(|a| {
            Some(NewsItem {
                title: a.title?,
                published: a
                    .published_utc
                    .as_deref()
                    .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
                    .map(|dt| dt.with_timezone(&Utc)),
                url: a.article_url,
                publisher: a.publisher.and_then(|p| p.name),
                summary: a.description,
            })
        })
        .take(limit)
        .collect();
    if items.is_empty() {
        return DataPoint::unavailable("no recent articles");
    }
    DataPoint::Available(items)
}

pub fn market_status(value: Value) -> Result<MarketStatus, ApiError> {
    let raw: RawMarketStatus = parse(value).map_err(ApiError::Decode)?;
    let market = raw
        .market
        .ok_or_else(|| ApiError::Decode("market field missing".into()))?;
    let exchanges = raw
        .exchanges
        .into_iter()
        .filter_map(|(name, v)| v.as_str().map(|s| (name, s.to_string())))
        .collect();
    Ok(MarketStatus {
        market,
        server_time: raw.server_time,
        early_hours: raw.early_hours,
        after_hours: raw.after_hours,
        exchanges,
    })
}

fn to_bar(raw: RawBar) -> Option<DailyBar> {
    let date = DateTime::<Utc>::from_timestamp_millis(raw.t?)?.date_naive();
    Some(DailyBar {
        date,
        open: raw.o?,
        high: raw.h?,
        low: raw.l?,
        close: raw.c?,
        volume: raw.v,
        vwap: raw.vw,
    })
}
