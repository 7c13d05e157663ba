use crate::domain::values::data_point::DataPoint;
use crate::domain::values::ticker::Ticker;
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompanyProfile {
    pub name: String,
    pub market: Option<String>,
    pub kind: Option<String>,
    pub currency: Option<String>,
    pub primary_exchange: Option<String>,
    pub market_cap: Option<f64>,
    pub description: Option<String>,
    pub homepage_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LastTrade {
    pub price: f64,
    pub size: Option<f64>,
    pub timestamp: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: Option<f64>,
    pub vwap: Option<f64>,
}

impl DailyBar {
    /// Open-to-close move for the session.
    pub fn change(&self) -> Change {
        Change::between(self.open, self.close)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewsItem {
    pub title: String,
    pub published: Option<DateTime<Utc>>,
    pub url: Option<String>,
    pub publisher: Option<String>,
    pub summary: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Change {
    pub absolute: f64,
    /// `None` when the base is zero.
    pub percent: Option<f64>,
}

impl Change {
    pub fn between(from: f64, to: f64) -> Self {
        let absolute = to - from;
        let percent = (from != 0.0).then(|| absolute / from * 100.0);
        Self { absolute, percent }
    }
}

/// Summary of a run of daily bars, oldest to newest.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeriodPerformance {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub start_close: f64,
    pub end_close: f64,
    pub change: Change,
    pub high: f64,
    pub low: f64,
    pub sessions: usize,
}

impl PeriodPerformance {
    pub fn from_bars(bars: &[DailyBar]) -> Option<Self> {
        let first = bars.first()?;
        let last = bars.last()?;
        let high = bars.iter().map(|b| b.high).fold(f64::NEG_INFINITY, f64::max);
        let low = bars.iter().map(|b| b.low).fold(f64::INFINITY, f64::min);
        Some(Self {
            start: first.date,
            end: last.date,
            start_close: first.close,
            end_close: last.close,
            change: Change::between(first.close, last.close),
            high,
            low,
            sessions: bars.len(),
        })
    }
}

/// Everything fetched for one ticker during one turn. Never cached.
#[derive(Debug, Clone, Serialize)]
pub struct MarketSnapshot {
    pub ticker: Ticker,
    pub company: DataPoint<CompanyProfile>,
    pub last_trade: DataPoint<LastTrade>,
    pub previous_close: DataPoint<DailyBar>,
    /// Oldest first.
    pub daily_bars: DataPoint<Vec<DailyBar>>,
    pub news: DataPoint<Vec<NewsItem>>,
    pub fetched_at: DateTime<Utc>,
}

impl MarketSnapshot {
    pub fn empty(ticker: Ticker) -> Self {
        Self {
            ticker,
            company: DataPoint::NotRequested,
            last_trade: DataPoint::NotRequested,
            previous_close: DataPoint::NotRequested,
            daily_bars: DataPoint::NotRequested,
            news: DataPoint::NotRequested,
            fetched_at: Utc::now(),
        }
    }

    pub fn performance(&self) -> Option<PeriodPerformance> {
        self.daily_bars
            .value()
            .and_then(|bars| PeriodPerformance::from_bars(bars))
    }

    /// Best available price: last trade, then previous close, then the
    /// newest daily bar.
    pub fn reference_price(&self) -> Option<f64> {
        self.last_trade
            .value()
            .map(|t| t.price)
            .or_else(|| self.previous_close.value().map(|b| b.close))
            .or_else(|| {
                self.daily_bars
                    .value()
                    .and_then(|bars| bars.last())
                    .map(|b| b.close)
            })
    }
}

/// Per-ticker result of a fetch.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TickerSnapshot {
    Found(MarketSnapshot),
    NotFound { ticker: Ticker },
    Unavailable { ticker: Ticker, reason: String },
}

impl TickerSnapshot {
    pub fn ticker(&self) -> &Ticker {
        match self {
            TickerSnapshot::Found(s) => &s.ticker,
            TickerSnapshot::NotFound { ticker } | TickerSnapshot::Unavailable { ticker, .. } => {
                ticker
            }
        }
    }

    pub fn snapshot(&self) -> Option<&MarketSnapshot> {
        match self {
            TickerSnapshot::Found(s) => Some(s),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bar(day: u32, close: f64) -> DailyBar {
        DailyBar {
            date: NaiveDate::from_ymd_opt(2024, 3, day).unwrap(),
            open: close - 1.0,
            high: close + 2.0,
            low: close - 3.0,
            close,
            volume: Some(1000.0),
            vwap: None,
        }
    }

    #[test]
    fn test_period_performance() {
        let perf = PeriodPerformance::from_bars(&[bar(1, 100.0), bar(2, 90.0), bar(3, 110.0)]).unwrap();
        assert_eq!(perf.sessions, 3);
        assert_eq!(perf.high, 112.0);
        assert_eq!(perf.low, 87.0);
        assert!((perf.change.percent.unwrap() - 10.0).abs() < 1e-9);
        assert!(PeriodPerformance::from_bars(&[]).is_none());
    }

    #[test]
    fn test_change_from_zero_has_no_percent() {
        assert_eq!(Change::between(0.0, 5.0).percent, None);
    }

    #[test]
    fn test_reference_price_falls_back_to_previous_close() {
        let mut snap = MarketSnapshot::empty(Ticker::new("AAPL").unwrap());
        snap.last_trade = DataPoint::unavailable("not included in the market-data plan");
        snap.previous_close = DataPoint::Available(bar(4, 187.5));
        assert_eq!(snap.reference_price(), Some(187.5));
    }
}
