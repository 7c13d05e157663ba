//! The intent-relevant slice of each snapshot, as handed to the model.
//!
//! Every figure in a digest comes straight from a snapshot field (or a
//! difference of two of them). Requested fields the provider did not supply
//! are listed as `UNAVAILABLE` rather than left out.

use crate::application::format::{
    format_market_cap, format_percent, format_price, format_signed, format_timestamp,
    format_volume,
};
use crate::domain::entities::snapshot::{MarketSnapshot, TickerSnapshot};
use crate::domain::values::data_point::DataPoint;
use crate::domain::values::intent::Intent;
use crate::domain::values::intent_profile::{IntentProfile, SnapshotField};
use crate::domain::values::ticker::{Ticker, TickerSet};
use serde::Serialize;
use std::fmt;

const DESCRIPTION_CHARS: usize = 400;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "text", rename_all = "snake_case")]
pub enum DigestValue {
    Value(String),
    Missing(String),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DigestLine {
    pub label: String,
    pub value: DigestValue,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "reason", rename_all = "snake_case")]
pub enum DigestStatus {
    Found,
    NotFound,
    Unavailable(String),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TickerDigest {
    pub ticker: Ticker,
    pub status: DigestStatus,
    pub lines: Vec<DigestLine>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Digest {
    pub intent: Intent,
    pub sections: Vec<TickerDigest>,
}

impl Digest {
    /// One section per ticker, in `tickers` order. Snapshots for tickers
    /// outside the set are ignored.
    pub fn build(
        intent: Intent,
        profile: &IntentProfile,
        tickers: &TickerSet,
        snapshots: &[TickerSnapshot],
    ) -> Self {
        let sections = tickers
            .iter()
            .map(|ticker| {
                match snapshots.iter().find(|s| s.ticker() == ticker) {
                    Some(TickerSnapshot::Found(snap)) => TickerDigest {
                        ticker: ticker.clone(),
                        status: DigestStatus::Found,
                        lines: snapshot_lines(intent, profile, snap),
                    },
                    Some(TickerSnapshot::NotFound { .. }) => TickerDigest {
                        ticker: ticker.clone(),
                        status: DigestStatus::NotFound,
                        lines: vec![],
                    },
                    Some(TickerSnapshot::Unavailable { reason, .. }) => TickerDigest {
                        ticker: ticker.clone(),
                        status: DigestStatus::Unavailable(reason.clone()),
                        lines: vec![],
                    },
                    None => TickerDigest {
                        ticker: ticker.clone(),
                        status: DigestStatus::Unavailable("no data fetched".into()),
                        lines: vec![],
                    },
                }
            })
            .collect();
        Self { intent, sections }
    }

    pub fn has_data(&self) -> bool {
        self.sections.iter().any(|s| s.status == DigestStatus::Found)
    }

    /// Labels of every requested field that came back empty, per ticker.
    pub fn missing(&self) -> Vec<(Ticker, String)> {
        self.sections
            .iter()
            .flat_map(|s| {
                s.lines.iter().filter_map(move |l| match l.value {
                    DigestValue::Missing(_) => Some((s.ticker.clone(), l.label.clone())),
                    DigestValue::Value(_) => None,
                })
            })
            .collect()
    }

    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let order: Vec<&str> = self.sections.iter().map(|s| s.ticker.as_str()).collect();
        writeln!(f, "Intent: {}", self.intent)?;
        writeln!(f, "Tickers (in order): {}", order.join(", "))?;
        for section in &self.sections {
            writeln!(f, "\n### {}", section.ticker)?;
            match &section.status {
                DigestStatus::Found => {}
                DigestStatus::NotFound => {
                    writeln!(f, "- status: NOT FOUND (unknown to the market-data provider)")?
                }
                DigestStatus::Unavailable(reason) => {
                    writeln!(f, "- status: UNAVAILABLE ({reason})")?
                }
            }
            for line in &section.lines {
                match &line.value {
                    DigestValue::Value(v) => writeln!(f, "- {}: {v}", line.label)?,
                    DigestValue::Missing(reason) => {
                        writeln!(f, "- {}: UNAVAILABLE ({reason})", line.label)?
                    }
                }
            }
        }
        Ok(())
    }
}

struct Lines(Vec<DigestLine>);

impl Lines {
    fn value(&mut self, label: impl Into<String>, value: impl Into<String>) {
        self.0.push(DigestLine {
            label: label.into(),
            value: DigestValue::Value(value.into()),
        });
    }

    fn missing(&mut self, label: impl Into<String>, reason: impl Into<String>) {
        self.0.push(DigestLine {
            label: label.into(),
            value: DigestValue::Missing(reason.into()),
        });
    }

    fn optional(&mut self, label: &str, value: Option<String>) {
        match value {
            Some(v) => self.value(label, v),
            None => self.missing(label, "not reported"),
        }
    }

    /// Returns the available value, or records why it is missing.
    fn field<'a, T>(&mut self, label: &str, dp: &'a DataPoint<T>) -> Option<&'a T> {
        match dp {
            DataPoint::Available(v) => Some(v),
            DataPoint::Unavailable(reason) => {
                self.missing(label, reason.clone());
                None
            }
            DataPoint::NotRequested => {
                self.missing(label, "not fetched");
                None
            }
        }
    }
}

fn snapshot_lines(intent: Intent, profile: &IntentProfile, snap: &MarketSnapshot) -> Vec<DigestLine> {
    let mut lines = Lines(Vec::new());
    for field in &profile.fields {
        match field {
            SnapshotField::Company => company_lines(&mut lines, intent, snap),
            SnapshotField::LastTrade => {
                if let Some(trade) = lines.field("last trade price", &snap.last_trade) {
                    lines.value("last trade price", format_price(trade.price));
                    lines.optional("last trade size", trade.size.map(|s| format!("{s} shares")));
                    lines.optional("last trade time", trade.timestamp.as_ref().map(format_timestamp));
                }
            }
            SnapshotField::PreviousClose => {
                if let Some(bar) = lines.field("previous close", &snap.previous_close) {
                    let change = bar.change();
                    lines.value("previous session date", bar.date.to_string());
                    lines.value("previous close", format_price(bar.close));
                    lines.value("previous session open", format_price(bar.open));
                    lines.value("previous session high", format_price(bar.high));
                    lines.value("previous session low", format_price(bar.low));
                    lines.optional("previous session volume", bar.volume.map(format_volume));
                    lines.value(
                        "previous session change (open to close)",
                        format!(
                            "{} ({})",
                            format_signed(change.absolute),
                            format_percent(change.percent)
                        ),
                    );
                }
            }
            SnapshotField::DailyBars => bar_lines(&mut lines, profile, snap),
            SnapshotField::News => {
                if let Some(items) = lines.field("news", &snap.news) {
                    for (i, item) in items.iter().take(profile.news_limit).enumerate() {
                        let n = i + 1;
                        let source: Vec<String> = [
                            item.publisher.clone(),
                            item.published.as_ref().map(format_timestamp),
                        ]
                        .into_iter()
                        .flatten()
                        .collect();
                        let headline = if source.is_empty() {
                            item.title.clone()
                        } else {
                            format!("{} ({})", item.title, source.join(", "))
                        };
                        lines.value(format!("headline {n}"), headline);
                        lines.optional(&format!("summary {n}"), item.summary.clone());
                    }
                }
            }
        }
    }
    lines.0
}

fn company_lines(lines: &mut Lines, intent: Intent, snap: &MarketSnapshot) {
    let Some(company) = lines.field("company", &snap.company) else {
        return;
    };
    lines.value("company", company.name.clone());
    lines.optional("primary exchange", company.primary_exchange.clone());
    lines.optional("market cap", company.market_cap.map(format_market_cap));
    if intent == Intent::DeepDive {
        lines.optional(
            "description",
            company
                .description
                .as_ref()
                .map(|d| d.chars().take(DESCRIPTION_CHARS).collect()),
        );
    }
}

fn bar_lines(lines: &mut Lines, profile: &IntentProfile, snap: &MarketSnapshot) {
    let Some(bars) = lines.field("daily bars", &snap.daily_bars) else {
        return;
    };
    let Some(perf) = snap.performance() else {
        lines.missing("period performance", "no bars in the requested window");
        return;
    };
    lines.value(
        "period",
        format!("{} to {} ({} sessions)", perf.start, perf.end, perf.sessions),
    );
    lines.value("period start close", format_price(perf.start_close));
    lines.value("period end close", format_price(perf.end_close));
    lines.value(
        "period change",
        format!(
            "{} ({})",
            format_signed(perf.change.absolute),
            format_percent(perf.change.percent)
        ),
    );
    lines.value("period high", format_price(perf.high));
    lines.value("period low", format_price(perf.low));

    let skip = bars.len().saturating_sub(profile.recent_bars);
    for bar in bars.iter().skip(skip) {
        let volume = bar
            .volume
            .map(format_volume)
            .unwrap_or_else(|| "volume unavailable".to_string());
        lines.value(
            format!("bar {}", bar.date),
            format!(
                "open {} high {} low {} close {} volume {volume}",
                format_price(bar.open),
                format_price(bar.high),
                format_price(bar.low),
                format_price(bar.close),
            ),
        );
    }
}
