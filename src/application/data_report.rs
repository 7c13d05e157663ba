//! Plain markdown rendering of fetched snapshots, used when the language
//! model is unavailable.

use crate::application::format::{
    format_market_cap, format_percent, format_price, format_signed, format_timestamp,
    format_volume,
};
use crate::domain::entities::report::DISCLAIMER;
use crate::domain::entities::snapshot::{MarketSnapshot, TickerSnapshot};
use crate::domain::values::data_point::DataPoint;
use crate::domain::values::intent_profile::IntentProfile;
use crate::domain::values::ticker::TickerSet;
use std::fmt;

pub fn render(
    tickers: &TickerSet,
    snapshots: &[TickerSnapshot],
    profile: &IntentProfile,
    note: Option<&str>,
) -> String {
    DataReport {
        tickers,
        snapshots,
        profile,
        note,
    }
    .to_string()
}

struct DataReport<'a> {
    tickers: &'a TickerSet,
    snapshots: &'a [TickerSnapshot],
    profile: &'a IntentProfile,
    note: Option<&'a str>,
}

impl fmt::Display for DataReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(note) = self.note {
            writeln!(f, "> {note}\n")?;
        }
        for ticker in self.tickers {
            writeln!(f, "## {ticker}\n")?;
            match self.snapshots.iter().find(|s| s.ticker() == ticker) {
                Some(TickerSnapshot::Found(snap)) => write_snapshot(f, snap, self.profile)?,
                Some(TickerSnapshot::NotFound { .. }) => writeln!(f, "Ticker not found.\n")?,
                Some(TickerSnapshot::Unavailable { reason, .. }) => {
                    writeln!(f, "Market data unavailable: {reason}.\n")?
                }
                None => writeln!(f, "Market data unavailable: no data fetched.\n")?,
            }
        }
        write!(f, "---\n{DISCLAIMER}")
    }
}

fn unavailable<T>(dp: &DataPoint<T>) -> Option<&str> {
    match dp {
        DataPoint::Unavailable(reason) => Some(reason.as_str()),
        _ => None,
    }
}

fn or_unavailable(value: Option<String>) -> String {
    value.unwrap_or_else(|| "unavailable".to_string())
}

fn write_snapshot(
    f: &mut fmt::Formatter<'_>,
    snap: &MarketSnapshot,
    profile: &IntentProfile,
) -> fmt::Result {
    if let Some(c) = snap.company.value() {
        writeln!(f, "**Company:** {}", c.name)?;
        writeln!(f, "**Market:** {}", or_unavailable(c.market.as_ref().map(|m| m.to_uppercase())))?;
        writeln!(f, "**Type:** {}", or_unavailable(c.kind.clone()))?;
        writeln!(f, "**Currency:** {}", or_unavailable(c.currency.clone()))?;
        writeln!(f, "**Market Cap:** {}\n", or_unavailable(c.market_cap.map(format_market_cap)))?;
    } else if let Some(reason) = unavailable(&snap.company) {
        writeln!(f, "**Company:** unavailable ({reason})\n")?;
    }

    if let Some(t) = snap.last_trade.value() {
        writeln!(f, "**Last Trade:** {}", format_price(t.price))?;
        writeln!(
            f,
            "- Size: {}",
            or_unavailable(t.size.map(|s| format!("{} shares", format_volume(s))))
        )?;
        writeln!(f, "- Time: {}\n", or_unavailable(t.timestamp.as_ref().map(format_timestamp)))?;
    } else if let Some(reason) = unavailable(&snap.last_trade) {
        writeln!(f, "**Last Trade:** unavailable ({reason})")?;
        if let Some(price) = snap.reference_price() {
            writeln!(f, "**Latest Close:** {}", format_price(price))?;
        }
        writeln!(f)?;
    }

    if let Some(bar) = snap.previous_close.value() {
        let change = bar.change();
        writeln!(f, "**Previous Close ({}):**", bar.date)?;
        writeln!(f, "- Close: {}", format_price(bar.close))?;
        writeln!(f, "- Open: {}", format_price(bar.open))?;
        writeln!(f, "- High: {}", format_price(bar.high))?;
        writeln!(f, "- Low: {}", format_price(bar.low))?;
        writeln!(
            f,
            "- Volume: {}",
            or_unavailable(bar.volume.map(|v| format!("{} shares", format_volume(v))))
        )?;
        writeln!(
            f,
            "- Daily Change: {} ({})\n",
            format_signed(change.absolute),
            format_percent(change.percent)
        )?;
    } else if let Some(reason) = unavailable(&snap.previous_close) {
        writeln!(f, "**Previous Close:** unavailable ({reason})\n")?;
    }

    if let Some(perf) = snap.performance() {
        writeln!(f, "**Performance {} to {}:**", perf.start, perf.end)?;
        writeln!(
            f,
            "- Close: {} → {} ({})",
            format_price(perf.start_close),
            format_price(perf.end_close),
            format_percent(perf.change.percent)
        )?;
        writeln!(f, "- Range: {} – {}", format_price(perf.low), format_price(perf.high))?;
        writeln!(f, "- Sessions: {}\n", perf.sessions)?;
    } else if let Some(reason) = unavailable(&snap.daily_bars) {
        writeln!(f, "**Performance:** unavailable ({reason})\n")?;
    }

    if let Some(items) = snap.news.value() {
        writeln!(f, "**Recent News:**")?;
        for item in items.iter().take(profile.news_limit) {
            let when = or_unavailable(item.published.as_ref().map(format_timestamp));
            match &item.url {
                Some(url) => writeln!(f, "- [{}]({url}) - {when}", item.title)?,
                None => writeln!(f, "- {} - {when}", item.title)?,
            }
        }
        writeln!(f)?;
    } else if let Some(reason) = unavailable(&snap.news) {
        writeln!(f, "**Recent News:** unavailable ({reason})\n")?;
    }
    Ok(())
}
