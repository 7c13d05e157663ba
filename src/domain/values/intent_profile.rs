//! Which snapshot fields each intent needs.
//!
//! Kept as data rather than branching logic: changing what a comparison
//! fetches means editing a table entry, not the fetch pipeline.

use crate::domain::values::intent::Intent;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SnapshotField {
    Company,
    LastTrade,
    PreviousClose,
    DailyBars,
    News,
}

impl fmt::Display for SnapshotField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SnapshotField::Company => write!(f, "company"),
            SnapshotField::LastTrade => write!(f, "last_trade"),
            SnapshotField::PreviousClose => write!(f, "previous_close"),
            SnapshotField::DailyBars => write!(f, "daily_bars"),
            SnapshotField::News => write!(f, "news"),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct IntentProfile {
    pub fields: Vec<SnapshotField>,
    /// Calendar days of daily bars to request.
    pub bar_lookback_days: u32,
    /// Most recent bars listed individually in the digest.
    pub recent_bars: usize,
    pub news_limit: usize,
}

impl IntentProfile {
    pub fn wants(&self, field: SnapshotField) -> bool {
        self.fields.contains(&field)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct IntentProfiles {
    pub price_lookup: IntentProfile,
    pub deep_dive: IntentProfile,
    pub comparison: IntentProfile,
    pub news: IntentProfile,
}

impl IntentProfiles {
    pub fn for_intent(&self, intent: Intent) -> &IntentProfile {
        match intent {
            Intent::PriceLookup => &self.price_lookup,
            Intent::DeepDive => &self.deep_dive,
            Intent::Comparison => &self.comparison,
            Intent::News => &self.news,
        }
    }
}

impl Default for IntentProfiles {
    fn default() -> Self {
        use SnapshotField::*;
        Self {
            price_lookup: IntentProfile {
                fields: vec![Company, LastTrade, PreviousClose],
                bar_lookback_days: 0,
                recent_bars: 0,
                news_limit: 0,
            },
            deep_dive: IntentProfile {
                fields: vec![Company, LastTrade, PreviousClose, DailyBars, News],
                bar_lookback_days: 90,
                recent_bars: 5,
                news_limit: 3,
            },
            comparison: IntentProfile {
                fields: vec![Company, PreviousClose, DailyBars],
                bar_lookback_days: 30,
                recent_bars: 0,
                news_limit: 0,
            },
            news: IntentProfile {
                fields: vec![Company, News],
                bar_lookback_days: 0,
                recent_bars: 0,
                news_limit: 3,
            },
        }
    }
}
