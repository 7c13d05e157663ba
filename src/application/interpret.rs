use crate::domain::entities::query::Query;
use crate::domain::values::horizon::Horizon;
use crate::domain::values::intent::Intent;
use crate::domain::values::lexicon::{find_phrase, Lexicon};
use crate::domain::values::ticker::TickerSet;
use chrono::{Datelike, Utc};
use regex::Regex;
use serde::Serialize;
use std::sync::Arc;

const HORIZON_PATTERN: &str =
    r"\b(?:last|past|previous|this|over)\s+(?:(\d{1,3})\s+)?(day|week|month|quarter|year)s?\b";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Interpretation {
    pub intent: Intent,
    pub tickers: TickerSet,
    pub horizon: Option<Horizon>,
}

pub struct QueryInterpreter {
    lexicon: Arc<Lexicon>,
    horizon_pattern: Regex,
}

impl QueryInterpreter {
    pub fn new(lexicon: Arc<Lexicon>) -> Self {
        Self {
            lexicon,
            horizon_pattern: Regex::new(HORIZON_PATTERN).expect("horizon pattern is valid"),
        }
    }

    /// Never fails: an empty ticker set is reported by the caller.
    pub fn interpret(&self, query: &Query) -> Interpretation {
        let text = query.text();
        let tickers = self.lexicon.find_tickers(text);
        let intent = self.classify(text, &tickers);
        let horizon = self.horizon(text);
        Interpretation {
            intent,
            tickers,
            horizon,
        }
    }

    /// Priority: comparison > news > deep_dive > price_lookup. Two or more
    /// tickers always mean comparison.
    fn classify(&self, text: &str, tickers: &TickerSet) -> Intent {
        if tickers.is_empty() {
            return Intent::PriceLookup;
        }
        if tickers.len() >= 2 || self.lexicon.is_comparison(text) {
            Intent::Comparison
        } else if self.lexicon.is_news(text) {
            Intent::News
        } else if self.lexicon.is_deep_dive(text) {
            Intent::DeepDive
        } else {
            Intent::PriceLookup
        }
    }

    fn horizon(&self, text: &str) -> Option<Horizon> {
        let lower = text.to_ascii_lowercase();
        if find_phrase(&lower, "year to date").is_some() || find_phrase(&lower, "ytd").is_some() {
            return Some(Horizon::days(Utc::now().ordinal()));
        }
        let caps = self.horizon_pattern.captures(&lower)?;
        let count = caps
            .get(1)
            .and_then(|m| m.as_str().parse::<u32>().ok())
            .unwrap_or(1);
        Horizon::from_unit(count, caps.get(2)?.as_str())
    }
}
