//! Static vocabulary used to validate and interpret queries.
//!
//! A `Lexicon` is built once at startup and shared read-only by the
//! validator and the interpreter.

use crate::domain::values::ticker::{Ticker, TickerSet};
use regex::Regex;
use std::collections::HashSet;

/// Uppercase 1–5 letter tokens, optionally written as a `$` cashtag.
const TICKER_PATTERN: &str = r"(\$)?\b([A-Z]{1,5})\b";

const COMPANIES: &[(&str, &str)] = &[
    ("apple", "AAPL"),
    ("microsoft", "MSFT"),
    ("google", "GOOGL"),
    ("alphabet", "GOOGL"),
    ("amazon", "AMZN"),
    ("tesla", "TSLA"),
    ("meta", "META"),
    ("facebook", "META"),
    ("nvidia", "NVDA"),
    ("netflix", "NFLX"),
    ("disney", "DIS"),
    ("walmart", "WMT"),
    ("coca cola", "KO"),
    ("coca-cola", "KO"),
    ("pepsi", "PEP"),
    ("pepsico", "PEP"),
    ("johnson & johnson", "JNJ"),
    ("visa", "V"),
    ("mastercard", "MA"),
    ("intel", "INTC"),
    ("amd", "AMD"),
    ("ibm", "IBM"),
    ("oracle", "ORCL"),
    ("salesforce", "CRM"),
    ("adobe", "ADBE"),
    ("uber", "UBER"),
    ("lyft", "LYFT"),
    ("airbnb", "ABNB"),
    ("spotify", "SPOT"),
    ("snapchat", "SNAP"),
    ("pinterest", "PINS"),
    ("paypal", "PYPL"),
    ("coinbase", "COIN"),
    ("robinhood", "HOOD"),
    ("jpmorgan", "JPM"),
    ("goldman sachs", "GS"),
    ("boeing", "BA"),
    ("exxon", "XOM"),
    ("chevron", "CVX"),
    ("costco", "COST"),
    ("starbucks", "SBUX"),
    ("mcdonald's", "MCD"),
    ("mcdonalds", "MCD"),
    ("nike", "NKE"),
    ("palantir", "PLTR"),
    ("broadcom", "AVGO"),
    ("qualcomm", "QCOM"),
    ("general motors", "GM"),
];

const FINANCE_KEYWORDS: &[&str] = &[
    "stock", "stocks", "share", "shares", "price", "prices", "priced", "market", "markets",
    "compare", "comparison", "ticker", "tickers", "symbol", "trading", "trade", "trades",
    "traded", "invest", "investing", "investment", "investor", "investors", "earnings",
    "dividend", "dividends", "revenue", "valuation", "market cap", "portfolio", "equity",
    "equities", "quote", "quotes", "nasdaq", "nyse", "s&p", "dow jones", "ipo", "etf",
    "bull", "bullish", "bear", "bearish", "rally", "sell-off", "selloff", "volatility",
    "52-week", "financial", "finance", "analyst", "analysts", "eps", "p/e", "closing price",
    "fundamentals", "short interest", "options", "wall street",
];

const COMPARISON_KEYWORDS: &[&str] = &[
    "compare", "comparison", "comparing", "versus", "vs", "against", "relative to",
    "better than", "outperform", "outperformed", "head to head",
];

const NEWS_KEYWORDS: &[&str] = &[
    "news", "headline", "headlines", "article", "articles", "announcement",
    "announcements", "press release", "happening",
];

const DEEP_DIVE_KEYWORDS: &[&str] = &[
    "deep dive", "deep-dive", "analysis", "analyze", "analyse", "breakdown", "performance",
    "trend", "trends", "history", "historical", "over the last", "fundamentals", "overview",
    "outlook", "report", "details", "information", "info",
];

/// All-caps words that look like tickers but almost never are.
const STOP_WORDS: &[&str] = &[
    "I", "A", "AI", "AM", "PM", "AN", "AND", "ARE", "AS", "AT", "BE", "BUT", "BY", "CAN",
    "CEO", "CFO", "CTO", "DD", "DO", "EPS", "ETF", "EU", "EUR", "FAQ", "FED", "FOR", "GDP",
    "GET", "HOW", "IF", "IN", "IPO", "IS", "IT", "ME", "MY", "NO", "NOT", "NOW", "OF", "OK",
    "ON", "OR", "PE", "SEC", "SHOW", "SO", "THE", "TO", "TV", "UK", "UP", "US", "USA", "USD",
    "UTC", "VS", "WE", "WHAT", "WHEN", "WHO", "WHY", "YES", "YOU", "YOY", "YTD", "QOQ", "ATH",
    "EST", "API", "PLEASE", "TELL", "GIVE", "LATEST", "TODAY",
    // Trading vocabulary. Symbols that collide ($LOW, $ALL) need a cashtag.
    "BUY", "SELL", "HOLD", "LONG", "SHORT", "CALL", "CALLS", "PUT", "PUTS", "GOOD", "BAD",
    "BEST", "WORST", "NEW", "OLD", "HIGH", "LOW", "TOP", "BIG", "HOT", "RISK", "SAFE", "CHEAP",
    "ALL", "ANY", "NEXT", "LAST", "DAY", "WEEK", "YEAR", "MONTH", "WHICH", "SHOULD", "WILL",
    "BUYS", "DIP", "MOON", "HODL", "YOLO", "ATM", "OTM", "ITM",
];

#[derive(Debug)]
pub struct Lexicon {
    companies: Vec<(String, Ticker)>,
    finance_keywords: Vec<String>,
    comparison_keywords: Vec<String>,
    news_keywords: Vec<String>,
    deep_dive_keywords: Vec<String>,
    stop_words: HashSet<String>,
    ticker_pattern: Regex,
}

impl Lexicon {
    /// The built-in vocabulary.
    pub fn builtin() -> Self {
        let companies = COMPANIES
            .iter()
            .filter_map(|(name, symbol)| Ticker::new(symbol).ok().map(|t| (name.to_string(), t)))
            .collect();
        Self::new(
            companies,
            to_owned(FINANCE_KEYWORDS),
            to_owned(COMPARISON_KEYWORDS),
            to_owned(NEWS_KEYWORDS),
            to_owned(DEEP_DIVE_KEYWORDS),
            to_owned(STOP_WORDS),
        )
    }

    pub fn new(
        companies: Vec<(String, Ticker)>,
        finance_keywords: Vec<String>,
        comparison_keywords: Vec<String>,
        news_keywords: Vec<String>,
        deep_dive_keywords: Vec<String>,
        stop_words: Vec<String>,
    ) -> Self {
        let lower = |v: Vec<String>| v.into_iter().map(|s| s.to_ascii_lowercase()).collect();
        Self {
            companies: companies
                .into_iter()
                .map(|(name, t)| (name.to_ascii_lowercase(), t))
                .collect(),
            finance_keywords: lower(finance_keywords),
            comparison_keywords: lower(comparison_keywords),
            news_keywords: lower(news_keywords),
            deep_dive_keywords: lower(deep_dive_keywords),
            stop_words: stop_words.into_iter().map(|s| s.to_ascii_uppercase()).collect(),
            ticker_pattern: Regex::new(TICKER_PATTERN).expect("ticker pattern is valid"),
        }
    }

    /// Tickers mentioned in `text`, in order of first appearance.
    ///
    /// Symbols must be written in capitals in the source text (or as a `$`
    /// cashtag); company names match case-insensitively on word boundaries.
    pub fn find_tickers(&self, text: &str) -> TickerSet {
        let lower = text.to_ascii_lowercase();
        let mut hits: Vec<(usize, Ticker)> = Vec::new();

        for caps in self.ticker_pattern.captures_iter(text) {
            let (Some(whole), Some(symbol)) = (caps.get(0), caps.get(2)) else {
                continue;
            };
            let cashtag = caps.get(1).is_some();
            let symbol = symbol.as_str();
            if !cashtag && !self.looks_like_bare_ticker(symbol) {
                continue;
            }
            if let Ok(ticker) = Ticker::new(symbol) {
                hits.push((whole.start(), ticker));
            }
        }

        for (name, ticker) in &self.companies {
            if let Some(pos) = find_phrase(&lower, name) {
                hits.push((pos, ticker.clone()));
            }
        }

        hits.sort_by_key(|(pos, _)| *pos);
        hits.into_iter().map(|(_, t)| t).collect()
    }

    fn looks_like_bare_ticker(&self, symbol: &str) -> bool {
        if symbol.len() < 2 || self.stop_words.contains(symbol) {
            return false;
        }
        // Shouted vocabulary ("PRICE", "APPLE") is not a symbol.
        let lower = symbol.to_ascii_lowercase();
        let is_word = |list: &[String]| list.iter().any(|w| *w == lower);
        !(self.companies.iter().any(|(name, _)| *name == lower)
            || is_word(&self.finance_keywords)
            || is_word(&self.comparison_keywords)
            || is_word(&self.news_keywords)
            || is_word(&self.deep_dive_keywords))
    }

    pub fn has_finance_keyword(&self, text: &str) -> bool {
        mentions_any(&text.to_ascii_lowercase(), &self.finance_keywords)
    }

    pub fn mentions_company(&self, text: &str) -> bool {
        let lower = text.to_ascii_lowercase();
        self.companies
            .iter()
            .any(|(name, _)| find_phrase(&lower, name).is_some())
    }

    pub fn is_comparison(&self, text: &str) -> bool {
        mentions_any(&text.to_ascii_lowercase(), &self.comparison_keywords)
    }

    pub fn is_news(&self, text: &str) -> bool {
        mentions_any(&text.to_ascii_lowercase(), &self.news_keywords)
    }

    pub fn is_deep_dive(&self, text: &str) -> bool {
        mentions_any(&text.to_ascii_lowercase(), &self.deep_dive_keywords)
    }
}

impl Default for Lexicon {
    fn default() -> Self {
        Self::builtin()
    }
}

fn to_owned(words: &[&str]) -> Vec<String> {
    words.iter().map(|w| w.to_string()).collect()
}

fn mentions_any(lower_text: &str, phrases: &[String]) -> bool {
    phrases.iter().any(|p| find_phrase(lower_text, p).is_some())
}

/// Byte offset of the first occurrence of `phrase` bounded by
/// non-alphanumeric characters (or the ends of `haystack`).
pub(crate) fn find_phrase(haystack: &str, phrase: &str) -> Option<usize> {
    if phrase.is_empty() {
        return None;
    }
    let step = phrase.chars().next().map_or(1, char::len_utf8);
    let mut start = 0;
    while let Some(offset) = haystack[start..].find(phrase) {
        let pos = start + offset;
        let end = pos + phrase.len();
        let before_ok = haystack[..pos]
            .chars()
            .next_back()
            .map_or(true, |c| !c.is_alphanumeric());
        let after_ok = haystack[end..]
            .chars()
            .next()
            .map_or(true, |c| !c.is_alphanumeric());
        if before_ok && after_ok {
            return Some(pos);
        }
        start = pos + step;
    }
    None
}
