use serde::{Deserialize, Serialize};
use std::fmt;

/// An uppercase symbol of 1–5 ASCII letters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Ticker(String);

impl Ticker {
    pub fn new(value: &str) -> Result<Self, String> {
        let value = value.trim().trim_start_matches('$').to_uppercase();
        if value.is_empty() || value.len() > 5 || !value.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(format!(
                "Ticker must be 1-5 letters, got {value:?}"
            ));
        }
        Ok(Ticker(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Ticker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Ticker {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Ticker::new(&value)
    }
}

impl From<Ticker> for String {
    fn from(ticker: Ticker) -> Self {
        ticker.0
    }
}

/// Ordered, duplicate-free tickers in first-seen order. Empty means
/// "no ticker found".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickerSet(Vec<Ticker>);

impl TickerSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends unless already present. Returns whether it was added.
    pub fn push(&mut self, ticker: Ticker) -> bool {
        if self.0.contains(&ticker) {
            return false;
        }
        self.0.push(ticker);
        true
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Ticker> {
        self.0.iter()
    }

    pub fn as_strs(&self) -> Vec<&str> {
        self.0.iter().map(Ticker::as_str).collect()
    }

    pub fn join(&self, sep: &str) -> String {
        self.as_strs().join(sep)
    }
}

impl FromIterator<Ticker> for TickerSet {
    fn from_iter<I: IntoIterator<Item = Ticker>>(iter: I) -> Self {
        let mut set = TickerSet::new();
        for ticker in iter {
            set.push(ticker);
        }
        set
    }
}

impl<'a> IntoIterator for &'a TickerSet {
    type Item = &'a Ticker;
    type IntoIter = std::slice::Iter<'a, Ticker>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ticker_normalizes() {
        assert_eq!(Ticker::new("$aapl").unwrap().as_str(), "AAPL");
        assert!(Ticker::new("TOOLONG").is_err());
        assert!(Ticker::new("BRK.B").is_err());
        assert!(Ticker::new("").is_err());
    }

    #[test]
    fn test_set_dedupes_in_order() {
        let set: TickerSet = ["TSLA", "NVDA", "TSLA"]
            .iter()
            .map(|t| Ticker::new(t).unwrap())
            .collect();
        assert_eq!(set.as_strs(), vec!["TSLA", "NVDA"]);
        assert_eq!(set.join("-"), "TSLA-NVDA");
    }
}
