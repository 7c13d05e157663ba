use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    PriceLookup,
    DeepDive,
    Comparison,
    News,
}

impl Intent {
    /// Human-readable label used in report titles.
    pub fn label(&self) -> &'static str {
        match self {
            Intent::PriceLookup => "Price Check",
            Intent::DeepDive => "Deep Dive",
            Intent::Comparison => "Comparison",
            Intent::News => "News Brief",
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Intent::PriceLookup => write!(f, "price_lookup"),
            Intent::DeepDive => write!(f, "deep_dive"),
            Intent::Comparison => write!(f, "comparison"),
            Intent::News => write!(f, "news"),
        }
    }
}
