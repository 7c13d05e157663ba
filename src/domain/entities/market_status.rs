use serde::Serialize;
use std::collections::BTreeMap;

/// Current trading session as reported by the market-data provider.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarketStatus {
    pub market: String,
    pub server_time: Option<String>,
    pub early_hours: Option<bool>,
    pub after_hours: Option<bool>,
    /// Exchange name → "open" / "closed" / "extended-hours".
    pub exchanges: BTreeMap<String, String>,
}
