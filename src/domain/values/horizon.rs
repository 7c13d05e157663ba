use serde::Serialize;

/// Longest lookback a query may ask for.
pub const MAX_HORIZON_DAYS: u32 = 5 * 365;

/// A lookback window stated in the query ("over the last year").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Horizon {
    days: u32,
}

impl Horizon {
    pub fn days(days: u32) -> Self {
        Self {
            days: days.clamp(1, MAX_HORIZON_DAYS),
        }
    }

    pub fn from_unit(count: u32, unit: &str) -> Option<Self> {
        let per_unit = match unit.trim_end_matches('s') {
            "day" => 1,
            "week" => 7,
            "month" => 30,
            "quarter" => 91,
            "year" => 365,
            _ => return None,
        };
        Some(Self::days(count.max(1).saturating_mul(per_unit)))
    }

    pub fn as_days(&self) -> u32 {
        self.days
    }
}
