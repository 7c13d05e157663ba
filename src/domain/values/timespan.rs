use std::fmt;

/// Days of lookback above which weekly bars replace daily ones.
const WEEKLY_ABOVE_DAYS: u32 = 365;

/// Bar width requested from the aggregates endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Timespan {
    Day,
    Week,
}

impl Timespan {
    /// Daily bars up to a year back, weekly bars beyond that.
    pub fn for_lookback(days: u32) -> Self {
        if days > WEEKLY_ABOVE_DAYS {
            Timespan::Week
        } else {
            Timespan::Day
        }
    }
}

impl fmt::Display for Timespan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Timespan::Day => write!(f, "day"),
            Timespan::Week => write!(f, "week"),
        }
    }
}
