use serde::Serialize;

/// A snapshot field. Upstream gaps are kept as an explicit marker so that
/// nothing downstream can mistake a missing value for zero.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "value", rename_all = "snake_case")]
pub enum DataPoint<T> {
    Available(T),
    Unavailable(String),
    /// Not part of the intent's profile, so never requested.
    NotRequested,
}

impl<T> DataPoint<T> {
    pub fn unavailable(reason: impl Into<String>) -> Self {
        DataPoint::Unavailable(reason.into())
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            DataPoint::Available(v) => Some(v),
            _ => None,
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, DataPoint::Available(_))
    }

    pub fn from_option(value: Option<T>, reason: &str) -> Self {
        match value {
            Some(v) => DataPoint::Available(v),
            None => DataPoint::unavailable(reason),
        }
    }
}

impl<T> Default for DataPoint<T> {
    fn default() -> Self {
        DataPoint::NotRequested
    }
}
