use crate::domain::values::intent::Intent;
use crate::domain::values::ticker::TickerSet;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

pub const DISCLAIMER: &str = "*Not financial advice. For informational purposes only.*";

#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub id: String,
    pub title: String,
    pub generated_at: DateTime<Utc>,
    pub intent: Intent,
    pub tickers: TickerSet,
    pub body: String,
    /// Why the language model was not used, when it wasn't.
    pub degraded: Option<String>,
}

impl Report {
    pub fn new(intent: Intent, tickers: TickerSet, body: String, degraded: Option<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            title: title_for(intent, &tickers),
            generated_at: Utc::now(),
            intent,
            tickers,
            body,
            degraded,
        }
    }

    pub fn is_degraded(&self) -> bool {
        self.degraded.is_some()
    }

    /// Header used when the report is persisted.
    pub fn header(&self) -> String {
        format!(
            "# {}\n\nGenerated: {}\n\n",
            self.title,
            self.generated_at.to_rfc3339_opts(SecondsFormat::Secs, true)
        )
    }

    pub fn to_markdown(&self) -> String {
        format!("{}{}", self.header(), self.body)
    }
}

fn title_for(intent: Intent, tickers: &TickerSet) -> String {
    let subject = match intent {
        Intent::Comparison => tickers.join(" vs "),
        _ => tickers.join(", "),
    };
    if subject.is_empty() {
        intent.label().to_string()
    } else {
        format!("{subject} {}", intent.label())
    }
}
