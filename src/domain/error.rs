use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("{0}")]
    Rejected(#[from] RejectionReason),

    #[error("Please mention a stock ticker (e.g., AAPL, MSFT, GOOGL) or a company name in your query.")]
    TickerNotFound,

    #[error("Market data error: {0}")]
    Api(#[from] ApiError),

    #[error("Synthesis failed: {0}")]
    Synthesis(#[from] SynthesisFailure),

    #[error("Could not write report to {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Why a query was turned away before any network call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RejectionReason {
    #[error("Please enter a question.")]
    EmptyQuery,

    #[error(
        "This query doesn't appear to be finance-related. \
         Please ask about stocks, market data, or financial analysis."
    )]
    NotFinanceRelated,
}

/// Failure of a single market-data request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("not found: {message}")]
    NotFound { message: String },

    #[error("rate limited: {message}")]
    RateLimited { message: String },

    /// Endpoint not included in the API plan, or a bad key.
    #[error("not authorized ({status}): {message}")]
    Unauthorized { status: u16, message: String },

    #[error("service error ({status}): {message}")]
    Service { status: u16, message: String },

    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("unexpected response body: {0}")]
    Decode(String),
}

impl ApiError {
    /// Classify a non-2xx status the way callers need to see it.
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        match status {
            404 => ApiError::NotFound { message },
            429 => ApiError::RateLimited { message },
            401 | 403 => ApiError::Unauthorized { status, message },
            _ => ApiError::Service { status, message },
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::NotFound { .. } => Some(404),
            ApiError::RateLimited { .. } => Some(429),
            ApiError::Unauthorized { status, .. } | ApiError::Service { status, .. } => {
                Some(*status)
            }
            ApiError::Timeout(_) | ApiError::Transport(_) | ApiError::Decode(_) => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::NotFound { .. })
    }

    /// Short reason used when a snapshot field is marked unavailable.
    pub fn unavailable_reason(&self) -> String {
        match self {
            ApiError::NotFound { .. } => "no data returned".to_string(),
            ApiError::RateLimited { .. } => "rate limited by the data provider".to_string(),
            ApiError::Unauthorized { .. } => "not included in the market-data plan".to_string(),
            ApiError::Service { status, .. } => format!("service error (HTTP {status})"),
            ApiError::Timeout(_) => "request timed out".to_string(),
            ApiError::Transport(_) => "service unavailable".to_string(),
            ApiError::Decode(_) => "unreadable response".to_string(),
        }
    }
}

/// Failure of the language-model call. Never surfaced to the user; the
/// synthesizer falls back to a raw data report instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SynthesisFailure {
    #[error("language model timed out after {0:?}")]
    Timeout(Duration),

    #[error("language model error: {0}")]
    Upstream(String),

    #[error("language model returned an empty completion")]
    EmptyCompletion,

    #[error("language model unavailable: {0}")]
    Unavailable(String),
}
