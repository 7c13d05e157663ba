//! Environment-driven configuration.
//!
//! Credentials are checked once, at startup. A missing key is a
//! configuration error, never a per-request failure.

use crate::domain::error::DomainError;
use crate::domain::ports::language_model::CompletionOptions;
use crate::domain::values::intent_profile::IntentProfiles;
use crate::domain::values::lexicon::Lexicon;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

pub const POLYGON_API_KEY: &str = "POLYGON_API_KEY";
pub const OPENAI_API_KEY: &str = "OPENAI_API_KEY";

#[derive(Clone)]
pub struct Credentials {
    pub polygon_api_key: String,
    /// `None` in offline (data-only) mode.
    pub openai_api_key: Option<String>,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("polygon_api_key", &"***")
            .field("openai_api_key", &self.openai_api_key.as_ref().map(|_| "***"))
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub polygon_base_url: Option<String>,
    pub openai_base_url: Option<String>,
    pub completion: CompletionOptions,
    /// Bound on each market-data request.
    pub fetch_timeout: Duration,
    /// Bound on the language-model call.
    pub synthesis_timeout: Duration,
    pub output_dir: PathBuf,
    pub lexicon: Arc<Lexicon>,
    pub profiles: Arc<IntentProfiles>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            polygon_base_url: None,
            openai_base_url: None,
            completion: CompletionOptions::default(),
            fetch_timeout: Duration::from_secs(10),
            synthesis_timeout: Duration::from_secs(60),
            output_dir: PathBuf::from("reports"),
            lexicon: Arc::new(Lexicon::builtin()),
            profiles: Arc::new(IntentProfiles::default()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub credentials: Credentials,
    pub settings: Settings,
}

impl AppConfig {
    pub fn from_env(offline: bool) -> Result<Self, DomainError> {
        Self::from_lookup(offline, |name| std::env::var(name).ok())
    }

    /// Same as [`AppConfig::from_env`], reading variables through `lookup`.
    pub fn from_lookup(
        offline: bool,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, DomainError> {
        let var = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let required = |name: &str| {
            var(name).ok_or_else(|| DomainError::Config(format!("{name} is not set")))
        };

        let credentials = Credentials {
            polygon_api_key: required(POLYGON_API_KEY)?,
            openai_api_key: if offline {
                None
            } else {
                Some(required(OPENAI_API_KEY)?)
            },
        };

        let defaults = Settings::default();
        let settings = Settings {
            polygon_base_url: var("POLYGON_BASE_URL"),
            openai_base_url: var("OPENAI_BASE_URL"),
            completion: CompletionOptions {
                model: var("OPENAI_MODEL").unwrap_or(defaults.completion.model),
                temperature: parse_or("OPENAI_TEMPERATURE", var("OPENAI_TEMPERATURE"), defaults.completion.temperature)?,
                max_tokens: parse_or("OPENAI_MAX_TOKENS", var("OPENAI_MAX_TOKENS"), defaults.completion.max_tokens)?,
            },
            fetch_timeout: secs_or(
                "MARKETBRIEF_FETCH_TIMEOUT_SECS",
                var("MARKETBRIEF_FETCH_TIMEOUT_SECS"),
                defaults.fetch_timeout,
            )?,
            synthesis_timeout: secs_or(
                "MARKETBRIEF_LLM_TIMEOUT_SECS",
                var("MARKETBRIEF_LLM_TIMEOUT_SECS"),
                defaults.synthesis_timeout,
            )?,
            output_dir: var("MARKETBRIEF_REPORTS_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.output_dir),
            lexicon: defaults.lexicon,
            profiles: defaults.profiles,
        };

        Ok(Self {
            credentials,
            settings,
        })
    }
}

fn parse_or<T: FromStr>(name: &str, raw: Option<String>, default: T) -> Result<T, DomainError> {
    match raw {
        None => Ok(default),
        Some(raw) => raw
            .parse()
            .map_err(|_| DomainError::Config(format!("{name} has an invalid value: {raw:?}"))),
    }
}

fn secs_or(name: &str, raw: Option<String>, default: Duration) -> Result<Duration, DomainError> {
    let secs = parse_or(name, raw, default.as_secs())?;
    if secs == 0 {
        return Err(DomainError::Config(format!("{name} must be at least 1")));
    }
    Ok(Duration::from_secs(secs))
}
