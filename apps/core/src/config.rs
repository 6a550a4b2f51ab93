//! Runtime configuration read from the environment (and `.env` via `dotenv`).

use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use url::Url;
use validator::Validate;

use crate::error::AppError;

pub const DEFAULT_BASE_URL: &str = "https://api.together.xyz/v1";
pub const DEFAULT_MODEL: &str = "meta-llama/Llama-4-Maverick-17B-128E-Instruct-FP8";
const DEFAULT_TIMEOUT_SECS: u64 = 60;
const DEFAULT_REVEAL_DELAY_MS: u64 = 30;

/// How assistant replies are produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseMode {
    /// Local intent matching and templates.
    Scripted,
    /// Forward the transcript to the remote completion service.
    Remote,
}

impl FromStr for ResponseMode {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "scripted" | "local" => Ok(ResponseMode::Scripted),
            "remote" | "llm" => Ok(ResponseMode::Remote),
            other => Err(AppError::Config(format!("unknown response mode '{}'", other))),
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

/// Settings for the remote completion service.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CompletionConfig {
    /// Bearer token. Missing means every remote call fails with a config error.
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    /// Base URL of an OpenAI-compatible API.
    #[validate(url)]
    pub base_url: String,
    /// Default model identifier.
    #[validate(length(min = 1))]
    pub model: String,
    /// Per-request timeout in seconds.
    #[validate(range(min = 1, max = 600))]
    pub timeout_secs: u64,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl CompletionConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// `{base_url}/chat/completions`
    pub fn endpoint(&self) -> Result<Url, AppError> {
        let base = self.base_url.trim_end_matches('/');
        Ok(Url::parse(&format!("{}/chat/completions", base))?)
    }
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub mode: ResponseMode,
    pub completion: CompletionConfig,
    /// JSON profile path; the built-in sample is used when absent.
    pub profile_path: Option<PathBuf>,
    /// Pause between reveal frames. Zero disables the reveal.
    pub reveal_delay: Duration,
    pub log_format: LogFormat,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            mode: ResponseMode::Scripted,
            completion: CompletionConfig::default(),
            profile_path: None,
            reveal_delay: Duration::from_millis(DEFAULT_REVEAL_DELAY_MS),
            log_format: LogFormat::Pretty,
        }
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_var<T: FromStr>(key: &str) -> Result<Option<T>, AppError> {
    match non_empty_var(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| AppError::Config(format!("{} has an invalid value '{}'", key, raw))),
        None => Ok(None),
    }
}

impl AppConfig {
    /// Reads the configuration from environment variables.
    ///
    /// | Variable | Default |
    /// |---|---|
    /// | `FOLIOCHAT_MODE` | `scripted` |
    /// | `TOGETHER_API_KEY` | unset |
    /// | `COMPLETION_BASE_URL` | Together API |
    /// | `COMPLETION_MODEL` | Llama 4 Maverick |
    /// | `COMPLETION_TIMEOUT_SECS` | 60 |
    /// | `FOLIOCHAT_PROFILE` | built-in sample |
    /// | `FOLIOCHAT_REVEAL_DELAY_MS` | 30 |
    /// | `FOLIOCHAT_LOG_FORMAT` | `pretty` |
    pub fn from_env() -> Result<Self, AppError> {
        let defaults = AppConfig::default();

        let mode = match non_empty_var("FOLIOCHAT_MODE") {
            Some(raw) => raw.parse()?,
            None => defaults.mode,
        };

        let completion = CompletionConfig {
            api_key: non_empty_var("TOGETHER_API_KEY"),
            base_url: non_empty_var("COMPLETION_BASE_URL")
                .unwrap_or(defaults.completion.base_url),
            model: non_empty_var("COMPLETION_MODEL").unwrap_or(defaults.completion.model),
            timeout_secs: parse_var("COMPLETION_TIMEOUT_SECS")?
                .unwrap_or(defaults.completion.timeout_secs),
        };

        let reveal_delay = parse_var::<u64>("FOLIOCHAT_REVEAL_DELAY_MS")?
            .map(Duration::from_millis)
            .unwrap_or(defaults.reveal_delay);

        let log_format = match non_empty_var("FOLIOCHAT_LOG_FORMAT").as_deref() {
            Some("json") => LogFormat::Json,
            _ => LogFormat::Pretty,
        };

        let config = AppConfig {
            mode,
            completion,
            profile_path: non_empty_var("FOLIOCHAT_PROFILE").map(PathBuf::from),
            reveal_delay,
            log_format,
        };
        config.validate()?;
        Ok(config)
    }

    /// Checks the completion settings. A missing API key is not an error here;
    /// it surfaces per turn so the conversation stays usable.
    pub fn validate(&self) -> Result<(), AppError> {
        self.completion.validate()?;
        self.completion.endpoint()?;
        Ok(())
    }
}
