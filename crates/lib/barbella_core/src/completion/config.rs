//! Completion client configuration.
//!
//! Resolved from environment variables with defaults. The API key is not
//! part of this struct: it is looked up on every request by the caller.

use std::env;
use std::time::Duration;

use url::Url;

use super::CompletionError;

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_MODEL: &str = "gemini-pro";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Endpoint, model and timeout for the completion client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionConfig {
    /// Provider API root, e.g. `https://generativelanguage.googleapis.com`.
    pub base_url: Url,
    /// Model name, e.g. `gemini-pro`.
    pub model: String,
    /// Upper bound on one provider call, connect through body.
    pub timeout: Duration,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_BASE_URL).expect("default base URL is valid"),
            model: DEFAULT_MODEL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl CompletionConfig {
    /// Reads configuration from environment variables.
    ///
    /// | Variable              | Default                                     |
    /// |-----------------------|---------------------------------------------|
    /// | `GEMINI_BASE_URL`     | `https://generativelanguage.googleapis.com` |
    /// | `GEMINI_MODEL`        | `gemini-pro`                                |
    /// | `GEMINI_TIMEOUT_SECS` | `30`                                        |
    pub fn from_env() -> Result<Self, CompletionError> {
        let defaults = Self::default();

        let base_url = match env::var("GEMINI_BASE_URL") {
            Ok(raw) => Url::parse(&raw).map_err(|e| {
                CompletionError::Config(format!("GEMINI_BASE_URL is not a valid URL: {e}"))
            })?,
            Err(_) => defaults.base_url,
        };

        let timeout = match env::var("GEMINI_TIMEOUT_SECS") {
            Ok(raw) => parse_timeout_secs(&raw)?,
            Err(_) => defaults.timeout,
        };

        Ok(Self {
            base_url,
            model: env::var("GEMINI_MODEL").unwrap_or(defaults.model),
            timeout,
        })
    }

    /// Full `generateContent` endpoint for the configured model.
    pub fn generate_content_url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url.as_str().trim_end_matches('/'),
            self.model
        )
    }
}

/// Provider timeout of `secs` seconds. Zero is rejected.
pub fn timeout_from_secs(secs: u64) -> Result<Duration, CompletionError> {
    if secs == 0 {
        return Err(CompletionError::Config(
            "timeout must be a positive number of seconds".into(),
        ));
    }
    Ok(Duration::from_secs(secs))
}

fn parse_timeout_secs(raw: &str) -> Result<Duration, CompletionError> {
    raw.trim()
        .parse::<u64>()
        .ok()
        .and_then(|secs| timeout_from_secs(secs).ok())
        .ok_or_else(|| {
            CompletionError::Config(format!(
                "GEMINI_TIMEOUT_SECS must be a positive integer, got {raw:?}"
            ))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_gemini_pro() {
        let config = CompletionConfig::default();
        assert_eq!(config.model, "gemini-pro");
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(
            config.generate_content_url(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-pro:generateContent"
        );
    }

    #[test]
    fn url_ignores_trailing_slash() {
        let config = CompletionConfig {
            base_url: Url::parse("http://127.0.0.1:8080/").unwrap(),
            model: "gemini-1.5-flash".into(),
            timeout: DEFAULT_TIMEOUT,
        };
        assert_eq!(
            config.generate_content_url(),
            "http://127.0.0.1:8080/v1beta/models/gemini-1.5-flash:generateContent"
        );
    }

    #[test]
    fn timeout_must_be_positive() {
        assert_eq!(parse_timeout_secs("15").unwrap(), Duration::from_secs(15));
        assert!(parse_timeout_secs("0").is_err());
        assert!(parse_timeout_secs("soon").is_err());
    }

    #[test]
    fn zero_second_timeout_is_config_error() {
        assert_eq!(timeout_from_secs(45).unwrap(), Duration::from_secs(45));
        assert!(matches!(
            timeout_from_secs(0),
            Err(CompletionError::Config(_))
        ));
    }
}
