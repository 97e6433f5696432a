//! API server configuration.

use std::path::PathBuf;

use barbella_core::prompt::{DEFAULT_COMPANY_NAME, PromptError, PromptTemplate};

use crate::error::StatusMapping;

/// Environment variable holding the provider API key.
pub const API_KEY_VAR: &str = "GEMINI_API_KEY";

/// Default cap on a chat request body. The client resends the whole
/// history on every call, so this sits well above axum's 2 MB default.
pub const DEFAULT_MAX_BODY_BYTES: usize = 16 * 1024 * 1024;

/// Where the provider API key comes from.
///
/// The key is resolved on every request, so a missing key fails each chat
/// call rather than server startup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ApiKeySource {
    /// Read the named environment variable at request time.
    Env(String),
    /// Fixed value, for tests and embedding.
    Fixed(Option<String>),
}

impl ApiKeySource {
    /// Current key, if set and non-blank.
    pub fn resolve(&self) -> Option<String> {
        let key = match self {
            ApiKeySource::Env(var) => std::env::var(var).ok(),
            ApiKeySource::Fixed(key) => key.clone(),
        };
        key.filter(|k| !k.trim().is_empty())
    }
}

impl Default for ApiKeySource {
    fn default() -> Self {
        ApiKeySource::Env(API_KEY_VAR.to_string())
    }
}

/// Configuration for the API server.
#[derive(Clone, Debug)]
pub struct ApiConfig {
    /// Address to bind the HTTP listener (e.g. "127.0.0.1:3000").
    pub bind_addr: String,
    /// Provider API key source.
    pub api_key: ApiKeySource,
    /// Error kind → status code table.
    pub status_mapping: StatusMapping,
    /// Company named by the built-in prompt template.
    pub company_name: String,
    /// Optional file overriding the built-in prompt template.
    pub prompt_template_path: Option<PathBuf>,
    /// Largest accepted request body, in bytes.
    pub max_body_bytes: usize,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:3000".into(),
            api_key: ApiKeySource::default(),
            status_mapping: StatusMapping::default(),
            company_name: DEFAULT_COMPANY_NAME.into(),
            prompt_template_path: None,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }
}

impl ApiConfig {
    /// Reads configuration from environment variables with sensible defaults.
    ///
    /// | Variable               | Default          |
    /// |------------------------|------------------|
    /// | `BIND_ADDR`            | `127.0.0.1:3000` |
    /// | `COMPANY_NAME`         | `Barbella`       |
    /// | `PROMPT_TEMPLATE_PATH` | unset (built-in) |
    /// | `ERROR_STATUS_MAPPING` | `flat`           |
    /// | `MAX_BODY_BYTES`       | 16 MiB           |
    ///
    /// `GEMINI_API_KEY` is not read here; see [`ApiKeySource`].
    pub fn from_env() -> Result<Self, String> {
        let defaults = Self::default();
        let status_mapping = match std::env::var("ERROR_STATUS_MAPPING") {
            Ok(raw) => raw.parse()?,
            Err(_) => defaults.status_mapping,
        };

        let max_body_bytes = match std::env::var("MAX_BODY_BYTES") {
            Ok(raw) => parse_body_limit(&raw)?,
            Err(_) => defaults.max_body_bytes,
        };

        Ok(Self {
            bind_addr: std::env::var("BIND_ADDR").unwrap_or(defaults.bind_addr),
            api_key: defaults.api_key,
            status_mapping,
            company_name: std::env::var("COMPANY_NAME").unwrap_or(defaults.company_name),
            prompt_template_path: std::env::var_os("PROMPT_TEMPLATE_PATH").map(PathBuf::from),
            max_body_bytes,
        })
    }

    /// Prompt template selected by this configuration.
    pub fn prompt_template(&self) -> Result<PromptTemplate, PromptError> {
        match &self.prompt_template_path {
            Some(path) => PromptTemplate::from_file(path),
            None => Ok(PromptTemplate::for_company(&self.company_name)),
        }
    }
}

fn parse_body_limit(raw: &str) -> Result<usize, String> {
    match raw.trim().parse::<usize>() {
        Ok(bytes) if bytes > 0 => Ok(bytes),
        _ => Err(format!(
            "MAX_BODY_BYTES must be a positive integer, got {raw:?}"
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_key_resolves() {
        let source = ApiKeySource::Fixed(Some("abc".into()));
        assert_eq!(source.resolve().as_deref(), Some("abc"));
    }

    #[test]
    fn blank_key_is_treated_as_missing() {
        assert_eq!(ApiKeySource::Fixed(Some("  ".into())).resolve(), None);
        assert_eq!(ApiKeySource::Fixed(None).resolve(), None);
    }

    #[test]
    fn unset_env_var_resolves_to_none() {
        let source = ApiKeySource::Env("BARBELLA_TEST_KEY_THAT_IS_NEVER_SET".into());
        assert_eq!(source.resolve(), None);
    }

    #[test]
    fn default_config_uses_builtin_template() {
        let config = ApiConfig::default();
        assert_eq!(config.status_mapping, StatusMapping::Flat);
        assert_eq!(config.api_key, ApiKeySource::Env("GEMINI_API_KEY".into()));
        let template = config.prompt_template().expect("template");
        assert!(template.as_str().contains("Barbella"));
    }

    #[test]
    fn company_name_flows_into_template() {
        let config = ApiConfig {
            company_name: "Acme Fitness".into(),
            ..ApiConfig::default()
        };
        let template = config.prompt_template().expect("template");
        assert!(template.as_str().contains("Acme Fitness"));
    }

    #[test]
    fn body_limit_must_be_positive() {
        assert_eq!(parse_body_limit("4096"), Ok(4096));
        assert!(parse_body_limit("0").is_err());
        assert!(parse_body_limit("big").is_err());
    }
}
