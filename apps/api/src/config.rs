use std::fmt;
use std::time::Duration;

use anyhow::{Context, Result};

const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_LLM_TIMEOUT_SECS: u64 = 60;
/// Extra time the HTTP client waits past the generation timeout; the generator
/// timeout must always fire first.
const HTTP_TIMEOUT_GRACE_SECS: u64 = 5;

/// Application configuration loaded from environment variables.
/// Startup fails if a required variable is missing or malformed.
#[derive(Clone)]
pub struct Config {
    pub openai_api_key: String,
    pub openai_base_url: String,
    pub llm_timeout_secs: u64,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup. `from_env` passes the
    /// process environment; tests pass a map.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let llm_timeout_secs = match lookup("LLM_TIMEOUT_SECS") {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .context("LLM_TIMEOUT_SECS must be a positive integer")?,
            None => DEFAULT_LLM_TIMEOUT_SECS,
        };

        Ok(Config {
            openai_api_key: require(&lookup, "OPENAI_API_KEY")?,
            openai_base_url: lookup("OPENAI_BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_OPENAI_BASE_URL.to_string()),
            llm_timeout_secs,
            port: lookup("PORT")
                .unwrap_or_else(|| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }

    pub fn llm_timeout(&self) -> Duration {
        Duration::from_secs(self.llm_timeout_secs)
    }

    /// Timeout for the underlying HTTP client. Always longer than `llm_timeout`.
    pub fn http_timeout(&self) -> Duration {
        self.llm_timeout() + Duration::from_secs(HTTP_TIMEOUT_GRACE_SECS)
    }
}

// Hand-written so the API key never ends up in logs.
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("openai_api_key", &"<redacted>")
            .field("openai_base_url", &self.openai_base_url)
            .field("llm_timeout_secs", &self.llm_timeout_secs)
            .field("port", &self.port)
            .field("rust_log", &self.rust_log)
            .finish()
    }
}

fn require<F>(lookup: &F, key: &str) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .filter(|value| !value.trim().is_empty())
        .with_context(|| format!("Required environment variable '{key}' is not set"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_applied_when_only_key_set() {
        let config = Config::from_lookup(lookup_from(&[("OPENAI_API_KEY", "sk-test")])).unwrap();
        assert_eq!(config.openai_base_url, DEFAULT_OPENAI_BASE_URL);
        assert_eq!(config.llm_timeout_secs, DEFAULT_LLM_TIMEOUT_SECS);
        assert_eq!(config.port, 8080);
        assert_eq!(config.rust_log, "info");
    }

    #[test]
    fn test_missing_api_key_fails() {
        let err = Config::from_lookup(lookup_from(&[])).unwrap_err();
        assert!(err.to_string().contains("OPENAI_API_KEY"));
    }

    #[test]
    fn test_blank_api_key_fails() {
        assert!(Config::from_lookup(lookup_from(&[("OPENAI_API_KEY", "  ")])).is_err());
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let result = Config::from_lookup(lookup_from(&[
            ("OPENAI_API_KEY", "sk-test"),
            ("LLM_TIMEOUT_SECS", "0"),
        ]));
        assert!(result.is_err());
    }

    #[test]
    fn test_http_timeout_outlasts_generation_timeout() {
        let config = Config::from_lookup(lookup_from(&[
            ("OPENAI_API_KEY", "sk-test"),
            ("LLM_TIMEOUT_SECS", "30"),
        ]))
        .unwrap();
        assert_eq!(config.llm_timeout(), Duration::from_secs(30));
        assert!(config.http_timeout() > config.llm_timeout());
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let config = Config::from_lookup(lookup_from(&[
            ("OPENAI_API_KEY", "sk-test"),
            ("OPENAI_BASE_URL", "http://localhost:9000/v1/"),
        ]))
        .unwrap();
        assert_eq!(config.openai_base_url, "http://localhost:9000/v1");
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let config =
            Config::from_lookup(lookup_from(&[("OPENAI_API_KEY", "sk-very-secret")])).unwrap();
        let printed = format!("{config:?}");
        assert!(!printed.contains("sk-very-secret"));
        assert!(printed.contains("<redacted>"));
    }
}
