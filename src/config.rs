use std::env;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{ensure, Context};

pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub port: u16,
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub gemini_base_url: String,
    pub upstream_timeout: Duration,
    pub cors_allowed_origins: Vec<String>,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup. Unset keys take their defaults;
    /// set but unparseable values are errors.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let port = parse_or(&lookup, "PORT", 8000u16)?;

        let timeout_secs = parse_or(&lookup, "UPSTREAM_TIMEOUT_SECS", 30u64)?;
        ensure!(timeout_secs > 0, "UPSTREAM_TIMEOUT_SECS must be greater than zero");

        Ok(Self {
            port,
            gemini_api_key: lookup("GEMINI_API_KEY")
                .map(|k| k.trim().to_string())
                .filter(|k| !k.is_empty()),
            gemini_model: lookup("GEMINI_MODEL")
                .unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string()),
            gemini_base_url: lookup("GEMINI_BASE_URL")
                .unwrap_or_else(|| DEFAULT_GEMINI_BASE_URL.to_string()),
            upstream_timeout: Duration::from_secs(timeout_secs),
            cors_allowed_origins: parse_origins(
                &lookup("CORS_ALLOWED_ORIGINS").unwrap_or_else(|| "*".to_string()),
            ),
        })
    }

    /// The configured API key, treating an empty string as unset.
    pub fn api_key(&self) -> Option<&str> {
        self.gemini_api_key.as_deref().filter(|k| !k.is_empty())
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("invalid {key}: {raw:?}")),
        None => Ok(default),
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(vars: &[(&str, &str)]) -> anyhow::Result<AppConfig> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.port, 8000);
        assert_eq!(config.gemini_api_key, None);
        assert_eq!(config.gemini_model, DEFAULT_GEMINI_MODEL);
        assert_eq!(config.gemini_base_url, DEFAULT_GEMINI_BASE_URL);
        assert_eq!(config.upstream_timeout, Duration::from_secs(30));
        assert_eq!(config.cors_allowed_origins, vec!["*"]);
    }

    #[test]
    fn test_explicit_values() {
        let config = config_from(&[
            ("PORT", "9001"),
            ("GEMINI_API_KEY", "  abc123\n"),
            ("GEMINI_MODEL", "gemini-2.0-flash"),
            ("UPSTREAM_TIMEOUT_SECS", "5"),
            ("CORS_ALLOWED_ORIGINS", "http://localhost:3000"),
        ])
        .unwrap();
        assert_eq!(config.port, 9001);
        assert_eq!(config.api_key(), Some("abc123"));
        assert_eq!(config.gemini_model, "gemini-2.0-flash");
        assert_eq!(config.upstream_timeout, Duration::from_secs(5));
        assert_eq!(config.cors_allowed_origins, vec!["http://localhost:3000"]);
    }

    #[test]
    fn test_blank_api_key_is_unset() {
        let config = config_from(&[("GEMINI_API_KEY", "   ")]).unwrap();
        assert_eq!(config.gemini_api_key, None);
        assert_eq!(config.api_key(), None);
    }

    #[test]
    fn test_zero_timeout_is_rejected() {
        let err = config_from(&[("UPSTREAM_TIMEOUT_SECS", "0")]).unwrap_err();
        assert!(err.to_string().contains("UPSTREAM_TIMEOUT_SECS"));
    }

    #[test]
    fn test_garbage_timeout_is_rejected() {
        let err = config_from(&[("UPSTREAM_TIMEOUT_SECS", "thirty")]).unwrap_err();
        assert!(err.to_string().contains("invalid UPSTREAM_TIMEOUT_SECS"));
    }

    #[test]
    fn test_garbage_port_is_rejected() {
        let err = config_from(&[("PORT", "not-a-port")]).unwrap_err();
        assert!(err.to_string().contains("invalid PORT"));

        assert!(config_from(&[("PORT", "70000")]).is_err());
    }

    #[test]
    fn test_parse_origins() {
        assert_eq!(
            parse_origins("http://localhost:3000, https://app.example.com,"),
            vec!["http://localhost:3000", "https://app.example.com"]
        );
        assert_eq!(parse_origins("*"), vec!["*"]);
        assert!(parse_origins("").is_empty());
    }

    #[test]
    fn test_empty_api_key_counts_as_unset() {
        let mut config = config_from(&[]).unwrap();
        config.gemini_api_key = Some(String::new());
        assert_eq!(config.api_key(), None);
        config.gemini_api_key = Some("abc".to_string());
        assert_eq!(config.api_key(), Some("abc"));
    }
}
