//! Greenhouse Harvest API configuration.

use std::time::Duration;

use duration_str::deserialize_duration;
use secrecy::SecretString;
use serde::Deserialize;
use url::Url;

/// Configuration for the Greenhouse Harvest API client.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HarvestConfig {
    /// The Harvest API key. Falls back to the `GREENHOUSE_API_KEY`
    /// environment variable when not set in the configuration file.
    pub api_key: Option<SecretString>,
    /// Base URL of the Harvest API.
    #[serde(default = "default_base_url")]
    pub base_url: Url,
    /// Timeout applied to each individual HTTP request.
    #[serde(default = "default_request_timeout", deserialize_with = "deserialize_duration")]
    pub request_timeout: Duration,
    /// Maximum number of attempts for a request that keeps failing with a
    /// retryable status.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// Outbound request rate window.
    #[serde(default)]
    pub rate_limit: RateWindowConfig,
}

impl Default for HarvestConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            request_timeout: default_request_timeout(),
            max_retries: default_max_retries(),
            rate_limit: RateWindowConfig::default(),
        }
    }
}

/// The documented default endpoint of the Harvest API.
pub fn default_base_url() -> Url {
    Url::parse("https://harvest.greenhouse.io/v1").expect("default base URL is valid")
}

fn default_request_timeout() -> Duration {
    Duration::from_secs(30)
}

fn default_max_retries() -> u32 {
    3
}

/// Configuration for the rolling request window enforced on outbound calls.
///
/// Harvest allows 50 requests per rolling 10 seconds per API key, which is
/// what the defaults encode.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RateWindowConfig {
    /// Maximum number of requests allowed within the interval.
    #[serde(default = "default_limit")]
    pub limit: u32,
    /// Length of the rolling interval.
    #[serde(default = "default_interval", deserialize_with = "deserialize_duration")]
    pub interval: Duration,
}

impl Default for RateWindowConfig {
    fn default() -> Self {
        Self {
            limit: default_limit(),
            interval: default_interval(),
        }
    }
}

fn default_limit() -> u32 {
    50
}

fn default_interval() -> Duration {
    Duration::from_secs(10)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config: HarvestConfig = toml::from_str("").unwrap();

        assert_eq!(config.base_url.as_str(), "https://harvest.greenhouse.io/v1");
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert_eq!(config.max_retries, 3);
        assert_eq!(config.rate_limit.limit, 50);
        assert_eq!(config.rate_limit.interval, Duration::from_secs(10));
        assert!(config.api_key.is_none());
    }

    #[test]
    fn custom_rate_window() {
        let toml = r#"
            [rate_limit]
            limit = 10
            interval = "2s"
        "#;

        let config: HarvestConfig = toml::from_str(toml).unwrap();

        insta::assert_debug_snapshot!(config.rate_limit, @r#"
        RateWindowConfig {
            limit: 10,
            interval: 2s,
        }
        "#);
    }

    #[test]
    fn custom_base_url_and_timeout() {
        let toml = r#"
            base_url = "http://localhost:9090/v1"
            request_timeout = "5s"
            max_retries = 1
        "#;

        let config: HarvestConfig = toml::from_str(toml).unwrap();

        assert_eq!(config.base_url.as_str(), "http://localhost:9090/v1");
        assert_eq!(config.request_timeout, Duration::from_secs(5));
        assert_eq!(config.max_retries, 1);
    }

    #[test]
    fn unknown_field_rejected() {
        let toml = r#"
            api_token = "secret"
        "#;

        let error = toml::from_str::<HarvestConfig>(toml).unwrap_err();
        assert!(error.to_string().contains("api_token"));
    }
}
