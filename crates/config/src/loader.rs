use std::path::Path;

use anyhow::bail;
use indoc::indoc;
use secrecy::SecretString;

use crate::Config;

pub(crate) fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Config> {
    let content = std::fs::read_to_string(path.as_ref())?;
    let config: Config = toml::from_str(&content)?;

    finalize(config)
}

/// Resolves values that may come from the environment rather than the file,
/// and validates that the configuration is usable.
pub(crate) fn finalize(mut config: Config) -> anyhow::Result<Config> {
    config.harvest.api_key = Some(resolve_api_key(
        config.harvest.api_key.take(),
        std::env::var("GREENHOUSE_API_KEY").ok(),
    )?);

    if config.harvest.rate_limit.limit == 0 {
        bail!("harvest.rate_limit.limit must be greater than zero");
    }

    if config.harvest.max_retries == 0 {
        bail!("harvest.max_retries must be greater than zero");
    }

    Ok(config)
}

fn resolve_api_key(
    from_file: Option<SecretString>,
    from_env: Option<String>,
) -> anyhow::Result<SecretString> {
    if let Some(key) = from_file {
        log::debug!("Using Harvest API key from the configuration file");
        return Ok(key);
    }

    if let Some(key) = from_env {
        log::debug!("Using Harvest API key from GREENHOUSE_API_KEY");
        return Ok(key.into());
    }

    bail!(indoc! {r#"
        No Harvest API key configured. Set the GREENHOUSE_API_KEY environment
        variable, or add the key to the configuration file:

          [harvest]
          api_key = "your-harvest-api-key"
    "#});
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_key_wins_over_environment() {
        use secrecy::ExposeSecret;

        let key = resolve_api_key(Some("from-file".into()), Some("from-env".to_string())).unwrap();
        assert_eq!(key.expose_secret(), "from-file");
    }

    #[test]
    fn environment_fallback() {
        use secrecy::ExposeSecret;

        let key = resolve_api_key(None, Some("from-env".to_string())).unwrap();
        assert_eq!(key.expose_secret(), "from-env");
    }

    #[test]
    fn missing_key_fails_before_any_network_call() {
        let error = resolve_api_key(None, None).unwrap_err();
        assert!(error.to_string().contains("GREENHOUSE_API_KEY"));
    }

    #[test]
    fn zero_rate_limit_rejected() {
        let mut config = Config::default();
        config.harvest.api_key = Some("key".into());
        config.harvest.rate_limit.limit = 0;

        let error = finalize(config).unwrap_err();
        assert!(error.to_string().contains("rate_limit.limit"));
    }

    #[test]
    fn full_document_parses() {
        let toml = indoc! {r#"
            [server]
            listen_address = "127.0.0.1:7700"

            [server.health]
            enabled = true
            path = "/healthz"

            [mcp]
            enabled = true
            path = "/mcp"

            [harvest]
            api_key = "test-key"
            base_url = "http://127.0.0.1:4000/v1"
            request_timeout = "10s"
            max_retries = 2

            [harvest.rate_limit]
            limit = 5
            interval = "1s"
        "#};

        let config: Config = toml::from_str(toml).unwrap();
        let config = finalize(config).unwrap();

        assert_eq!(
            config.server.listen_address,
            Some("127.0.0.1:7700".parse().unwrap())
        );
        assert_eq!(config.server.health.path, "/healthz");
        assert_eq!(config.mcp.path, "/mcp");
        assert_eq!(config.harvest.base_url.as_str(), "http://127.0.0.1:4000/v1");
        assert_eq!(config.harvest.rate_limit.limit, 5);
    }
}
