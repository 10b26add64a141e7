//! HTTP client initialization.

use std::sync::Arc;
use std::time::Duration;

use reqwest::ClientBuilder;

use crate::config::Config;

/// Initializes the HTTP client used for enrichment lookups.
///
/// The timeout covers the transport round-trip only; the rate-limit retry
/// loop in the enrichment client sits above it and has no timeout of its own.
pub async fn init_client(config: &Config) -> Result<Arc<reqwest::Client>, reqwest::Error> {
    let client = ClientBuilder::new()
        .timeout(Duration::from_secs(config.timeout_seconds))
        .build()?;
    Ok(Arc::new(client))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_init_client_with_default_config() {
        let config = Config::default();
        let client = init_client(&config).await;
        assert!(client.is_ok());
    }
}
