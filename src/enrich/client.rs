//! Geolocation lookup client.
//!
//! Wraps the external enrichment endpoint. One outbound GET per attempt,
//! authenticated with a token query parameter. The retry-on-rate-limit policy
//! lives here: a 429 blocks the calling pipeline for a fixed cooldown and
//! then retries the same IP, without bound. The missing retry ceiling is a
//! known risk inherited from the original tool; see DESIGN.md.

use std::sync::Arc;
use std::time::Duration;

use log::warn;
use reqwest::StatusCode;

use super::types::GeoInfo;
use crate::errors::EnrichError;

/// Client for the IP geolocation enrichment service.
#[derive(Debug, Clone)]
pub struct GeoClient {
    client: Arc<reqwest::Client>,
    base_url: String,
    token: String,
    cooldown: Duration,
}

impl GeoClient {
    /// Creates a client for `base_url` authenticating with `token`.
    ///
    /// `cooldown` is how long a 429 response blocks before the retry
    /// (60 seconds in production; tests shrink it).
    pub fn new(
        client: Arc<reqwest::Client>,
        base_url: impl Into<String>,
        token: impl Into<String>,
        cooldown: Duration,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            token: token.into(),
            cooldown,
        }
    }

    /// Looks up geolocation data for `client_ip`.
    ///
    /// - 200: the body is decoded into [`GeoInfo`].
    /// - 429: sleeps the cooldown and retries the same IP, indefinitely.
    /// - anything else (including transport failures): returns an error the
    ///   caller is expected to log and absorb by substituting
    ///   `GeoInfo::default()`; enrichment failure never blocks persistence.
    pub async fn lookup(&self, client_ip: &str) -> Result<GeoInfo, EnrichError> {
        let url = format!(
            "{}/{}/?token={}",
            self.base_url.trim_end_matches('/'),
            client_ip,
            self.token
        );

        loop {
            let response = self.client.get(&url).send().await?;
            match response.status() {
                StatusCode::OK => {
                    let body = response.text().await?;
                    return serde_json::from_str::<GeoInfo>(&body)
                        .map_err(|e| EnrichError::Decode(e.to_string()));
                }
                StatusCode::TOO_MANY_REQUESTS => {
                    warn!(
                        "enrichment API rate limit exceeded for {client_ip}; retrying in {}s",
                        self.cooldown.as_secs_f64()
                    );
                    tokio::time::sleep(self.cooldown).await;
                }
                status => return Err(EnrichError::Status(status)),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httptest::{matchers::*, responders::*, Expectation, Server};

    fn test_client(server: &Server, cooldown_ms: u64) -> GeoClient {
        GeoClient::new(
            Arc::new(reqwest::Client::new()),
            server.url_str(""),
            "test-token",
            Duration::from_millis(cooldown_ms),
        )
    }

    #[tokio::test]
    async fn test_lookup_decodes_success_response() {
        let server = Server::run();
        server.expect(
            Expectation::matching(request::method_path("GET", "/5.6.7.8/")).respond_with(
                json_encoded(serde_json::json!({
                    "country": {"names": {"en": "Brazil"}}
                })),
            ),
        );

        let info = test_client(&server, 10)
            .lookup("5.6.7.8")
            .await
            .expect("lookup should succeed");
        assert_eq!(info.country_name(), Some("Brazil"));
    }

    #[tokio::test]
    async fn test_lookup_sends_token_query_parameter() {
        let server = Server::run();
        server.expect(
            Expectation::matching(all_of![
                request::method_path("GET", "/5.6.7.8/"),
                request::query(url_decoded(contains(("token", "test-token")))),
            ])
            .respond_with(json_encoded(serde_json::json!({}))),
        );

        test_client(&server, 10)
            .lookup("5.6.7.8")
            .await
            .expect("lookup should succeed");
    }

    #[tokio::test]
    async fn test_lookup_retries_after_rate_limit() {
        let server = Server::run();
        server.expect(
            Expectation::matching(request::method_path("GET", "/5.6.7.8/"))
                .times(3)
                .respond_with(cycle![
                    status_code(429),
                    status_code(429),
                    json_encoded(serde_json::json!({
                        "country": {"names": {"en": "Brazil"}}
                    })),
                ]),
        );

        // Same target IP must survive both 429 rounds.
        let info = test_client(&server, 10)
            .lookup("5.6.7.8")
            .await
            .expect("lookup should eventually succeed");
        assert_eq!(info.country_name(), Some("Brazil"));
    }

    #[tokio::test]
    async fn test_lookup_non_200_is_an_error() {
        let server = Server::run();
        server.expect(
            Expectation::matching(request::method_path("GET", "/5.6.7.8/"))
                .respond_with(status_code(500)),
        );

        let err = test_client(&server, 10)
            .lookup("5.6.7.8")
            .await
            .expect_err("500 should be an error");
        assert!(matches!(err, EnrichError::Status(s) if s.as_u16() == 500));
    }

    #[tokio::test]
    async fn test_lookup_malformed_body_is_a_decode_error() {
        let server = Server::run();
        server.expect(
            Expectation::matching(request::method_path("GET", "/5.6.7.8/"))
                .respond_with(status_code(200).body("not json")),
        );

        let err = test_client(&server, 10)
            .lookup("5.6.7.8")
            .await
            .expect_err("garbage body should be an error");
        assert!(matches!(err, EnrichError::Decode(_)));
    }
}
