use crate::config::PickerConfig;
use crate::error::Error;
use crate::metrics::Metrics;
use crate::registry::EndpointRegistry;
use indexmap::IndexMap;
use reqwest::StatusCode;
use std::sync::Arc;
use tracing::{debug, info, warn};
use url::Url;

/// Outcome of a single discovery load.
///
/// Only a confirmed-missing resource blocks the selector; every other
/// failure degrades to an empty-but-functional one.
#[derive(Debug)]
pub enum LoadOutcome {
    /// The discovery resource was fetched and parsed
    Loaded(EndpointRegistry),
    /// The discovery resource is missing entirely (HTTP 404);
    /// no selector should be offered
    NotFound,
    /// The resource exists (or might exist) but this load failed;
    /// proceed with zero known endpoints
    Degraded,
}

/// Fetches and classifies the endpoint discovery resource.
///
/// One attempt per `load` call; there are no retries. The resource is a
/// flat JSON object mapping display names to endpoint URIs.
pub struct DiscoveryClient {
    http: reqwest::Client,
    metrics: Arc<Metrics>,
}

impl DiscoveryClient {
    /// Create a new discovery client
    pub fn new(config: &PickerConfig, metrics: Arc<Metrics>) -> Result<Self, Error> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;
        Ok(Self { http, metrics })
    }

    /// Fetch `resource_url` and classify the result.
    ///
    /// Never returns an error: failure modes are folded into the outcome
    /// and their causes logged here.
    pub async fn load(&self, resource_url: &str) -> LoadOutcome {
        self.metrics.record_load();

        let base = match Url::parse(resource_url) {
            Ok(url) => url,
            Err(e) => {
                warn!("invalid discovery URL '{}': {}", resource_url, e);
                self.metrics.record_load_failure();
                return LoadOutcome::Degraded;
            }
        };

        debug!("fetching discovery resource {}", base);
        let response = match self.http.get(base.clone()).send().await {
            Ok(response) => response,
            Err(e) => {
                warn!("discovery fetch failed: {}", e);
                self.metrics.record_load_failure();
                return LoadOutcome::Degraded;
            }
        };

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            info!("discovery resource {} not found", base);
            self.metrics.record_load_failure();
            return LoadOutcome::NotFound;
        }
        if !status.is_success() {
            warn!("discovery fetch returned status {}", status);
            self.metrics.record_load_failure();
            return LoadOutcome::Degraded;
        }

        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                warn!("failed to read discovery body: {}", e);
                self.metrics.record_load_failure();
                return LoadOutcome::Degraded;
            }
        };

        // The document must be a flat object of string name -> string URI.
        // IndexMap keeps the document order, which drives render order.
        let doc: IndexMap<String, String> = match serde_json::from_str(&body) {
            Ok(doc) => doc,
            Err(e) => {
                warn!("discovery body is not a name->URL object: {}", e);
                self.metrics.record_load_failure();
                return LoadOutcome::Degraded;
            }
        };

        let registry = EndpointRegistry::from_document(doc, &base);
        info!("discovered {} endpoint(s) from {}", registry.len(), base);
        LoadOutcome::Loaded(registry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client() -> (DiscoveryClient, Arc<Metrics>) {
        let metrics = Arc::new(Metrics::new());
        let client = DiscoveryClient::new(&PickerConfig::default(), metrics.clone())
            .expect("client builds");
        (client, metrics)
    }

    #[tokio::test]
    async fn test_load_success() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/endpoints.json"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(r#"{"alice":"ws://h:1/a","bob":"ws://h:1/b"}"#),
            )
            .mount(&server)
            .await;

        let (client, metrics) = client();
        let outcome = client
            .load(&format!("{}/endpoints.json", server.uri()))
            .await;

        match outcome {
            LoadOutcome::Loaded(registry) => {
                let names: Vec<&str> = registry.names().collect();
                assert_eq!(names, vec!["alice", "bob"]);
                assert_eq!(registry.get("bob").map(Url::as_str), Some("ws://h:1/b"));
            }
            other => panic!("expected Loaded, got {:?}", other),
        }
        assert_eq!(metrics.loads(), 1);
        assert_eq!(metrics.load_failures(), 0);
    }

    #[tokio::test]
    async fn test_load_preserves_document_order() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/endpoints.json"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(r#"{"zeta":"ws://h:1/z","alpha":"ws://h:1/a"}"#),
            )
            .mount(&server)
            .await;

        let (client, _metrics) = client();
        let outcome = client
            .load(&format!("{}/endpoints.json", server.uri()))
            .await;

        match outcome {
            LoadOutcome::Loaded(registry) => {
                let names: Vec<&str> = registry.names().collect();
                assert_eq!(names, vec!["zeta", "alpha"]);
            }
            other => panic!("expected Loaded, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_load_resolves_relative_values() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/endpoints.json"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"node":"/feed"}"#))
            .mount(&server)
            .await;

        let (client, _metrics) = client();
        let outcome = client
            .load(&format!("{}/endpoints.json", server.uri()))
            .await;

        match outcome {
            LoadOutcome::Loaded(registry) => {
                let url = registry.get("node").expect("entry kept");
                assert_eq!(url.scheme(), "ws");
                assert_eq!(url.path(), "/feed");
            }
            other => panic!("expected Loaded, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_load_404_is_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let (client, metrics) = client();
        let outcome = client
            .load(&format!("{}/endpoints.json", server.uri()))
            .await;

        assert!(matches!(outcome, LoadOutcome::NotFound));
        assert_eq!(metrics.load_failures(), 1);
    }

    #[tokio::test]
    async fn test_load_500_is_degraded() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let (client, _metrics) = client();
        let outcome = client
            .load(&format!("{}/endpoints.json", server.uri()))
            .await;

        assert!(matches!(outcome, LoadOutcome::Degraded));
    }

    #[tokio::test]
    async fn test_load_malformed_body_is_degraded() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"alice":{"x":1}}"#))
            .mount(&server)
            .await;

        let (client, _metrics) = client();
        let outcome = client
            .load(&format!("{}/endpoints.json", server.uri()))
            .await;

        assert!(matches!(outcome, LoadOutcome::Degraded));
    }

    #[tokio::test]
    async fn test_load_network_error_is_degraded() {
        // Bind and immediately drop a listener so the port refuses connections.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind");
        let addr = listener.local_addr().expect("addr");
        drop(listener);

        let (client, metrics) = client();
        let outcome = client
            .load(&format!("http://{}/endpoints.json", addr))
            .await;

        assert!(matches!(outcome, LoadOutcome::Degraded));
        assert_eq!(metrics.load_failures(), 1);
    }
}
