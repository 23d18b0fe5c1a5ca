//! HTTP implementation of the cluster capability against the OpenSearch
//! REST API.
//!
//! Index listing uses the plain-text `_cat/indices` endpoint. Its tabular
//! output is parsed here; rows that cannot be parsed are skipped rather
//! than failing the whole listing.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use super::{ClusterClient, ClusterError};
use crate::config::ClusterConfig;

/// Column of the `_cat/indices` tabular output holding the index name.
/// Typical row: `green open logstash-logs-2024.01.31 <uuid> 1 1 ...`
const CAT_INDEX_NAME_COLUMN: usize = 2;

/// Cluster client over the OpenSearch REST API with basic auth.
pub struct HttpClusterClient {
    http: Client,
    base_url: String,
    username: String,
    password: String,
}

impl HttpClusterClient {
    /// Build a client from the cluster configuration.
    pub fn from_config(config: &ClusterConfig) -> Result<Self, ClusterError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(ClusterError::Build)?;

        Ok(Self {
            http,
            base_url: config.url.trim_end_matches('/').to_string(),
            username: config.username.clone(),
            password: config.password.clone(),
        })
    }
}

#[async_trait]
impl ClusterClient for HttpClusterClient {
    async fn list_indices(&self) -> Result<Vec<String>, ClusterError> {
        let url = format!("{}/_cat/indices", self.base_url);
        let response = self
            .http
            .get(&url)
            .basic_auth(&self.username, Some(&self.password))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClusterError::Status {
                operation: "list indices",
                status,
                body,
            });
        }

        let body = response.text().await?;
        Ok(parse_cat_indices(&body))
    }

    async fn delete_index(&self, name: &str) -> Result<(), ClusterError> {
        let url = format!("{}/{}", self.base_url, name);
        let response = self
            .http
            .delete(&url)
            .basic_auth(&self.username, Some(&self.password))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClusterError::Status {
                operation: "delete index",
                status,
                body,
            });
        }

        Ok(())
    }
}

/// Parse the plain-text `_cat/indices` response into index names.
///
/// Rows are whitespace-separated with the index name in the third column.
/// Empty lines are skipped silently; rows with too few columns are skipped
/// with a diagnostic and do not abort the listing.
fn parse_cat_indices(body: &str) -> Vec<String> {
    let mut names = Vec::new();

    for line in body.lines() {
        if line.trim().is_empty() {
            continue;
        }

        let fields: Vec<&str> = line.split_whitespace().collect();
        match fields.get(CAT_INDEX_NAME_COLUMN) {
            Some(name) => names.push((*name).to_string()),
            None => {
                tracing::warn!(row = line, "Skipping _cat/indices row with too few columns");
            }
        }
    }

    names
}

#[cfg(test)]
mod tests {
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{header, method, path},
    };

    use super::*;

    fn client_for(server: &MockServer) -> HttpClusterClient {
        HttpClusterClient::from_config(&ClusterConfig {
            url: server.uri(),
            username: "admin".to_string(),
            password: "secret".to_string(),
            timeout_secs: 5,
        })
        .unwrap()
    }

    // "admin:secret" base64-encoded.
    const BASIC_AUTH: &str = "Basic YWRtaW46c2VjcmV0";

    #[test]
    fn parse_cat_indices_typical_output() {
        let body = "\
green open logstash-logs-2024.01.01 aBcD1234 1 1 1000 0 1mb 512kb
green open logstash-logs-2024.01.02 eFgH5678 1 1 2000 0 2mb 1mb
yellow open other-index-2024.01.01 iJkL9012 1 1 10 0 10kb 5kb
";
        assert_eq!(
            parse_cat_indices(body),
            vec![
                "logstash-logs-2024.01.01",
                "logstash-logs-2024.01.02",
                "other-index-2024.01.01",
            ]
        );
    }

    #[test]
    fn parse_cat_indices_skips_short_rows_and_blank_lines() {
        let body = "\
green open logstash-logs-2024.01.01 aBcD1234 1 1

green open
green open logstash-logs-2024.01.02 eFgH5678 1 1
";
        assert_eq!(
            parse_cat_indices(body),
            vec!["logstash-logs-2024.01.01", "logstash-logs-2024.01.02"]
        );
    }

    #[test]
    fn parse_cat_indices_empty_body() {
        assert!(parse_cat_indices("").is_empty());
    }

    #[tokio::test]
    async fn list_indices_sends_basic_auth_and_parses_rows() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/_cat/indices"))
            .and(header("Authorization", BASIC_AUTH))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                "green open logstash-logs-2024.01.01 aBcD1234 1 1 1000 0 1mb 512kb\n",
            ))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let indices = client.list_indices().await.unwrap();
        assert_eq!(indices, vec!["logstash-logs-2024.01.01"]);
    }

    #[tokio::test]
    async fn list_indices_non_success_status_is_fatal() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/_cat/indices"))
            .respond_with(ResponseTemplate::new(503).set_body_string("cluster unavailable"))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let err = client.list_indices().await.unwrap_err();
        assert!(
            matches!(err, ClusterError::Status { status, .. } if status.as_u16() == 503),
            "unexpected error: {err}"
        );
    }

    #[tokio::test]
    async fn delete_index_targets_the_named_index() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/logstash-logs-2024.01.01"))
            .and(header("Authorization", BASIC_AUTH))
            .respond_with(ResponseTemplate::new(200).set_body_string("{\"acknowledged\":true}"))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        client.delete_index("logstash-logs-2024.01.01").await.unwrap();
    }

    #[tokio::test]
    async fn delete_index_missing_index_reports_status() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/logstash-logs-1999.01.01"))
            .respond_with(ResponseTemplate::new(404).set_body_string("index_not_found_exception"))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let err = client.delete_index("logstash-logs-1999.01.01").await.unwrap_err();
        assert!(matches!(err, ClusterError::Status { status, .. } if status.as_u16() == 404));
    }
}
