//! Search-cluster client capability.
//!
//! The pruner consumes exactly two cluster operations, expressed as a
//! narrow trait so the orchestrator can be tested against an in-memory
//! fake without a real cluster.

mod http;
#[cfg(test)]
pub(crate) mod test_utils;

use async_trait::async_trait;
pub use http::HttpClusterClient;

/// Errors from cluster interactions.
#[derive(Debug, thiserror::Error)]
pub enum ClusterError {
    /// The HTTP client could not be constructed from the configuration.
    #[error("Failed to build cluster HTTP client: {0}")]
    Build(#[source] reqwest::Error),

    /// The cluster could not be reached or the response body could not be
    /// read.
    #[error("Cluster request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The cluster answered with a non-success status.
    #[error("Cluster returned {status} for {operation}: {body}")]
    Status {
        operation: &'static str,
        status: reqwest::StatusCode,
        body: String,
    },
}

/// Narrow capability interface over the search cluster.
#[async_trait]
pub trait ClusterClient: Send + Sync {
    /// List the names of all indices currently present in the cluster,
    /// in cluster order (not guaranteed sorted). Read-only.
    async fn list_indices(&self) -> Result<Vec<String>, ClusterError>;

    /// Delete a single index by name.
    async fn delete_index(&self, name: &str) -> Result<(), ClusterError>;
}
