//! In-memory cluster fake for orchestrator tests.

use std::sync::Mutex;

use async_trait::async_trait;

use super::{ClusterClient, ClusterError};

/// A fake cluster holding a fixed listing, recording delete calls, and
/// optionally failing deletes for specific indices.
pub struct FakeCluster {
    indices: Vec<String>,
    failing: Vec<String>,
    deleted: Mutex<Vec<String>>,
}

impl FakeCluster {
    pub fn new(indices: &[&str]) -> Self {
        Self {
            indices: indices.iter().map(|s| s.to_string()).collect(),
            failing: Vec::new(),
            deleted: Mutex::new(Vec::new()),
        }
    }

    /// Make deletes of the given index fail with a server error.
    pub fn failing_on(mut self, name: &str) -> Self {
        self.failing.push(name.to_string());
        self
    }

    /// Names deleted so far, in call order.
    pub fn deleted(&self) -> Vec<String> {
        self.deleted.lock().expect("fake cluster lock").clone()
    }
}

#[async_trait]
impl ClusterClient for FakeCluster {
    async fn list_indices(&self) -> Result<Vec<String>, ClusterError> {
        Ok(self.indices.clone())
    }

    async fn delete_index(&self, name: &str) -> Result<(), ClusterError> {
        if self.failing.iter().any(|f| f == name) {
            return Err(ClusterError::Status {
                operation: "delete index",
                status: reqwest::StatusCode::INTERNAL_SERVER_ERROR,
                body: "simulated failure".to_string(),
            });
        }

        self.deleted
            .lock()
            .expect("fake cluster lock")
            .push(name.to_string());
        Ok(())
    }
}
