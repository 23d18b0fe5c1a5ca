//! One-shot prune run: list indices, evaluate retention, delete or report.
//!
//! The run is a single linear pass with no retries. Fatal errors (listing
//! failure) abort the run; per-index delete failures are logged, recorded
//! in the run result, and do not stop processing of the remaining
//! candidates.

use chrono::{NaiveDate, Utc};

use crate::{
    cluster::{ClusterClient, ClusterError},
    config::RetentionConfig,
    retention::RetentionPolicy,
};

/// A delete attempt that failed for a single candidate index.
#[derive(Debug)]
pub struct DeleteFailure {
    pub index: String,
    pub error: ClusterError,
}

/// Results from a single prune run.
#[derive(Debug)]
pub struct PruneRunResult {
    /// The boundary date used for this run.
    pub cutoff: NaiveDate,
    /// The naming-convention prefix the run applied.
    pub prefix: String,
    /// Whether mutating calls were suppressed.
    pub dry_run: bool,
    /// Number of indices matching the naming convention, eligible or not.
    pub total_matching: usize,
    /// Deletion candidates in cluster order.
    pub candidates: Vec<String>,
    /// Number of candidates actually deleted.
    pub deleted: u64,
    /// Per-candidate delete failures, in attempt order.
    pub failures: Vec<DeleteFailure>,
}

impl PruneRunResult {
    pub fn has_candidates(&self) -> bool {
        !self.candidates.is_empty()
    }
}

/// Fatal prune errors. Per-index delete failures are carried in the run
/// result instead and do not change the run's overall status.
#[derive(Debug, thiserror::Error)]
pub enum PruneError {
    #[error("Failed to list indices: {0}")]
    Listing(#[source] ClusterError),
}

/// Run a single prune pass against the cluster.
pub async fn run_prune(
    cluster: &dyn ClusterClient,
    retention: &RetentionConfig,
) -> Result<PruneRunResult, PruneError> {
    let today = Utc::now().date_naive();
    run_prune_at(cluster, retention, today).await
}

/// Run a single prune pass with an explicit "today", so tests control the
/// clock.
pub async fn run_prune_at(
    cluster: &dyn ClusterClient,
    retention: &RetentionConfig,
    today: NaiveDate,
) -> Result<PruneRunResult, PruneError> {
    let policy =
        RetentionPolicy::with_age_limit(&retention.index_prefix, today, retention.age_limit_days);

    tracing::info!(
        cutoff = %policy.cutoff(),
        prefix = %retention.index_prefix,
        dry_run = retention.dry_run,
        "Starting prune run"
    );

    let names = cluster.list_indices().await.map_err(PruneError::Listing)?;
    let plan = policy.plan(names);

    tracing::info!(
        total_matching = plan.total_matching,
        candidates = plan.candidates.len(),
        "Evaluated index listing"
    );

    let mut deleted = 0u64;
    let mut failures = Vec::new();

    if retention.dry_run {
        tracing::info!(
            candidates = plan.candidates.len(),
            "Dry run: no indices will be deleted"
        );
    } else {
        for name in &plan.candidates {
            match cluster.delete_index(name).await {
                Ok(()) => {
                    deleted += 1;
                    tracing::debug!(index = %name, "Deleted index");
                }
                Err(e) => {
                    tracing::error!(index = %name, error = %e, "Failed to delete index");
                    failures.push(DeleteFailure {
                        index: name.clone(),
                        error: e,
                    });
                }
            }
        }
    }

    Ok(PruneRunResult {
        cutoff: policy.cutoff(),
        prefix: retention.index_prefix.clone(),
        dry_run: retention.dry_run,
        total_matching: plan.total_matching,
        candidates: plan.candidates,
        deleted,
        failures,
    })
}

/// Render the human-readable run summary.
///
/// This is the operational report printed to stdout: cutoff date, count of
/// convention-matching indices, the candidate list and its size, and the
/// deletion or dry-run outcome.
pub fn render_summary(result: &PruneRunResult) -> String {
    use std::fmt::Write;

    let mut out = String::new();
    let _ = writeln!(out, "Cutoff date: {}", result.cutoff);
    let _ = writeln!(
        out,
        "Total {}* indices: {}",
        result.prefix, result.total_matching
    );

    if result.has_candidates() {
        let _ = writeln!(out, "Indices to delete:");
        for name in &result.candidates {
            let _ = writeln!(out, "{name}");
        }
        let _ = writeln!(out, "Total indices to delete: {}", result.candidates.len());
    } else {
        let _ = writeln!(out, "No indices to delete.");
    }

    if result.dry_run {
        let _ = writeln!(out, "Dry run: no indices have been deleted.");
    } else if result.has_candidates() {
        for failure in &result.failures {
            let _ = writeln!(out, "Error deleting index {}: {}", failure.index, failure.error);
        }
        let _ = writeln!(
            out,
            "Deleted {} of {} indices.",
            result.deleted,
            result.candidates.len()
        );
    }

    out
}
