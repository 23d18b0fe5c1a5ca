//! Retention pruner for date-suffixed search-cluster indices.
//!
//! A one-shot maintenance task: list the indices present in an
//! OpenSearch-style cluster, find those whose `YYYY.MM.DD` name suffix is
//! older than the configured age limit, and delete them, or only report
//! them in dry-run mode.

pub mod cluster;
pub mod config;
pub mod observability;
pub mod prune;
pub mod retention;

#[cfg(test)]
mod tests;
