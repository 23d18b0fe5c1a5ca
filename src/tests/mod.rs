//! Consolidated test modules.
//!
//! End-to-end prune runs against a mock cluster HTTP API.
