//! Audit trail construction and reporting.
//!
//! # Responsibility
//! - Build one audit event per mutation, with attribute-level diffs.
//! - Filter and summarize the retained log for review surfaces.
//!
//! # Invariants
//! - Snapshots and diffs only cover workflow fields; the supervisor block is
//!   never recorded.

pub mod recorder;
pub mod report;
