//! Board domain model.
//!
//! # Responsibility
//! - Define the canonical task, column and audit records owned by the board.
//! - Keep serialized field names aligned with the export document shape.
//!
//! # Invariants
//! - Every id in a column exists in the task map and appears exactly once
//!   across all columns.
//! - `Task::status` always names the column currently holding the task id.
//!
//! # See also
//! - `crate::transfer` for the document validation rules.

pub mod audit;
pub mod board;
pub mod task;
