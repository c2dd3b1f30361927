//! Services around the board store.
//!
//! # Responsibility
//! - Adapt repositories into the never-failing persistence contract used by
//!   the board store.

pub mod persistence;
