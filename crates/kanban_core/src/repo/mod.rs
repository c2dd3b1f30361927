//! Repository layer over the board database.
//!
//! # Responsibility
//! - Define fallible data-access contracts for board snapshots and settings.
//! - Keep SQL details out of the store and the persistence adapter.
//!
//! # Invariants
//! - Reads reject undecodable persisted data instead of masking it; masking
//!   is the persistence adapter's decision.

pub mod board_repo;
