//! Board state container and its mutation surface.
//!
//! # Responsibility
//! - Own the single mutable board root and expose every mutation.
//! - Record one audit event per applied mutation and enforce the log cap.
//! - Notify a post-mutation hook (persistence) after each applied change.
//!
//! # Invariants
//! - Transitions are pure: a mutation either yields a complete next state or
//!   leaves the previous state untouched.
//! - Missing ids are silent no-ops; the hook does not fire for them.

mod board_store;
pub mod transitions;

pub use board_store::{BoardStore, SaveHook};
pub use transitions::{MoveRequest, ReorderRequest};
