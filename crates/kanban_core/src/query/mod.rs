//! Structured task search.
//!
//! # Responsibility
//! - Tokenize free-text/operator search strings into a [`ParsedQuery`].
//! - Compile parsed queries into task predicates and board views.
//!
//! # Invariants
//! - All recognized filters combine with AND; tags combine with AND.
//! - Unknown operator tokens never take part in matching.

pub mod parser;
pub mod predicate;
pub mod view;
