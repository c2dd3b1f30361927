//! Board document import/export.
//!
//! # Responsibility
//! - Serialize the full board into a portable JSON document.
//! - Validate external documents structurally and referentially, and repair
//!   duplicated column references, before they may replace live state.
//!
//! # Invariants
//! - Import never yields a partial state: it returns a complete repaired
//!   board or an itemized error list.
//! - Referential integrity is checked before duplicate resolution, and again
//!   after it.
//! - `import(export(state)) == state` for states without duplicated
//!   column references.

pub mod export;
pub mod import;
pub mod schema;

pub use export::{export_board, EXPORT_FILE_NAME};
pub use import::{
    capped_messages, check_referential_integrity, import_board, import_board_as, import_notice,
    resolve_duplicate_references, ImportError, ImportOutcome,
};
