//! Flutter-facing bindings over `kanban_core`.

pub mod api;
