//! Audit event model.
//!
//! # Invariants
//! - An event is created exactly once per mutation and never edited.
//! - `diff.before`/`diff.after` only carry changed top-level attributes, or a
//!   positional descriptor for `MOVE`.

use crate::model::task::TaskId;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt::{Display, Formatter};

/// Attribute map stored on each side of a diff.
pub type AuditValues = Map<String, Value>;

/// Kind of state-changing operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AuditAction {
    Create,
    Update,
    Delete,
    Move,
}

impl AuditAction {
    pub const ALL: [AuditAction; 4] = [
        AuditAction::Create,
        AuditAction::Update,
        AuditAction::Move,
        AuditAction::Delete,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Create => "CREATE",
            Self::Update => "UPDATE",
            Self::Delete => "DELETE",
            Self::Move => "MOVE",
        }
    }

    /// Parses the wire name, ASCII case-insensitive.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_uppercase().as_str() {
            "CREATE" => Some(Self::Create),
            "UPDATE" => Some(Self::Update),
            "DELETE" => Some(Self::Delete),
            "MOVE" => Some(Self::Move),
            _ => None,
        }
    }
}

impl Display for AuditAction {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

/// Before/after attribute maps of one event.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AuditDiff {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub before: Option<AuditValues>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub after: Option<AuditValues>,
}

impl AuditDiff {
    /// Union of keys present on either side, before-keys first.
    pub fn changed_keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = Vec::new();
        for side in [&self.before, &self.after].into_iter().flatten() {
            for key in side.keys() {
                if !keys.contains(&key.as_str()) {
                    keys.push(key.as_str());
                }
            }
        }
        keys
    }
}

/// Immutable record of one state-changing operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditEvent {
    pub id: String,
    /// RFC 3339 creation time.
    pub timestamp: String,
    pub action: AuditAction,
    pub task_id: TaskId,
    #[serde(default)]
    pub diff: AuditDiff,
    pub user_label: String,
}
