//! Audit event builders.
//!
//! # Responsibility
//! - Snapshot tasks for CREATE/DELETE and diff them for UPDATE.
//! - Provide positional descriptors for MOVE and id-regeneration events.
//!
//! # Invariants
//! - UPDATE diffs contain only keys whose values differ; absent optional
//!   values are recorded as explicit `null`.
//! - An UPDATE with no changed field still yields an event (empty maps).

use crate::model::audit::{AuditAction, AuditDiff, AuditEvent, AuditValues};
use crate::model::task::{ColumnId, Task};
use chrono::{SecondsFormat, Utc};
use serde_json::Value;
use uuid::Uuid;

/// Note attached to id-regeneration events synthesized during import.
pub const ID_REGENERATION_NOTE: &str = "Regenerated from a duplicated id during import";

/// Fields compared by [`diff_tasks`], in recording order.
pub const TRACKED_FIELDS: [&str; 7] = [
    "title",
    "description",
    "priority",
    "tags",
    "estimationMin",
    "dueAt",
    "status",
];

/// Current UTC time as RFC 3339 with millisecond precision.
pub fn now_iso() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Fresh opaque identifier for tasks and events.
pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// Full normalized snapshot used by CREATE (`after`) and DELETE (`before`).
pub fn task_snapshot(task: &Task) -> AuditValues {
    let mut snapshot = AuditValues::new();
    snapshot.insert("id".to_string(), Value::from(task.id.as_str()));
    snapshot.insert(
        "createdAt".to_string(),
        Value::from(task.created_at.as_str()),
    );
    for field in TRACKED_FIELDS {
        snapshot.insert(field.to_string(), tracked_value(task, field));
    }
    snapshot
}

/// Attribute-level diff over [`TRACKED_FIELDS`].
///
/// Tag sequences compare by order and length.
pub fn diff_tasks(before: &Task, after: &Task) -> (AuditValues, AuditValues) {
    let mut changed_before = AuditValues::new();
    let mut changed_after = AuditValues::new();

    for field in TRACKED_FIELDS {
        let old = tracked_value(before, field);
        let new = tracked_value(after, field);
        if old != new {
            changed_before.insert(field.to_string(), old);
            changed_after.insert(field.to_string(), new);
        }
    }

    (changed_before, changed_after)
}

/// Builds an audit event for one mutation.
///
/// - `Create` snapshots `after`, `Delete` snapshots `before`.
/// - `Update` diffs `before` against `after`.
/// - `Move`, or any action missing its task snapshots, gets an empty diff;
///   the caller attaches a positional descriptor afterwards.
pub fn make_audit_event(
    action: AuditAction,
    task_id: &str,
    before: Option<&Task>,
    after: Option<&Task>,
    user_label: &str,
) -> AuditEvent {
    let diff = match (action, before, after) {
        (AuditAction::Create, _, Some(created)) => AuditDiff {
            before: None,
            after: Some(task_snapshot(created)),
        },
        (AuditAction::Delete, Some(removed), _) => AuditDiff {
            before: Some(task_snapshot(removed)),
            after: None,
        },
        (AuditAction::Update, Some(old), Some(new)) => {
            let (changed_before, changed_after) = diff_tasks(old, new);
            AuditDiff {
                before: Some(changed_before),
                after: Some(changed_after),
            }
        }
        _ => AuditDiff::default(),
    };

    AuditEvent {
        id: new_id(),
        timestamp: now_iso(),
        action,
        task_id: task_id.to_string(),
        diff,
        user_label: user_label.to_string(),
    }
}

/// Positional change recorded by drag-originated MOVE events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveDescriptor {
    pub from_col: ColumnId,
    pub to_col: ColumnId,
    pub from_index: usize,
    pub to_index: usize,
}

impl MoveDescriptor {
    /// `before = {fromCol, fromIndex}`, `after = {toCol, toIndex}`.
    pub fn into_diff(self) -> AuditDiff {
        let mut before = AuditValues::new();
        before.insert("fromCol".to_string(), Value::from(self.from_col.as_str()));
        before.insert("fromIndex".to_string(), Value::from(self.from_index));

        let mut after = AuditValues::new();
        after.insert("toCol".to_string(), Value::from(self.to_col.as_str()));
        after.insert("toIndex".to_string(), Value::from(self.to_index));

        AuditDiff {
            before: Some(before),
            after: Some(after),
        }
    }
}

/// UPDATE event recording an `old -> new` id regeneration.
pub fn record_id_regeneration(old_id: &str, new_id_value: &str, user_label: &str) -> AuditEvent {
    let mut before = AuditValues::new();
    before.insert("id".to_string(), Value::from(old_id));

    let mut after = AuditValues::new();
    after.insert("id".to_string(), Value::from(new_id_value));
    after.insert("note".to_string(), Value::from(ID_REGENERATION_NOTE));

    AuditEvent {
        id: new_id(),
        timestamp: now_iso(),
        action: AuditAction::Update,
        task_id: new_id_value.to_string(),
        diff: AuditDiff {
            before: Some(before),
            after: Some(after),
        },
        user_label: user_label.to_string(),
    }
}

fn tracked_value(task: &Task, field: &str) -> Value {
    match field {
        "title" => Value::from(task.title.as_str()),
        "description" => optional_text(task.description.as_deref()),
        "priority" => Value::from(task.priority.as_str()),
        "tags" => Value::from(task.tags.clone()),
        "estimationMin" => Value::from(task.estimation_min),
        "dueAt" => optional_text(task.due_at.as_deref()),
        "status" => Value::from(task.status.as_str()),
        _ => Value::Null,
    }
}

fn optional_text(value: Option<&str>) -> Value {
    value.map_or(Value::Null, Value::from)
}
