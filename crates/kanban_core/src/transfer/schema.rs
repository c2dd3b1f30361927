//! Structural validation of board documents.
//!
//! Walks the raw JSON tree and collects every independently detectable
//! violation as `path: reason`, with dotted paths (`tasks.t1.title`,
//! `auditLog.0.action`) and `root` for the top level.

use crate::model::audit::AuditAction;
use crate::model::task::{ColumnId, Priority, SCORE_MAX, TITLE_MIN_CHARS};
use serde_json::{Map, Value};

const COLUMN_KEYS: [&str; 3] = ["todo", "doing", "done"];

/// Returns one message per structural violation; empty when valid.
pub fn validate_document(document: &Value) -> Vec<String> {
    let mut issues = Issues::default();

    let Some(root) = document.as_object() else {
        issues.push("", format!("expected object, received {}", kind_of(document)));
        return issues.into_messages();
    };

    match root.get("tasks") {
        None => issues.push("tasks", "required"),
        Some(Value::Object(tasks)) => {
            for (key, task) in tasks {
                validate_task(&child("tasks", key), key, task, &mut issues);
            }
        }
        Some(other) => issues.push(
            "tasks",
            format!("expected object, received {}", kind_of(other)),
        ),
    }

    match root.get("columns") {
        None => issues.push("columns", "required"),
        Some(Value::Object(columns)) => validate_columns(columns, &mut issues),
        Some(other) => issues.push(
            "columns",
            format!("expected object, received {}", kind_of(other)),
        ),
    }

    match root.get("auditLog") {
        None => issues.push("auditLog", "required"),
        Some(Value::Array(events)) => {
            for (index, event) in events.iter().enumerate() {
                validate_event(&child("auditLog", &index.to_string()), event, &mut issues);
            }
        }
        Some(other) => issues.push(
            "auditLog",
            format!("expected array, received {}", kind_of(other)),
        ),
    }

    issues.into_messages()
}

fn validate_task(path: &str, key: &str, value: &Value, issues: &mut Issues) {
    let Some(task) = value.as_object() else {
        issues.push(path, format!("expected object, received {}", kind_of(value)));
        return;
    };

    if let Some(id) = required_string(path, task, "id", 1, issues) {
        if id != key {
            issues.push(&child(path, "id"), format!("must match its map key `{key}`"));
        }
    }

    if let Some(title) = required_string(path, task, "title", 0, issues) {
        if title.trim().chars().count() < TITLE_MIN_CHARS {
            issues.push(
                &child(path, "title"),
                format!("must contain at least {TITLE_MIN_CHARS} character(s)"),
            );
        }
    }

    optional_string(path, task, "description", issues);
    required_enum(path, task, "priority", |raw| Priority::parse(raw).is_some(), "low|medium|high", issues);

    match task.get("tags") {
        None => issues.push(&child(path, "tags"), "required"),
        Some(Value::Array(tags)) => {
            for (index, tag) in tags.iter().enumerate() {
                if !tag.is_string() {
                    issues.push(
                        &child(&child(path, "tags"), &index.to_string()),
                        format!("expected string, received {}", kind_of(tag)),
                    );
                }
            }
        }
        Some(other) => issues.push(
            &child(path, "tags"),
            format!("expected array, received {}", kind_of(other)),
        ),
    }

    match task.get("estimationMin") {
        None => issues.push(&child(path, "estimationMin"), "required"),
        Some(Value::Number(number)) => match number.as_u64() {
            Some(minutes) if minutes >= 1 && minutes <= u64::from(u32::MAX) => {}
            Some(_) => issues.push(
                &child(path, "estimationMin"),
                "must be an integer between 1 and 4294967295",
            ),
            None => issues.push(
                &child(path, "estimationMin"),
                "expected positive integer",
            ),
        },
        Some(other) => issues.push(
            &child(path, "estimationMin"),
            format!("expected number, received {}", kind_of(other)),
        ),
    }

    required_string(path, task, "createdAt", 1, issues);
    optional_string(path, task, "dueAt", issues);
    required_enum(path, task, "status", |raw| ColumnId::parse(raw).is_some(), "todo|doing|done", issues);

    if task.contains_key("supervisor") && task.contains_key("god") {
        issues.push(&child(path, "god"), "conflicts with supervisor");
    }
    for key in ["supervisor", "god"] {
        if let Some(block) = task.get(key) {
            validate_supervisor(&child(path, key), block, issues);
        }
    }
}

fn validate_supervisor(path: &str, value: &Value, issues: &mut Issues) {
    let Some(block) = value.as_object() else {
        issues.push(path, format!("expected object, received {}", kind_of(value)));
        return;
    };

    if block.contains_key("notes") && block.contains_key("javiNotes") {
        issues.push(&child(path, "javiNotes"), "conflicts with notes");
    }
    let notes_key = if block.contains_key("notes") { "notes" } else { "javiNotes" };
    required_string(path, block, notes_key, 0, issues);
    required_string(path, block, "comment", 0, issues);

    match block.get("score") {
        None | Some(Value::Null) => {}
        Some(Value::Number(number)) => match number.as_f64() {
            Some(score) if (0.0..=SCORE_MAX).contains(&score) => {}
            _ => issues.push(
                &child(path, "score"),
                format!("must be between 0 and {SCORE_MAX}"),
            ),
        },
        Some(other) => issues.push(
            &child(path, "score"),
            format!("expected number or null, received {}", kind_of(other)),
        ),
    }
}

fn validate_columns(columns: &Map<String, Value>, issues: &mut Issues) {
    for key in COLUMN_KEYS {
        let path = child("columns", key);
        match columns.get(key) {
            None => issues.push(&path, "required"),
            Some(Value::Array(ids)) => {
                for (index, id) in ids.iter().enumerate() {
                    if !id.is_string() {
                        issues.push(
                            &child(&path, &index.to_string()),
                            format!("expected string, received {}", kind_of(id)),
                        );
                    }
                }
            }
            Some(other) => {
                issues.push(&path, format!("expected array, received {}", kind_of(other)))
            }
        }
    }

    for key in columns.keys() {
        if !COLUMN_KEYS.contains(&key.as_str()) {
            issues.push(
                &child("columns", key),
                "unknown column; expected todo|doing|done",
            );
        }
    }
}

fn validate_event(path: &str, value: &Value, issues: &mut Issues) {
    let Some(event) = value.as_object() else {
        issues.push(path, format!("expected object, received {}", kind_of(value)));
        return;
    };

    required_string(path, event, "id", 1, issues);
    required_string(path, event, "timestamp", 1, issues);
    required_enum(
        path,
        event,
        "action",
        |raw| AuditAction::parse(raw).map(AuditAction::as_str) == Some(raw),
        "CREATE|UPDATE|DELETE|MOVE",
        issues,
    );
    required_string(path, event, "taskId", 1, issues);
    required_string(path, event, "userLabel", 1, issues);

    match event.get("diff") {
        None => {}
        Some(Value::Object(diff)) => {
            for side in ["before", "after"] {
                match diff.get(side) {
                    None | Some(Value::Object(_)) => {}
                    Some(other) => issues.push(
                        &child(&child(path, "diff"), side),
                        format!("expected object, received {}", kind_of(other)),
                    ),
                }
            }
        }
        Some(other) => issues.push(
            &child(path, "diff"),
            format!("expected object, received {}", kind_of(other)),
        ),
    }
}

fn required_string<'a>(
    path: &str,
    object: &'a Map<String, Value>,
    key: &str,
    min_chars: usize,
    issues: &mut Issues,
) -> Option<&'a str> {
    let field = child(path, key);
    match object.get(key) {
        None => {
            issues.push(&field, "required");
            None
        }
        Some(Value::String(text)) => {
            if text.chars().count() < min_chars {
                issues.push(&field, format!("must contain at least {min_chars} character(s)"));
                None
            } else {
                Some(text.as_str())
            }
        }
        Some(other) => {
            issues.push(&field, format!("expected string, received {}", kind_of(other)));
            None
        }
    }
}

fn optional_string(path: &str, object: &Map<String, Value>, key: &str, issues: &mut Issues) {
    match object.get(key) {
        None | Some(Value::String(_)) => {}
        Some(other) => issues.push(
            &child(path, key),
            format!("expected string, received {}", kind_of(other)),
        ),
    }
}

fn required_enum(
    path: &str,
    object: &Map<String, Value>,
    key: &str,
    accepts: impl Fn(&str) -> bool,
    expected: &str,
    issues: &mut Issues,
) {
    let field = child(path, key);
    match object.get(key) {
        None => issues.push(&field, "required"),
        Some(Value::String(raw)) if accepts(raw) => {}
        Some(Value::String(raw)) => {
            issues.push(&field, format!("invalid value `{raw}`; expected {expected}"))
        }
        Some(other) => issues.push(
            &field,
            format!("expected string, received {}", kind_of(other)),
        ),
    }
}

fn child(path: &str, key: &str) -> String {
    if path.is_empty() {
        key.to_string()
    } else {
        format!("{path}.{key}")
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[derive(Debug, Default)]
struct Issues {
    items: Vec<String>,
}

impl Issues {
    fn push(&mut self, path: &str, reason: impl Into<String>) {
        let path = if path.is_empty() { "root" } else { path };
        self.items.push(format!("{path}: {}", reason.into()));
    }

    fn into_messages(self) -> Vec<String> {
        self.items
    }
}

#[cfg(test)]
mod tests {
    use super::validate_document;
    use serde_json::json;

    fn valid_task(id: &str) -> serde_json::Value {
        json!({
            "id": id,
            "title": "Replace mats",
            "priority": "medium",
            "tags": ["gym"],
            "estimationMin": 45,
            "createdAt": "2026-01-01T00:00:00.000Z",
            "status": "todo"
        })
    }

    #[test]
    fn valid_document_has_no_issues() {
        let document = json!({
            "tasks": { "t1": valid_task("t1") },
            "columns": { "todo": ["t1"], "doing": [], "done": [] },
            "auditLog": []
        });
        assert!(validate_document(&document).is_empty());
    }

    #[test]
    fn legacy_aliases_conflict_with_current_keys() {
        let mut task = valid_task("t1");
        task["supervisor"] = json!({ "notes": "a", "javiNotes": "b", "score": null, "comment": "" });
        task["god"] = json!({ "javiNotes": "old", "score": null, "comment": "" });
        let document = json!({
            "tasks": { "t1": task },
            "columns": { "todo": ["t1"], "doing": [], "done": [] },
            "auditLog": []
        });

        let issues = validate_document(&document);
        assert_eq!(
            issues,
            vec![
                "tasks.t1.god: conflicts with supervisor".to_string(),
                "tasks.t1.supervisor.javiNotes: conflicts with notes".to_string(),
            ]
        );
    }

    #[test]
    fn non_object_root_is_reported_at_root() {
        let issues = validate_document(&json!([1, 2]));
        assert_eq!(issues, vec!["root: expected object, received array".to_string()]);
    }

    #[test]
    fn collects_every_independent_violation() {
        let mut bad = valid_task("t1");
        bad["title"] = json!("ab");
        bad["estimationMin"] = json!(0);
        bad["priority"] = json!("urgent");
        bad["supervisor"] = json!({ "notes": "", "score": 11, "comment": "" });

        let document = json!({
            "tasks": { "t1": bad },
            "columns": { "todo": [], "doing": [7], "backlog": [] },
            "auditLog": [{ "id": "e1", "timestamp": "x", "action": "RENAME", "taskId": "t1", "userLabel": "User" }]
        });

        let issues = validate_document(&document);
        let expected = [
            "tasks.t1.title:",
            "tasks.t1.priority:",
            "tasks.t1.estimationMin:",
            "tasks.t1.supervisor.score:",
            "columns.doing.0:",
            "columns.done: required",
            "columns.backlog:",
            "auditLog.0.action:",
        ];
        for prefix in expected {
            assert!(
                issues.iter().any(|issue| issue.starts_with(prefix)),
                "missing issue {prefix}: {issues:?}"
            );
        }
        assert_eq!(issues.len(), expected.len());
    }

    #[test]
    fn task_id_must_match_map_key() {
        let document = json!({
            "tasks": { "t1": valid_task("other") },
            "columns": { "todo": [], "doing": [], "done": [] },
            "auditLog": []
        });
        let issues = validate_document(&document);
        assert_eq!(issues.len(), 1);
        assert!(issues[0].starts_with("tasks.t1.id:"));
    }

    #[test]
    fn fractional_estimation_is_rejected() {
        let mut task = valid_task("t1");
        task["estimationMin"] = json!(12.5);
        let document = json!({
            "tasks": { "t1": task },
            "columns": { "todo": [], "doing": [], "done": [] },
            "auditLog": []
        });
        let issues = validate_document(&document);
        assert_eq!(issues, vec!["tasks.t1.estimationMin: expected positive integer".to_string()]);
    }
}
