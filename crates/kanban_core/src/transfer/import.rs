//! Board import pipeline.
//!
//! Steps, in order:
//! 1. parse JSON (`Malformed` on failure)
//! 2. structural validation (`Invalid`, all violations)
//! 3. referential integrity (`Integrity`, one message per dangling id)
//! 4. duplicate column reference repair (clone + fresh id, audited)
//! 5. referential integrity again on the repaired board

use crate::audit::recorder::{new_id, record_id_regeneration};
use crate::config::DEFAULT_USER_LABEL;
use crate::model::board::BoardState;
use crate::model::task::ColumnId;
use crate::transfer::schema::validate_document;
use log::{info, warn};
use serde_json::Value;
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Import rejection. Live state must stay untouched for every variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportError {
    /// Input is not parseable JSON.
    Malformed(String),
    /// Structural schema violations, `path: reason` each.
    Invalid(Vec<String>),
    /// Column references to ids missing from the task map.
    Integrity(Vec<String>),
}

impl ImportError {
    /// Itemized human-readable messages.
    pub fn messages(&self) -> Vec<String> {
        match self {
            Self::Malformed(message) => vec![message.clone()],
            Self::Invalid(errors) | Self::Integrity(errors) => errors.clone(),
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            Self::Malformed(_) => "malformed",
            Self::Invalid(_) => "invalid",
            Self::Integrity(_) => "integrity",
        }
    }
}

impl Display for ImportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Malformed(message) => write!(f, "malformed document: {message}"),
            Self::Invalid(errors) => {
                write!(f, "document failed validation with {} error(s)", errors.len())
            }
            Self::Integrity(errors) => write!(
                f,
                "document has {} dangling column reference(s)",
                errors.len()
            ),
        }
    }
}

impl Error for ImportError {}

/// Successful import: repaired board plus the number of regenerated ids.
///
/// The audit cap is not applied here; the store applies it on replacement.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportOutcome {
    pub state: BoardState,
    pub regenerated: usize,
}

impl ImportOutcome {
    /// One-line success notice for the user.
    pub fn notice(&self) -> String {
        import_notice(self.regenerated)
    }
}

/// Success notice for a given regenerated-id count.
pub fn import_notice(regenerated: usize) -> String {
    if regenerated == 0 {
        "Imported.".to_string()
    } else {
        format!(
            "Imported (regenerated {regenerated} duplicated id(s), recorded in the audit log)."
        )
    }
}

/// Imports with the default actor label on synthesized events.
pub fn import_board(raw: &str) -> Result<ImportOutcome, ImportError> {
    import_board_as(raw, DEFAULT_USER_LABEL)
}

/// Validates and repairs a raw document.
///
/// # Errors
/// - [`ImportError::Malformed`] when `raw` is not JSON.
/// - [`ImportError::Invalid`] with every structural violation.
/// - [`ImportError::Integrity`] with every dangling column reference.
pub fn import_board_as(raw: &str, user_label: &str) -> Result<ImportOutcome, ImportError> {
    let result = run_import(raw, user_label);
    match &result {
        Ok(outcome) => info!(
            "event=board_import module=transfer status=ok tasks={} regenerated={}",
            outcome.state.tasks.len(),
            outcome.regenerated
        ),
        Err(err) => warn!(
            "event=board_import module=transfer status=error error_code={} errors={}",
            err.kind(),
            err.messages().len()
        ),
    }
    result
}

fn run_import(raw: &str, user_label: &str) -> Result<ImportOutcome, ImportError> {
    let document: Value = serde_json::from_str(raw)
        .map_err(|err| ImportError::Malformed(format!("the file is not valid JSON ({err})")))?;

    let structural = validate_document(&document);
    if !structural.is_empty() {
        return Err(ImportError::Invalid(structural));
    }

    let candidate: BoardState = serde_json::from_value(document)
        .map_err(|err| ImportError::Invalid(vec![format!("root: {err}")]))?;

    let dangling = check_referential_integrity(&candidate);
    if !dangling.is_empty() {
        return Err(ImportError::Integrity(dangling));
    }

    let (mut repaired, regenerated) = resolve_duplicate_references(candidate, user_label);
    align_statuses(&mut repaired);

    let dangling = check_referential_integrity(&repaired);
    if !dangling.is_empty() {
        return Err(ImportError::Integrity(dangling));
    }

    Ok(ImportOutcome {
        state: repaired,
        regenerated,
    })
}

/// One message per column slot referencing an id absent from `tasks`.
pub fn check_referential_integrity(state: &BoardState) -> Vec<String> {
    let mut errors = Vec::new();
    for (column, ids) in state.columns.iter() {
        for (index, id) in ids.iter().enumerate() {
            if !state.tasks.contains_key(id) {
                errors.push(format!(
                    "columns.{column}[{index}] references id \"{id}\" that does not exist in tasks"
                ));
            }
        }
    }
    errors
}

/// Rewrites every non-first column reference to a cloned task.
///
/// Columns are scanned todo, doing, done; the first occurrence of an id keeps
/// it. Each later occurrence gets a clone of the original task with a fresh
/// id and the status of the column it sits in. One UPDATE event per
/// regenerated id is prepended to the audit log, in scan order.
pub fn resolve_duplicate_references(mut state: BoardState, user_label: &str) -> (BoardState, usize) {
    let mut seen: HashSet<String> = HashSet::new();
    let mut events = Vec::new();

    for column in ColumnId::ALL {
        let slots = state.columns.get(column).len();
        for index in 0..slots {
            let id = state.columns.get(column)[index].clone();
            if seen.insert(id.clone()) {
                continue;
            }

            let Some(original) = state.tasks.get(&id) else {
                continue;
            };

            let fresh_id = new_id();
            let mut clone = original.clone();
            clone.id = fresh_id.clone();
            clone.status = column;

            state.tasks.insert(fresh_id.clone(), clone);
            state.columns.get_mut(column)[index] = fresh_id.clone();
            events.push(record_id_regeneration(&id, &fresh_id, user_label));
            seen.insert(fresh_id);
        }
    }

    let regenerated = events.len();
    if regenerated > 0 {
        events.append(&mut state.audit_log);
        state.audit_log = events;
    }
    (state, regenerated)
}

/// Keeps the first `limit` messages and appends `…` when more exist.
pub fn capped_messages(messages: &[String], limit: usize) -> Vec<String> {
    let mut capped = messages.iter().take(limit).cloned().collect::<Vec<_>>();
    if messages.len() > limit {
        capped.push("…".to_string());
    }
    capped
}

fn align_statuses(state: &mut BoardState) {
    let BoardState { tasks, columns, .. } = state;
    for (column, ids) in columns.iter() {
        for id in ids {
            if let Some(task) = tasks.get_mut(id) {
                task.status = column;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{capped_messages, import_board, import_notice, ImportError};

    #[test]
    fn malformed_json_yields_single_message() {
        let err = import_board("{ not json").unwrap_err();
        assert!(matches!(err, ImportError::Malformed(_)));
        assert_eq!(err.messages().len(), 1);
    }

    #[test]
    fn capped_messages_appends_ellipsis() {
        let messages = (0..12).map(|i| format!("e{i}")).collect::<Vec<_>>();
        let capped = capped_messages(&messages, 10);
        assert_eq!(capped.len(), 11);
        assert_eq!(capped[10], "…");
        assert_eq!(capped_messages(&messages[..3], 10).len(), 3);
    }

    #[test]
    fn notice_mentions_regenerated_count() {
        assert_eq!(import_notice(0), "Imported.");
        assert!(import_notice(2).contains("regenerated 2"));
    }
}
