//! Audit log filtering and summaries for review surfaces.

use crate::model::audit::{AuditAction, AuditEvent};

/// Events listed under "recent" in a summary by default.
pub const DEFAULT_RECENT_LIMIT: usize = 5;
const DIFF_SUMMARY_KEYS: usize = 3;

/// Filter over the retained audit log.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuditFilter {
    /// `None` keeps every action.
    pub action: Option<AuditAction>,
    /// Substring matched against `task_id`; blank keeps everything.
    pub task_id_fragment: String,
}

impl AuditFilter {
    pub fn matches(&self, event: &AuditEvent) -> bool {
        let action_ok = self.action.map_or(true, |action| event.action == action);
        let fragment = self.task_id_fragment.trim();
        let task_ok = fragment.is_empty() || event.task_id.contains(fragment);
        action_ok && task_ok
    }

    /// Matching events, keeping log order (newest first).
    pub fn apply<'a>(&self, events: &'a [AuditEvent]) -> Vec<&'a AuditEvent> {
        events.iter().filter(|event| self.matches(event)).collect()
    }
}

/// Per-action counts plus the most recent events.
#[derive(Debug, Clone, PartialEq)]
pub struct AuditSummary {
    pub creates: usize,
    pub updates: usize,
    pub moves: usize,
    pub deletes: usize,
    pub recent: Vec<AuditEvent>,
}

impl AuditSummary {
    /// Summarizes `events`, which are expected newest first.
    pub fn from_events<'a, I>(events: I, recent_limit: usize) -> Self
    where
        I: IntoIterator<Item = &'a AuditEvent>,
    {
        let mut summary = Self {
            creates: 0,
            updates: 0,
            moves: 0,
            deletes: 0,
            recent: Vec::new(),
        };

        for event in events {
            match event.action {
                AuditAction::Create => summary.creates += 1,
                AuditAction::Update => summary.updates += 1,
                AuditAction::Move => summary.moves += 1,
                AuditAction::Delete => summary.deletes += 1,
            }
            if summary.recent.len() < recent_limit {
                summary.recent.push(event.clone());
            }
        }

        summary
    }

    pub fn count(&self, action: AuditAction) -> usize {
        match action {
            AuditAction::Create => self.creates,
            AuditAction::Update => self.updates,
            AuditAction::Move => self.moves,
            AuditAction::Delete => self.deletes,
        }
    }

    pub fn total(&self) -> usize {
        self.creates + self.updates + self.moves + self.deletes
    }

    /// Plain-text report suitable for clipboard export.
    pub fn render(&self) -> String {
        let mut out = String::from("Audit summary\n");
        for action in AuditAction::ALL {
            out.push_str(&format!("- {action}: {}\n", self.count(action)));
        }
        out.push_str("\nRecent:\n");
        let recent = self
            .recent
            .iter()
            .map(|event| {
                format!(
                    "- {} {} ({})",
                    event.action,
                    event.task_id,
                    format_timestamp(&event.timestamp)
                )
            })
            .collect::<Vec<_>>();
        out.push_str(&recent.join("\n"));
        out
    }
}

/// Short description of what an event changed.
///
/// MOVE events read `status changed`; others list the first three changed
/// keys, with `…` when more exist, or `-` when nothing changed.
pub fn diff_summary(event: &AuditEvent) -> String {
    if event.action == AuditAction::Move {
        return "status changed".to_string();
    }

    let keys = event.diff.changed_keys();
    if keys.is_empty() {
        return "-".to_string();
    }

    let mut summary = keys
        .iter()
        .take(DIFF_SUMMARY_KEYS)
        .copied()
        .collect::<Vec<_>>()
        .join(", ");
    if keys.len() > DIFF_SUMMARY_KEYS {
        summary.push('…');
    }
    summary
}

/// `YYYY-MM-DD HH:MM:SS` view of an RFC 3339 timestamp.
pub fn format_timestamp(iso: &str) -> String {
    iso.replacen('T', " ", 1).chars().take(19).collect()
}
