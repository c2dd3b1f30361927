//! Compiles a [`ParsedQuery`] into a task predicate.
//!
//! # Invariants
//! - Due-date windows use calendar days in local time; the reference day is
//!   injected so evaluation is deterministic.
//! - Tasks without a parsable due date never match a due filter.

use crate::model::task::Task;
use crate::query::parser::{DueFilter, ParsedQuery};
use chrono::{DateTime, Days, Local, NaiveDate, NaiveDateTime};
use std::collections::HashSet;

const DUE_WEEK_DAYS: u64 = 7;

/// Task-matching predicate built from a parsed query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskPredicate {
    query: ParsedQuery,
    today: NaiveDate,
}

impl TaskPredicate {
    /// Builds a predicate evaluating due filters relative to `today`.
    pub fn new(query: ParsedQuery, today: NaiveDate) -> Self {
        Self { query, today }
    }

    /// Builds a predicate relative to the current local date.
    pub fn for_today(query: ParsedQuery) -> Self {
        Self::new(query, Local::now().date_naive())
    }

    pub fn query(&self) -> &ParsedQuery {
        &self.query
    }

    /// Returns whether `task` satisfies every recognized filter.
    pub fn matches(&self, task: &Task) -> bool {
        if !self.matches_text(task) {
            return false;
        }

        if !self.query.tags.is_empty() {
            let task_tags = task
                .tags
                .iter()
                .map(|tag| tag.trim().to_lowercase())
                .collect::<HashSet<_>>();
            if !self.query.tags.iter().all(|tag| task_tags.contains(tag)) {
                return false;
            }
        }

        if let Some(priority) = self.query.priority {
            if task.priority != priority {
                return false;
            }
        }

        if let Some(est) = self.query.est {
            if !est.matches(task.estimation_min) {
                return false;
            }
        }

        if let Some(due) = self.query.due {
            if !self.matches_due(task, due) {
                return false;
            }
        }

        true
    }

    fn matches_text(&self, task: &Task) -> bool {
        let needle = self.query.text.as_str();
        if needle.is_empty() {
            return true;
        }
        let haystack = format!(
            "{} {}",
            task.title,
            task.description.as_deref().unwrap_or_default()
        )
        .to_lowercase();
        haystack.contains(needle)
    }

    fn matches_due(&self, task: &Task, due: DueFilter) -> bool {
        let Some(due_date) = task.due_at.as_deref().and_then(parse_due_date) else {
            return false;
        };

        match due {
            DueFilter::Overdue => due_date < self.today,
            DueFilter::Week => {
                let Some(week_end) = self.today.checked_add_days(Days::new(DUE_WEEK_DAYS)) else {
                    return false;
                };
                due_date >= self.today && due_date <= week_end
            }
        }
    }
}

/// Parses a due value into a local calendar date.
///
/// Accepts `YYYY-MM-DD`, RFC 3339 timestamps (converted to local time) and
/// naive `YYYY-MM-DDTHH:MM[:SS]` values.
pub fn parse_due_date(raw: &str) -> Option<NaiveDate> {
    let value = raw.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Some(date);
    }

    if let Ok(timestamp) = DateTime::parse_from_rfc3339(value) {
        return Some(timestamp.with_timezone(&Local).date_naive());
    }

    ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .map(|timestamp| timestamp.date())
}

#[cfg(test)]
mod tests {
    use super::{parse_due_date, TaskPredicate};
    use crate::model::task::{ColumnId, Priority, Task};
    use crate::query::parser::parse_query;
    use chrono::NaiveDate;

    fn task(title: &str, due_at: Option<&str>) -> Task {
        Task {
            id: title.to_string(),
            title: title.to_string(),
            description: Some("Belt SLIPS at speed".to_string()),
            priority: Priority::Medium,
            tags: vec!["Gym".to_string()],
            estimation_min: 30,
            created_at: "2026-01-01T00:00:00.000Z".to_string(),
            due_at: due_at.map(ToString::to_string),
            status: ColumnId::Todo,
            supervisor: None,
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 5, 10).expect("valid date")
    }

    #[test]
    fn free_text_matches_title_and_description_case_insensitively() {
        let predicate = TaskPredicate::new(parse_query("belt slips"), today());
        assert!(predicate.matches(&task("Treadmill", None)));
        let predicate = TaskPredicate::new(parse_query("rowing"), today());
        assert!(!predicate.matches(&task("Treadmill", None)));
    }

    #[test]
    fn stored_tags_are_normalized_before_matching() {
        let predicate = TaskPredicate::new(parse_query("tag:gym"), today());
        assert!(predicate.matches(&task("Treadmill", None)));
    }

    #[test]
    fn overdue_is_strictly_before_today() {
        let predicate = TaskPredicate::new(parse_query("due:overdue"), today());
        assert!(predicate.matches(&task("late", Some("2026-05-09"))));
        assert!(!predicate.matches(&task("today", Some("2026-05-10"))));
        assert!(!predicate.matches(&task("none", None)));
        assert!(!predicate.matches(&task("garbage", Some("someday"))));
    }

    #[test]
    fn parse_due_date_accepts_supported_shapes() {
        let expected = NaiveDate::from_ymd_opt(2026, 5, 17);
        assert_eq!(parse_due_date("2026-05-17"), expected);
        assert_eq!(parse_due_date(" 2026-05-17T09:30 "), expected);
        assert_eq!(parse_due_date("2026-05-17T09:30:00"), expected);
        assert_eq!(parse_due_date(""), None);
        assert_eq!(parse_due_date("17/05/2026"), None);
    }
}
