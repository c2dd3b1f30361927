//! Task domain model.
//!
//! # Responsibility
//! - Define the task record, its enums and the optional supervisor block.
//! - Provide collaborator-side input normalization and validation helpers.
//!
//! # Invariants
//! - `id` is opaque and never reused for another task.
//! - `created_at` is set once at creation and never changed.
//! - `tags` hold lowercase values; duplicates are only removed by
//!   [`TaskInput::normalized`], not enforced on the stored record.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Opaque task identifier.
///
/// Engine-created ids are UUID v4 strings, imported ids are kept verbatim.
pub type TaskId = String;

/// Minimum title length after trimming.
pub const TITLE_MIN_CHARS: usize = 3;
/// Upper bound accepted by [`TaskInput::validate`] for estimations.
pub const ESTIMATION_MAX_MIN: u32 = 10_000;
/// Inclusive upper bound of a supervisor score.
pub const SCORE_MAX: f64 = 10.0;

/// Task priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::Low, Priority::Medium, Priority::High];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    /// Parses the lowercase wire name.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "low" => Some(Self::Low),
            "medium" => Some(Self::Medium),
            "high" => Some(Self::High),
            _ => None,
        }
    }
}

/// One of the three fixed board columns.
///
/// The same value doubles as the task workflow status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnId {
    Todo,
    Doing,
    Done,
}

impl ColumnId {
    /// Columns in board order. Duplicate resolution scans in this order.
    pub const ALL: [ColumnId; 3] = [ColumnId::Todo, ColumnId::Doing, ColumnId::Done];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Todo => "todo",
            Self::Doing => "doing",
            Self::Done => "done",
        }
    }

    /// Parses the lowercase wire name.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "todo" => Some(Self::Todo),
            "doing" => Some(Self::Doing),
            "done" => Some(Self::Done),
            _ => None,
        }
    }
}

impl Display for ColumnId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

/// Secondary review data attached by a supervisor.
///
/// Not part of the workflow fields: never diffed or snapshotted by audit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupervisorNote {
    #[serde(alias = "javiNotes")]
    pub notes: String,
    /// `None` means not reviewed yet. Serialized as `null`.
    #[serde(default)]
    pub score: Option<f64>,
    pub comment: String,
}

impl SupervisorNote {
    pub fn is_reviewed(&self) -> bool {
        self.score.is_some()
    }
}

/// Canonical task record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub priority: Priority,
    pub tags: Vec<String>,
    /// Positive estimation in minutes.
    pub estimation_min: u32,
    /// RFC 3339 creation timestamp.
    pub created_at: String,
    /// Date (`YYYY-MM-DD`) or RFC 3339 timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_at: Option<String>,
    pub status: ColumnId,
    #[serde(default, alias = "god", skip_serializing_if = "Option::is_none")]
    pub supervisor: Option<SupervisorNote>,
}

/// Input payload for create/update operations.
///
/// The board store does not validate input; form collaborators call
/// [`TaskInput::validate`] before submitting.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskInput {
    pub title: String,
    pub description: Option<String>,
    pub priority: Priority,
    pub tags: Vec<String>,
    pub estimation_min: u32,
    pub due_at: Option<String>,
    pub status: ColumnId,
    /// `None` on update keeps the existing annotation.
    pub supervisor: Option<SupervisorNote>,
}

impl TaskInput {
    /// Minimal input with defaults for optional fields.
    pub fn new(title: impl Into<String>, priority: Priority, estimation_min: u32) -> Self {
        Self {
            title: title.into(),
            description: None,
            priority,
            tags: Vec::new(),
            estimation_min,
            due_at: None,
            status: ColumnId::Todo,
            supervisor: None,
        }
    }

    pub fn with_status(mut self, status: ColumnId) -> Self {
        self.status = status;
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_due_at(mut self, due_at: impl Into<String>) -> Self {
        self.due_at = Some(due_at.into());
        self
    }

    pub fn with_supervisor(mut self, note: SupervisorNote) -> Self {
        self.supervisor = Some(note);
        self
    }

    /// Returns a copy with trimmed text fields and normalized tags.
    ///
    /// - Blank description / due date become `None`.
    /// - Tags are trimmed, lowercased, blank ones dropped, duplicates removed
    ///   keeping the first occurrence.
    pub fn normalized(&self) -> Self {
        let mut tags: Vec<String> = Vec::with_capacity(self.tags.len());
        for raw in &self.tags {
            if let Some(tag) = normalize_tag(raw) {
                if !tags.contains(&tag) {
                    tags.push(tag);
                }
            }
        }

        Self {
            title: self.title.trim().to_string(),
            description: non_blank(self.description.as_deref()),
            priority: self.priority,
            tags,
            estimation_min: self.estimation_min,
            due_at: non_blank(self.due_at.as_deref()),
            status: self.status,
            supervisor: self.supervisor.clone(),
        }
    }

    /// Validates form-level constraints.
    ///
    /// # Errors
    /// - Title shorter than [`TITLE_MIN_CHARS`] after trim.
    /// - Estimation outside `1..=ESTIMATION_MAX_MIN`.
    /// - Supervisor score outside `[0, SCORE_MAX]` or not finite.
    pub fn validate(&self) -> Result<(), TaskValidationError> {
        if self.title.trim().chars().count() < TITLE_MIN_CHARS {
            return Err(TaskValidationError::TitleTooShort);
        }
        if self.estimation_min == 0 || self.estimation_min > ESTIMATION_MAX_MIN {
            return Err(TaskValidationError::EstimationOutOfRange(self.estimation_min));
        }
        if let Some(score) = self.supervisor.as_ref().and_then(|note| note.score) {
            if !score.is_finite() || !(0.0..=SCORE_MAX).contains(&score) {
                return Err(TaskValidationError::ScoreOutOfRange(score));
            }
        }
        Ok(())
    }
}

/// Form-level validation failure for [`TaskInput`].
#[derive(Debug, Clone, PartialEq)]
pub enum TaskValidationError {
    TitleTooShort,
    EstimationOutOfRange(u32),
    ScoreOutOfRange(f64),
}

impl Display for TaskValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TitleTooShort => write!(
                f,
                "title must have at least {TITLE_MIN_CHARS} characters"
            ),
            Self::EstimationOutOfRange(value) => write!(
                f,
                "estimation must be between 1 and {ESTIMATION_MAX_MIN} minutes, got {value}"
            ),
            Self::ScoreOutOfRange(value) => {
                write!(f, "score must be between 0 and {SCORE_MAX}, got {value}")
            }
        }
    }
}

impl Error for TaskValidationError {}

/// Normalizes one tag: trimmed and lowercased, `None` when blank.
pub fn normalize_tag(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_lowercase())
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(ToString::to_string)
}

#[cfg(test)]
mod tests {
    use super::{normalize_tag, ColumnId, Priority, SupervisorNote, TaskInput, TaskValidationError};

    #[test]
    fn normalized_trims_text_and_dedups_tags() {
        let input = TaskInput::new("  Fix treadmill  ", Priority::High, 30)
            .with_description("   ")
            .with_due_at("")
            .with_tags([" Urgent", "urgent", "", "Gym "]);

        let normalized = input.normalized();
        assert_eq!(normalized.title, "Fix treadmill");
        assert_eq!(normalized.description, None);
        assert_eq!(normalized.due_at, None);
        assert_eq!(normalized.tags, vec!["urgent".to_string(), "gym".to_string()]);
    }

    #[test]
    fn validate_rejects_short_title_and_bad_estimation() {
        let short = TaskInput::new(" ab ", Priority::Low, 10);
        assert_eq!(short.validate(), Err(TaskValidationError::TitleTooShort));

        let zero = TaskInput::new("Valid title", Priority::Low, 0);
        assert_eq!(
            zero.validate(),
            Err(TaskValidationError::EstimationOutOfRange(0))
        );
    }

    #[test]
    fn validate_checks_supervisor_score_range() {
        let note = SupervisorNote {
            notes: String::new(),
            score: Some(10.5),
            comment: String::new(),
        };
        let input = TaskInput::new("Valid title", Priority::Medium, 15).with_supervisor(note);
        assert!(matches!(
            input.validate(),
            Err(TaskValidationError::ScoreOutOfRange(_))
        ));
    }

    #[test]
    fn enums_roundtrip_wire_names() {
        for column in ColumnId::ALL {
            assert_eq!(ColumnId::parse(column.as_str()), Some(column));
        }
        for priority in Priority::ALL {
            assert_eq!(Priority::parse(priority.as_str()), Some(priority));
        }
        assert_eq!(ColumnId::parse("in_progress"), None);
    }

    #[test]
    fn normalize_tag_rejects_blank() {
        assert_eq!(normalize_tag("  "), None);
        assert_eq!(normalize_tag(" ReAct "), Some("react".to_string()));
    }
}
