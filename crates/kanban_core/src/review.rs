//! Supervisor review summary over a set of tasks.

use crate::model::board::BoardState;
use crate::model::task::{ColumnId, Task};

/// Unreviewed titles kept for display.
pub const UNREVIEWED_PREVIEW_LIMIT: usize = 6;

#[derive(Debug, Clone, PartialEq)]
pub struct SupervisorSummary {
    pub reviewed: usize,
    pub unreviewed: usize,
    /// Mean score rounded to one decimal; `None` when nothing is reviewed.
    pub average_score: Option<f64>,
    /// First unreviewed titles, at most [`UNREVIEWED_PREVIEW_LIMIT`].
    pub unreviewed_titles: Vec<String>,
}

impl SupervisorSummary {
    /// Summarizes `tasks` in iteration order. A task without a supervisor
    /// block counts as unreviewed.
    pub fn from_tasks<'a, I>(tasks: I) -> Self
    where
        I: IntoIterator<Item = &'a Task>,
    {
        let mut reviewed = 0usize;
        let mut unreviewed = 0usize;
        let mut score_sum = 0.0f64;
        let mut unreviewed_titles = Vec::new();

        for task in tasks {
            match task.supervisor.as_ref().and_then(|note| note.score) {
                Some(score) => {
                    reviewed += 1;
                    score_sum += score;
                }
                None => {
                    unreviewed += 1;
                    if unreviewed_titles.len() < UNREVIEWED_PREVIEW_LIMIT {
                        unreviewed_titles.push(task.title.clone());
                    }
                }
            }
        }

        let average_score =
            (reviewed > 0).then(|| (score_sum / reviewed as f64 * 10.0).round() / 10.0);

        Self {
            reviewed,
            unreviewed,
            average_score,
            unreviewed_titles,
        }
    }

    /// Summarizes a board in column order (todo, doing, done).
    pub fn from_board(state: &BoardState) -> Self {
        Self::from_tasks(
            ColumnId::ALL
                .into_iter()
                .flat_map(|column| state.tasks_in(column)),
        )
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        let average = self
            .average_score
            .map(|avg| format!("{avg}/10"))
            .unwrap_or_else(|| "-".to_string());
        out.push_str(&format!("average: {average}\n"));
        out.push_str(&format!("reviewed: {}\n", self.reviewed));
        out.push_str(&format!("unreviewed: {}\n", self.unreviewed));
        if self.unreviewed == 0 {
            out.push_str("all tasks reviewed\n");
            return out;
        }
        for title in &self.unreviewed_titles {
            out.push_str(&format!("  - {title}\n"));
        }
        if self.unreviewed > self.unreviewed_titles.len() {
            out.push_str("  - …\n");
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::SupervisorSummary;
    use crate::model::task::{ColumnId, Priority, SupervisorNote, Task};

    fn task(title: &str, score: Option<Option<f64>>) -> Task {
        Task {
            id: title.to_lowercase(),
            title: title.to_string(),
            description: None,
            priority: Priority::Low,
            tags: Vec::new(),
            estimation_min: 10,
            created_at: "2026-01-01T00:00:00.000Z".to_string(),
            due_at: None,
            status: ColumnId::Todo,
            supervisor: score.map(|score| SupervisorNote {
                notes: String::new(),
                score,
                comment: String::new(),
            }),
        }
    }

    #[test]
    fn average_is_rounded_to_one_decimal() {
        let tasks = vec![
            task("Alpha", Some(Some(7.0))),
            task("Beta", Some(Some(8.0))),
            task("Gamma", Some(Some(8.0))),
            task("Delta", Some(None)),
            task("Epsilon", None),
        ];
        let summary = SupervisorSummary::from_tasks(&tasks);
        assert_eq!(summary.reviewed, 3);
        assert_eq!(summary.unreviewed, 2);
        assert_eq!(summary.average_score, Some(7.7));
        assert_eq!(summary.unreviewed_titles, vec!["Delta", "Epsilon"]);
    }

    #[test]
    fn preview_is_capped_and_empty_set_has_no_average() {
        let tasks: Vec<Task> = (0..8).map(|n| task(&format!("Task {n}"), None)).collect();
        let summary = SupervisorSummary::from_tasks(&tasks);
        assert_eq!(summary.unreviewed_titles.len(), 6);
        assert_eq!(summary.average_score, None);
        assert!(summary.render().contains("…"));
    }

    #[test]
    fn render_lists_counts_then_pending_titles() {
        let tasks = vec![task("Alpha", Some(Some(9.0))), task("Beta", None)];
        assert_eq!(
            SupervisorSummary::from_tasks(&tasks).render(),
            "average: 9/10\nreviewed: 1\nunreviewed: 1\n  - Beta\n"
        );

        let reviewed = vec![task("Alpha", Some(Some(6.5)))];
        assert_eq!(
            SupervisorSummary::from_tasks(&reviewed).render(),
            "average: 6.5/10\nreviewed: 1\nunreviewed: 0\nall tasks reviewed\n"
        );
    }
}
