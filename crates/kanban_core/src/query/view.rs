//! Filtered board projections.

use crate::model::board::BoardState;
use crate::model::task::{ColumnId, Task};
use crate::query::predicate::TaskPredicate;

/// Matching tasks of one column, in column order.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnView<'a> {
    pub column: ColumnId,
    pub tasks: Vec<&'a Task>,
}

impl ColumnView<'_> {
    /// Sum of estimation minutes over the visible tasks.
    pub fn total_estimation(&self) -> u64 {
        self.tasks
            .iter()
            .map(|task| u64::from(task.estimation_min))
            .sum()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

/// Applies `predicate` to every column of `state`.
///
/// Returns one view per column in board order, even when empty.
pub fn filter_board<'a>(state: &'a BoardState, predicate: &TaskPredicate) -> Vec<ColumnView<'a>> {
    ColumnId::ALL
        .into_iter()
        .map(|column| ColumnView {
            column,
            tasks: state
                .tasks_in(column)
                .into_iter()
                .filter(|task| predicate.matches(task))
                .collect(),
        })
        .collect()
}

/// Every task of the board matching `predicate`, in column order.
pub fn matching_tasks<'a>(state: &'a BoardState, predicate: &TaskPredicate) -> Vec<&'a Task> {
    filter_board(state, predicate)
        .into_iter()
        .flat_map(|view| view.tasks)
        .collect()
}
