//! Board aggregate: task map, ordered columns and audit log.
//!
//! # Invariants
//! - Column order is significant (display and drag order).
//! - `audit_log` is ordered newest first.

use crate::model::audit::AuditEvent;
use crate::model::task::{ColumnId, Task, TaskId};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// The three ordered task-id sequences.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Columns {
    pub todo: Vec<TaskId>,
    pub doing: Vec<TaskId>,
    pub done: Vec<TaskId>,
}

impl Columns {
    pub fn get(&self, column: ColumnId) -> &Vec<TaskId> {
        match column {
            ColumnId::Todo => &self.todo,
            ColumnId::Doing => &self.doing,
            ColumnId::Done => &self.done,
        }
    }

    pub fn get_mut(&mut self, column: ColumnId) -> &mut Vec<TaskId> {
        match column {
            ColumnId::Todo => &mut self.todo,
            ColumnId::Doing => &mut self.doing,
            ColumnId::Done => &mut self.done,
        }
    }

    /// Returns the first column (in board order) containing `id`.
    pub fn column_of(&self, id: &str) -> Option<ColumnId> {
        ColumnId::ALL
            .into_iter()
            .find(|column| self.get(*column).iter().any(|entry| entry == id))
    }

    /// Removes every occurrence of `id` from every column.
    pub fn remove_everywhere(&mut self, id: &str) {
        for column in ColumnId::ALL {
            self.get_mut(column).retain(|entry| entry != id);
        }
    }

    /// Iterates `(column, ids)` pairs in board order.
    pub fn iter(&self) -> impl Iterator<Item = (ColumnId, &[TaskId])> {
        ColumnId::ALL
            .into_iter()
            .map(move |column| (column, self.get(column).as_slice()))
    }

    pub fn len(&self) -> usize {
        self.todo.len() + self.doing.len() + self.done.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Canonical board state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardState {
    pub tasks: BTreeMap<TaskId, Task>,
    pub columns: Columns,
    #[serde(default)]
    pub audit_log: Vec<AuditEvent>,
}

impl BoardState {
    /// Empty board used when nothing is persisted yet.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn task(&self, id: &str) -> Option<&Task> {
        self.tasks.get(id)
    }

    /// Tasks of one column in column order. Dangling ids are skipped.
    pub fn tasks_in(&self, column: ColumnId) -> Vec<&Task> {
        self.columns
            .get(column)
            .iter()
            .filter_map(|id| self.tasks.get(id))
            .collect()
    }

    /// Keeps the newest `cap` audit events.
    pub fn truncate_audit_log(&mut self, cap: usize) {
        self.audit_log.truncate(cap);
    }

    /// Checks the column/task consistency invariant.
    ///
    /// Returns one message per violation; `Ok` when every column id exists,
    /// appears exactly once on the board and matches its task status.
    pub fn check_consistency(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();
        let mut seen: HashSet<&str> = HashSet::new();

        for (column, ids) in self.columns.iter() {
            for (index, id) in ids.iter().enumerate() {
                if !seen.insert(id.as_str()) {
                    errors.push(format!("columns.{column}[{index}] repeats id \"{id}\""));
                }
                match self.tasks.get(id) {
                    None => errors.push(format!(
                        "columns.{column}[{index}] references unknown id \"{id}\""
                    )),
                    Some(task) if task.status != column => errors.push(format!(
                        "task \"{id}\" has status {} but sits in {column}",
                        task.status
                    )),
                    Some(_) => {}
                }
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
