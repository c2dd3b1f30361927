//! Board store: the single owner of live board state.
//!
//! # Responsibility
//! - Expose create/update/delete/move/reorder as the only mutation surface.
//! - Apply the audit-log cap and notify the save hook after every change.
//!
//! # Invariants
//! - A mutation either swaps in a complete next state or leaves the current
//!   one untouched; no partial update is observable.
//! - Missing ids are silent no-ops: `false`, no audit entry, no hook call.
//! - `state().audit_log.len() <= config().audit_log_cap()` at all times.

use crate::config::BoardConfig;
use crate::model::board::BoardState;
use crate::model::task::{ColumnId, Task, TaskId, TaskInput};
use crate::query::parser::parse_query;
use crate::query::predicate::TaskPredicate;
use crate::query::view::{filter_board, ColumnView};
use crate::service::persistence::PersistenceAdapter;
use crate::store::transitions::{self, MoveRequest, ReorderRequest};
use crate::transfer::{export_board, import_board_as, ImportError};
use log::{debug, info};

/// Post-mutation callback, typically a persistence snapshot.
pub type SaveHook = Box<dyn FnMut(&BoardState) + Send>;

/// Explicit state container for one board.
pub struct BoardStore {
    state: BoardState,
    config: BoardConfig,
    save_hook: Option<SaveHook>,
}

impl BoardStore {
    /// Creates a store over `state`, trimming its audit log to the cap.
    pub fn new(mut state: BoardState, config: BoardConfig) -> Self {
        state.truncate_audit_log(config.audit_log_cap());
        Self {
            state,
            config,
            save_hook: None,
        }
    }

    /// Loads state from `adapter` and snapshots back to it after each mutation.
    pub fn open<A>(adapter: A, config: BoardConfig) -> Self
    where
        A: PersistenceAdapter + Send + 'static,
    {
        let state = adapter.load();
        info!(
            "event=store_open module=store status=ok tasks={} audit_events={}",
            state.tasks.len(),
            state.audit_log.len()
        );
        let hook: SaveHook = Box::new(move |next: &BoardState| adapter.save(next));
        Self::new(state, config).with_save_hook(hook)
    }

    pub fn with_save_hook(mut self, hook: SaveHook) -> Self {
        self.save_hook = Some(hook);
        self
    }

    pub fn state(&self) -> &BoardState {
        &self.state
    }

    pub fn into_state(self) -> BoardState {
        self.state
    }

    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    pub fn task(&self, id: &str) -> Option<&Task> {
        self.state.task(id)
    }

    /// Tasks of `column` in display order.
    pub fn tasks_in(&self, column: ColumnId) -> Vec<&Task> {
        self.state.tasks_in(column)
    }

    /// Creates a task at the front of its column and returns the new id.
    pub fn create_task(&mut self, input: &TaskInput) -> TaskId {
        let (next, id) = transitions::create_task(&self.state, input, self.config.user_label());
        debug!("event=task_create module=store status=ok task_id={id}");
        self.commit(next);
        id
    }

    pub fn update_task(&mut self, task_id: &str, input: &TaskInput) -> bool {
        let next = transitions::update_task(&self.state, task_id, input, self.config.user_label());
        self.apply("task_update", task_id, next)
    }

    pub fn delete_task(&mut self, task_id: &str) -> bool {
        let next = transitions::delete_task(&self.state, task_id, self.config.user_label());
        self.apply("task_delete", task_id, next)
    }

    /// Drag-originated move; the destination index is clamped to append.
    pub fn move_task_dnd(&mut self, request: &MoveRequest) -> bool {
        let next = transitions::move_task(&self.state, request, self.config.user_label());
        self.apply("task_move", &request.task_id, next)
    }

    /// Drag-originated reorder inside a single column.
    pub fn reorder_task_dnd(&mut self, request: &ReorderRequest) -> bool {
        let next = transitions::reorder_task(&self.state, request, self.config.user_label());
        self.apply("task_reorder", &request.task_id, next)
    }

    /// Wholesale replacement; the incoming audit log is trimmed to the cap.
    pub fn replace_state(&mut self, next: BoardState) {
        debug!(
            "event=state_replace module=store status=ok tasks={}",
            next.tasks.len()
        );
        self.commit(next);
    }

    /// Empties the audit log, keeping tasks and columns.
    pub fn clear_audit_log(&mut self) {
        let mut next = self.state.clone();
        next.audit_log.clear();
        debug!("event=audit_clear module=store status=ok");
        self.commit(next);
    }

    /// Validates `raw` and replaces live state with the repaired board.
    ///
    /// Returns the number of regenerated ids. On error the live state is
    /// untouched.
    pub fn import_document(&mut self, raw: &str) -> Result<usize, ImportError> {
        let outcome = import_board_as(raw, self.config.user_label())?;
        let regenerated = outcome.regenerated;
        self.replace_state(outcome.state);
        Ok(regenerated)
    }

    pub fn export_document(&self) -> Result<String, serde_json::Error> {
        export_board(&self.state)
    }

    /// Runs a search query against today's date.
    pub fn search(&self, query: &str) -> Vec<ColumnView<'_>> {
        let predicate = TaskPredicate::for_today(parse_query(query));
        filter_board(&self.state, &predicate)
    }

    fn apply(&mut self, event: &str, task_id: &str, next: Option<BoardState>) -> bool {
        match next {
            Some(next) => {
                debug!("event={event} module=store status=ok task_id={task_id}");
                self.commit(next);
                true
            }
            None => {
                debug!("event={event} module=store status=skip task_id={task_id}");
                false
            }
        }
    }

    fn commit(&mut self, mut next: BoardState) {
        next.truncate_audit_log(self.config.audit_log_cap());
        self.state = next;
        if let Some(hook) = self.save_hook.as_mut() {
            hook(&self.state);
        }
    }
}

impl Default for BoardStore {
    fn default() -> Self {
        Self::new(BoardState::empty(), BoardConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::BoardStore;
    use crate::config::BoardConfig;
    use crate::model::board::BoardState;
    use crate::model::task::{Priority, TaskInput};
    use std::sync::{Arc, Mutex};

    #[test]
    fn hook_runs_only_for_applied_mutations() {
        let calls = Arc::new(Mutex::new(0usize));
        let counter = Arc::clone(&calls);
        let mut store = BoardStore::new(BoardState::empty(), BoardConfig::default())
            .with_save_hook(Box::new(move |_: &BoardState| *counter.lock().unwrap() += 1));

        let id = store.create_task(&TaskInput::new("Write notes", Priority::Medium, 30));
        assert!(store.delete_task(&id));
        assert!(!store.delete_task(&id));
        assert!(!store.update_task("missing", &TaskInput::new("Nope", Priority::Low, 1)));

        assert_eq!(*calls.lock().unwrap(), 2);
    }

    #[test]
    fn new_trims_incoming_audit_log() {
        let mut seed = BoardStore::default();
        for n in 0..4 {
            seed.create_task(&TaskInput::new(format!("Task {n}"), Priority::Low, 5));
        }
        let store = BoardStore::new(seed.into_state(), BoardConfig::default().with_audit_log_cap(2));
        assert_eq!(store.state().audit_log.len(), 2);
        assert_eq!(store.state().tasks.len(), 4);
    }
}
