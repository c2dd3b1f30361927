//! Pure state transitions: `&BoardState -> next BoardState`.
//!
//! Each function returns `None` when the mutation does not apply (stale or
//! unknown id). Audit events are prepended; the cap is the caller's job.

use crate::audit::recorder::{make_audit_event, new_id, now_iso, MoveDescriptor};
use crate::model::audit::AuditAction;
use crate::model::board::BoardState;
use crate::model::task::{ColumnId, Task, TaskId, TaskInput};

/// Drag of a task across (or within) columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveRequest {
    pub task_id: TaskId,
    pub from_col: ColumnId,
    pub to_col: ColumnId,
    pub from_index: usize,
    pub to_index: usize,
}

/// Drag of a task inside one column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReorderRequest {
    pub col: ColumnId,
    pub from_index: usize,
    pub to_index: usize,
    pub task_id: TaskId,
}

/// Inserts a new task at the front of its target column.
///
/// Returns the next state and the generated task id.
pub fn create_task(prev: &BoardState, input: &TaskInput, user_label: &str) -> (BoardState, TaskId) {
    let input = input.normalized();
    let id = new_id();
    let task = Task {
        id: id.clone(),
        title: input.title,
        description: input.description,
        priority: input.priority,
        tags: input.tags,
        estimation_min: input.estimation_min,
        created_at: now_iso(),
        due_at: input.due_at,
        status: input.status,
        supervisor: input.supervisor,
    };

    let event = make_audit_event(AuditAction::Create, &id, None, Some(&task), user_label);

    let mut next = prev.clone();
    next.columns.get_mut(task.status).insert(0, id.clone());
    next.tasks.insert(id.clone(), task);
    next.audit_log.insert(0, event);
    (next, id)
}

/// Replaces the editable fields of an existing task.
///
/// A status change moves the id to the front of the new column and is still
/// recorded as UPDATE. A `None` supervisor block keeps the current one.
pub fn update_task(
    prev: &BoardState,
    task_id: &str,
    input: &TaskInput,
    user_label: &str,
) -> Option<BoardState> {
    let existing = prev.tasks.get(task_id)?;
    let input = input.normalized();

    let updated = Task {
        id: existing.id.clone(),
        title: input.title,
        description: input.description,
        priority: input.priority,
        tags: input.tags,
        estimation_min: input.estimation_min,
        created_at: existing.created_at.clone(),
        due_at: input.due_at,
        status: input.status,
        supervisor: input.supervisor.or_else(|| existing.supervisor.clone()),
    };

    let event = make_audit_event(
        AuditAction::Update,
        task_id,
        Some(existing),
        Some(&updated),
        user_label,
    );

    let mut next = prev.clone();
    if existing.status != updated.status {
        next.columns.remove_everywhere(task_id);
        next.columns
            .get_mut(updated.status)
            .insert(0, task_id.to_string());
    }
    next.tasks.insert(task_id.to_string(), updated);
    next.audit_log.insert(0, event);
    Some(next)
}

/// Removes a task from the map and from its column.
pub fn delete_task(prev: &BoardState, task_id: &str, user_label: &str) -> Option<BoardState> {
    let existing = prev.tasks.get(task_id)?;
    let event = make_audit_event(AuditAction::Delete, task_id, Some(existing), None, user_label);

    let mut next = prev.clone();
    next.tasks.remove(task_id);
    next.columns.remove_everywhere(task_id);
    next.audit_log.insert(0, event);
    Some(next)
}

/// Moves a task to `to_col` at `to_index`, clamped to `[0, destination len]`.
///
/// The id is removed from every column first, so a stale `from_col` cannot
/// leave a second copy behind. The recorded descriptor carries the effective
/// destination index.
pub fn move_task(prev: &BoardState, request: &MoveRequest, user_label: &str) -> Option<BoardState> {
    let task_id = request.task_id.as_str();
    prev.tasks.get(task_id)?;

    let mut next = prev.clone();
    next.columns.remove_everywhere(task_id);
    let destination = next.columns.get_mut(request.to_col);
    let to_index = request.to_index.min(destination.len());
    destination.insert(to_index, task_id.to_string());

    if let Some(task) = next.tasks.get_mut(task_id) {
        task.status = request.to_col;
    }

    let mut event = make_audit_event(AuditAction::Move, task_id, None, None, user_label);
    event.diff = MoveDescriptor {
        from_col: request.from_col,
        to_col: request.to_col,
        from_index: request.from_index,
        to_index,
    }
    .into_diff();
    next.audit_log.insert(0, event);
    Some(next)
}

/// Reorders a task inside one column.
///
/// Skips when `from_index` is out of range, when the id found there is not
/// `task_id`, or when the task no longer exists. `from_index == to_index`
/// still records a MOVE.
pub fn reorder_task(
    prev: &BoardState,
    request: &ReorderRequest,
    user_label: &str,
) -> Option<BoardState> {
    let column = prev.columns.get(request.col);
    if column.get(request.from_index)? != &request.task_id {
        return None;
    }
    prev.tasks.get(&request.task_id)?;

    let mut next = prev.clone();
    let ids = next.columns.get_mut(request.col);
    let moved = ids.remove(request.from_index);
    let to_index = request.to_index.min(ids.len());
    ids.insert(to_index, moved);

    if let Some(task) = next.tasks.get_mut(&request.task_id) {
        task.status = request.col;
    }

    let mut event = make_audit_event(
        AuditAction::Move,
        &request.task_id,
        None,
        None,
        user_label,
    );
    event.diff = MoveDescriptor {
        from_col: request.col,
        to_col: request.col,
        from_index: request.from_index,
        to_index,
    }
    .into_diff();
    next.audit_log.insert(0, event);
    Some(next)
}

#[cfg(test)]
mod tests {
    use super::{create_task, reorder_task, ReorderRequest};
    use crate::model::board::BoardState;
    use crate::model::task::{ColumnId, Priority, TaskInput};

    #[test]
    fn transitions_leave_previous_state_untouched() {
        let empty = BoardState::empty();
        let (next, id) = create_task(&empty, &TaskInput::new("Mop floor", Priority::Low, 15), "User");
        assert!(empty.tasks.is_empty());
        assert!(empty.audit_log.is_empty());
        assert_eq!(next.columns.todo, vec![id]);
    }

    #[test]
    fn reorder_skips_when_slot_holds_another_id() {
        let empty = BoardState::empty();
        let (state, first) = create_task(&empty, &TaskInput::new("First", Priority::Low, 5), "User");
        let (state, _second) = create_task(&state, &TaskInput::new("Second", Priority::Low, 5), "User");

        let stale = ReorderRequest {
            col: ColumnId::Todo,
            from_index: 0,
            to_index: 1,
            task_id: first.clone(),
        };
        assert!(reorder_task(&state, &stale, "User").is_none());

        let out_of_range = ReorderRequest {
            col: ColumnId::Todo,
            from_index: 9,
            to_index: 0,
            task_id: first,
        };
        assert!(reorder_task(&state, &out_of_range, "User").is_none());
    }
}
