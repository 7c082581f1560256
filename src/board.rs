//! Board State
//!
//! Tasks partitioned into the three columns, plus load phase, the error
//! banner and the inline-edit draft. Pure data: the async side lives in
//! `view_model`.

use crate::models::{Column, Task, TaskId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadPhase {
    /// First list fetch outstanding
    Loading,
    Ready,
}

/// Inline rename in progress
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditDraft {
    pub id: TaskId,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Board {
    /// Indexed by `Column::index()`
    columns: [Vec<Task>; 3],
    pub phase: LoadPhase,
    pub error: Option<String>,
    pub editing: Option<EditDraft>,
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    pub fn new() -> Self {
        Self {
            columns: Default::default(),
            phase: LoadPhase::Loading,
            error: None,
            editing: None,
        }
    }

    pub fn column(&self, column: Column) -> &[Task] {
        &self.columns[column.index()]
    }

    pub fn len(&self) -> usize {
        self.columns.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_loading(&self) -> bool {
        self.phase == LoadPhase::Loading
    }

    pub fn start_loading(&mut self) {
        self.phase = LoadPhase::Loading;
        self.error = None;
    }

    /// Replace everything with a fresh server list, grouped by status
    pub fn load(&mut self, tasks: Vec<Task>) {
        self.columns = Default::default();
        for task in tasks {
            self.push(Column::for_status(task.status), task);
        }
        self.phase = LoadPhase::Ready;
        self.error = None;
        self.editing = None;
    }

    /// Load failed: stop loading with empty columns
    pub fn fail_load(&mut self, message: Option<String>) {
        self.columns = Default::default();
        self.phase = LoadPhase::Ready;
        self.error = message;
        self.editing = None;
    }

    /// Column holding `id`, with the task
    pub fn find(&self, id: TaskId) -> Option<(Column, &Task)> {
        Column::ALL.into_iter().find_map(|column| {
            self.column(column)
                .iter()
                .find(|t| t.id == id)
                .map(|t| (column, t))
        })
    }

    pub fn task_in(&self, column: Column, id: TaskId) -> Option<&Task> {
        self.column(column).iter().find(|t| t.id == id)
    }

    /// Append to `column`; any older copy of the same id is dropped first
    pub fn push(&mut self, column: Column, task: Task) {
        self.remove(task.id);
        self.columns[column.index()].push(task);
    }

    /// Remove from wherever it is
    pub fn remove(&mut self, id: TaskId) -> Option<Task> {
        for tasks in self.columns.iter_mut() {
            if let Some(pos) = tasks.iter().position(|t| t.id == id) {
                return Some(tasks.remove(pos));
            }
        }
        None
    }

    /// Confirmed move: the server's copy goes to the end of `to`
    pub fn apply_move(&mut self, to: Column, updated: Task) {
        self.push(to, updated);
    }

    /// Swap in the server's copy without changing its column or position
    pub fn replace(&mut self, updated: Task) -> bool {
        for tasks in self.columns.iter_mut() {
            if let Some(slot) = tasks.iter_mut().find(|t| t.id == updated.id) {
                *slot = updated;
                return true;
            }
        }
        false
    }

    pub fn set_error(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
    }

    pub fn dismiss_error(&mut self) {
        self.error = None;
    }

    // ========================
    // Inline edit
    // ========================

    pub fn begin_edit(&mut self, id: TaskId) {
        if let Some((_, task)) = self.find(id) {
            self.editing = Some(EditDraft { id, text: task.title.clone() });
        }
    }

    pub fn set_draft(&mut self, text: String) {
        if let Some(draft) = self.editing.as_mut() {
            draft.text = text;
        }
    }

    pub fn cancel_edit(&mut self) {
        self.editing = None;
    }

    /// End editing and hand back the draft for submission
    pub fn take_edit(&mut self) -> Option<EditDraft> {
        self.editing.take()
    }

    pub fn is_editing(&self, id: TaskId) -> bool {
        self.editing.as_ref().is_some_and(|d| d.id == id)
    }
}
