//! Board View-Model
//!
//! Async board operations. Every mutation waits for the server: local
//! state changes only after the call succeeds, and only from what the
//! server returned. A failure leaves the board as it was and shows a
//! message, except authentication failures, which end the session.

use std::cell::RefCell;

use crate::api::TaskService;
use crate::board::Board;
use crate::errors::{ApiError, ApiResult};
use crate::models::{Column, TaskId, TaskStatus};

/// Longest title the backend accepts
pub const MAX_TITLE_CHARS: usize = 500;

/// Somewhere a [`Board`] lives: a signal in the UI, a `RefCell` in tests.
///
/// Both accessors return `None` once the board is gone (view unmounted
/// while a request was in flight).
pub trait BoardCell {
    fn read<R>(&self, f: impl FnOnce(&Board) -> R) -> Option<R>;
    fn write<R>(&self, f: impl FnOnce(&mut Board) -> R) -> Option<R>;
}

impl BoardCell for RefCell<Board> {
    fn read<R>(&self, f: impl FnOnce(&Board) -> R) -> Option<R> {
        Some(f(&self.borrow()))
    }

    fn write<R>(&self, f: impl FnOnce(&mut Board) -> R) -> Option<R> {
        Some(f(&mut self.borrow_mut()))
    }
}

/// Trimmed title, or why it cannot be sent
pub fn validate_title(title: &str) -> ApiResult<&str> {
    let title = title.trim();
    if title.is_empty() {
        return Err(ApiError::validation("Title is required"));
    }
    if title.chars().count() > MAX_TITLE_CHARS {
        return Err(ApiError::validation("Title cannot exceed 500 characters"));
    }
    Ok(title)
}

fn position_hint(len: usize) -> i32 {
    i32::try_from(len).unwrap_or(i32::MAX)
}

#[derive(Clone)]
pub struct BoardViewModel {
    tasks: TaskService,
}

impl BoardViewModel {
    pub fn new(tasks: TaskService) -> Self {
        Self { tasks }
    }

    /// A rejected token was already evicted by the client; only a missing
    /// token still needs the sign-out here
    fn sign_out_if_needed(&self, err: &ApiError) {
        if matches!(err, ApiError::NotAuthenticated) {
            tracing::info!("board has no session");
            self.tasks.session().logout();
        }
    }

    /// Route a failure: sign out for auth errors, banner otherwise
    fn report<C: BoardCell>(&self, cell: &C, err: &ApiError) {
        if err.is_auth() {
            self.sign_out_if_needed(err);
        } else {
            cell.write(|board| board.set_error(err.to_string()));
        }
    }

    pub async fn load<C: BoardCell>(&self, cell: &C) -> ApiResult<()> {
        cell.write(Board::start_loading);
        match self.tasks.list().await {
            Ok(tasks) => {
                tracing::info!(count = tasks.len(), "board loaded");
                cell.write(|board| board.load(tasks));
                Ok(())
            }
            Err(err) => {
                let message = (!err.is_auth()).then(|| err.to_string());
                cell.write(|board| board.fail_load(message));
                self.sign_out_if_needed(&err);
                Err(err)
            }
        }
    }

    /// New task lands in To Do once the server echoes it back
    pub async fn create<C: BoardCell>(&self, cell: &C, title: &str) -> ApiResult<()> {
        let title = match validate_title(title) {
            Ok(title) => title,
            Err(err) => {
                self.report(cell, &err);
                return Err(err);
            }
        };
        let position = cell
            .read(|board| position_hint(board.column(Column::Todo).len()))
            .unwrap_or_default();

        match self.tasks.create(title, TaskStatus::New, position).await {
            Ok(task) => {
                tracing::info!(task_id = task.id, "task created");
                cell.write(|board| board.push(Column::Todo, task));
                Ok(())
            }
            Err(err) => {
                self.report(cell, &err);
                Err(err)
            }
        }
    }

    /// Drag-and-drop move; appended to the end of `to` on success
    pub async fn move_task<C: BoardCell>(&self, cell: &C, id: TaskId, from: Column, to: Column) -> ApiResult<()> {
        if from == to {
            return Ok(());
        }
        let Some((task, position)) = cell
            .read(|board| {
                board
                    .task_in(from, id)
                    .cloned()
                    .map(|t| (t, position_hint(board.column(to).len())))
            })
            .flatten()
        else {
            tracing::debug!(task_id = id, from = from.key(), "dropped task no longer in source column");
            return Ok(());
        };

        match self.tasks.update(id, &task.title, to.status(), position).await {
            Ok(updated) => {
                tracing::info!(task_id = id, from = from.key(), to = to.key(), "task moved");
                cell.write(|board| board.apply_move(to, updated));
                Ok(())
            }
            Err(err) => {
                self.report(cell, &err);
                Err(err)
            }
        }
    }

    /// Commit the inline edit. Blank or unchanged drafts just close the editor.
    pub async fn commit_edit<C: BoardCell>(&self, cell: &C) -> ApiResult<()> {
        let Some((draft, task)) = cell
            .write(|board| {
                let draft = board.take_edit()?;
                let task = board.find(draft.id).map(|(_, t)| t.clone())?;
                Some((draft, task))
            })
            .flatten()
        else {
            return Ok(());
        };

        let text = draft.text.trim();
        if text.is_empty() || text == task.title {
            return Ok(());
        }
        let title = match validate_title(text) {
            Ok(title) => title,
            Err(err) => {
                self.report(cell, &err);
                return Err(err);
            }
        };

        match self.tasks.update(task.id, title, task.status, task.position_order).await {
            Ok(updated) => {
                tracing::info!(task_id = task.id, "task renamed");
                cell.write(|board| board.replace(updated));
                Ok(())
            }
            Err(err) => {
                self.report(cell, &err);
                Err(err)
            }
        }
    }

    pub async fn delete<C: BoardCell>(&self, cell: &C, id: TaskId) -> ApiResult<()> {
        match self.tasks.delete(id).await {
            Ok(()) => {
                tracing::info!(task_id = id, "task deleted");
                cell.write(|board| board.remove(id));
                Ok(())
            }
            Err(err) => {
                self.report(cell, &err);
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::fake::FakeBackend;
    use crate::api::{ApiClient, AuthClient};
    use crate::config::AppConfig;
    use crate::models::{Credentials, Task};
    use crate::session::Session;
    use std::cell::Cell;
    use std::rc::Rc;

    struct Harness {
        backend: Rc<FakeBackend>,
        session: Session,
        vm: BoardViewModel,
        board: RefCell<Board>,
    }

    impl Harness {
        fn new() -> Self {
            let backend = FakeBackend::new();
            let session = Session::in_memory();
            let client = ApiClient::new(Rc::new(AppConfig::default()), backend.clone(), session.clone());
            Self {
                vm: BoardViewModel::new(TaskService::new(client)),
                backend,
                session,
                board: RefCell::new(Board::new()),
            }
        }

        fn signed_in() -> Self {
            let harness = Self::new();
            harness.session.login(&harness.backend.issue_token("ana"));
            harness
        }

        fn titles(&self, column: Column) -> Vec<String> {
            self.board.borrow().column(column).iter().map(|t| t.title.clone()).collect()
        }

        fn columns(&self) -> Vec<Vec<Task>> {
            let board = self.board.borrow();
            Column::ALL.iter().map(|c| board.column(*c).to_vec()).collect()
        }

        fn sent(&self) -> usize {
            self.backend.requests().len()
        }

        async fn seed(&self, titles: &[&str]) {
            for title in titles {
                self.vm.create(&self.board, title).await.unwrap();
            }
        }
    }

    #[tokio::test]
    async fn test_load_groups_server_tasks() {
        let h = Harness::signed_in();
        h.seed(&["a", "b"]).await;
        let id = h.board.borrow().column(Column::Todo)[1].id;
        h.vm.move_task(&h.board, id, Column::Todo, Column::InProgress).await.unwrap();

        *h.board.borrow_mut() = Board::new();
        h.vm.load(&h.board).await.unwrap();

        assert!(!h.board.borrow().is_loading());
        assert_eq!(h.titles(Column::Todo), vec!["a"]);
        assert_eq!(h.titles(Column::InProgress), vec!["b"]);
        assert!(h.titles(Column::Completed).is_empty());
    }

    #[tokio::test]
    async fn test_load_server_error_shows_message() {
        let h = Harness::signed_in();
        h.backend.fail_next(500, "Failed to fetch todos");

        assert!(h.vm.load(&h.board).await.is_err());

        let board = h.board.borrow();
        assert!(!board.is_loading());
        assert!(board.is_empty());
        assert_eq!(board.error.as_deref(), Some("Failed to fetch todos"));
        assert!(h.session.is_authenticated());
    }

    #[tokio::test]
    async fn test_load_rejected_token_signs_out() {
        let h = Harness::signed_in();
        let signed_out = Rc::new(Cell::new(false));
        let flag = signed_out.clone();
        h.session.set_signed_out_hook(move || flag.set(true));
        h.backend.revoke_all_tokens();

        let err = h.vm.load(&h.board).await.unwrap_err();

        assert_eq!(err, ApiError::AuthenticationFailed);
        assert!(signed_out.get());
        assert!(!h.session.is_authenticated());
        assert_eq!(h.board.borrow().error, None);
    }

    #[tokio::test]
    async fn test_create_blank_title_sends_nothing() {
        let h = Harness::signed_in();

        let err = h.vm.create(&h.board, "   ").await.unwrap_err();

        assert_eq!(err, ApiError::validation("Title is required"));
        assert_eq!(h.sent(), 0);
        assert!(h.board.borrow().is_empty());
    }

    #[tokio::test]
    async fn test_create_too_long_title_sends_nothing() {
        let h = Harness::signed_in();
        let title = "x".repeat(MAX_TITLE_CHARS + 1);

        assert!(h.vm.create(&h.board, &title).await.is_err());
        assert_eq!(h.sent(), 0);
    }

    #[tokio::test]
    async fn test_create_uses_server_record() {
        let h = Harness::signed_in();

        h.vm.create(&h.board, "  Buy milk ").await.unwrap();

        let board = h.board.borrow();
        let created = &board.column(Column::Todo)[0];
        assert_eq!(created.title, "Buy milk");
        assert_eq!(created.id, h.backend.todos()[0].id);
    }

    #[tokio::test]
    async fn test_move_to_same_column_is_noop() {
        let h = Harness::signed_in();
        h.seed(&["a"]).await;
        let id = h.board.borrow().column(Column::Todo)[0].id;
        let before = (h.columns(), h.sent());

        h.vm.move_task(&h.board, id, Column::Todo, Column::Todo).await.unwrap();

        assert_eq!((h.columns(), h.sent()), before);
    }

    #[tokio::test]
    async fn test_failed_move_leaves_board_untouched() {
        let h = Harness::signed_in();
        h.seed(&["a", "b"]).await;
        let id = h.board.borrow().column(Column::Todo)[0].id;
        let before = h.columns();
        h.backend.fail_next(500, "Failed to update todo");

        let err = h.vm.move_task(&h.board, id, Column::Todo, Column::Completed).await.unwrap_err();

        assert_eq!(err, ApiError::operation(Some(500), "Failed to update todo"));
        assert_eq!(h.columns(), before);
        assert_eq!(h.board.borrow().error.as_deref(), Some("Failed to update todo"));
    }

    #[tokio::test]
    async fn test_move_of_missing_task_is_ignored() {
        let h = Harness::signed_in();
        h.seed(&["a"]).await;
        let sent = h.sent();

        h.vm.move_task(&h.board, 99, Column::Todo, Column::Completed).await.unwrap();

        assert_eq!(h.sent(), sent);
    }

    #[tokio::test]
    async fn test_commit_edit_renames_after_success() {
        let h = Harness::signed_in();
        h.seed(&["Draft"]).await;
        let id = h.board.borrow().column(Column::Todo)[0].id;

        h.board.borrow_mut().begin_edit(id);
        h.board.borrow_mut().set_draft("Final".into());
        h.vm.commit_edit(&h.board).await.unwrap();

        assert_eq!(h.titles(Column::Todo), vec!["Final"]);
        assert!(h.board.borrow().editing.is_none());
        let body = h.backend.requests().pop().unwrap().body.unwrap();
        assert_eq!(body["status"], "new");
    }

    #[tokio::test]
    async fn test_cancelled_or_unchanged_edit_sends_nothing() {
        let h = Harness::signed_in();
        h.seed(&["Draft"]).await;
        let id = h.board.borrow().column(Column::Todo)[0].id;
        let sent = h.sent();

        h.board.borrow_mut().begin_edit(id);
        h.board.borrow_mut().set_draft("Other".into());
        h.board.borrow_mut().cancel_edit();
        h.vm.commit_edit(&h.board).await.unwrap();

        h.board.borrow_mut().begin_edit(id);
        h.vm.commit_edit(&h.board).await.unwrap();

        assert_eq!(h.sent(), sent);
        assert_eq!(h.titles(Column::Todo), vec!["Draft"]);
    }

    #[tokio::test]
    async fn test_failed_edit_keeps_old_title() {
        let h = Harness::signed_in();
        h.seed(&["Draft"]).await;
        let id = h.board.borrow().column(Column::Todo)[0].id;
        h.backend.set_offline(true);

        h.board.borrow_mut().begin_edit(id);
        h.board.borrow_mut().set_draft("Final".into());
        let err = h.vm.commit_edit(&h.board).await.unwrap_err();

        assert!(matches!(err, ApiError::Transport(_)));
        assert_eq!(h.titles(Column::Todo), vec!["Draft"]);
        assert!(h.board.borrow().error.is_some());
    }

    #[tokio::test]
    async fn test_delete_removes_after_success_only() {
        let h = Harness::signed_in();
        h.seed(&["a", "b"]).await;
        let first = h.board.borrow().column(Column::Todo)[0].id;
        let second = h.board.borrow().column(Column::Todo)[1].id;

        h.vm.delete(&h.board, first).await.unwrap();
        h.backend.fail_next(404, "Todo not found");
        assert!(h.vm.delete(&h.board, second).await.is_err());

        assert_eq!(h.titles(Column::Todo), vec!["b"]);
    }

    #[tokio::test]
    async fn test_forbidden_mutation_signs_out_and_blocks_further_calls() {
        let h = Harness::signed_in();
        h.seed(&["a"]).await;
        let id = h.board.borrow().column(Column::Todo)[0].id;
        h.backend.fail_next(403, "Unauthorized access");

        let err = h.vm.delete(&h.board, id).await.unwrap_err();
        assert_eq!(err, ApiError::AuthenticationFailed);
        assert!(!h.session.is_authenticated());

        let sent = h.sent();
        let err = h.vm.create(&h.board, "b").await.unwrap_err();
        assert_eq!(err, ApiError::NotAuthenticated);
        assert_eq!(h.sent(), sent);
        assert_eq!(h.titles(Column::Todo), vec!["a"]);
    }

    #[tokio::test]
    async fn test_login_create_and_drag_to_completed() {
        let h = Harness::new();
        h.backend.add_user("ana", "secret");
        let auth = AuthClient::new(Rc::new(AppConfig::default()), h.backend.clone(), h.session.clone());

        auth.login(&Credentials { username: "ana".into(), password: "secret".into() })
            .await
            .unwrap();
        assert!(h.session.is_authenticated());

        h.vm.load(&h.board).await.unwrap();
        assert!(h.board.borrow().is_empty());
        assert!(!h.board.borrow().is_loading());

        h.vm.create(&h.board, "Buy milk").await.unwrap();
        assert_eq!(h.titles(Column::Todo), vec!["Buy milk"]);

        let id = h.board.borrow().column(Column::Todo)[0].id;
        h.vm.move_task(&h.board, id, Column::Todo, Column::Completed).await.unwrap();

        assert!(h.titles(Column::Todo).is_empty());
        assert!(h.titles(Column::InProgress).is_empty());
        assert_eq!(h.titles(Column::Completed), vec!["Buy milk"]);
        let body = h.backend.requests().pop().unwrap().body.unwrap();
        assert_eq!(body["status"], "completed");
        assert_eq!(h.backend.todos()[0].status, TaskStatus::Completed);
    }

    fn count_sign_outs(session: &Session) -> Rc<Cell<u32>> {
        let count = Rc::new(Cell::new(0));
        let counter = count.clone();
        session.set_signed_out_hook(move || counter.set(counter.get() + 1));
        count
    }

    #[tokio::test]
    async fn test_rejected_token_signs_out_once() {
        let h = Harness::signed_in();
        h.seed(&["a"]).await;
        let id = h.board.borrow().column(Column::Todo)[0].id;
        let sign_outs = count_sign_outs(&h.session);
        h.backend.fail_next(401, "Token expired");

        let err = h.vm.move_task(&h.board, id, Column::Todo, Column::Completed).await.unwrap_err();

        assert_eq!(err, ApiError::AuthenticationFailed);
        assert_eq!(sign_outs.get(), 1);

        // Load after a revoked token goes through the same path
        h.session.login(&h.backend.issue_token("ana"));
        h.backend.revoke_all_tokens();
        assert!(h.vm.load(&h.board).await.is_err());
        assert_eq!(sign_outs.get(), 2);
    }

    #[tokio::test]
    async fn test_missing_token_signs_out_without_request() {
        let h = Harness::new();
        let sign_outs = count_sign_outs(&h.session);

        let err = h.vm.load(&h.board).await.unwrap_err();

        assert_eq!(err, ApiError::NotAuthenticated);
        assert_eq!(sign_outs.get(), 1);
        assert_eq!(h.sent(), 0);
    }

    #[tokio::test]
    async fn test_save_then_blur_commits_once() {
        let h = Harness::signed_in();
        h.seed(&["Draft"]).await;
        let id = h.board.borrow().column(Column::Todo)[0].id;
        let sent = h.sent();

        h.board.borrow_mut().begin_edit(id);
        h.board.borrow_mut().set_draft("Final".into());
        let (saved, blurred) = tokio::join!(h.vm.commit_edit(&h.board), h.vm.commit_edit(&h.board));

        assert!(saved.is_ok() && blurred.is_ok());
        assert_eq!(h.sent(), sent + 1);
        assert_eq!(h.titles(Column::Todo), vec!["Final"]);
    }
}
