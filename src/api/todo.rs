//! Todo Commands
//!
//! CRUD bindings for `/api/todos`. Each call refuses to run without a
//! stored token.

use serde::{Deserialize, Serialize};

use super::{ApiClient, Method};
use crate::errors::{ApiError, ApiResult};
use crate::models::{Task, TaskId, TaskStatus};
use crate::session::Session;

const TODOS_PATH: &str = "/api/todos";

// ========================
// Wire Structs
// ========================

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TodoRequest<'a> {
    title: &'a str,
    status: TaskStatus,
    position_order: i32,
}

#[derive(Deserialize)]
struct TodoListResponse {
    status: Option<String>,
    message: Option<String>,
    #[serde(default)]
    todos: Vec<Task>,
}

#[derive(Deserialize)]
struct TodoResponse {
    status: Option<String>,
    message: Option<String>,
    todo: Option<Task>,
}

#[derive(Deserialize)]
struct StatusResponse {
    status: Option<String>,
    message: Option<String>,
}

/// Envelope `status` must read "success" when present
fn check_envelope(status: Option<&str>, message: Option<String>, fallback: &str) -> ApiResult<()> {
    match status {
        None | Some("success") => Ok(()),
        Some(_) => Err(ApiError::operation(None, message.unwrap_or_else(|| fallback.to_string()))),
    }
}

fn todo_path(id: TaskId) -> String {
    format!("{}/{}", TODOS_PATH, id)
}

// ========================
// Service
// ========================

#[derive(Clone)]
pub struct TaskService {
    client: ApiClient,
}

impl TaskService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub fn session(&self) -> &Session {
        self.client.session()
    }

    fn ensure_authenticated(&self) -> ApiResult<()> {
        if self.client.session().is_authenticated() {
            Ok(())
        } else {
            Err(ApiError::NotAuthenticated)
        }
    }

    pub async fn list(&self) -> ApiResult<Vec<Task>> {
        self.ensure_authenticated()?;
        let result: ApiResult<Vec<Task>> = async {
            let response: TodoListResponse = self.client.get_json(TODOS_PATH).await?;
            check_envelope(response.status.as_deref(), response.message, "Failed to fetch todos")?;
            Ok(response.todos)
        }
        .await;
        log_failure("list", &result);
        result
    }

    pub async fn create(&self, title: &str, status: TaskStatus, position_order: i32) -> ApiResult<Task> {
        self.ensure_authenticated()?;
        let request = TodoRequest { title, status, position_order };
        let result = self.send_todo(Method::Post, TODOS_PATH, &request, "Failed to create todo").await;
        log_failure("create", &result);
        result
    }

    pub async fn update(
        &self,
        id: TaskId,
        title: &str,
        status: TaskStatus,
        position_order: i32,
    ) -> ApiResult<Task> {
        self.ensure_authenticated()?;
        let request = TodoRequest { title, status, position_order };
        let result = self
            .send_todo(Method::Put, &todo_path(id), &request, "Failed to update todo")
            .await;
        log_failure("update", &result);
        result
    }

    pub async fn delete(&self, id: TaskId) -> ApiResult<()> {
        self.ensure_authenticated()?;
        let result: ApiResult<()> = async {
            let response = self.client.send(Method::Delete, &todo_path(id), None).await?;
            // Some servers answer 204 with no body
            if response.body.trim().is_empty() {
                return Ok(());
            }
            let body: StatusResponse = response.json()?;
            check_envelope(body.status.as_deref(), body.message, "Failed to delete todo")
        }
        .await;
        log_failure("delete", &result);
        result
    }

    async fn send_todo(
        &self,
        method: Method,
        path: &str,
        request: &TodoRequest<'_>,
        fallback: &str,
    ) -> ApiResult<Task> {
        let response: TodoResponse = self.client.send_json(method, path, request).await?;
        check_envelope(response.status.as_deref(), response.message, fallback)?;
        response
            .todo
            .ok_or_else(|| ApiError::operation(None, "Response did not include the todo"))
    }
}

fn log_failure<T>(operation: &str, result: &ApiResult<T>) {
    match result {
        Err(err) if err.is_auth() => tracing::warn!(operation, error = %err, "todo call refused"),
        Err(err) => tracing::error!(operation, error = %err, "todo call failed"),
        Ok(_) => {}
    }
}
