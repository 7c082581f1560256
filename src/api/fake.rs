//! In-memory stand-in for the to-do backend, used by tests.
//!
//! Mirrors the real server's routes, envelopes and status codes closely
//! enough to exercise the client end to end.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use async_trait::async_trait;
use serde_json::{json, Value};

use super::{HttpRequest, HttpResponse, Method, Transport};
use crate::errors::{ApiError, ApiResult};
use crate::models::{Task, TaskId, TaskStatus};

#[derive(Default)]
struct State {
    users: HashMap<String, String>,
    tokens: HashMap<String, String>,
    /// (owner, task) in creation order
    todos: Vec<(String, Task)>,
    next_id: TaskId,
    issued: u32,
    requests: Vec<HttpRequest>,
    fail_next: Option<(u16, String)>,
    offline: bool,
}

#[derive(Default)]
pub(crate) struct FakeBackend {
    state: RefCell<State>,
}

impl FakeBackend {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    pub fn add_user(&self, username: &str, password: &str) {
        self.state
            .borrow_mut()
            .users
            .insert(username.to_string(), password.to_string());
    }

    /// Register `username` if needed and hand out a valid token
    pub fn issue_token(&self, username: &str) -> String {
        let mut state = self.state.borrow_mut();
        state.users.entry(username.to_string()).or_insert_with(|| "secret".to_string());
        state.issued += 1;
        let token = format!("token-{}-{}", username, state.issued);
        state.tokens.insert(token.clone(), username.to_string());
        token
    }

    pub fn revoke_all_tokens(&self) {
        self.state.borrow_mut().tokens.clear();
    }

    /// Answer the next request with this status and message
    pub fn fail_next(&self, status: u16, message: &str) {
        self.state.borrow_mut().fail_next = Some((status, message.to_string()));
    }

    pub fn set_offline(&self, offline: bool) {
        self.state.borrow_mut().offline = offline;
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.state.borrow().requests.clone()
    }

    /// Server-side copy of every stored task
    pub fn todos(&self) -> Vec<Task> {
        self.state.borrow().todos.iter().map(|(_, t)| t.clone()).collect()
    }

    fn handle(&self, request: &HttpRequest) -> HttpResponse {
        let mut state = self.state.borrow_mut();
        if let Some((status, message)) = state.fail_next.take() {
            return reply(status, json!({"status": "error", "message": message, "code": status}));
        }

        let path = request
            .url
            .find("/api/")
            .map(|i| &request.url[i..])
            .unwrap_or(request.url.as_str());
        let body = request.body.clone().unwrap_or(Value::Null);

        match (request.method, path) {
            (Method::Post, "/api/login") => login(&mut state, &body),
            (Method::Post, "/api/register") => register(&mut state, &body),
            (method, path) if path.starts_with("/api/todos") => {
                let Some(user) = request
                    .bearer
                    .as_ref()
                    .and_then(|t| state.tokens.get(t))
                    .cloned()
                else {
                    return HttpResponse { status: 401, body: String::new() };
                };
                let id = path
                    .strip_prefix("/api/todos/")
                    .and_then(|rest| rest.parse::<TaskId>().ok());
                match (method, id) {
                    (Method::Get, None) => list_todos(&state, &user),
                    (Method::Post, None) => create_todo(&mut state, &user, &body),
                    (Method::Put, Some(id)) => update_todo(&mut state, &user, id, &body),
                    (Method::Delete, Some(id)) => delete_todo(&mut state, &user, id),
                    _ => reply(405, json!({"status": "error", "message": "Method not allowed"})),
                }
            }
            _ => reply(404, json!({"status": "error", "message": "Not found"})),
        }
    }
}

#[async_trait(?Send)]
impl Transport for FakeBackend {
    async fn send(&self, request: HttpRequest) -> ApiResult<HttpResponse> {
        if self.state.borrow().offline {
            return Err(ApiError::Transport("connection refused".into()));
        }
        let response = self.handle(&request);
        self.state.borrow_mut().requests.push(request);
        Ok(response)
    }
}

fn reply(status: u16, body: Value) -> HttpResponse {
    HttpResponse { status, body: body.to_string() }
}

fn error(status: u16, message: &str) -> HttpResponse {
    reply(status, json!({"status": "error", "message": message, "code": status}))
}

fn field<'a>(body: &'a Value, name: &str) -> &'a str {
    body.get(name).and_then(Value::as_str).unwrap_or_default()
}

fn login(state: &mut State, body: &Value) -> HttpResponse {
    let username = field(body, "username");
    match state.users.get(username) {
        Some(password) if password == field(body, "password") => {
            state.issued += 1;
            let token = format!("token-{}-{}", username, state.issued);
            state.tokens.insert(token.clone(), username.to_string());
            reply(200, json!({
                "status": "success",
                "message": "Authentication successful",
                "token": token,
                "username": username,
                "code": 200,
            }))
        }
        _ => error(401, "Authentication failed: Invalid username or password"),
    }
}

fn register(state: &mut State, body: &Value) -> HttpResponse {
    let username = field(body, "username");
    if state.users.contains_key(username) {
        return error(400, "Registration failed: Username is already taken");
    }
    state
        .users
        .insert(username.to_string(), field(body, "password").to_string());
    let mut payload = json!({
        "status": "success",
        "message": "Registration successful",
        "username": username,
        "code": 200,
    });
    if let Some(email) = body.get("email") {
        payload["email"] = email.clone();
    }
    reply(200, payload)
}

fn list_todos(state: &State, user: &str) -> HttpResponse {
    let mut todos: Vec<&Task> = state
        .todos
        .iter()
        .filter(|(owner, _)| owner == user)
        .map(|(_, t)| t)
        .collect();
    todos.sort_by_key(|t| t.position_order);
    reply(200, json!({"status": "success", "todos": todos, "code": 200}))
}

fn parse_status(body: &Value) -> Option<TaskStatus> {
    match body.get("status") {
        None | Some(Value::Null) => Some(TaskStatus::New),
        Some(value) => serde_json::from_value(value.clone()).ok(),
    }
}

fn position(body: &Value) -> i32 {
    body.get("positionOrder")
        .and_then(Value::as_i64)
        .and_then(|p| i32::try_from(p).ok())
        .unwrap_or(0)
}

fn create_todo(state: &mut State, user: &str, body: &Value) -> HttpResponse {
    let title = field(body, "title");
    if title.trim().is_empty() {
        return error(400, "Title is required");
    }
    let Some(status) = parse_status(body) else {
        return error(400, "Invalid status");
    };
    state.next_id += 1;
    let task = Task {
        id: state.next_id,
        title: title.to_string(),
        status,
        position_order: position(body),
        created_at: None,
        updated_at: None,
    };
    state.todos.push((user.to_string(), task.clone()));
    reply(201, json!({"status": "success", "message": "Todo created successfully", "todo": task, "code": 201}))
}

fn owned_todo<'a>(state: &'a mut State, user: &str, id: TaskId) -> Result<&'a mut Task, HttpResponse> {
    let (owner, task) = state
        .todos
        .iter_mut()
        .find(|(_, t)| t.id == id)
        .ok_or_else(|| error(404, "Todo not found"))?;
    if owner.as_str() != user {
        return Err(error(403, "Unauthorized access"));
    }
    Ok(task)
}

fn update_todo(state: &mut State, user: &str, id: TaskId, body: &Value) -> HttpResponse {
    let title = field(body, "title").to_string();
    if title.trim().is_empty() {
        return error(400, "Title is required");
    }
    let Some(status) = parse_status(body) else {
        return error(400, "Invalid status");
    };
    let position_order = position(body);
    match owned_todo(state, user, id) {
        Ok(task) => {
            task.title = title;
            task.status = status;
            task.position_order = position_order;
            reply(200, json!({"status": "success", "message": "Todo updated successfully", "todo": task, "code": 200}))
        }
        Err(response) => response,
    }
}

fn delete_todo(state: &mut State, user: &str, id: TaskId) -> HttpResponse {
    if let Err(response) = owned_todo(state, user, id) {
        return response;
    }
    state.todos.retain(|(_, t)| t.id != id);
    reply(200, json!({"status": "success", "message": "Todo deleted successfully", "code": 200}))
}
