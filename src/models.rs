//! Frontend Models
//!
//! Data structures matching backend entities, plus the board columns and
//! the one table translating between columns and backend statuses.

use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serialize};

pub type TaskId = i64;

/// Persisted task state (backend enum)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskStatus {
    #[serde(rename = "new")]
    New,
    #[serde(rename = "inProgress")]
    InProgress,
    /// Older backends stored "done"
    #[serde(rename = "completed", alias = "done")]
    Completed,
}

/// Task data structure (matches backend)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    pub status: TaskStatus,
    #[serde(default)]
    pub position_order: i32,
    #[serde(default, deserialize_with = "lenient_timestamp", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<NaiveDateTime>,
    #[serde(default, deserialize_with = "lenient_timestamp", skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<NaiveDateTime>,
}

/// Timestamps are informational; an unexpected shape must not fail the whole list
fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| v.as_str().and_then(|s| s.parse().ok())))
}

/// Board column (UI enum)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Column {
    #[serde(rename = "todo")]
    Todo,
    #[serde(rename = "inProgress")]
    InProgress,
    #[serde(rename = "completed")]
    Completed,
}

/// Column ↔ status mapping, the only place either side is translated
const STATUS_MAP: [(Column, TaskStatus); 3] = [
    (Column::Todo, TaskStatus::New),
    (Column::InProgress, TaskStatus::InProgress),
    (Column::Completed, TaskStatus::Completed),
];

impl Column {
    /// Display order, left to right
    pub const ALL: [Column; 3] = [Column::Todo, Column::InProgress, Column::Completed];

    pub fn for_status(status: TaskStatus) -> Self {
        STATUS_MAP
            .iter()
            .find(|(_, s)| *s == status)
            .map(|(c, _)| *c)
            .unwrap_or(Column::Todo)
    }

    pub fn status(self) -> TaskStatus {
        STATUS_MAP
            .iter()
            .find(|(c, _)| *c == self)
            .map(|(_, s)| *s)
            .unwrap_or(TaskStatus::New)
    }

    pub fn index(self) -> usize {
        match self {
            Column::Todo => 0,
            Column::InProgress => 1,
            Column::Completed => 2,
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            Column::Todo => "todo",
            Column::InProgress => "inProgress",
            Column::Completed => "completed",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Column::Todo => "To Do",
            Column::InProgress => "In Progress",
            Column::Completed => "Completed",
        }
    }
}

// ========================
// Auth payloads
// ========================

#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Registration {
    pub username: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub token: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RegisterResponse {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}
