//! Domain records and wire DTOs for todos and users.
//!
//! # Design
//! `Todo` is the stored record and carries its owner. The DTOs that cross
//! the HTTP boundary (`TodoPublic`, `TodosResponse`) drop the owner and
//! render the deadline as `yyyymmdd`. Incoming payloads (`CreateTodo`,
//! `UpdateTodo`) are raw until `validate` turns them into a `Todo` or a
//! `TodoPatch`; nothing reaches a store unvalidated.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::date::{self, DateInput};
use crate::error::{Error, Result};
use crate::query::OwnerFilter;
use crate::schema;

/// Generate a fresh record id (UUIDv4, hyphenated).
pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// A stored todo item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Todo {
    pub id: String,
    pub task: String,
    pub deadline: NaiveDate,
    pub priority: i64,
    pub is_done: i64,
    pub user_id: String,
}

/// A todo as returned to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoPublic {
    pub id: String,
    pub task: String,
    #[serde(with = "date::yyyymmdd")]
    pub deadline: NaiveDate,
    pub priority: i64,
    pub is_done: i64,
}

impl From<Todo> for TodoPublic {
    fn from(todo: Todo) -> Self {
        Self {
            id: todo.id,
            task: todo.task,
            deadline: todo.deadline,
            priority: todo.priority,
            is_done: todo.is_done,
        }
    }
}

/// One page of todos plus the totals for the caller's whole list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodosResponse {
    pub todos: Vec<TodoPublic>,
    pub todos_total: u64,
    pub todos_pages: u64,
}

/// Request payload for creating a todo. `priority` and `is_done` default
/// to 0 when omitted.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTodo {
    pub task: String,
    pub deadline: DateInput,
    #[serde(default)]
    pub priority: i64,
    #[serde(default)]
    pub is_done: i64,
}

impl CreateTodo {
    /// Validate every field and build the record owned by `owner`.
    pub fn validate(self, owner: &OwnerFilter) -> Result<Todo> {
        schema::validate_task(&self.task)?;
        let deadline = resolve_deadline(self.deadline)?;
        let priority = schema::validate_priority(self.priority)?;
        let is_done = schema::validate_is_done(self.is_done)?;

        Ok(Todo {
            id: new_id(),
            task: self.task,
            deadline,
            priority,
            is_done,
            user_id: owner.owner_id().to_string(),
        })
    }
}

/// Request payload for a partial update. Only the fields present in the
/// JSON are applied; an explicit `null` counts as absent.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateTodo {
    #[serde(default)]
    pub task: Option<String>,
    #[serde(default)]
    pub deadline: Option<DateInput>,
    #[serde(default)]
    pub priority: Option<i64>,
    #[serde(default)]
    pub is_done: Option<i64>,
}

impl UpdateTodo {
    pub fn validate(self) -> Result<TodoPatch> {
        if let Some(task) = &self.task {
            schema::validate_task(task)?;
        }
        Ok(TodoPatch {
            task: self.task,
            deadline: self.deadline.map(resolve_deadline).transpose()?,
            priority: self.priority.map(schema::validate_priority).transpose()?,
            is_done: self.is_done.map(schema::validate_is_done).transpose()?,
        })
    }
}

/// A validated partial update, one typed slot per mutable field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoPatch {
    pub task: Option<String>,
    pub deadline: Option<NaiveDate>,
    pub priority: Option<i64>,
    pub is_done: Option<i64>,
}

impl TodoPatch {
    pub fn is_empty(&self) -> bool {
        self.task.is_none()
            && self.deadline.is_none()
            && self.priority.is_none()
            && self.is_done.is_none()
    }

    /// Overwrite the fields present in the patch. Id and owner never change.
    pub fn apply(&self, todo: &mut Todo) {
        if let Some(task) = &self.task {
            todo.task = task.clone();
        }
        if let Some(deadline) = self.deadline {
            todo.deadline = deadline;
        }
        if let Some(priority) = self.priority {
            todo.priority = priority;
        }
        if let Some(is_done) = self.is_done {
            todo.is_done = is_done;
        }
    }
}

fn resolve_deadline(input: DateInput) -> Result<NaiveDate> {
    input.resolve().map_err(|reason| Error::InvalidDate {
        field: "deadline",
        reason,
    })
}

/// A registered user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub username: String,
    pub preference: Option<String>,
}

/// Request payload for registering a user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserCreate {
    pub username: String,
}

impl UserCreate {
    pub fn validate(self) -> Result<User> {
        schema::validate_username(&self.username)?;
        Ok(User {
            id: new_id(),
            username: self.username,
            preference: None,
        })
    }
}
