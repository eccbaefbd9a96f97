//! Task-list operations over any [`TodoStore`].
//!
//! Every operation validates its input completely before the first store
//! call, so a rejected request never causes a partial mutation.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{Error, Result, StoreError};
use crate::pagination::{total_pages, PAGE_SIZE};
use crate::query::{build_list_query, ListParams, OwnerFilter};
use crate::store::TodoStore;
use crate::types::{CreateTodo, TodoPublic, TodosResponse, UpdateTodo, User, UserCreate};

/// One page of the owner's todos with the owner's total count and pages.
pub async fn list_todos<S: TodoStore>(
    store: &S,
    owner: &OwnerFilter,
    params: &ListParams,
) -> Result<TodosResponse> {
    let query = build_list_query(owner.clone(), params).inspect_err(|err| {
        debug!(owner = owner.owner_id(), %err, "rejected list parameters");
    })?;

    let total = store.count_todos(query.count_query()).await?;
    let todos = store.select_todos(&query).await?;

    Ok(TodosResponse {
        todos: todos.into_iter().map(TodoPublic::from).collect(),
        todos_total: total,
        todos_pages: total_pages(total, PAGE_SIZE),
    })
}

pub async fn get_todo<S: TodoStore>(store: &S, owner: &OwnerFilter, id: &str) -> Result<TodoPublic> {
    store
        .get_todo(id, owner)
        .await?
        .map(TodoPublic::from)
        .ok_or(Error::NotFound)
}

pub async fn create_todo<S: TodoStore>(
    store: &S,
    owner: &OwnerFilter,
    input: CreateTodo,
) -> Result<TodoPublic> {
    let todo = input.validate(owner)?;
    let todo = store.insert_todo(todo).await?;
    info!(id = %todo.id, owner = owner.owner_id(), "todo created");
    Ok(todo.into())
}

pub async fn update_todo<S: TodoStore>(
    store: &S,
    owner: &OwnerFilter,
    id: &str,
    input: UpdateTodo,
) -> Result<TodoPublic> {
    let patch = input.validate()?;
    let todo = store
        .update_todo(id, owner, &patch)
        .await?
        .ok_or(Error::NotFound)?;
    Ok(todo.into())
}

pub async fn delete_todo<S: TodoStore>(store: &S, owner: &OwnerFilter, id: &str) -> Result<()> {
    if !store.delete_todo(id, owner).await? {
        return Err(Error::NotFound);
    }
    info!(id, owner = owner.owner_id(), "todo deleted");
    Ok(())
}

/// Outcome of a registration attempt. A taken username is reported, not
/// raised.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Registration {
    Created(User),
    AlreadyExists { message: String },
}

pub async fn register_user<S: TodoStore>(store: &S, input: UserCreate) -> Result<Registration> {
    let user = input.validate()?;

    if store.find_user_by_username(&user.username).await?.is_some() {
        return Ok(already_exists());
    }

    match store.insert_user(user).await {
        Ok(user) => {
            info!(id = %user.id, username = %user.username, "user registered");
            Ok(Registration::Created(user))
        }
        // lost a race with a concurrent registration of the same name
        Err(StoreError::Duplicate(_)) => Ok(already_exists()),
        Err(err) => Err(err.into()),
    }
}

fn already_exists() -> Registration {
    Registration::AlreadyExists {
        message: "User already exists".to_string(),
    }
}

/// Outcome of a login lookup by username.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LoginOutcome {
    Found { user_id: String, message: String },
    NotFound { message: String },
}

pub async fn login<S: TodoStore>(store: &S, username: &str) -> Result<LoginOutcome> {
    Ok(match store.find_user_by_username(username).await? {
        Some(user) => LoginOutcome::Found {
            user_id: user.id,
            message: "Login successfully".to_string(),
        },
        None => LoginOutcome::NotFound {
            message: "User not found".to_string(),
        },
    })
}
