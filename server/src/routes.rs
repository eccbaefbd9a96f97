//! Request handlers. Each one extracts its inputs, hands them to the core
//! service and renders the outcome; validation lives in the core.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tasklist_core::service::{self, LoginOutcome, Registration};
use tasklist_core::{CreateTodo, ListParams, TodoPublic, TodoStore, TodosResponse, UpdateTodo, UserCreate};

use crate::error::ApiError;
use crate::extract::Owner;

pub async fn list_todos<S: TodoStore>(
    State(store): State<Arc<S>>,
    Owner(owner): Owner,
    Query(params): Query<ListParams>,
) -> Result<Json<TodosResponse>, ApiError> {
    let response = service::list_todos(store.as_ref(), &owner, &params).await?;
    Ok(Json(response))
}

pub async fn get_todo<S: TodoStore>(
    State(store): State<Arc<S>>,
    Owner(owner): Owner,
    Path(todo_id): Path<String>,
) -> Result<Json<TodoPublic>, ApiError> {
    let todo = service::get_todo(store.as_ref(), &owner, &todo_id).await?;
    Ok(Json(todo))
}

pub async fn create_todo<S: TodoStore>(
    State(store): State<Arc<S>>,
    Owner(owner): Owner,
    Json(input): Json<CreateTodo>,
) -> Result<(StatusCode, Json<TodoPublic>), ApiError> {
    let todo = service::create_todo(store.as_ref(), &owner, input).await?;
    Ok((StatusCode::CREATED, Json(todo)))
}

pub async fn update_todo<S: TodoStore>(
    State(store): State<Arc<S>>,
    Owner(owner): Owner,
    Path(todo_id): Path<String>,
    Json(input): Json<UpdateTodo>,
) -> Result<Json<TodoPublic>, ApiError> {
    let todo = service::update_todo(store.as_ref(), &owner, &todo_id, input).await?;
    Ok(Json(todo))
}

pub async fn delete_todo<S: TodoStore>(
    State(store): State<Arc<S>>,
    Owner(owner): Owner,
    Path(todo_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    service::delete_todo(store.as_ref(), &owner, &todo_id).await?;
    Ok(Json(json!({ "message": "Todo deleted successfully" })))
}

pub async fn create_user<S: TodoStore>(
    State(store): State<Arc<S>>,
    Json(input): Json<UserCreate>,
) -> Result<Json<Registration>, ApiError> {
    let registration = service::register_user(store.as_ref(), input).await?;
    Ok(Json(registration))
}

#[derive(Debug, Deserialize)]
pub struct LoginParams {
    pub username: String,
}

pub async fn login<S: TodoStore>(
    State(store): State<Arc<S>>,
    Query(params): Query<LoginParams>,
) -> Result<Json<LoginOutcome>, ApiError> {
    let outcome = service::login(store.as_ref(), &params.username).await?;
    Ok(Json(outcome))
}
