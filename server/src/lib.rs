//! HTTP surface of the task-list service.
//!
//! # Design
//! The router is generic over the record store, so the same routes run on
//! `MemoryStore` in tests and on `SqliteStore` in production. The store is
//! created by the caller, shared as `Arc<S>` state, and closed by the caller
//! once the server has drained.

pub mod config;
pub mod error;
pub mod extract;
pub mod routes;
pub mod sqlite;
pub mod telemetry;

use std::future::Future;
use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tasklist_core::TodoStore;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

pub use error::ApiError;
pub use extract::{USER_ID_HEADER, USER_ID_HEADER_ALT};
pub use sqlite::SqliteStore;

/// Collection routes answer both with and without a trailing slash.
pub fn app<S: TodoStore>(store: Arc<S>) -> Router {
    let todos = || get(routes::list_todos::<S>).post(routes::create_todo::<S>);
    let users = || post(routes::create_user::<S>);
    let login = || post(routes::login::<S>);

    Router::new()
        .route("/todo", todos())
        .route("/todo/", todos())
        .route(
            "/todo/{todo_id}",
            get(routes::get_todo::<S>)
                .put(routes::update_todo::<S>)
                .delete(routes::delete_todo::<S>),
        )
        .route("/user", users())
        .route("/user/", users())
        .route("/login", login())
        .route("/login/", login())
        .layer(TraceLayer::new_for_http())
        .with_state(store)
}

/// Serve until `shutdown` resolves, then finish in-flight requests.
pub async fn run<S: TodoStore>(
    listener: TcpListener,
    store: Arc<S>,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<(), std::io::Error> {
    axum::serve(listener, app(store))
        .with_graceful_shutdown(shutdown)
        .await
}
