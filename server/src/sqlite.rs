//! SQLite-backed [`TodoStore`].
//!
//! # Design
//! Tables are created on connect if missing and never altered. Dynamic
//! ordering only ever interpolates the static column and keyword returned
//! by `SortField`/`SortOrder`; every caller-supplied value is bound as a
//! parameter. Without a sort the rows come back in insertion order, since
//! the owner index scan yields them by rowid.

use std::str::FromStr;

use chrono::NaiveDate;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::FromRow;
use tasklist_core::store::StoreResult;
use tasklist_core::{OwnerFilter, StoreError, Todo, TodoPatch, TodoQuery, TodoStore, User};
use tracing::info;

const MAX_CONNECTIONS: u32 = 10;

const CREATE_TODOS: &str = r#"CREATE TABLE IF NOT EXISTS todos (
    id TEXT PRIMARY KEY NOT NULL,
    task TEXT NOT NULL,
    deadline TEXT NOT NULL,
    priority INTEGER NOT NULL DEFAULT 0,
    is_done INTEGER NOT NULL DEFAULT 0,
    user_id TEXT NOT NULL
)"#;

const CREATE_TODOS_OWNER_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_todos_user_id ON todos (user_id)";

const CREATE_USERS: &str = r#"CREATE TABLE IF NOT EXISTS users (
    id TEXT PRIMARY KEY NOT NULL,
    username TEXT NOT NULL UNIQUE,
    preference TEXT
)"#;

const TODO_COLUMNS: &str = "id, task, deadline, priority, is_done, user_id";

#[derive(Debug, FromRow)]
struct TodoRow {
    id: String,
    task: String,
    deadline: NaiveDate,
    priority: i64,
    is_done: i64,
    user_id: String,
}

impl From<TodoRow> for Todo {
    fn from(row: TodoRow) -> Self {
        Self {
            id: row.id,
            task: row.task,
            deadline: row.deadline,
            priority: row.priority,
            is_done: row.is_done,
            user_id: row.user_id,
        }
    }
}

#[derive(Debug, FromRow)]
struct UserRow {
    id: String,
    username: String,
    preference: Option<String>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            username: row.username,
            preference: row.preference,
        }
    }
}

fn backend(err: sqlx::Error) -> StoreError {
    StoreError::Backend(Box::new(err))
}

fn to_i64(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Open (creating if needed) the database at `url` and its tables.
    pub async fn connect(url: &str) -> Result<Self, sqlx::Error> {
        let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(MAX_CONNECTIONS)
            .connect_with(options)
            .await?;
        let store = Self { pool };
        store.create_tables().await?;
        info!(url, "connected to sqlite");
        Ok(store)
    }

    /// A private in-memory database. The pool is pinned to one connection
    /// that never expires, since each SQLite connection to `:memory:` sees
    /// its own database.
    pub async fn in_memory() -> Result<Self, sqlx::Error> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?;
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;
        let store = Self { pool };
        store.create_tables().await?;
        Ok(store)
    }

    async fn create_tables(&self) -> Result<(), sqlx::Error> {
        for statement in [CREATE_TODOS, CREATE_TODOS_OWNER_INDEX, CREATE_USERS] {
            sqlx::query(statement).execute(&self.pool).await?;
        }
        Ok(())
    }
}

impl TodoStore for SqliteStore {
    async fn insert_todo(&self, todo: Todo) -> StoreResult<Todo> {
        sqlx::query(
            "INSERT INTO todos (id, task, deadline, priority, is_done, user_id) VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(&todo.id)
        .bind(&todo.task)
        .bind(todo.deadline)
        .bind(todo.priority)
        .bind(todo.is_done)
        .bind(&todo.user_id)
        .execute(&self.pool)
        .await
        .map_err(backend)?;
        Ok(todo)
    }

    async fn get_todo(&self, id: &str, filter: &OwnerFilter) -> StoreResult<Option<Todo>> {
        let sql = format!("SELECT {TODO_COLUMNS} FROM todos WHERE id = ? AND user_id = ?");
        let row = sqlx::query_as::<_, TodoRow>(&sql)
            .bind(id)
            .bind(filter.owner_id())
            .fetch_optional(&self.pool)
            .await
            .map_err(backend)?;
        Ok(row.map(Todo::from))
    }

    async fn update_todo(
        &self,
        id: &str,
        filter: &OwnerFilter,
        patch: &TodoPatch,
    ) -> StoreResult<Option<Todo>> {
        let mut tx = self.pool.begin().await.map_err(backend)?;

        let sql = format!("SELECT {TODO_COLUMNS} FROM todos WHERE id = ? AND user_id = ?");
        let row = sqlx::query_as::<_, TodoRow>(&sql)
            .bind(id)
            .bind(filter.owner_id())
            .fetch_optional(&mut *tx)
            .await
            .map_err(backend)?;
        let Some(row) = row else {
            return Ok(None);
        };

        let mut todo = Todo::from(row);
        patch.apply(&mut todo);

        sqlx::query(
            "UPDATE todos SET task = ?, deadline = ?, priority = ?, is_done = ? WHERE id = ? AND user_id = ?",
        )
        .bind(&todo.task)
        .bind(todo.deadline)
        .bind(todo.priority)
        .bind(todo.is_done)
        .bind(&todo.id)
        .bind(&todo.user_id)
        .execute(&mut *tx)
        .await
        .map_err(backend)?;

        tx.commit().await.map_err(backend)?;
        Ok(Some(todo))
    }

    async fn delete_todo(&self, id: &str, filter: &OwnerFilter) -> StoreResult<bool> {
        let rows_affected = sqlx::query("DELETE FROM todos WHERE id = ? AND user_id = ?")
            .bind(id)
            .bind(filter.owner_id())
            .execute(&self.pool)
            .await
            .map_err(backend)?
            .rows_affected();
        Ok(rows_affected > 0)
    }

    async fn count_todos(&self, filter: &OwnerFilter) -> StoreResult<u64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM todos WHERE user_id = ?")
            .bind(filter.owner_id())
            .fetch_one(&self.pool)
            .await
            .map_err(backend)?;
        Ok(u64::try_from(count).unwrap_or_default())
    }

    async fn select_todos(&self, query: &TodoQuery) -> StoreResult<Vec<Todo>> {
        let mut sql = format!("SELECT {TODO_COLUMNS} FROM todos WHERE user_id = ?");
        if let Some(sort) = query.sort {
            // both tokens are static strings from the whitelist enums
            sql.push_str(&format!(" ORDER BY {} {}", sort.field.column(), sort.order.sql_keyword()));
        }
        sql.push_str(" LIMIT ? OFFSET ?");

        let rows = sqlx::query_as::<_, TodoRow>(&sql)
            .bind(query.filter.owner_id())
            .bind(to_i64(query.limit))
            .bind(to_i64(query.offset))
            .fetch_all(&self.pool)
            .await
            .map_err(backend)?;
        Ok(rows.into_iter().map(Todo::from).collect())
    }

    async fn find_user_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            "SELECT id, username, preference FROM users WHERE username = ?",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(backend)?;
        Ok(row.map(User::from))
    }

    async fn insert_user(&self, user: User) -> StoreResult<User> {
        let result = sqlx::query("INSERT INTO users (id, username, preference) VALUES (?, ?, ?)")
            .bind(&user.id)
            .bind(&user.username)
            .bind(&user.preference)
            .execute(&self.pool)
            .await;

        match result {
            Ok(_) => Ok(user),
            Err(sqlx::Error::Database(err)) if err.is_unique_violation() => {
                Err(StoreError::Duplicate("username"))
            }
            Err(err) => Err(backend(err)),
        }
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}
