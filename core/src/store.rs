//! The record-store capability consumed by the task-list operations.
//!
//! # Design
//! Stores receive only validated values: an `OwnerFilter` on every todo
//! access, a `TodoQuery` whose sort comes from the `SortField` whitelist,
//! and a `TodoPatch` with typed fields. Every method returns a `Send`
//! future so handlers generic over the store can run on a multi-threaded
//! runtime.
//!
//! `MemoryStore` keeps records in insertion order, which is the natural
//! order returned when a query carries no sort.

use std::future::Future;

use tokio::sync::RwLock;

use crate::error::StoreError;
use crate::query::{OwnerFilter, TodoQuery};
use crate::schema::SortOrder;
use crate::types::{Todo, TodoPatch, User};

pub type StoreResult<T> = Result<T, StoreError>;

pub trait TodoStore: Send + Sync + 'static {
    fn insert_todo(&self, todo: Todo) -> impl Future<Output = StoreResult<Todo>> + Send;

    fn get_todo(
        &self,
        id: &str,
        filter: &OwnerFilter,
    ) -> impl Future<Output = StoreResult<Option<Todo>>> + Send;

    /// Apply `patch` to the matching todo and return the updated record.
    fn update_todo(
        &self,
        id: &str,
        filter: &OwnerFilter,
        patch: &TodoPatch,
    ) -> impl Future<Output = StoreResult<Option<Todo>>> + Send;

    /// Returns `false` when nothing matched.
    fn delete_todo(&self, id: &str, filter: &OwnerFilter) -> impl Future<Output = StoreResult<bool>> + Send;

    fn count_todos(&self, filter: &OwnerFilter) -> impl Future<Output = StoreResult<u64>> + Send;

    fn select_todos(&self, query: &TodoQuery) -> impl Future<Output = StoreResult<Vec<Todo>>> + Send;

    fn find_user_by_username(&self, username: &str) -> impl Future<Output = StoreResult<Option<User>>> + Send;

    /// Fails with `StoreError::Duplicate("username")` if the name is taken.
    fn insert_user(&self, user: User) -> impl Future<Output = StoreResult<User>> + Send;

    /// Release the store's resources. Further calls are not supported.
    fn close(&self) -> impl Future<Output = ()> + Send {
        async {}
    }
}

#[derive(Debug, Default)]
struct Tables {
    todos: Vec<Todo>,
    users: Vec<User>,
}

/// In-process store backed by insertion-ordered vectors.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TodoStore for MemoryStore {
    async fn insert_todo(&self, todo: Todo) -> StoreResult<Todo> {
        self.tables.write().await.todos.push(todo.clone());
        Ok(todo)
    }

    async fn get_todo(&self, id: &str, filter: &OwnerFilter) -> StoreResult<Option<Todo>> {
        let tables = self.tables.read().await;
        Ok(tables
            .todos
            .iter()
            .find(|todo| todo.id == id && filter.matches(todo))
            .cloned())
    }

    async fn update_todo(
        &self,
        id: &str,
        filter: &OwnerFilter,
        patch: &TodoPatch,
    ) -> StoreResult<Option<Todo>> {
        let mut tables = self.tables.write().await;
        let Some(todo) = tables
            .todos
            .iter_mut()
            .find(|todo| todo.id == id && filter.matches(todo))
        else {
            return Ok(None);
        };
        patch.apply(todo);
        Ok(Some(todo.clone()))
    }

    async fn delete_todo(&self, id: &str, filter: &OwnerFilter) -> StoreResult<bool> {
        let mut tables = self.tables.write().await;
        let before = tables.todos.len();
        tables.todos.retain(|todo| !(todo.id == id && filter.matches(todo)));
        Ok(tables.todos.len() < before)
    }

    async fn count_todos(&self, filter: &OwnerFilter) -> StoreResult<u64> {
        let tables = self.tables.read().await;
        Ok(tables.todos.iter().filter(|todo| filter.matches(todo)).count() as u64)
    }

    async fn select_todos(&self, query: &TodoQuery) -> StoreResult<Vec<Todo>> {
        let tables = self.tables.read().await;
        let mut rows: Vec<Todo> = tables
            .todos
            .iter()
            .filter(|todo| query.filter.matches(todo))
            .cloned()
            .collect();

        if let Some(sort) = query.sort {
            rows.sort_by(|a, b| match sort.order {
                SortOrder::Asc => sort.field.compare(a, b),
                SortOrder::Desc => sort.field.compare(b, a),
            });
        }

        let offset = usize::try_from(query.offset).unwrap_or(usize::MAX);
        let limit = usize::try_from(query.limit).unwrap_or(usize::MAX);
        Ok(rows.into_iter().skip(offset).take(limit).collect())
    }

    async fn find_user_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|user| user.username == username).cloned())
    }

    async fn insert_user(&self, user: User) -> StoreResult<User> {
        let mut tables = self.tables.write().await;
        if tables.users.iter().any(|existing| existing.username == user.username) {
            return Err(StoreError::Duplicate("username"));
        }
        tables.users.push(user.clone());
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::query::{build_list_query, ListParams};

    fn todo(id: &str, owner: &str, task: &str, priority: i64) -> Todo {
        Todo {
            id: id.to_string(),
            task: task.to_string(),
            deadline: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            priority,
            is_done: 0,
            user_id: owner.to_string(),
        }
    }

    fn sorted(field: &str, order: &str) -> ListParams {
        ListParams {
            page_index: 0,
            sort_by: Some(field.to_string()),
            sort_order: Some(order.to_string()),
        }
    }

    #[tokio::test]
    async fn owner_filter_scopes_every_access() {
        let store = MemoryStore::new();
        store.insert_todo(todo("a", "u1", "mine", 0)).await.unwrap();
        let u2 = OwnerFilter::new("u2");

        assert!(store.get_todo("a", &u2).await.unwrap().is_none());
        assert!(store.update_todo("a", &u2, &TodoPatch::default()).await.unwrap().is_none());
        assert!(!store.delete_todo("a", &u2).await.unwrap());
        assert_eq!(store.count_todos(&u2).await.unwrap(), 0);
        assert!(store.get_todo("a", &OwnerFilter::new("u1")).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn unsorted_select_keeps_insertion_order() {
        let store = MemoryStore::new();
        for (id, task) in [("1", "c"), ("2", "a"), ("3", "b")] {
            store.insert_todo(todo(id, "u1", task, 0)).await.unwrap();
        }
        let query = build_list_query(OwnerFilter::new("u1"), &ListParams::default()).unwrap();
        let ids: Vec<_> = store.select_todos(&query).await.unwrap().into_iter().map(|t| t.id).collect();
        assert_eq!(ids, ["1", "2", "3"]);
    }

    #[tokio::test]
    async fn sort_is_stable_in_both_directions() {
        let store = MemoryStore::new();
        for (id, priority) in [("1", 1), ("2", 2), ("3", 1), ("4", 0)] {
            store.insert_todo(todo(id, "u1", "t", priority)).await.unwrap();
        }

        let query = build_list_query(OwnerFilter::new("u1"), &sorted("priority", "asc")).unwrap();
        let ids: Vec<_> = store.select_todos(&query).await.unwrap().into_iter().map(|t| t.id).collect();
        assert_eq!(ids, ["4", "1", "3", "2"]);

        let query = build_list_query(OwnerFilter::new("u1"), &sorted("priority", "desc")).unwrap();
        let ids: Vec<_> = store.select_todos(&query).await.unwrap().into_iter().map(|t| t.id).collect();
        assert_eq!(ids, ["2", "1", "3", "4"]);
    }

    #[tokio::test]
    async fn duplicate_username_is_rejected() {
        let store = MemoryStore::new();
        let user = User {
            id: "1".to_string(),
            username: "alice".to_string(),
            preference: None,
        };
        store.insert_user(user.clone()).await.unwrap();
        let again = User {
            id: "2".to_string(),
            ..user
        };
        assert!(matches!(
            store.insert_user(again).await,
            Err(StoreError::Duplicate("username"))
        ));
    }

    #[tokio::test]
    async fn close_keeps_records() {
        let store = MemoryStore::new();
        store.insert_todo(todo("1", "u1", "a", 0)).await.unwrap();
        store.close().await;

        let filter = OwnerFilter::new("u1");
        assert_eq!(store.count_todos(&filter).await.unwrap(), 1);
        assert!(store.get_todo("1", &filter).await.unwrap().is_some());
    }
}
