//! Validation and query construction for a multi-tenant task-list service.
//!
//! # Overview
//! Turns raw request values into validated, owner-scoped work for a record
//! store: `yyyymmdd` deadlines become calendar dates, `sort_by`/`sort_order`
//! are checked against a fixed whitelist, and page indexes become a bounded
//! offset/limit window with a derived page count.
//!
//! # Design
//! - `date`, `schema`, `query` and `pagination` are pure and synchronous.
//! - `store::TodoStore` is the record-store seam; `MemoryStore` implements
//!   it in-process and other backends live with their runtime.
//! - `service` drives a store and fails fast: nothing is written unless the
//!   whole request validated.
//! - Every todo access carries an `OwnerFilter`, so one tenant can never
//!   read or touch another tenant's rows.

pub mod date;
pub mod error;
pub mod pagination;
pub mod query;
pub mod schema;
pub mod service;
pub mod store;
pub mod types;

pub use date::DateInput;
pub use error::{DateError, Error, SortError, StoreError};
pub use pagination::{total_pages, PAGE_SIZE};
pub use query::{build_list_query, ListParams, OwnerFilter, Sort, TodoQuery};
pub use schema::{SortField, SortOrder};
pub use store::{MemoryStore, TodoStore};
pub use types::{CreateTodo, Todo, TodoPatch, TodoPublic, TodosResponse, UpdateTodo, User, UserCreate};
