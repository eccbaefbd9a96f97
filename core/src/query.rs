//! Translation of raw list parameters into a bounded, owner-scoped query.
//!
//! # Design
//! `build_list_query` is pure: it validates `sort_by`/`sort_order` against
//! the whitelist and computes the page window, but never touches a store.
//! The owner filter is a required argument and cannot be derived from the
//! request parameters, so every query it produces is tenant-scoped.

use serde::{Deserialize, Serialize};

use crate::error::SortError;
use crate::pagination::PAGE_SIZE;
use crate::schema::{self, SortField, SortOrder};
use crate::types::Todo;

/// Equality filter on the owning user.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OwnerFilter {
    owner_id: String,
}

impl OwnerFilter {
    pub fn new(owner_id: impl Into<String>) -> Self {
        Self {
            owner_id: owner_id.into(),
        }
    }

    pub fn owner_id(&self) -> &str {
        &self.owner_id
    }

    pub fn matches(&self, todo: &Todo) -> bool {
        todo.user_id == self.owner_id
    }
}

/// Raw list parameters as they arrive in the query string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListParams {
    #[serde(default)]
    pub page_index: u64,
    #[serde(default)]
    pub sort_by: Option<String>,
    #[serde(default)]
    pub sort_order: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sort {
    pub field: SortField,
    pub order: SortOrder,
}

/// One page of an owner's todos, optionally ordered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoQuery {
    pub filter: OwnerFilter,
    pub sort: Option<Sort>,
    pub offset: u64,
    pub limit: u64,
}

impl TodoQuery {
    /// The unpaged filter used to count the owner's todos.
    pub fn count_query(&self) -> &OwnerFilter {
        &self.filter
    }
}

/// Validate `params` and build the page query for `filter`.
///
/// When `sort_by` is absent or empty `sort_order` is ignored and no
/// ordering is imposed. Page indexes past the end are accepted and select nothing.
pub fn build_list_query(filter: OwnerFilter, params: &ListParams) -> Result<TodoQuery, SortError> {
    let sort = match params.sort_by.as_deref().filter(|field| !field.is_empty()) {
        Some(field) => Some(Sort {
            field: schema::parse_sort_field(field)?,
            order: schema::parse_sort_order(params.sort_order.as_deref())?,
        }),
        None => None,
    };

    Ok(TodoQuery {
        filter,
        sort,
        offset: params.page_index.saturating_mul(PAGE_SIZE),
        limit: PAGE_SIZE,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(page_index: u64, sort_by: Option<&str>, sort_order: Option<&str>) -> ListParams {
        ListParams {
            page_index,
            sort_by: sort_by.map(str::to_string),
            sort_order: sort_order.map(str::to_string),
        }
    }

    #[test]
    fn defaults_to_first_page_unsorted() {
        let query = build_list_query(OwnerFilter::new("u1"), &ListParams::default()).unwrap();
        assert_eq!(query.filter.owner_id(), "u1");
        assert_eq!(query.sort, None);
        assert_eq!(query.offset, 0);
        assert_eq!(query.limit, 5);
        assert_eq!(query.count_query(), &OwnerFilter::new("u1"));
    }

    #[test]
    fn offset_follows_page_index() {
        let query = build_list_query(OwnerFilter::new("u1"), &params(3, None, None)).unwrap();
        assert_eq!(query.offset, 15);
        assert_eq!(query.limit, 5);
    }

    #[test]
    fn huge_page_index_saturates() {
        let query = build_list_query(OwnerFilter::new("u1"), &params(u64::MAX, None, None)).unwrap();
        assert_eq!(query.offset, u64::MAX);
    }

    #[test]
    fn sort_order_ignored_without_sort_by() {
        let query = build_list_query(OwnerFilter::new("u1"), &params(0, None, Some("sideways"))).unwrap();
        assert_eq!(query.sort, None);
    }

    #[test]
    fn empty_sort_by_means_unsorted() {
        let query = build_list_query(OwnerFilter::new("u1"), &params(1, Some(""), Some("up"))).unwrap();
        assert_eq!(query.sort, None);
        assert_eq!(query.offset, 5);
    }

    #[test]
    fn accepts_whitelisted_sort() {
        let query =
            build_list_query(OwnerFilter::new("u1"), &params(0, Some("priority"), Some("desc"))).unwrap();
        assert_eq!(
            query.sort,
            Some(Sort {
                field: SortField::Priority,
                order: SortOrder::Desc
            })
        );
    }

    #[test]
    fn unknown_field_lists_valid_fields() {
        let err = build_list_query(OwnerFilter::new("u1"), &params(0, Some("color"), Some("asc")))
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid sort field: color. Valid fields: task, deadline, priority, is_done"
        );
    }

    #[test]
    fn unknown_direction_is_rejected() {
        let err = build_list_query(OwnerFilter::new("u1"), &params(0, Some("priority"), Some("up")))
            .unwrap_err();
        assert_eq!(
            err,
            SortError::UnknownDirection {
                order: "up".to_string(),
                valid: "asc, desc".to_string()
            }
        );
    }

    #[test]
    fn sort_by_requires_direction() {
        let err = build_list_query(OwnerFilter::new("u1"), &params(0, Some("task"), None)).unwrap_err();
        assert!(matches!(err, SortError::MissingDirection { .. }));
    }

    #[test]
    fn different_owners_never_share_a_filter() {
        let p = params(0, Some("deadline"), Some("asc"));
        let a = build_list_query(OwnerFilter::new("u1"), &p).unwrap();
        let b = build_list_query(OwnerFilter::new("u2"), &p).unwrap();
        assert_ne!(a.filter, b.filter);
        assert_eq!(a.sort, b.sort);
        assert_eq!(a.offset, b.offset);
    }
}
