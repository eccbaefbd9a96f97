//! Field constraints for todos and users, and the sortable whitelist.
//!
//! Sorting by name goes through [`SortField`], which pairs every accepted
//! token with a typed comparator and a fixed column name. Nothing outside
//! this enum is ever used to pick a field.

use std::cmp::Ordering;
use std::ops::RangeInclusive;

use crate::error::{Error, SortError};
use crate::types::Todo;

pub const MAX_TASK_LEN: usize = 255;
pub const MAX_USERNAME_LEN: usize = 50;
pub const PRIORITY_RANGE: RangeInclusive<i64> = 0..=2;
pub const IS_DONE_RANGE: RangeInclusive<i64> = 0..=1;

/// A todo attribute eligible for ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortField {
    Task,
    Deadline,
    Priority,
    IsDone,
}

impl SortField {
    pub const ALL: [SortField; 4] = [
        SortField::Task,
        SortField::Deadline,
        SortField::Priority,
        SortField::IsDone,
    ];

    /// Case-sensitive lookup of a whitelisted field token.
    pub fn from_token(token: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.as_str() == token)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SortField::Task => "task",
            SortField::Deadline => "deadline",
            SortField::Priority => "priority",
            SortField::IsDone => "is_done",
        }
    }

    /// Column holding this field in the `todos` table.
    pub fn column(self) -> &'static str {
        self.as_str()
    }

    /// Ascending comparison of two todos on this field.
    pub fn compare(self, a: &Todo, b: &Todo) -> Ordering {
        match self {
            SortField::Task => a.task.cmp(&b.task),
            SortField::Deadline => a.deadline.cmp(&b.deadline),
            SortField::Priority => a.priority.cmp(&b.priority),
            SortField::IsDone => a.is_done.cmp(&b.is_done),
        }
    }

    /// Comma-separated list of every accepted token, for error messages.
    pub fn valid_tokens() -> String {
        Self::ALL.map(SortField::as_str).join(", ")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub const ALL: [SortOrder; 2] = [SortOrder::Asc, SortOrder::Desc];

    pub fn from_token(token: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|order| order.as_str() == token)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }

    pub fn sql_keyword(self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }

    pub fn valid_tokens() -> String {
        Self::ALL.map(SortOrder::as_str).join(", ")
    }
}

pub fn is_sortable(field: &str) -> bool {
    SortField::from_token(field).is_some()
}

pub fn is_valid_direction(direction: &str) -> bool {
    SortOrder::from_token(direction).is_some()
}

pub(crate) fn parse_sort_field(token: &str) -> Result<SortField, SortError> {
    SortField::from_token(token).ok_or_else(|| SortError::UnknownField {
        field: token.to_string(),
        valid: SortField::valid_tokens(),
    })
}

pub(crate) fn parse_sort_order(token: Option<&str>) -> Result<SortOrder, SortError> {
    let token = token.ok_or_else(|| SortError::MissingDirection {
        valid: SortOrder::valid_tokens(),
    })?;
    SortOrder::from_token(token).ok_or_else(|| SortError::UnknownDirection {
        order: token.to_string(),
        valid: SortOrder::valid_tokens(),
    })
}

pub fn validate_task(task: &str) -> Result<(), Error> {
    max_chars("task", task, MAX_TASK_LEN)
}

pub fn validate_username(username: &str) -> Result<(), Error> {
    max_chars("username", username, MAX_USERNAME_LEN)
}

pub fn validate_priority(priority: i64) -> Result<i64, Error> {
    within("priority", priority, &PRIORITY_RANGE)
}

pub fn validate_is_done(is_done: i64) -> Result<i64, Error> {
    within("is_done", is_done, &IS_DONE_RANGE)
}

fn max_chars(field: &'static str, value: &str, max: usize) -> Result<(), Error> {
    let len = value.chars().count();
    if len > max {
        return Err(Error::InvalidField {
            field,
            reason: format!("must be at most {max} characters, got {len}"),
        });
    }
    Ok(())
}

fn within(field: &'static str, value: i64, range: &RangeInclusive<i64>) -> Result<i64, Error> {
    if !range.contains(&value) {
        return Err(Error::InvalidField {
            field,
            reason: format!(
                "must be between {} and {}, got {value}",
                range.start(),
                range.end()
            ),
        });
    }
    Ok(value)
}
