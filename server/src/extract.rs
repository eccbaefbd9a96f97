use axum::{extract::FromRequestParts, http::request::Parts};
use tasklist_core::OwnerFilter;

use crate::error::ApiError;

/// Header carrying the caller's user id. Its value is trusted as given.
pub const USER_ID_HEADER: &str = "user-id";

/// Underscore spelling of [`USER_ID_HEADER`], still accepted when the
/// hyphenated header is absent.
pub const USER_ID_HEADER_ALT: &str = "user_id";

/// The caller's tenant scope, taken from the `user-id` header.
#[derive(Debug, Clone)]
pub struct Owner(pub OwnerFilter);

impl<S: Send + Sync> FromRequestParts<S> for Owner {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let owner_id = [USER_ID_HEADER, USER_ID_HEADER_ALT]
            .into_iter()
            .find_map(|name| parts.headers.get(name))
            .and_then(|value| value.to_str().ok())
            .ok_or(ApiError::MissingOwner)?;
        Ok(Owner(OwnerFilter::new(owner_id)))
    }
}
