use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

use crate::errors::AppError;

/// Header set by the auth gateway in front of this service once the session is verified.
pub const USER_ID_HEADER: &str = "x-user-id";

/// Identity of the authenticated caller. Sessions are verified upstream; requests
/// that reach us without the header are rejected with 401.
#[derive(Debug, Clone)]
pub struct CallerIdentity {
    pub user_id: String,
}

#[async_trait]
impl<S> FromRequestParts<S> for CallerIdentity
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(|id| CallerIdentity {
                user_id: id.to_string(),
            })
            .ok_or(AppError::Unauthorized)
    }
}
