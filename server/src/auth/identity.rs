//! Caller identity forwarded by the authenticating gateway.

use std::collections::HashSet;

use axum::async_trait;
use axum::extract::{FromRequestParts, Request};
use axum::http::request::Parts;
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::Response;
use tracing::warn;
use uuid::Uuid;

use super::policy::{Permission, Role};
use crate::utils::error::AppError;

pub const USER_ID_HEADER: &str = "x-user-id";
pub const USER_ROLES_HEADER: &str = "x-user-roles";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_id: Uuid,
    pub roles: HashSet<Role>,
}

impl Identity {
    /// Reads `X-User-Id` (required) and `X-User-Roles` (comma separated,
    /// unknown roles ignored).
    pub fn from_headers(headers: &HeaderMap) -> Result<Self, AppError> {
        let raw_id = headers
            .get(USER_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| AppError::AuthError("Missing X-User-Id header".to_string()))?;

        let user_id = Uuid::parse_str(raw_id.trim())
            .map_err(|_| AppError::AuthError("X-User-Id is not a valid UUID".to_string()))?;

        let roles = headers
            .get(USER_ROLES_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(|raw| {
                raw.split(',')
                    .filter_map(|role| role.parse::<Role>().ok())
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self { user_id, roles })
    }

    pub fn has_permission(&self, permission: Permission) -> bool {
        self.roles.iter().any(|role| role.grants(permission))
    }
}

/// Rejects requests without a gateway identity and stores the parsed
/// [`Identity`] in the request extensions.
pub async fn require_identity(mut req: Request, next: Next) -> Result<Response, AppError> {
    let identity = Identity::from_headers(req.headers()).inspect_err(|_| {
        warn!(uri = %req.uri(), "Request without a valid gateway identity");
    })?;

    req.extensions_mut().insert(identity);
    Ok(next.run(req).await)
}

#[async_trait]
impl<S> FromRequestParts<S> for Identity
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        if let Some(identity) = parts.extensions.get::<Identity>() {
            return Ok(identity.clone());
        }

        let identity = Identity::from_headers(&parts.headers)?;
        parts.extensions.insert(identity.clone());
        Ok(identity)
    }
}
