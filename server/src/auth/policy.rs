//! Role to permission table and the per-route-group permission layer.

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::str::FromStr;

use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;
use tracing::warn;

use super::identity::Identity;
use crate::utils::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Customer,
    Organizer,
    Admin,
}

impl FromStr for Role {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "customer" => Ok(Role::Customer),
            "organizer" => Ok(Role::Organizer),
            "admin" => Ok(Role::Admin),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Permission {
    BookTickets,
    ManageEvents,
    ManageVenues,
    ManageCategories,
    ModerateEvents,
    ManageUsers,
}

impl Permission {
    pub const ALL: &'static [Permission] = &[
        Permission::BookTickets,
        Permission::ManageEvents,
        Permission::ManageVenues,
        Permission::ManageCategories,
        Permission::ModerateEvents,
        Permission::ManageUsers,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Permission::BookTickets => "book_tickets",
            Permission::ManageEvents => "manage_events",
            Permission::ManageVenues => "manage_venues",
            Permission::ManageCategories => "manage_categories",
            Permission::ModerateEvents => "moderate_events",
            Permission::ManageUsers => "manage_users",
        }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Role {
    pub fn permissions(&self) -> &'static [Permission] {
        match self {
            Role::Customer => &[Permission::BookTickets],
            Role::Organizer => &[Permission::ManageEvents],
            Role::Admin => Permission::ALL,
        }
    }

    pub fn grants(&self, permission: Permission) -> bool {
        self.permissions().contains(&permission)
    }
}

/// Permission layer for a route group.
///
/// ```ignore
/// Router::new()
///     .route("/api/bookings", post(create_booking))
///     .layer(middleware::from_fn(require_permission(Permission::BookTickets)))
///     .layer(middleware::from_fn(require_identity));
/// ```
///
/// Expects [`Identity`] in the request extensions; without it the request
/// is unauthenticated (401). A caller whose roles lack `permission` gets 403.
pub fn require_permission(
    permission: Permission,
) -> impl Fn(Request, Next) -> Pin<Box<dyn Future<Output = Result<Response, AppError>> + Send>>
       + Clone {
    move |req: Request, next: Next| {
        Box::pin(async move {
            let identity = req
                .extensions()
                .get::<Identity>()
                .ok_or_else(|| AppError::AuthError("Missing caller identity".to_string()))?;

            if !identity.has_permission(permission) {
                warn!(
                    user_id = %identity.user_id,
                    required_permission = %permission,
                    "Permission denied"
                );
                return Err(AppError::Forbidden(format!(
                    "Permission denied: {}",
                    permission
                )));
            }

            Ok(next.run(req).await)
        })
    }
}
