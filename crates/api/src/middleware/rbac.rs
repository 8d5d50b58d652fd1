//! Role-based access control (RBAC) extractors.
//!
//! Each extractor wraps [`AuthUser`] and rejects requests whose role does not
//! meet the route's requirement, so the policy is visible in the handler
//! signature:
//!
//! | Extractor      | Roles              | Used for                                       |
//! |----------------|--------------------|------------------------------------------------|
//! | `RequireAdmin` | Admin              | deletes, tournament/stringer writes, users     |
//! | `RequireStaff` | Admin, Stringer    | player/racquet/string/job writes, transitions  |
//! | `RequireAuth`  | any                | reads                                          |

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use stringdesk_core::error::CoreError;
use stringdesk_core::roles::{is_staff, ROLE_ADMIN};

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// Requires the `Admin` role. Rejects with 403 Forbidden otherwise.
pub struct RequireAdmin(pub AuthUser);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if user.role != ROLE_ADMIN {
            return Err(AppError::Core(CoreError::Forbidden(
                "Admin role required".into(),
            )));
        }
        Ok(RequireAdmin(user))
    }
}

/// Requires `Admin` or `Stringer`. Rejects with 403 Forbidden otherwise.
pub struct RequireStaff(pub AuthUser);

impl FromRequestParts<AppState> for RequireStaff {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if !is_staff(&user.role) {
            return Err(AppError::Core(CoreError::Forbidden(
                "Admin or Stringer role required".into(),
            )));
        }
        Ok(RequireStaff(user))
    }
}

/// Requires any authenticated user (any valid role).
///
/// Functionally equivalent to [`AuthUser`] but named explicitly so read
/// routes document that they are not public.
pub struct RequireAuth(pub AuthUser);

impl FromRequestParts<AppState> for RequireAuth {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        Ok(RequireAuth(user))
    }
}
