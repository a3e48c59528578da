// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Authentication and authorization types and services.
//!
//! Identity comes from a user id asserted by a trusted gateway. No
//! credentials or sessions are checked here; the id only has to name an
//! active user.

use leadflow_domain::{
    Access, Requester, UserRole,
    policy::{
        authorize_delete_lead, authorize_lead_access, authorize_manage_leads,
        authorize_manage_users, authorize_view_reports,
    },
};
use leadflow_persistence::{Persistence, UserData};
use tracing::{debug, warn};

use crate::error::{ApiError, translate_persistence_error};

/// An authenticated caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedActor {
    /// The caller's user id.
    pub user_id: i64,
    /// The caller's login name.
    pub login_name: String,
    /// The caller's display name.
    pub display_name: String,
    /// The caller's role.
    pub role: UserRole,
}

impl AuthenticatedActor {
    /// Creates a new authenticated actor.
    #[must_use]
    pub const fn new(
        user_id: i64,
        login_name: String,
        display_name: String,
        role: UserRole,
    ) -> Self {
        Self {
            user_id,
            login_name,
            display_name,
            role,
        }
    }

    /// Returns the identity handed to the core for authorization and audit.
    #[must_use]
    pub const fn to_requester(&self) -> Requester {
        Requester::new(self.user_id, self.role)
    }
}

/// Authentication service.
pub struct AuthenticationService;

impl AuthenticationService {
    /// Resolves a user id into an authenticated actor.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::AuthenticationFailed` if the user does not exist or
    /// is inactive, or an internal error if the lookup fails.
    pub fn authenticate(
        persistence: &mut Persistence,
        user_id: i64,
    ) -> Result<AuthenticatedActor, ApiError> {
        let user: UserData = persistence
            .get_user_by_id(user_id)
            .map_err(translate_persistence_error)?
            .ok_or_else(|| {
                warn!(user_id, "Unknown user");
                ApiError::AuthenticationFailed {
                    reason: format!("Unknown user {user_id}"),
                }
            })?;

        if !user.is_active {
            warn!(user_id, "Inactive user");
            return Err(ApiError::AuthenticationFailed {
                reason: format!("User {user_id} is inactive"),
            });
        }

        debug!(user_id, role = %user.role, "Caller authenticated");
        Ok(AuthenticatedActor::new(
            user.user_id,
            user.login_name,
            user.display_name,
            user.role,
        ))
    }
}

/// Authorization service.
///
/// Every check delegates to the domain policy and only turns the decision
/// into an `ApiError`.
pub struct AuthorizationService;

impl AuthorizationService {
    /// Checks that the actor may create, import and edit leads.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Unauthorized` when denied.
    pub fn authorize_manage_leads(actor: &AuthenticatedActor) -> Result<(), ApiError> {
        require(authorize_manage_leads(actor.role), "manage_leads")
    }

    /// Checks that the actor may delete leads.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Unauthorized` when denied.
    pub fn authorize_delete_lead(actor: &AuthenticatedActor) -> Result<(), ApiError> {
        require(authorize_delete_lead(actor.role), "delete_lead")
    }

    /// Checks that the actor may read or work a lead held by `assigned_to`.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Unauthorized` when denied.
    pub fn authorize_lead_access(
        actor: &AuthenticatedActor,
        assigned_to: Option<i64>,
        action: &str,
    ) -> Result<(), ApiError> {
        require(authorize_lead_access(&actor.to_requester(), assigned_to), action)
    }

    /// Checks that the actor may administer users.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Unauthorized` when denied.
    pub fn authorize_manage_users(actor: &AuthenticatedActor) -> Result<(), ApiError> {
        require(authorize_manage_users(actor.role), "manage_users")
    }

    /// Checks that the actor may read listings and statistics.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Unauthorized` when denied.
    pub fn authorize_view_reports(actor: &AuthenticatedActor) -> Result<(), ApiError> {
        require(authorize_view_reports(actor.role), "view_reports")
    }
}

fn require(access: Access, action: &str) -> Result<(), ApiError> {
    match access {
        Access::Allow => Ok(()),
        Access::Deny => Err(ApiError::Unauthorized {
            action: action.to_string(),
        }),
    }
}
