// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for the API layer.

use leadflow::CoreError;
use leadflow_domain::DomainError;
use leadflow_persistence::PersistenceError;
use thiserror::Error;
use tracing::error;

use crate::password_policy::PasswordPolicyError;

/// API-level errors.
///
/// These are distinct from domain/core errors and represent the API contract.
/// Lower layers are translated explicitly; none of their variants leak through.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The caller could not be identified.
    #[error("Authentication failed: {reason}")]
    AuthenticationFailed {
        /// The reason authentication failed.
        reason: String,
    },
    /// The caller is identified but may not perform the action.
    #[error("Unauthorized: not permitted to {action}")]
    Unauthorized {
        /// The action that was attempted.
        action: String,
    },
    /// Invalid input was provided.
    #[error("Invalid input for field '{field}': {message}")]
    InvalidInput {
        /// The field that was invalid.
        field: String,
        /// A description of the validation failure.
        message: String,
    },
    /// A requested resource was not found.
    #[error("{resource_type} not found: {message}")]
    ResourceNotFound {
        /// The type of resource that was not found.
        resource_type: String,
        /// A description of what was not found.
        message: String,
    },
    /// The request conflicts with the current state of a resource.
    #[error("Conflict: {message}")]
    Conflict {
        /// A description of the conflict.
        message: String,
    },
    /// A domain rule was violated.
    #[error("Domain rule violation ({rule}): {message}")]
    DomainRuleViolation {
        /// The rule that was violated.
        rule: String,
        /// A description of the violation.
        message: String,
    },
    /// The uploaded CSV could not be read at all.
    #[error("Invalid CSV format: {reason}")]
    InvalidCsvFormat {
        /// Why the CSV was rejected.
        reason: String,
    },
    /// An internal error occurred.
    #[error("Internal error: {message}")]
    Internal {
        /// A description of the internal error.
        message: String,
    },
}

impl From<PasswordPolicyError> for ApiError {
    fn from(err: PasswordPolicyError) -> Self {
        Self::InvalidInput {
            field: String::from("password"),
            message: err.to_string(),
        }
    }
}

/// Translates a domain error into an API error.
///
/// This translation is explicit and ensures domain errors are not leaked directly.
#[must_use]
pub fn translate_domain_error(err: DomainError) -> ApiError {
    match err {
        DomainError::EmptyOrderRequest => ApiError::InvalidInput {
            field: String::from("counts"),
            message: err.to_string(),
        },
        DomainError::InvalidField { field, message } => ApiError::InvalidInput {
            field: field.to_string(),
            message,
        },
        DomainError::InvalidLeadType(_) => invalid_value("lead_type", &err),
        DomainError::InvalidGender(_) => invalid_value("gender", &err),
        DomainError::InvalidDocumentStatus(_) => invalid_value("document_status", &err),
        DomainError::InvalidLeadStatus(_) | DomainError::InvalidOrderStatus(_) => {
            invalid_value("status", &err)
        }
        DomainError::InvalidPriority(_) => invalid_value("priority", &err),
        DomainError::InvalidRole(_) => invalid_value("role", &err),
        DomainError::InvalidUserStatus(_) => invalid_value("user_status", &err),
        DomainError::OrderNotFound(id) => not_found("Order", id),
        DomainError::LeadNotFound(id) => not_found("Lead", id),
        DomainError::UserNotFound(id) => not_found("User", id),
        DomainError::Forbidden { action } => ApiError::Unauthorized {
            action: action.to_string(),
        },
        DomainError::OrderAlreadyCancelled(_) | DomainError::LeadInUse { .. } => {
            ApiError::Conflict {
                message: err.to_string(),
            }
        }
        DomainError::InvalidStatusTransition { .. } => ApiError::DomainRuleViolation {
            rule: String::from("order_status_transition"),
            message: err.to_string(),
        },
        DomainError::AgentNotEligible { .. } => ApiError::DomainRuleViolation {
            rule: String::from("eligible_agent"),
            message: err.to_string(),
        },
    }
}

/// Translates a core error into an API error.
#[must_use]
pub fn translate_core_error(err: CoreError) -> ApiError {
    match err {
        CoreError::DomainViolation(domain_err) => translate_domain_error(domain_err),
        CoreError::AllocationInconsistency { .. } => {
            error!(error = %err, "Order allocation failed verification");
            ApiError::Internal {
                message: err.to_string(),
            }
        }
    }
}

/// Translates a persistence error into an API error.
///
/// Store failures become `Internal`; the message is logged here so handlers
/// do not have to.
#[must_use]
pub fn translate_persistence_error(err: PersistenceError) -> ApiError {
    match err {
        PersistenceError::Core(core_err) => translate_core_error(core_err),
        PersistenceError::NotFound(what) => ApiError::ResourceNotFound {
            resource_type: what
                .split_whitespace()
                .next()
                .unwrap_or("Resource")
                .to_string(),
            message: format!("{what} does not exist"),
        },
        PersistenceError::DuplicateLoginName(login) => ApiError::Conflict {
            message: format!("Login name '{login}' is already taken"),
        },
        other => {
            error!(error = %other, "Persistence error");
            ApiError::Internal {
                message: other.to_string(),
            }
        }
    }
}

fn invalid_value(field: &str, err: &DomainError) -> ApiError {
    ApiError::InvalidInput {
        field: field.to_string(),
        message: err.to_string(),
    }
}

fn not_found(resource_type: &str, id: i64) -> ApiError {
    ApiError::ResourceNotFound {
        resource_type: resource_type.to_string(),
        message: format!("{resource_type} {id} does not exist"),
    }
}
