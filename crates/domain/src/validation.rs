// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use crate::lead::NormalizedLeadRecord;
use crate::order::{AllocationPolicy, OrderRequest, OrderUpdate};
use crate::types::{UserRole, UserStatus};
use crate::user::UserAccount;

/// Maximum length of free text fields (notes, comments, reasons).
pub const MAX_TEXT_LENGTH: usize = 2000;

/// Largest count one order may request for a single lead type. Counts are
/// stored as 32-bit signed columns.
pub const MAX_ORDER_COUNT: u32 = i32::MAX.unsigned_abs();

/// Validates an order request before any store access.
///
/// # Arguments
///
/// * `request` - The order request to validate
///
/// # Errors
///
/// Returns an error if:
/// - Every requested count is zero
/// - A count exceeds [`MAX_ORDER_COUNT`]
/// - The notes exceed the maximum text length
pub fn validate_order_request(request: &OrderRequest) -> Result<(), DomainError> {
    // Rule: an order must ask for something
    if request.counts.is_zero() {
        return Err(DomainError::EmptyOrderRequest);
    }

    if let Some((lead_type, count)) =
        request.counts.iter().find(|(_, count)| *count > MAX_ORDER_COUNT)
    {
        return Err(DomainError::InvalidField {
            field: lead_type.as_str(),
            message: format!("Requested {count} leads; at most {MAX_ORDER_COUNT} per type"),
        });
    }

    if let Some(notes) = &request.notes {
        validate_text_length("notes", notes)?;
    }

    Ok(())
}

/// Validates an order metadata update.
///
/// # Errors
///
/// Returns an error if the update changes nothing or the notes are too long.
pub fn validate_order_update(update: &OrderUpdate) -> Result<(), DomainError> {
    if update.is_empty() {
        return Err(DomainError::InvalidField {
            field: "update",
            message: String::from("At least one of priority or notes must be provided"),
        });
    }

    if let Some(notes) = &update.notes {
        validate_text_length("notes", notes)?;
    }

    Ok(())
}

/// Validates a cancellation reason.
///
/// # Errors
///
/// Returns an error if the reason is blank or too long.
pub fn validate_cancellation_reason(reason: &str) -> Result<(), DomainError> {
    if reason.trim().is_empty() {
        return Err(DomainError::InvalidField {
            field: "reason",
            message: String::from("Cancellation reason cannot be empty"),
        });
    }
    validate_text_length("reason", reason)
}

/// Validates a comment body.
///
/// # Errors
///
/// Returns an error if the text is blank or too long.
pub fn validate_comment(text: &str) -> Result<(), DomainError> {
    if text.trim().is_empty() {
        return Err(DomainError::InvalidField {
            field: "text",
            message: String::from("Comment cannot be empty"),
        });
    }
    validate_text_length("text", text)
}

/// Validates the required fields of a lead record.
///
/// Does not check for duplicates; that requires store context.
///
/// # Errors
///
/// Returns an error if:
/// - The first or last name is empty
/// - The email is empty or has no `@`
/// - The country is empty
pub fn validate_lead_record(record: &NormalizedLeadRecord) -> Result<(), DomainError> {
    if record.first_name.trim().is_empty() {
        return Err(DomainError::InvalidField {
            field: "first_name",
            message: String::from("First name cannot be empty"),
        });
    }

    if record.last_name.trim().is_empty() {
        return Err(DomainError::InvalidField {
            field: "last_name",
            message: String::from("Last name cannot be empty"),
        });
    }

    let email: &str = record.email.trim();
    if email.is_empty() || !email.contains('@') {
        return Err(DomainError::InvalidField {
            field: "email",
            message: format!("'{email}' is not a valid email address"),
        });
    }

    if record.country.trim().is_empty() {
        return Err(DomainError::InvalidField {
            field: "country",
            message: String::from("Country cannot be empty"),
        });
    }

    Ok(())
}

/// Validates that a user may be the target of a manual lead assignment.
///
/// # Arguments
///
/// * `user` - The prospective agent
/// * `policy` - Whether approval is required
///
/// # Errors
///
/// Returns `DomainError::AgentNotEligible` if the user is not an agent, is
/// inactive, or (when the policy requires it) is not approved.
pub fn validate_agent_eligibility(
    user: &UserAccount,
    policy: &AllocationPolicy,
) -> Result<(), DomainError> {
    let reason: Option<String> = if user.role != UserRole::Agent {
        Some(format!("role is {}, not agent", user.role))
    } else if !user.is_active {
        Some(String::from("account is inactive"))
    } else if policy.require_agent_approval && user.status != UserStatus::Approved {
        Some(format!("account status is {}", user.status))
    } else {
        None
    };

    reason.map_or(Ok(()), |reason| {
        Err(DomainError::AgentNotEligible {
            user_id: user.user_id,
            reason,
        })
    })
}

fn validate_text_length(field: &'static str, value: &str) -> Result<(), DomainError> {
    let length: usize = value.chars().count();
    if length > MAX_TEXT_LENGTH {
        return Err(DomainError::InvalidField {
            field,
            message: format!("Must be at most {MAX_TEXT_LENGTH} characters, got {length}"),
        });
    }
    Ok(())
}
