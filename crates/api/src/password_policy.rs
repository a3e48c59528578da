// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Password rules for new accounts.

use thiserror::Error;

/// Why a password was refused.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PasswordPolicyError {
    #[error("Password must be at least {min_length} characters long")]
    TooShort { min_length: usize },

    #[error(
        "Password must mix at least {required} of: uppercase, lowercase, digits, symbols \
         (found {found})"
    )]
    InsufficientComplexity { required: usize, found: usize },

    /// The password equals the login or display name, ignoring case.
    #[error("Password must not match {field}")]
    MatchesForbiddenField { field: String },
}

/// Length and character-mix requirements.
pub struct PasswordPolicy {
    pub min_length: usize,
    /// How many of the four character kinds must appear.
    pub min_complexity: usize,
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self {
            min_length: 8,
            min_complexity: 2,
        }
    }
}

const CHARACTER_KINDS: [fn(&char) -> bool; 4] = [
    char::is_ascii_uppercase,
    char::is_ascii_lowercase,
    char::is_ascii_digit,
    char::is_ascii_punctuation,
];

impl PasswordPolicy {
    /// Checks `password` for an account with the given names.
    ///
    /// # Errors
    ///
    /// Returns the first rule the password breaks.
    pub fn validate(
        &self,
        password: &str,
        login_name: &str,
        display_name: &str,
    ) -> Result<(), PasswordPolicyError> {
        if password.chars().count() < self.min_length {
            return Err(PasswordPolicyError::TooShort {
                min_length: self.min_length,
            });
        }

        let found: usize = CHARACTER_KINDS
            .iter()
            .filter(|kind| password.chars().any(|c| kind(&c)))
            .count();
        if found < self.min_complexity {
            return Err(PasswordPolicyError::InsufficientComplexity {
                required: self.min_complexity,
                found,
            });
        }

        for (field, value) in [("login_name", login_name), ("display_name", display_name)] {
            if password.eq_ignore_ascii_case(value.trim()) {
                return Err(PasswordPolicyError::MatchesForbiddenField {
                    field: field.to_string(),
                });
            }
        }
        Ok(())
    }
}
