// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Conversions between stored column values and domain values.

use std::str::FromStr;

use leadflow_domain::DomainError;
use num_traits::ToPrimitive;
use time::format_description::well_known::Rfc3339;
use time::{OffsetDateTime, UtcOffset};

use crate::error::PersistenceError;

/// Formats a timestamp as RFC 3339 in UTC.
pub fn format_timestamp(value: OffsetDateTime) -> Result<String, PersistenceError> {
    value
        .to_offset(UtcOffset::UTC)
        .format(&Rfc3339)
        .map_err(|e| PersistenceError::SerializationError(format!("Invalid timestamp: {e}")))
}

/// Parses a stored RFC 3339 timestamp.
pub fn parse_timestamp(value: &str) -> Result<OffsetDateTime, PersistenceError> {
    OffsetDateTime::parse(value, &Rfc3339).map_err(|e| {
        PersistenceError::ReconstructionError(format!("Invalid timestamp '{value}': {e}"))
    })
}

pub fn parse_optional_timestamp(
    value: Option<&str>,
) -> Result<Option<OffsetDateTime>, PersistenceError> {
    value.map(parse_timestamp).transpose()
}

/// Parses a stored enum label.
pub fn parse_label<T>(value: &str) -> Result<T, PersistenceError>
where
    T: FromStr<Err = DomainError>,
{
    value
        .parse()
        .map_err(|e: DomainError| PersistenceError::ReconstructionError(e.to_string()))
}

/// Stores a count as a column integer.
pub fn count_to_column(value: u32) -> Result<i32, PersistenceError> {
    value
        .to_i32()
        .ok_or_else(|| PersistenceError::SerializationError(format!("Count {value} out of range")))
}

/// Reads a count column.
pub fn count_from_column(value: i32) -> Result<u32, PersistenceError> {
    value
        .to_u32()
        .ok_or_else(|| PersistenceError::ReconstructionError(format!("Negative count {value}")))
}

/// Converts a SQL `COUNT` result.
pub fn count_to_u64(value: i64) -> Result<u64, PersistenceError> {
    value
        .to_u64()
        .ok_or_else(|| PersistenceError::ReconstructionError(format!("Negative count {value}")))
}

/// Reads a boolean stored as INTEGER 0/1.
pub const fn flag(value: i32) -> bool {
    value != 0
}

/// Stores a boolean as INTEGER 0/1.
pub fn flag_value(value: bool) -> i32 {
    i32::from(value)
}

/// Escapes `%`, `_` and the escape character itself for a `LIKE` pattern.
pub fn escape_like(value: &str) -> String {
    let mut escaped: String = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Builds a `LIKE` pattern matching `value` anywhere.
pub fn contains_pattern(value: &str) -> String {
    format!("%{}%", escape_like(value))
}

/// Unicode lower-casing used for the `country_folded` column and for
/// patterns matched against it.
pub fn fold_case(value: &str) -> String {
    value.trim().to_lowercase()
}
