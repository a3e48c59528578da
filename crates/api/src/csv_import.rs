// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! CSV adapter for bulk lead import.
//!
//! Maps spreadsheet headers onto [`NormalizedLeadRecord`] fields. Headers
//! are matched ignoring case, spaces, hyphens and underscores, and a few
//! common synonyms are accepted. Parsing never touches the store; field
//! validation and duplicate checks happen at ingest.

use csv::StringRecord;
use leadflow_domain::{DocumentStatus, Gender, LeadStatus, LeadType, NormalizedLeadRecord};
use std::collections::HashMap;
use std::str::FromStr;

use crate::error::ApiError;

/// A row that parsed into a lead record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvLeadRow {
    /// The row number (1-based, excluding header).
    pub row_number: usize,
    /// The parsed record.
    pub record: NormalizedLeadRecord,
}

/// A row that could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvRowError {
    /// The row number (1-based, excluding header).
    pub row_number: usize,
    /// What was wrong with it.
    pub message: String,
}

/// The result of parsing a lead CSV.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CsvImport {
    /// Rows ready for ingest, in file order.
    pub rows: Vec<CsvLeadRow>,
    /// Rows rejected while parsing.
    pub errors: Vec<CsvRowError>,
}

/// Canonical field names and the normalized headers accepted for each.
const HEADER_SYNONYMS: &[(&str, &[&str])] = &[
    ("lead_type", &["leadtype", "type"]),
    ("first_name", &["firstname", "first", "givenname"]),
    ("last_name", &["lastname", "last", "surname", "familyname"]),
    ("email", &["email", "emailaddress", "mail"]),
    ("phone", &["phone", "phonenumber", "telephone", "mobile"]),
    ("country", &["country", "countryname"]),
    ("gender", &["gender", "sex"]),
    ("client", &["client"]),
    ("client_broker", &["clientbroker", "broker"]),
    ("client_network", &["clientnetwork", "network"]),
    ("document_status", &["documentstatus", "documents"]),
    ("status", &["status", "leadstatus"]),
    ("source", &["source", "leadsource"]),
];

/// Fields every import must carry a column for.
const REQUIRED_HEADERS: &[&str] = &["lead_type", "first_name", "last_name", "email", "country"];

/// Normalizes a header for matching: lowercase, separators removed.
fn normalize_header(header: &str) -> String {
    header
        .trim()
        .chars()
        .filter(|c| !matches!(c, ' ' | '_' | '-'))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Maps canonical field names to column positions.
fn map_headers(headers: &StringRecord) -> Result<HashMap<&'static str, usize>, ApiError> {
    let mut header_map: HashMap<&'static str, usize> = HashMap::new();

    for (idx, header) in headers.iter().enumerate() {
        let normalized: String = normalize_header(header);
        let canonical: Option<&'static str> = HEADER_SYNONYMS
            .iter()
            .find(|(_, synonyms)| synonyms.contains(&normalized.as_str()))
            .map(|(field, _)| *field);
        if let Some(field) = canonical {
            header_map.entry(field).or_insert(idx);
        }
    }

    let missing: Vec<&str> = REQUIRED_HEADERS
        .iter()
        .filter(|required| !header_map.contains_key(*required))
        .copied()
        .collect();

    if !missing.is_empty() {
        return Err(ApiError::InvalidCsvFormat {
            reason: format!("Missing required headers: {}", missing.join(", ")),
        });
    }

    Ok(header_map)
}

fn parse_optional<T: FromStr>(
    value: Option<String>,
    field: &str,
    errors: &mut Vec<String>,
) -> Option<T>
where
    T::Err: std::fmt::Display,
{
    value.and_then(|v| match v.parse::<T>() {
        Ok(parsed) => Some(parsed),
        Err(e) => {
            errors.push(format!("{field}: {e}"));
            None
        }
    })
}

/// Parses one CSV record into a lead record, or the list of problems with it.
fn parse_csv_row(
    record: &StringRecord,
    header_map: &HashMap<&'static str, usize>,
) -> Result<NormalizedLeadRecord, Vec<String>> {
    let mut errors: Vec<String> = Vec::new();

    let get_field = |name: &str| -> Option<String> {
        header_map
            .get(name)
            .and_then(|&idx| record.get(idx))
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    };

    let lead_type: Option<LeadType> = match get_field("lead_type") {
        Some(value) => parse_optional(Some(value), "lead_type", &mut errors),
        None => {
            errors.push(String::from("lead_type: required field is missing or empty"));
            None
        }
    };
    let gender: Option<Gender> = parse_optional(get_field("gender"), "gender", &mut errors);
    let document_status: Option<DocumentStatus> =
        parse_optional(get_field("document_status"), "document_status", &mut errors);
    let status: Option<LeadStatus> = parse_optional(get_field("status"), "status", &mut errors);

    let Some(lead_type) = lead_type else {
        return Err(errors);
    };
    if !errors.is_empty() {
        return Err(errors);
    }

    let mut lead: NormalizedLeadRecord = NormalizedLeadRecord::new(
        lead_type,
        get_field("first_name").unwrap_or_default(),
        get_field("last_name").unwrap_or_default(),
        get_field("email").unwrap_or_default(),
        get_field("country").unwrap_or_default(),
    );
    lead.phone = get_field("phone");
    lead.gender = gender.unwrap_or_default();
    lead.client = get_field("client");
    lead.client_broker = get_field("client_broker");
    lead.client_network = get_field("client_network");
    lead.document_status = document_status;
    lead.status = status.unwrap_or_default();
    lead.source = get_field("source");

    Ok(lead)
}

/// Parses lead CSV text.
///
/// # Errors
///
/// Returns `ApiError::InvalidCsvFormat` if the header row is unreadable or
/// lacks a required column. Problems with individual rows are reported in
/// [`CsvImport::errors`] instead.
pub fn parse_leads_csv(csv_content: &str) -> Result<CsvImport, ApiError> {
    let mut reader: csv::Reader<&[u8]> = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(false)
        .from_reader(csv_content.as_bytes());

    let headers: StringRecord = reader
        .headers()
        .map_err(|e| ApiError::InvalidCsvFormat {
            reason: format!("Failed to read CSV headers: {e}"),
        })?
        .clone();
    let header_map: HashMap<&'static str, usize> = map_headers(&headers)?;

    let mut import: CsvImport = CsvImport::default();
    for (index, result) in reader.records().enumerate() {
        let row_number: usize = index + 1;
        let parsed: Result<NormalizedLeadRecord, Vec<String>> = match result {
            Ok(record) => parse_csv_row(&record, &header_map),
            Err(e) => Err(vec![format!("Failed to parse CSV row: {e}")]),
        };
        match parsed {
            Ok(record) => import.rows.push(CsvLeadRow { row_number, record }),
            Err(messages) => import.errors.push(CsvRowError {
                row_number,
                message: messages.join("; "),
            }),
        }
    }

    Ok(import)
}
