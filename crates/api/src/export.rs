// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! CSV export of an order's claimed leads.

use leadflow_domain::Lead;

use crate::error::ApiError;

/// Column headers of an order export, in output order.
pub const EXPORT_HEADERS: [&str; 12] = [
    "lead_id",
    "lead_type",
    "first_name",
    "last_name",
    "email",
    "phone",
    "country",
    "gender",
    "client",
    "client_broker",
    "client_network",
    "status",
];

/// Writes leads as CSV, one row per lead in the given order.
///
/// # Errors
///
/// Returns `ApiError::Internal` if the CSV writer fails.
pub fn leads_to_csv(leads: &[Lead]) -> Result<String, ApiError> {
    let mut writer: csv::Writer<Vec<u8>> = csv::Writer::from_writer(Vec::new());
    writer.write_record(EXPORT_HEADERS).map_err(export_error)?;

    for lead in leads {
        let lead_id: String = lead.lead_id.to_string();
        writer
            .write_record([
                lead_id.as_str(),
                lead.lead_type.as_str(),
                lead.first_name.as_str(),
                lead.last_name.as_str(),
                lead.email.as_str(),
                lead.phone.as_deref().unwrap_or_default(),
                lead.country.as_str(),
                lead.gender.as_str(),
                lead.client.as_deref().unwrap_or_default(),
                lead.client_broker.as_deref().unwrap_or_default(),
                lead.client_network.as_deref().unwrap_or_default(),
                lead.status.as_str(),
            ])
            .map_err(export_error)?;
    }

    let bytes: Vec<u8> = writer.into_inner().map_err(|e| ApiError::Internal {
        message: format!("Failed to finish CSV export: {e}"),
    })?;
    String::from_utf8(bytes).map_err(|e| ApiError::Internal {
        message: format!("CSV export is not valid UTF-8: {e}"),
    })
}

fn export_error(err: csv::Error) -> ApiError {
    ApiError::Internal {
        message: format!("Failed to write CSV export: {err}"),
    }
}
