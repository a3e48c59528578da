// Copyright (C) 2024-2025 Fred Clausen and the ratatui project contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Random sample leads for seeding a development database.
//!
//! Records use the same field names as the `POST /leads` request body, plus
//! a `comments` list.

use std::{fs, path::Path};

use color_eyre::{eyre::Context, Result};
use rand::Rng;
use serde::Serialize;

const LEAD_TYPES: &[&str] = &["ftd", "filler", "cold", "live"];
const GENDERS: &[&str] = &["male", "female", "not_defined"];
const STATUSES: &[&str] = &["active", "contacted", "converted", "inactive"];
const DOCUMENT_STATUSES: &[&str] = &["good", "ok", "pending"];
const SOURCES: &[&str] = &["website", "referral", "social_media", "direct"];

const FIRST_NAMES: &[&str] = &[
    "Ada", "Alan", "Grace", "Edsger", "Barbara", "Donald", "Frances", "Ken", "Margaret", "Niklaus",
    "Radia", "Tim", "Sophie", "John", "Hedy", "Linus",
];
const LAST_NAMES: &[&str] = &[
    "Lovelace", "Turing", "Hopper", "Dijkstra", "Liskov", "Knuth", "Allen", "Thompson",
    "Hamilton", "Wirth", "Perlman", "Berners-Lee", "Wilson", "McCarthy", "Lamarr", "Torvalds",
];
const COUNTRIES: &[&str] = &[
    "Germany", "United Kingdom", "France", "Spain", "Italy", "Canada", "Australia", "Brazil",
    "Japan", "South Africa", "Poland", "Netherlands",
];
const COMPANIES: &[&str] = &[
    "Northwind", "Contoso", "Initech", "Globex", "Umbrella", "Hooli", "Vandelay", "Stark",
];

const INTEREST: &[&str] = &["very interested", "somewhat interested", "highly interested"];
const MARKETS: &[&str] = &["forex", "stocks", "crypto", "commodities", "indices"];
const CHANNELS: &[&str] = &["email", "phone", "WhatsApp", "Telegram", "LinkedIn"];
const RESPONSES: &[&str] = &["positive response", "requested more info", "needs time to decide"];
const MEETINGS: &[&str] = &["video call", "phone consultation", "online demo"];
const TIMEFRAMES: &[&str] = &["next week", "tomorrow", "next month", "this Friday"];

/// A generated lead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SampleLead {
    pub lead_type: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub country: String,
    pub gender: String,
    pub client: Option<String>,
    pub client_broker: Option<String>,
    pub client_network: Option<String>,
    pub document_status: Option<String>,
    pub status: String,
    pub source: String,
    pub comments: Vec<SampleComment>,
}

/// A generated comment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SampleComment {
    pub text: String,
}

fn pick<R: Rng + ?Sized>(rng: &mut R, items: &[&'static str]) -> &'static str {
    items[rng.random_range(0..items.len())]
}

fn maybe_company<R: Rng + ?Sized>(rng: &mut R) -> Option<String> {
    rng.random_bool(0.5)
        .then(|| pick(rng, COMPANIES).to_string())
}

fn generate_phone<R: Rng + ?Sized>(rng: &mut R) -> String {
    format!(
        "+{}{}",
        rng.random_range(1..100),
        rng.random_range(100_000_000_u64..1_000_000_000)
    )
}

fn generate_comment<R: Rng + ?Sized>(rng: &mut R) -> SampleComment {
    let text: String = match rng.random_range(0..4) {
        0 => format!("Initial contact made, {} in trading", pick(rng, INTEREST)),
        1 => format!("Followed up via {}, {}", pick(rng, CHANNELS), pick(rng, RESPONSES)),
        2 => format!("Scheduled {} for {}", pick(rng, MEETINGS), pick(rng, TIMEFRAMES)),
        _ => format!("Asked about {} accounts", pick(rng, MARKETS)),
    };
    SampleComment { text }
}

/// Generates one lead. `index` keeps emails unique within a batch.
fn generate_lead<R: Rng + ?Sized>(rng: &mut R, index: usize) -> SampleLead {
    let lead_type: &str = pick(rng, LEAD_TYPES);
    let first_name: &str = pick(rng, FIRST_NAMES);
    let last_name: &str = pick(rng, LAST_NAMES);
    let comment_count: usize = rng.random_range(0..=3);

    SampleLead {
        lead_type: lead_type.to_string(),
        first_name: first_name.to_string(),
        last_name: last_name.to_string(),
        email: format!(
            "{}.{}.{index}@example.com",
            first_name.to_lowercase(),
            last_name.to_lowercase()
        ),
        phone: Some(generate_phone(rng)),
        country: pick(rng, COUNTRIES).to_string(),
        gender: pick(rng, GENDERS).to_string(),
        client: maybe_company(rng),
        client_broker: maybe_company(rng),
        client_network: maybe_company(rng),
        document_status: (lead_type == "ftd").then(|| pick(rng, DOCUMENT_STATUSES).to_string()),
        status: pick(rng, STATUSES).to_string(),
        source: pick(rng, SOURCES).to_string(),
        comments: (0..comment_count).map(|_| generate_comment(rng)).collect(),
    }
}

/// Generates `count` leads.
pub fn generate_leads<R: Rng + ?Sized>(rng: &mut R, count: usize) -> Vec<SampleLead> {
    (0..count).map(|index| generate_lead(rng, index)).collect()
}

/// Generates `count` leads and writes them to `output` as a JSON array.
pub fn write_leads(count: usize, output: &Path) -> Result<()> {
    let leads: Vec<SampleLead> = generate_leads(&mut rand::rng(), count);
    let json: String = serde_json::to_string_pretty(&leads).wrap_err("failed to encode leads")?;
    fs::write(output, json).wrap_err_with(|| format!("failed to write {}", output.display()))?;
    tracing::info!("generated {count} leads and saved to {}", output.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use rand::{rngs::StdRng, SeedableRng};

    use super::*;

    #[test]
    fn generates_requested_count_with_unique_emails() {
        let mut rng: StdRng = StdRng::seed_from_u64(7);
        let leads: Vec<SampleLead> = generate_leads(&mut rng, 200);

        assert_eq!(leads.len(), 200);
        let emails: BTreeSet<&str> = leads.iter().map(|lead| lead.email.as_str()).collect();
        assert_eq!(emails.len(), 200);
    }

    #[test]
    fn only_ftd_leads_carry_document_status() {
        let mut rng: StdRng = StdRng::seed_from_u64(11);

        for lead in generate_leads(&mut rng, 200) {
            assert!(LEAD_TYPES.contains(&lead.lead_type.as_str()));
            assert_eq!(lead.document_status.is_some(), lead.lead_type == "ftd");
            assert!(lead.comments.len() <= 3);
            assert!(STATUSES.contains(&lead.status.as_str()));
        }
    }

    #[test]
    fn serializes_with_request_field_names() {
        let mut rng: StdRng = StdRng::seed_from_u64(3);
        let leads: Vec<SampleLead> = generate_leads(&mut rng, 1);

        let value: serde_json::Value = serde_json::to_value(&leads).unwrap();

        let lead = &value[0];
        assert!(lead["lead_type"].is_string());
        assert!(lead["first_name"].is_string());
        assert!(lead["client_broker"].is_string() || lead["client_broker"].is_null());
        assert!(lead["comments"].is_array());
    }
}
