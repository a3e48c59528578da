// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use leadflow_domain::{AllocationPolicy, Lead, LeadCounts, LeadType, OrderRequest};

use crate::store::LeadStore;

/// The leads selected for an order, before anything is written.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AllocationResult {
    /// Selected leads in selection order.
    pub claimed: Vec<(i64, LeadType)>,
    /// Selected count per lead type.
    pub fulfilled: LeadCounts,
}

impl AllocationResult {
    /// Returns the selected lead ids in selection order.
    #[must_use]
    pub fn lead_ids(&self) -> Vec<i64> {
        self.claimed.iter().map(|(lead_id, _)| *lead_id).collect()
    }
}

/// Selects leads for an order request.
///
/// Each lead type with a non-zero request is queried independently; buckets
/// never borrow from each other. The store's order is the only ordering.
/// Leads of the wrong type are ignored and over-long results are truncated,
/// so `fulfilled[t]` never exceeds `requests[t]`.
///
/// This performs no writes. Finding nothing is not an error.
///
/// # Arguments
///
/// * `store` - The lead store to query
/// * `request` - The order request
/// * `policy` - Whether already assigned leads may be selected
///
/// # Errors
///
/// Returns the store's error if any query fails.
pub fn allocate<S: LeadStore>(
    store: &mut S,
    request: &OrderRequest,
    policy: &AllocationPolicy,
) -> Result<AllocationResult, S::Error> {
    let mut result: AllocationResult = AllocationResult::default();

    for (lead_type, requested) in request.counts.iter() {
        if requested == 0 {
            continue;
        }

        let candidates: Vec<Lead> =
            store.find_available(lead_type, requested, &request.criteria, policy.exclusive)?;

        for lead in candidates
            .into_iter()
            .filter(|lead| lead.lead_type == lead_type)
        {
            if result.fulfilled.get(lead_type) >= requested {
                break;
            }
            result.claimed.push((lead.lead_id, lead_type));
            result.fulfilled.increment(lead_type);
        }
    }

    Ok(result)
}
