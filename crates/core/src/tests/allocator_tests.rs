// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::tests::helpers::{InMemoryStore, create_test_lead, create_test_leads};
use crate::{AllocationResult, allocate};
use leadflow_domain::{
    AllocationPolicy, Assignment, Lead, LeadCounts, LeadType, OrderRequest, SelectionCriteria,
};
use time::macros::datetime;

fn request(counts: LeadCounts) -> OrderRequest {
    OrderRequest::new(counts, SelectionCriteria::default())
}

#[test]
fn test_allocate_takes_leads_in_store_order() {
    let mut store = InMemoryStore::with_leads(create_test_leads(1, 5, LeadType::Ftd));

    let result: AllocationResult = allocate(
        &mut store,
        &request(LeadCounts::new(3, 0, 0, 0)),
        &AllocationPolicy::default(),
    )
    .unwrap();

    assert_eq!(result.lead_ids(), vec![1, 2, 3]);
    assert_eq!(result.fulfilled, LeadCounts::new(3, 0, 0, 0));
}

#[test]
fn test_allocate_buckets_do_not_borrow() {
    let mut leads: Vec<Lead> = create_test_leads(1, 1, LeadType::Ftd);
    leads.extend(create_test_leads(10, 5, LeadType::Cold));
    let mut store = InMemoryStore::with_leads(leads);

    let result: AllocationResult = allocate(
        &mut store,
        &request(LeadCounts::new(3, 0, 2, 0)),
        &AllocationPolicy::default(),
    )
    .unwrap();

    assert_eq!(result.fulfilled, LeadCounts::new(1, 0, 2, 0));
    assert_eq!(result.lead_ids(), vec![1, 10, 11]);
}

#[test]
fn test_allocate_skips_zero_buckets() {
    let mut store = InMemoryStore::with_leads(create_test_leads(1, 5, LeadType::Live));

    allocate(
        &mut store,
        &request(LeadCounts::new(0, 0, 0, 2)),
        &AllocationPolicy::default(),
    )
    .unwrap();

    assert_eq!(store.queries, 1);
}

#[test]
fn test_allocate_truncates_and_ignores_wrong_types() {
    let mut leads: Vec<Lead> = create_test_leads(1, 4, LeadType::Ftd);
    leads.extend(create_test_leads(10, 4, LeadType::Filler));
    let mut store = InMemoryStore::with_leads(leads);
    store.over_return = true;

    let result: AllocationResult = allocate(
        &mut store,
        &request(LeadCounts::new(2, 1, 0, 0)),
        &AllocationPolicy::default(),
    )
    .unwrap();

    assert_eq!(result.fulfilled, LeadCounts::new(2, 1, 0, 0));
    assert_eq!(
        result.claimed,
        vec![
            (1, LeadType::Ftd),
            (2, LeadType::Ftd),
            (10, LeadType::Filler)
        ]
    );
}

#[test]
fn test_allocate_with_nothing_available_is_not_an_error() {
    let mut store: InMemoryStore = InMemoryStore::default();

    let result: AllocationResult = allocate(
        &mut store,
        &request(LeadCounts::new(3, 0, 0, 0)),
        &AllocationPolicy::default(),
    )
    .unwrap();

    assert!(result.claimed.is_empty());
    assert!(result.fulfilled.is_zero());
}

#[test]
fn test_exclusive_policy_skips_assigned_leads() {
    let mut taken: Lead = create_test_lead(1, LeadType::Ftd);
    taken.assignment = Some(Assignment::new(5, datetime!(2026-01-20 08:00 UTC)));
    let mut store: InMemoryStore =
        InMemoryStore::with_leads([taken, create_test_lead(2, LeadType::Ftd)]);

    let exclusive: AllocationResult = allocate(
        &mut store,
        &request(LeadCounts::new(2, 0, 0, 0)),
        &AllocationPolicy::default(),
    )
    .unwrap();
    assert_eq!(exclusive.lead_ids(), vec![2]);

    let reclaim: AllocationPolicy = AllocationPolicy {
        exclusive: false,
        require_agent_approval: true,
    };
    let shared: AllocationResult = allocate(
        &mut store,
        &request(LeadCounts::new(2, 0, 0, 0)),
        &reclaim,
    )
    .unwrap();
    assert_eq!(shared.lead_ids(), vec![1, 2]);
}

#[test]
fn test_allocate_respects_client_exclusion() {
    let mut acme: Lead = create_test_lead(1, LeadType::Ftd);
    acme.client = Some(String::from("Acme"));
    let mut store: InMemoryStore =
        InMemoryStore::with_leads([acme, create_test_lead(2, LeadType::Ftd)]);

    let criteria: SelectionCriteria = SelectionCriteria::builder()
        .exclude_clients(["Acme"])
        .build();
    let result: AllocationResult = allocate(
        &mut store,
        &OrderRequest::new(LeadCounts::new(2, 0, 0, 0), criteria),
        &AllocationPolicy::default(),
    )
    .unwrap();

    assert_eq!(result.lead_ids(), vec![2]);
}
