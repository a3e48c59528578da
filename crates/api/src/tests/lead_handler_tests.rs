// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use leadflow_domain::AllocationPolicy;

use super::helpers::{Fixture, add_user, create_test_cause, import_leads_of_type, setup, test_now};
use crate::{
    AddCommentRequest, ApiError, AssignLeadsRequest, AssignmentResponse, AuthenticatedActor,
    CreateLeadRequest, CreateOrderRequest, ImportLeadsResponse, LeadInfo, LeadStatsResponse,
    ListLeadsQuery, ListLeadsResponse, UnassignLeadsRequest, UpdateLeadStatusRequest,
    UpdateUserRequest, add_comment, assign_leads, create_lead, create_order, delete_lead, get_lead,
    import_leads, lead_stats, list_leads, unassign_leads, update_lead_status, update_user,
};

fn lead_request(email: &str) -> CreateLeadRequest {
    CreateLeadRequest {
        lead_type: String::from("cold"),
        first_name: String::from("Maria"),
        last_name: String::from("Lopez"),
        email: email.to_string(),
        country: String::from("Spain"),
        gender: Some(String::from("F")),
        client: Some(String::from("  ")),
        ..CreateLeadRequest::default()
    }
}

fn approved_agent(fixture: &mut Fixture, login_name: &str) -> AuthenticatedActor {
    let admin: AuthenticatedActor = fixture.admin.clone();
    let agent: AuthenticatedActor = add_user(&mut fixture.persistence, &admin, login_name, "agent");
    update_user(
        &mut fixture.persistence,
        agent.user_id,
        &UpdateUserRequest {
            status: Some(String::from("approved")),
            is_active: None,
        },
        &admin,
    )
    .unwrap();
    agent
}

fn assign(
    fixture: &mut Fixture,
    actor: &AuthenticatedActor,
    lead_ids: Vec<i64>,
    agent_id: i64,
) -> Result<AssignmentResponse, ApiError> {
    assign_leads(
        &mut fixture.persistence,
        &AssignLeadsRequest { lead_ids, agent_id },
        actor,
        &AllocationPolicy::default(),
        create_test_cause(),
        test_now(),
    )
}

#[test]
fn test_create_lead_normalizes_optional_fields() {
    let mut fixture: Fixture = setup();
    let lead_manager: AuthenticatedActor = fixture.lead_manager.clone();

    let lead: LeadInfo = create_lead(
        &mut fixture.persistence,
        &lead_request("maria@example.com"),
        &lead_manager,
        test_now(),
    )
    .unwrap();

    assert_eq!(lead.lead_type, "cold");
    assert_eq!(lead.gender, "female");
    assert_eq!(lead.status, "active");
    assert_eq!(lead.client, None);
    assert_eq!(lead.assigned_to, None);
}

#[test]
fn test_create_lead_rejections() {
    let mut fixture: Fixture = setup();
    let lead_manager: AuthenticatedActor = fixture.lead_manager.clone();
    let manager: AuthenticatedActor = fixture.manager.clone();

    assert!(matches!(
        create_lead(
            &mut fixture.persistence,
            &lead_request("maria@example.com"),
            &manager,
            test_now()
        ),
        Err(ApiError::Unauthorized { .. })
    ));

    let bad_type: CreateLeadRequest = CreateLeadRequest {
        lead_type: String::from("warm"),
        ..lead_request("maria@example.com")
    };
    assert!(matches!(
        create_lead(&mut fixture.persistence, &bad_type, &lead_manager, test_now()),
        Err(ApiError::InvalidInput { ref field, .. }) if field == "lead_type"
    ));

    create_lead(
        &mut fixture.persistence,
        &lead_request("maria@example.com"),
        &lead_manager,
        test_now(),
    )
    .unwrap();
    assert!(matches!(
        create_lead(
            &mut fixture.persistence,
            &lead_request("maria@example.com"),
            &lead_manager,
            test_now()
        ),
        Err(ApiError::InvalidInput { ref field, .. }) if field == "email"
    ));
}

#[test]
fn test_import_reports_rejected_rows_by_csv_row_number() {
    let mut fixture: Fixture = setup();
    let lead_manager: AuthenticatedActor = fixture.lead_manager.clone();
    let csv: &str = "Type,First Name,Last Name,E-mail,Country\n\
                     ftd,Ana,Silva,ana@example.com,Portugal\n\
                     warm,Bad,Type,bad@example.com,Portugal\n\
                     filler,Ben,Stone,not-an-email,Ireland\n\
                     live,Ana,Twin,ana@example.com,Portugal\n\
                     cold,Cleo,Marsh,cleo@example.com,France\n";

    let response: ImportLeadsResponse =
        import_leads(&mut fixture.persistence, csv, &lead_manager, test_now()).unwrap();

    assert_eq!(response.imported, 2);
    assert_eq!(response.lead_ids.len(), 2);
    let rows: Vec<usize> = response.errors.iter().map(|e| e.row).collect();
    assert_eq!(rows, vec![2, 3, 4]);
}

#[test]
fn test_import_without_required_header_fails() {
    let mut fixture: Fixture = setup();
    let lead_manager: AuthenticatedActor = fixture.lead_manager.clone();

    let result: Result<ImportLeadsResponse, ApiError> = import_leads(
        &mut fixture.persistence,
        "first_name,last_name,email\nA,B,a@b.c\n",
        &lead_manager,
        test_now(),
    );

    assert!(matches!(result, Err(ApiError::InvalidCsvFormat { .. })));
}

#[test]
fn test_assignment_requires_approved_agent() {
    let mut fixture: Fixture = setup();
    let lead_ids: Vec<i64> = import_leads_of_type(&mut fixture, "cold", 2, "acme");
    let admin: AuthenticatedActor = fixture.admin.clone();
    let lead_manager: AuthenticatedActor = fixture.lead_manager.clone();
    let pending: AuthenticatedActor =
        add_user(&mut fixture.persistence, &admin, "pending", "agent");

    assert!(matches!(
        assign(&mut fixture, &lead_manager, lead_ids.clone(), pending.user_id),
        Err(ApiError::DomainRuleViolation { .. })
    ));
    assert!(matches!(
        assign(&mut fixture, &lead_manager, lead_ids.clone(), 999),
        Err(ApiError::ResourceNotFound { .. })
    ));

    let agent: AuthenticatedActor = approved_agent(&mut fixture, "agent");
    let response: AssignmentResponse =
        assign(&mut fixture, &lead_manager, lead_ids, agent.user_id).unwrap();
    assert_eq!(response.modified, 2);
    assert!(response.event_id.is_some());
}

#[test]
fn test_agents_only_see_and_work_their_own_leads() {
    let mut fixture: Fixture = setup();
    let lead_ids: Vec<i64> = import_leads_of_type(&mut fixture, "cold", 3, "acme");
    let lead_manager: AuthenticatedActor = fixture.lead_manager.clone();
    let agent: AuthenticatedActor = approved_agent(&mut fixture, "agent");

    assert!(matches!(
        get_lead(&mut fixture.persistence, lead_ids[0], &agent),
        Err(ApiError::Unauthorized { .. })
    ));

    assign(&mut fixture, &lead_manager, vec![lead_ids[0]], agent.user_id).unwrap();

    let listed: ListLeadsResponse =
        list_leads(&mut fixture.persistence, &ListLeadsQuery::default(), &agent).unwrap();
    assert_eq!(listed.total, 1);
    assert_eq!(listed.leads[0].lead_id, lead_ids[0]);

    let updated: LeadInfo = update_lead_status(
        &mut fixture.persistence,
        lead_ids[0],
        &UpdateLeadStatusRequest {
            status: String::from("contacted"),
        },
        &agent,
    )
    .unwrap();
    assert_eq!(updated.status, "contacted");

    add_comment(
        &mut fixture.persistence,
        lead_ids[0],
        &AddCommentRequest {
            text: String::from("Called, wants a follow-up"),
        },
        &agent,
        test_now(),
    )
    .unwrap();
    let lead: LeadInfo = get_lead(&mut fixture.persistence, lead_ids[0], &agent).unwrap();
    assert_eq!(lead.comments.len(), 1);
    assert_eq!(lead.comments[0].author_id, agent.user_id);

    assert!(matches!(
        add_comment(
            &mut fixture.persistence,
            lead_ids[0],
            &AddCommentRequest {
                text: String::from("   "),
            },
            &agent,
            test_now(),
        ),
        Err(ApiError::InvalidInput { ref field, .. }) if field == "text"
    ));
}

#[test]
fn test_unassign_reports_modified_count() {
    let mut fixture: Fixture = setup();
    let lead_ids: Vec<i64> = import_leads_of_type(&mut fixture, "cold", 2, "acme");
    let lead_manager: AuthenticatedActor = fixture.lead_manager.clone();
    let agent: AuthenticatedActor = approved_agent(&mut fixture, "agent");
    assign(&mut fixture, &lead_manager, vec![lead_ids[0]], agent.user_id).unwrap();

    let response: AssignmentResponse = unassign_leads(
        &mut fixture.persistence,
        &UnassignLeadsRequest { lead_ids },
        &lead_manager,
        create_test_cause(),
        test_now(),
    )
    .unwrap();

    assert_eq!(response.modified, 1);
}

#[test]
fn test_delete_lead_rules() {
    let mut fixture: Fixture = setup();
    let lead_ids: Vec<i64> = import_leads_of_type(&mut fixture, "ftd", 2, "acme");
    let admin: AuthenticatedActor = fixture.admin.clone();
    let manager: AuthenticatedActor = fixture.manager.clone();
    create_order(
        &mut fixture.persistence,
        &CreateOrderRequest {
            ftd: 1,
            ..CreateOrderRequest::default()
        },
        &manager,
        &AllocationPolicy::default(),
        create_test_cause(),
        test_now(),
    )
    .unwrap();

    assert!(matches!(
        delete_lead(&mut fixture.persistence, lead_ids[1], &manager),
        Err(ApiError::Unauthorized { .. })
    ));
    assert!(matches!(
        delete_lead(&mut fixture.persistence, lead_ids[0], &admin),
        Err(ApiError::Conflict { .. })
    ));

    delete_lead(&mut fixture.persistence, lead_ids[1], &admin).unwrap();
    assert!(matches!(
        get_lead(&mut fixture.persistence, lead_ids[1], &admin),
        Err(ApiError::ResourceNotFound { .. })
    ));
    assert!(matches!(
        delete_lead(&mut fixture.persistence, lead_ids[1], &admin),
        Err(ApiError::ResourceNotFound { .. })
    ));
}

#[test]
fn test_lead_stats_access() {
    let mut fixture: Fixture = setup();
    import_leads_of_type(&mut fixture, "live", 2, "acme");
    let lead_manager: AuthenticatedActor = fixture.lead_manager.clone();
    let agent: AuthenticatedActor = approved_agent(&mut fixture, "agent");

    let stats: LeadStatsResponse = lead_stats(&mut fixture.persistence, &lead_manager).unwrap();
    assert_eq!(stats.overall.total, 2);
    assert_eq!(stats.overall.available, 2);

    assert!(matches!(
        lead_stats(&mut fixture.persistence, &agent),
        Err(ApiError::Unauthorized { .. })
    ));
}
