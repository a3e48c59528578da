// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use leadflow_domain::AllocationPolicy;

use super::helpers::{Fixture, add_user, create_test_cause, import_leads_of_type, setup, test_now};
use crate::{
    ApiError, AuthenticatedActor, CancelOrderRequest, CreateOrderRequest, EXPORT_HEADERS,
    ListOrdersQuery, ListOrdersResponse, OrderDetailsResponse, OrderTimelineResponse,
    OrderTransitionResponse, UpdateOrderRequest, cancel_order, create_order, export_order_leads,
    get_order, get_order_timeline, list_orders, update_order,
};

fn ftd_request(count: u32) -> CreateOrderRequest {
    CreateOrderRequest {
        ftd: count,
        ..CreateOrderRequest::default()
    }
}

fn place_order(
    fixture: &mut Fixture,
    actor: &AuthenticatedActor,
    request: &CreateOrderRequest,
) -> Result<OrderTransitionResponse, ApiError> {
    create_order(
        &mut fixture.persistence,
        request,
        actor,
        &AllocationPolicy::default(),
        create_test_cause(),
        test_now(),
    )
}

#[test]
fn test_create_order_claims_requested_leads() {
    let mut fixture: Fixture = setup();
    import_leads_of_type(&mut fixture, "ftd", 3, "acme");
    let manager: AuthenticatedActor = fixture.manager.clone();

    let response: OrderTransitionResponse =
        place_order(&mut fixture, &manager, &ftd_request(3)).unwrap();

    assert_eq!(response.order.status, "fulfilled");
    assert_eq!(response.order.lead_ids.len(), 3);
    assert_eq!(response.order.requester_id, manager.user_id);
    assert_eq!(response.order.priority, "medium");
    assert!(response.event_id.is_some());
}

#[test]
fn test_create_order_with_short_pool_is_partial() {
    let mut fixture: Fixture = setup();
    import_leads_of_type(&mut fixture, "ftd", 1, "acme");
    let manager: AuthenticatedActor = fixture.manager.clone();

    let response: OrderTransitionResponse =
        place_order(&mut fixture, &manager, &ftd_request(3)).unwrap();

    assert_eq!(response.order.status, "partial");
    assert_eq!(response.order.fulfilled.ftd, 1);
    assert_eq!(response.order.requests.ftd, 3);
}

#[test]
fn test_create_order_honours_client_exclusion() {
    let mut fixture: Fixture = setup();
    import_leads_of_type(&mut fixture, "ftd", 2, "acme");
    let others: Vec<i64> = import_leads_of_type(&mut fixture, "ftd", 2, "globex");
    let manager: AuthenticatedActor = fixture.manager.clone();

    let request: CreateOrderRequest = CreateOrderRequest {
        excluded_clients: vec![String::from("acme")],
        ..ftd_request(4)
    };
    let response: OrderTransitionResponse = place_order(&mut fixture, &manager, &request).unwrap();

    assert_eq!(response.order.lead_ids, others);
    assert_eq!(response.order.excluded_clients, vec![String::from("acme")]);
}

#[test]
fn test_create_order_rejects_empty_request() {
    let mut fixture: Fixture = setup();
    let manager: AuthenticatedActor = fixture.manager.clone();

    let result: Result<OrderTransitionResponse, ApiError> =
        place_order(&mut fixture, &manager, &CreateOrderRequest::default());

    assert!(matches!(
        result,
        Err(ApiError::InvalidInput { ref field, .. }) if field == "counts"
    ));
}

#[test]
fn test_create_order_rejects_count_beyond_storage_range() {
    let mut fixture: Fixture = setup();
    import_leads_of_type(&mut fixture, "ftd", 2, "acme");
    let manager: AuthenticatedActor = fixture.manager.clone();
    let events_before: i64 = fixture.persistence.count_audit_events().unwrap();

    let result: Result<OrderTransitionResponse, ApiError> =
        place_order(&mut fixture, &manager, &ftd_request(3_000_000_000));

    assert!(matches!(
        result,
        Err(ApiError::InvalidInput { ref field, .. }) if field == "ftd"
    ));
    assert_eq!(fixture.persistence.count_audit_events().unwrap(), events_before);
}

#[test]
fn test_create_order_rejects_unknown_priority() {
    let mut fixture: Fixture = setup();
    let manager: AuthenticatedActor = fixture.manager.clone();
    let request: CreateOrderRequest = CreateOrderRequest {
        priority: Some(String::from("urgent")),
        ..ftd_request(1)
    };

    let result: Result<OrderTransitionResponse, ApiError> =
        place_order(&mut fixture, &manager, &request);

    assert!(matches!(
        result,
        Err(ApiError::InvalidInput { ref field, .. }) if field == "priority"
    ));
}

#[test]
fn test_lead_manager_cannot_create_orders() {
    let mut fixture: Fixture = setup();
    let lead_manager: AuthenticatedActor = fixture.lead_manager.clone();

    let result: Result<OrderTransitionResponse, ApiError> =
        place_order(&mut fixture, &lead_manager, &ftd_request(1));

    assert!(matches!(result, Err(ApiError::Unauthorized { .. })));
}

#[test]
fn test_order_visible_to_owner_and_admin_only() {
    let mut fixture: Fixture = setup();
    import_leads_of_type(&mut fixture, "ftd", 2, "acme");
    let manager: AuthenticatedActor = fixture.manager.clone();
    let admin: AuthenticatedActor = fixture.admin.clone();
    let order_id: i64 = place_order(&mut fixture, &manager, &ftd_request(2))
        .unwrap()
        .order
        .order_id;
    let other: AuthenticatedActor =
        add_user(&mut fixture.persistence, &admin, "other", "affiliate_manager");

    let details: OrderDetailsResponse =
        get_order(&mut fixture.persistence, order_id, &manager).unwrap();
    assert_eq!(details.leads.len(), 2);
    assert!(get_order(&mut fixture.persistence, order_id, &admin).is_ok());
    assert!(matches!(
        get_order(&mut fixture.persistence, order_id, &other),
        Err(ApiError::Unauthorized { .. })
    ));
    assert!(matches!(
        get_order(&mut fixture.persistence, 999, &admin),
        Err(ApiError::ResourceNotFound { .. })
    ));
}

#[test]
fn test_second_cancel_is_a_conflict() {
    let mut fixture: Fixture = setup();
    import_leads_of_type(&mut fixture, "ftd", 2, "acme");
    let manager: AuthenticatedActor = fixture.manager.clone();
    let order_id: i64 = place_order(&mut fixture, &manager, &ftd_request(2))
        .unwrap()
        .order
        .order_id;
    let request: CancelOrderRequest = CancelOrderRequest {
        reason: String::from("client withdrew"),
    };

    let cancelled: OrderTransitionResponse = cancel_order(
        &mut fixture.persistence,
        order_id,
        &request,
        &manager,
        create_test_cause(),
        test_now(),
    )
    .unwrap();
    assert_eq!(cancelled.order.status, "cancelled");
    assert_eq!(
        cancelled.order.cancellation_reason.as_deref(),
        Some("client withdrew")
    );

    let again: Result<OrderTransitionResponse, ApiError> = cancel_order(
        &mut fixture.persistence,
        order_id,
        &request,
        &manager,
        create_test_cause(),
        test_now(),
    );
    assert!(matches!(again, Err(ApiError::Conflict { .. })));

    let timeline: OrderTimelineResponse =
        get_order_timeline(&mut fixture.persistence, order_id, &manager).unwrap();
    let actions: Vec<&str> = timeline.events.iter().map(|e| e.action.as_str()).collect();
    assert_eq!(actions, vec!["CreateOrder", "CancelOrder"]);
}

#[test]
fn test_update_order_requires_a_change() {
    let mut fixture: Fixture = setup();
    import_leads_of_type(&mut fixture, "ftd", 1, "acme");
    let manager: AuthenticatedActor = fixture.manager.clone();
    let order_id: i64 = place_order(&mut fixture, &manager, &ftd_request(1))
        .unwrap()
        .order
        .order_id;

    let empty: Result<OrderTransitionResponse, ApiError> = update_order(
        &mut fixture.persistence,
        order_id,
        &UpdateOrderRequest::default(),
        &manager,
        create_test_cause(),
        test_now(),
    );
    assert!(matches!(
        empty,
        Err(ApiError::InvalidInput { ref field, .. }) if field == "update"
    ));

    let updated: OrderTransitionResponse = update_order(
        &mut fixture.persistence,
        order_id,
        &UpdateOrderRequest {
            priority: Some(String::from("High")),
            notes: None,
        },
        &manager,
        create_test_cause(),
        test_now(),
    )
    .unwrap();
    assert_eq!(updated.order.priority, "high");
}

#[test]
fn test_export_writes_one_row_per_claimed_lead() {
    let mut fixture: Fixture = setup();
    import_leads_of_type(&mut fixture, "ftd", 2, "acme");
    let manager: AuthenticatedActor = fixture.manager.clone();
    let order_id: i64 = place_order(&mut fixture, &manager, &ftd_request(2))
        .unwrap()
        .order
        .order_id;

    let csv: String = export_order_leads(&mut fixture.persistence, order_id, &manager).unwrap();
    let lines: Vec<&str> = csv.lines().collect();

    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0], EXPORT_HEADERS.join(","));
    assert!(lines[1].contains(",ftd,"));
    assert!(lines[1].ends_with(",active"));
}

#[test]
fn test_list_orders_scopes_non_admins_to_their_own() {
    let mut fixture: Fixture = setup();
    import_leads_of_type(&mut fixture, "ftd", 2, "acme");
    let manager: AuthenticatedActor = fixture.manager.clone();
    let admin: AuthenticatedActor = fixture.admin.clone();
    place_order(&mut fixture, &manager, &ftd_request(1)).unwrap();
    place_order(&mut fixture, &admin, &ftd_request(1)).unwrap();

    let mine: ListOrdersResponse =
        list_orders(&mut fixture.persistence, &ListOrdersQuery::default(), &manager).unwrap();
    assert_eq!(mine.total, 1);
    assert_eq!(mine.orders[0].requester_id, manager.user_id);

    let all: ListOrdersResponse =
        list_orders(&mut fixture.persistence, &ListOrdersQuery::default(), &admin).unwrap();
    assert_eq!(all.total, 2);
}

#[test]
fn test_list_orders_validates_query() {
    let mut fixture: Fixture = setup();
    let admin: AuthenticatedActor = fixture.admin.clone();

    let bad_page: ListOrdersQuery = ListOrdersQuery {
        per_page: Some(500),
        ..ListOrdersQuery::default()
    };
    assert!(matches!(
        list_orders(&mut fixture.persistence, &bad_page, &admin),
        Err(ApiError::InvalidInput { ref field, .. }) if field == "per_page"
    ));

    let bad_date: ListOrdersQuery = ListOrdersQuery {
        from: Some(String::from("last tuesday")),
        ..ListOrdersQuery::default()
    };
    assert!(matches!(
        list_orders(&mut fixture.persistence, &bad_date, &admin),
        Err(ApiError::InvalidInput { ref field, .. }) if field == "from"
    ));

    let by_date: ListOrdersQuery = ListOrdersQuery {
        from: Some(String::from("2026-03-01")),
        to: Some(String::from("2026-03-03T00:00:00Z")),
        ..ListOrdersQuery::default()
    };
    assert!(list_orders(&mut fixture.persistence, &by_date, &admin).is_ok());
}
