// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]
#![allow(clippy::multiple_crate_versions)]

mod identity;

#[cfg(test)]
mod tests;

use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, Query, State as AxumState},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, patch, post},
};
use clap::Parser;
use leadflow_api::{
    AddCommentRequest, AddCommentResponse, ApiError, AssignLeadsRequest, AssignmentResponse,
    CancelOrderRequest, CreateLeadRequest, CreateOrderRequest, CreateUserRequest,
    ImportLeadsResponse, LeadInfo, LeadStatsResponse, ListLeadsQuery, ListLeadsResponse,
    ListOrdersQuery, ListOrdersResponse, ListUsersQuery, ListUsersResponse, OrderDetailsResponse,
    OrderTimelineResponse, OrderTransitionResponse, UnassignLeadsRequest, UpdateLeadStatusRequest,
    UpdateOrderRequest, UpdateUserRequest, UserInfo, add_comment, assign_leads, bootstrap_admin,
    cancel_order, create_lead, create_order, create_user, delete_lead, export_order_leads,
    get_lead, get_order, get_order_timeline, import_leads, lead_stats, list_leads, list_orders,
    list_users, unassign_leads, update_lead_status, update_order, update_user,
};
use leadflow_domain::AllocationPolicy;
use leadflow_persistence::Persistence;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use tokio::sync::Mutex;
use tracing::{error, info, warn};

use crate::identity::{CallerIdentity, RequestCause};

/// Leadflow Server - HTTP server for lead allocation and order fulfilment
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the `SQLite` database file. If not provided, uses in-memory database.
    #[arg(short, long)]
    database: Option<String>,

    /// Port to bind the server to
    #[arg(short, long, default_value_t = 3000)]
    port: u16,

    /// Address to bind the server to
    #[arg(short, long, default_value = "127.0.0.1")]
    bind: IpAddr,

    /// Let new orders re-claim leads that are already assigned
    #[arg(long)]
    allow_reclaim: bool,

    /// Allow manual assignment to agents that are not yet approved
    #[arg(long)]
    skip_agent_approval: bool,

    /// Login name of the admin to create when no users exist
    #[arg(long, requires = "bootstrap_password")]
    bootstrap_admin: Option<String>,

    /// Password for the bootstrap admin
    #[arg(long, requires = "bootstrap_admin")]
    bootstrap_password: Option<String>,
}

impl Args {
    const fn allocation_policy(&self) -> AllocationPolicy {
        AllocationPolicy {
            exclusive: !self.allow_reclaim,
            require_agent_approval: !self.skip_agent_approval,
        }
    }
}

/// Application state shared across handlers.
///
/// The store is a single connection behind a Mutex; every mutation runs in
/// its own transaction.
#[derive(Clone)]
struct AppState {
    /// The persistence layer.
    persistence: Arc<Mutex<Persistence>>,
    /// Allocation switches applied to every order and assignment.
    policy: AllocationPolicy,
}

/// Standard error response.
#[derive(Debug, Serialize, Deserialize)]
struct ErrorResponse {
    /// Error indicator.
    error: bool,
    /// Error message.
    message: String,
}

/// Liveness response.
#[derive(Debug, Serialize, Deserialize)]
struct HealthResponse {
    /// Always `ok`.
    status: String,
}

/// HTTP error wrapper that implements `IntoResponse`.
#[derive(Debug)]
pub struct HttpError {
    /// The HTTP status code.
    status: StatusCode,
    /// The error message.
    message: String,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let body: Json<ErrorResponse> = Json(ErrorResponse {
            error: true,
            message: self.message,
        });
        (self.status, body).into_response()
    }
}

impl From<ApiError> for HttpError {
    fn from(err: ApiError) -> Self {
        let status: StatusCode = match err {
            ApiError::InvalidInput { .. }
            | ApiError::InvalidCsvFormat { .. }
            | ApiError::DomainRuleViolation { .. } => StatusCode::BAD_REQUEST,
            ApiError::AuthenticationFailed { .. } => StatusCode::UNAUTHORIZED,
            ApiError::Unauthorized { .. } => StatusCode::FORBIDDEN,
            ApiError::ResourceNotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Conflict { .. } => StatusCode::CONFLICT,
            ApiError::Internal { .. } => {
                error!(error = %err, "Request failed internally");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        Self {
            status,
            message: err.to_string(),
        }
    }
}

// ============================================================================
// Orders
// ============================================================================

/// Handler for POST `/orders` endpoint.
///
/// Creates an order and fulfils it from the available pool in one step.
async fn handle_create_order(
    AxumState(app_state): AxumState<AppState>,
    CallerIdentity(actor): CallerIdentity,
    RequestCause(cause): RequestCause,
    Json(request): Json<CreateOrderRequest>,
) -> Result<(StatusCode, Json<OrderTransitionResponse>), HttpError> {
    info!(
        actor = actor.user_id,
        ftd = request.ftd,
        filler = request.filler,
        cold = request.cold,
        live = request.live,
        "Handling create_order request"
    );

    let mut persistence = app_state.persistence.lock().await;
    let response: OrderTransitionResponse = create_order(
        &mut persistence,
        &request,
        &actor,
        &app_state.policy,
        cause,
        OffsetDateTime::now_utc(),
    )?;
    drop(persistence);

    info!(
        order_id = response.order.order_id,
        status = %response.order.status,
        "Order created"
    );

    Ok((StatusCode::CREATED, Json(response)))
}

/// Handler for GET `/orders` endpoint.
async fn handle_list_orders(
    AxumState(app_state): AxumState<AppState>,
    CallerIdentity(actor): CallerIdentity,
    Query(query): Query<ListOrdersQuery>,
) -> Result<Json<ListOrdersResponse>, HttpError> {
    info!(actor = actor.user_id, "Handling list_orders request");

    let mut persistence = app_state.persistence.lock().await;
    let response: ListOrdersResponse = list_orders(&mut persistence, &query, &actor)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for GET `/orders/{order_id}` endpoint.
async fn handle_get_order(
    AxumState(app_state): AxumState<AppState>,
    CallerIdentity(actor): CallerIdentity,
    Path(order_id): Path<i64>,
) -> Result<Json<OrderDetailsResponse>, HttpError> {
    info!(actor = actor.user_id, order_id, "Handling get_order request");

    let mut persistence = app_state.persistence.lock().await;
    let response: OrderDetailsResponse = get_order(&mut persistence, order_id, &actor)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for PATCH `/orders/{order_id}` endpoint.
async fn handle_update_order(
    AxumState(app_state): AxumState<AppState>,
    CallerIdentity(actor): CallerIdentity,
    RequestCause(cause): RequestCause,
    Path(order_id): Path<i64>,
    Json(request): Json<UpdateOrderRequest>,
) -> Result<Json<OrderTransitionResponse>, HttpError> {
    info!(actor = actor.user_id, order_id, "Handling update_order request");

    let mut persistence = app_state.persistence.lock().await;
    let response: OrderTransitionResponse = update_order(
        &mut persistence,
        order_id,
        &request,
        &actor,
        cause,
        OffsetDateTime::now_utc(),
    )?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for POST `/orders/{order_id}/cancel` endpoint.
///
/// Cancels the order and returns its still-attributed leads to the pool.
async fn handle_cancel_order(
    AxumState(app_state): AxumState<AppState>,
    CallerIdentity(actor): CallerIdentity,
    RequestCause(cause): RequestCause,
    Path(order_id): Path<i64>,
    Json(request): Json<CancelOrderRequest>,
) -> Result<Json<OrderTransitionResponse>, HttpError> {
    info!(actor = actor.user_id, order_id, "Handling cancel_order request");

    let mut persistence = app_state.persistence.lock().await;
    let response: OrderTransitionResponse = cancel_order(
        &mut persistence,
        order_id,
        &request,
        &actor,
        cause,
        OffsetDateTime::now_utc(),
    )?;
    drop(persistence);

    info!(order_id, "Order cancelled");

    Ok(Json(response))
}

/// Handler for GET `/orders/{order_id}/export` endpoint.
///
/// Returns the claimed leads as a CSV attachment.
async fn handle_export_order(
    AxumState(app_state): AxumState<AppState>,
    CallerIdentity(actor): CallerIdentity,
    Path(order_id): Path<i64>,
) -> Result<Response, HttpError> {
    info!(actor = actor.user_id, order_id, "Handling export_order request");

    let mut persistence = app_state.persistence.lock().await;
    let csv: String = export_order_leads(&mut persistence, order_id, &actor)?;
    drop(persistence);

    let headers: [(header::HeaderName, String); 2] = [
        (header::CONTENT_TYPE, String::from("text/csv; charset=utf-8")),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"order_{order_id}_leads.csv\""),
        ),
    ];

    Ok((headers, csv).into_response())
}

/// Handler for GET `/orders/{order_id}/audit` endpoint.
async fn handle_get_order_timeline(
    AxumState(app_state): AxumState<AppState>,
    CallerIdentity(actor): CallerIdentity,
    Path(order_id): Path<i64>,
) -> Result<Json<OrderTimelineResponse>, HttpError> {
    info!(actor = actor.user_id, order_id, "Handling get_order_timeline request");

    let mut persistence = app_state.persistence.lock().await;
    let response: OrderTimelineResponse = get_order_timeline(&mut persistence, order_id, &actor)?;
    drop(persistence);

    Ok(Json(response))
}

// ============================================================================
// Leads
// ============================================================================

/// Handler for POST `/leads` endpoint.
async fn handle_create_lead(
    AxumState(app_state): AxumState<AppState>,
    CallerIdentity(actor): CallerIdentity,
    Json(request): Json<CreateLeadRequest>,
) -> Result<(StatusCode, Json<LeadInfo>), HttpError> {
    info!(actor = actor.user_id, lead_type = %request.lead_type, "Handling create_lead request");

    let mut persistence = app_state.persistence.lock().await;
    let response: LeadInfo =
        create_lead(&mut persistence, &request, &actor, OffsetDateTime::now_utc())?;
    drop(persistence);

    Ok((StatusCode::CREATED, Json(response)))
}

/// Handler for GET `/leads` endpoint.
async fn handle_list_leads(
    AxumState(app_state): AxumState<AppState>,
    CallerIdentity(actor): CallerIdentity,
    Query(query): Query<ListLeadsQuery>,
) -> Result<Json<ListLeadsResponse>, HttpError> {
    info!(actor = actor.user_id, "Handling list_leads request");

    let mut persistence = app_state.persistence.lock().await;
    let response: ListLeadsResponse = list_leads(&mut persistence, &query, &actor)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for GET `/leads/{lead_id}` endpoint.
async fn handle_get_lead(
    AxumState(app_state): AxumState<AppState>,
    CallerIdentity(actor): CallerIdentity,
    Path(lead_id): Path<i64>,
) -> Result<Json<LeadInfo>, HttpError> {
    info!(actor = actor.user_id, lead_id, "Handling get_lead request");

    let mut persistence = app_state.persistence.lock().await;
    let response: LeadInfo = get_lead(&mut persistence, lead_id, &actor)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for DELETE `/leads/{lead_id}` endpoint.
async fn handle_delete_lead(
    AxumState(app_state): AxumState<AppState>,
    CallerIdentity(actor): CallerIdentity,
    Path(lead_id): Path<i64>,
) -> Result<StatusCode, HttpError> {
    info!(actor = actor.user_id, lead_id, "Handling delete_lead request");

    let mut persistence = app_state.persistence.lock().await;
    delete_lead(&mut persistence, lead_id, &actor)?;
    drop(persistence);

    Ok(StatusCode::NO_CONTENT)
}

/// Handler for PATCH `/leads/{lead_id}/status` endpoint.
async fn handle_update_lead_status(
    AxumState(app_state): AxumState<AppState>,
    CallerIdentity(actor): CallerIdentity,
    Path(lead_id): Path<i64>,
    Json(request): Json<UpdateLeadStatusRequest>,
) -> Result<Json<LeadInfo>, HttpError> {
    info!(
        actor = actor.user_id,
        lead_id,
        status = %request.status,
        "Handling update_lead_status request"
    );

    let mut persistence = app_state.persistence.lock().await;
    let response: LeadInfo = update_lead_status(&mut persistence, lead_id, &request, &actor)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for POST `/leads/{lead_id}/comments` endpoint.
async fn handle_add_comment(
    AxumState(app_state): AxumState<AppState>,
    CallerIdentity(actor): CallerIdentity,
    Path(lead_id): Path<i64>,
    Json(request): Json<AddCommentRequest>,
) -> Result<(StatusCode, Json<AddCommentResponse>), HttpError> {
    info!(actor = actor.user_id, lead_id, "Handling add_comment request");

    let mut persistence = app_state.persistence.lock().await;
    let response: AddCommentResponse = add_comment(
        &mut persistence,
        lead_id,
        &request,
        &actor,
        OffsetDateTime::now_utc(),
    )?;
    drop(persistence);

    Ok((StatusCode::CREATED, Json(response)))
}

/// Handler for POST `/leads/import` endpoint.
///
/// The body is the raw CSV text. Rows that fail validation are reported
/// individually; the rest are imported.
async fn handle_import_leads(
    AxumState(app_state): AxumState<AppState>,
    CallerIdentity(actor): CallerIdentity,
    body: String,
) -> Result<Json<ImportLeadsResponse>, HttpError> {
    info!(actor = actor.user_id, bytes = body.len(), "Handling import_leads request");

    let mut persistence = app_state.persistence.lock().await;
    let response: ImportLeadsResponse =
        import_leads(&mut persistence, &body, &actor, OffsetDateTime::now_utc())?;
    drop(persistence);

    if !response.errors.is_empty() {
        warn!(
            imported = response.imported,
            rejected = response.errors.len(),
            "Some rows were rejected"
        );
    }

    Ok(Json(response))
}

/// Handler for POST `/leads/assign` endpoint.
async fn handle_assign_leads(
    AxumState(app_state): AxumState<AppState>,
    CallerIdentity(actor): CallerIdentity,
    RequestCause(cause): RequestCause,
    Json(request): Json<AssignLeadsRequest>,
) -> Result<Json<AssignmentResponse>, HttpError> {
    info!(
        actor = actor.user_id,
        agent_id = request.agent_id,
        count = request.lead_ids.len(),
        "Handling assign_leads request"
    );

    let mut persistence = app_state.persistence.lock().await;
    let response: AssignmentResponse = assign_leads(
        &mut persistence,
        &request,
        &actor,
        &app_state.policy,
        cause,
        OffsetDateTime::now_utc(),
    )?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for POST `/leads/unassign` endpoint.
async fn handle_unassign_leads(
    AxumState(app_state): AxumState<AppState>,
    CallerIdentity(actor): CallerIdentity,
    RequestCause(cause): RequestCause,
    Json(request): Json<UnassignLeadsRequest>,
) -> Result<Json<AssignmentResponse>, HttpError> {
    info!(
        actor = actor.user_id,
        count = request.lead_ids.len(),
        "Handling unassign_leads request"
    );

    let mut persistence = app_state.persistence.lock().await;
    let response: AssignmentResponse = unassign_leads(
        &mut persistence,
        &request,
        &actor,
        cause,
        OffsetDateTime::now_utc(),
    )?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for GET `/stats/leads` endpoint.
async fn handle_lead_stats(
    AxumState(app_state): AxumState<AppState>,
    CallerIdentity(actor): CallerIdentity,
) -> Result<Json<LeadStatsResponse>, HttpError> {
    info!(actor = actor.user_id, "Handling lead_stats request");

    let mut persistence = app_state.persistence.lock().await;
    let response: LeadStatsResponse = lead_stats(&mut persistence, &actor)?;
    drop(persistence);

    Ok(Json(response))
}

// ============================================================================
// Users
// ============================================================================

/// Handler for POST `/users` endpoint.
async fn handle_create_user(
    AxumState(app_state): AxumState<AppState>,
    CallerIdentity(actor): CallerIdentity,
    Json(request): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserInfo>), HttpError> {
    info!(
        actor = actor.user_id,
        login_name = %request.login_name,
        role = %request.role,
        "Handling create_user request"
    );

    let mut persistence = app_state.persistence.lock().await;
    let response: UserInfo =
        create_user(&mut persistence, &request, &actor, OffsetDateTime::now_utc())?;
    drop(persistence);

    Ok((StatusCode::CREATED, Json(response)))
}

/// Handler for GET `/users` endpoint.
async fn handle_list_users(
    AxumState(app_state): AxumState<AppState>,
    CallerIdentity(actor): CallerIdentity,
    Query(query): Query<ListUsersQuery>,
) -> Result<Json<ListUsersResponse>, HttpError> {
    info!(actor = actor.user_id, "Handling list_users request");

    let mut persistence = app_state.persistence.lock().await;
    let response: ListUsersResponse = list_users(&mut persistence, &query, &actor)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for PATCH `/users/{user_id}` endpoint.
async fn handle_update_user(
    AxumState(app_state): AxumState<AppState>,
    CallerIdentity(actor): CallerIdentity,
    Path(user_id): Path<i64>,
    Json(request): Json<UpdateUserRequest>,
) -> Result<Json<UserInfo>, HttpError> {
    info!(actor = actor.user_id, user_id, "Handling update_user request");

    let mut persistence = app_state.persistence.lock().await;
    let response: UserInfo = update_user(&mut persistence, user_id, &request, &actor)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for GET `/health` endpoint.
async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: String::from("ok"),
    })
}

/// Every route except `/health` resolves the caller from `X-User-Id`.
fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/health", get(handle_health))
        .route("/orders", post(handle_create_order).get(handle_list_orders))
        .route("/orders/{order_id}", get(handle_get_order).patch(handle_update_order))
        .route("/orders/{order_id}/cancel", post(handle_cancel_order))
        .route("/orders/{order_id}/export", get(handle_export_order))
        .route("/orders/{order_id}/audit", get(handle_get_order_timeline))
        .route("/leads", post(handle_create_lead).get(handle_list_leads))
        .route("/leads/import", post(handle_import_leads))
        .route("/leads/assign", post(handle_assign_leads))
        .route("/leads/unassign", post(handle_unassign_leads))
        .route("/leads/{lead_id}", get(handle_get_lead).delete(handle_delete_lead))
        .route("/leads/{lead_id}/status", patch(handle_update_lead_status))
        .route("/leads/{lead_id}/comments", post(handle_add_comment))
        .route("/stats/leads", get(handle_lead_stats))
        .route("/users", post(handle_create_user).get(handle_list_users))
        .route("/users/{user_id}", patch(handle_update_user))
        .with_state(app_state)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let mut persistence: Persistence = match &args.database {
        Some(path) => {
            info!(database = %path, "Starting Leadflow with a database file");
            Persistence::new_with_file(path)?
        }
        None => {
            info!("Starting Leadflow with an in-memory database; data is lost on exit");
            Persistence::new_in_memory()?
        }
    };

    if let (Some(login_name), Some(password)) = (&args.bootstrap_admin, &args.bootstrap_password)
    {
        match bootstrap_admin(
            &mut persistence,
            login_name,
            password,
            OffsetDateTime::now_utc(),
        )? {
            Some(admin) => info!(user_id = admin.user_id, "Bootstrap admin created"),
            None => info!("Users already exist; bootstrap admin skipped"),
        }
    }

    let policy: AllocationPolicy = args.allocation_policy();
    info!(
        exclusive = policy.exclusive,
        require_agent_approval = policy.require_agent_approval,
        "Allocation policy"
    );

    let app: Router = build_router(AppState {
        persistence: Arc::new(Mutex::new(persistence)),
        policy,
    });

    let addr: SocketAddr = SocketAddr::new(args.bind, args.port);
    let listener: tokio::net::TcpListener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "Listening");
    axum::serve(listener, app).await?;

    Ok(())
}
