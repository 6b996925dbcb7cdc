// src/handlers/events.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    authz::{effective_account_id, Permission, Resource},
    common::error::AppError,
    config::AppState,
    middleware::{
        auth::AuthenticatedUser,
        rbac::{CanCreateEvent, CanViewEvents, RequireAbility},
    },
    models::events::{AgendaItem, CreateEventPayload, Event, EventDetail, SaveAgendaPayload, UpdateEventPayload},
};

// =============================================================================
//  1. EVENTS
// =============================================================================

// GET /api/events
#[utoipa::path(
    get,
    path = "/api/events",
    tag = "Events",
    responses((status = 200, description = "Events of the team", body = Vec<Event>)),
    security(("api_jwt" = []))
)]
pub async fn list_events(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    _guard: RequireAbility<CanViewEvents>,
) -> Result<Json<Vec<Event>>, AppError> {
    let events = app_state.gate.hierarchy().effective_events(&user).await?;
    Ok(Json(events))
}

// POST /api/events
#[utoipa::path(
    post,
    path = "/api/events",
    tag = "Events",
    request_body = CreateEventPayload,
    responses(
        (status = 201, description = "Event created", body = Event),
        (status = 403, description = "Plan events limit reached or role insufficient"),
        (status = 409, description = "Title already in use")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_event(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    _guard: RequireAbility<CanCreateEvent>,
    Json(payload): Json<CreateEventPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    // Events always belong to the captain, whoever creates them
    let event = app_state
        .event_service
        .create_event(effective_account_id(&user), &payload)
        .await?;

    Ok((StatusCode::CREATED, Json(event)))
}

// GET /api/events/{id}
#[utoipa::path(
    get,
    path = "/api/events/{id}",
    tag = "Events",
    params(("id" = Uuid, Path, description = "Event ID")),
    responses((status = 200, description = "Event with categories, guests and agenda", body = EventDetail)),
    security(("api_jwt" = []))
)]
pub async fn get_event(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<Json<EventDetail>, AppError> {
    let event = app_state.event_service.find_event(id).await?;
    app_state
        .gate
        .require(&user, Permission::ViewEvent, Some(Resource::Event(&event)))
        .await?;

    let detail = app_state.event_service.event_detail(event).await?;
    Ok(Json(detail))
}

// PUT /api/events/{id}
#[utoipa::path(
    put,
    path = "/api/events/{id}",
    tag = "Events",
    params(("id" = Uuid, Path, description = "Event ID")),
    request_body = UpdateEventPayload,
    responses((status = 200, description = "Event updated", body = Event)),
    security(("api_jwt" = []))
)]
pub async fn update_event(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateEventPayload>,
) -> Result<Json<Event>, AppError> {
    payload.validate()?;

    let event = app_state.event_service.find_event(id).await?;
    app_state
        .gate
        .require(&user, Permission::EditEvent, Some(Resource::Event(&event)))
        .await?;

    let event = app_state.event_service.update_event(&event, &payload).await?;
    Ok(Json(event))
}

// DELETE /api/events/{id}
#[utoipa::path(
    delete,
    path = "/api/events/{id}",
    tag = "Events",
    params(("id" = Uuid, Path, description = "Event ID")),
    responses((status = 204, description = "Event deleted")),
    security(("api_jwt" = []))
)]
pub async fn delete_event(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let event = app_state.event_service.find_event(id).await?;
    app_state
        .gate
        .require(&user, Permission::DeleteEvent, Some(Resource::Event(&event)))
        .await?;

    app_state.event_service.delete_event(&event).await?;
    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
//  2. ASSIGNEES
// =============================================================================

// POST /api/events/{id}/assignees/{member_id}
#[utoipa::path(
    post,
    path = "/api/events/{id}/assignees/{member_id}",
    tag = "Events",
    params(
        ("id" = Uuid, Path, description = "Event ID"),
        ("member_id" = Uuid, Path, description = "Member to assign")
    ),
    responses(
        (status = 204, description = "Member assigned"),
        (status = 403, description = "Not a verified member of the team")
    ),
    security(("api_jwt" = []))
)]
pub async fn assign_member(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path((id, member_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, AppError> {
    let event = app_state.event_service.find_event(id).await?;
    app_state
        .gate
        .require(&user, Permission::AssignMember, Some(Resource::Event(&event)))
        .await?;

    app_state.event_service.assign_member(&event, member_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// DELETE /api/events/{id}/assignees/{member_id}
#[utoipa::path(
    delete,
    path = "/api/events/{id}/assignees/{member_id}",
    tag = "Events",
    params(
        ("id" = Uuid, Path, description = "Event ID"),
        ("member_id" = Uuid, Path, description = "Assigned member")
    ),
    responses(
        (status = 204, description = "Member unassigned"),
        (status = 404, description = "Member is not assigned to this event")
    ),
    security(("api_jwt" = []))
)]
pub async fn unassign_member(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path((id, member_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, AppError> {
    let event = app_state.event_service.find_event(id).await?;
    app_state
        .gate
        .require(&user, Permission::AssignMember, Some(Resource::Event(&event)))
        .await?;

    app_state.event_service.unassign_member(&event, member_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
//  3. AGENDA
// =============================================================================

// POST /api/events/{id}/agenda
#[utoipa::path(
    post,
    path = "/api/events/{id}/agenda",
    tag = "Agenda",
    params(("id" = Uuid, Path, description = "Event ID")),
    request_body = SaveAgendaPayload,
    responses((status = 201, description = "Agenda item created", body = AgendaItem)),
    security(("api_jwt" = []))
)]
pub async fn create_agenda_item(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<SaveAgendaPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let event = app_state.event_service.find_event(id).await?;
    app_state
        .gate
        .require(&user, Permission::CreateAgenda, Some(Resource::Event(&event)))
        .await?;

    let item = app_state.event_service.create_agenda_item(&event, &payload).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

// PUT /api/agenda/{id}
#[utoipa::path(
    put,
    path = "/api/agenda/{id}",
    tag = "Agenda",
    params(("id" = Uuid, Path, description = "Agenda item ID")),
    request_body = SaveAgendaPayload,
    responses((status = 200, description = "Agenda item updated", body = AgendaItem)),
    security(("api_jwt" = []))
)]
pub async fn update_agenda_item(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<SaveAgendaPayload>,
) -> Result<Json<AgendaItem>, AppError> {
    payload.validate()?;

    let item = app_state.event_service.find_agenda_item(id).await?;
    app_state
        .gate
        .require(&user, Permission::EditAgenda, Some(Resource::Agenda(&item)))
        .await?;

    let item = app_state.event_service.update_agenda_item(&item, &payload).await?;
    Ok(Json(item))
}

// DELETE /api/agenda/{id}
#[utoipa::path(
    delete,
    path = "/api/agenda/{id}",
    tag = "Agenda",
    params(("id" = Uuid, Path, description = "Agenda item ID")),
    responses((status = 204, description = "Agenda item deleted")),
    security(("api_jwt" = []))
)]
pub async fn delete_agenda_item(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let item = app_state.event_service.find_agenda_item(id).await?;
    app_state
        .gate
        .require(&user, Permission::DeleteAgenda, Some(Resource::Agenda(&item)))
        .await?;

    app_state.event_service.delete_agenda_item(&item).await?;
    Ok(StatusCode::NO_CONTENT)
}
