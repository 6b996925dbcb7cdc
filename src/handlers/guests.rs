// src/handlers/guests.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    authz::{Permission, Resource},
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::guests::{Guest, GuestStatus, InviteGuestPayload, RsvpResponse, UpdateGuestPayload},
};

// POST /api/events/{id}/guests
#[utoipa::path(
    post,
    path = "/api/events/{id}/guests",
    tag = "Guests",
    params(("id" = Uuid, Path, description = "Event ID")),
    request_body = InviteGuestPayload,
    responses(
        (status = 201, description = "Guest invited", body = Guest),
        (status = 400, description = "E-mail already invited to this event")
    ),
    security(("api_jwt" = []))
)]
pub async fn invite_guest(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<InviteGuestPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let event = app_state.event_service.find_event(id).await?;
    app_state
        .gate
        .require(&user, Permission::InviteGuest, Some(Resource::Event(&event)))
        .await?;

    let guest = app_state.guest_service.invite(&event, &payload).await?;
    Ok((StatusCode::CREATED, Json(guest)))
}

// PUT /api/guests/{id}
#[utoipa::path(
    put,
    path = "/api/guests/{id}",
    tag = "Guests",
    params(("id" = Uuid, Path, description = "Guest ID")),
    request_body = UpdateGuestPayload,
    responses((status = 200, description = "Guest updated", body = Guest)),
    security(("api_jwt" = []))
)]
pub async fn update_guest(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateGuestPayload>,
) -> Result<Json<Guest>, AppError> {
    payload.validate()?;

    let guest = app_state.guest_service.find_guest(id).await?;
    app_state
        .gate
        .require(&user, Permission::EditGuest, Some(Resource::Guest(&guest)))
        .await?;

    let guest = app_state.guest_service.update(&guest, &payload).await?;
    Ok(Json(guest))
}

// DELETE /api/guests/{id}
#[utoipa::path(
    delete,
    path = "/api/guests/{id}",
    tag = "Guests",
    params(("id" = Uuid, Path, description = "Guest ID")),
    responses((status = 204, description = "Guest removed")),
    security(("api_jwt" = []))
)]
pub async fn delete_guest(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let guest = app_state.guest_service.find_guest(id).await?;
    app_state
        .gate
        .require(&user, Permission::DeleteGuest, Some(Resource::Guest(&guest)))
        .await?;

    app_state.guest_service.delete(&guest).await?;
    Ok(StatusCode::NO_CONTENT)
}

// --- Public RSVP links ---

// GET /api/rsvp/{token}/confirm
#[utoipa::path(
    get,
    path = "/api/rsvp/{token}/confirm",
    tag = "Guests",
    params(("token" = Uuid, Path, description = "RSVP token from the invitation")),
    responses(
        (status = 200, description = "Presence confirmed", body = RsvpResponse),
        (status = 404, description = "Unknown or already answered")
    )
)]
pub async fn confirm_presence(
    State(app_state): State<AppState>,
    Path(token): Path<Uuid>,
) -> Result<Json<RsvpResponse>, AppError> {
    let answer = app_state.guest_service.respond(token, GuestStatus::Confirmed).await?;
    Ok(Json(answer))
}

// GET /api/rsvp/{token}/refuse
#[utoipa::path(
    get,
    path = "/api/rsvp/{token}/refuse",
    tag = "Guests",
    params(("token" = Uuid, Path, description = "RSVP token from the invitation")),
    responses(
        (status = 200, description = "Invitation refused", body = RsvpResponse),
        (status = 404, description = "Unknown or already answered")
    )
)]
pub async fn refuse_presence(
    State(app_state): State<AppState>,
    Path(token): Path<Uuid>,
) -> Result<Json<RsvpResponse>, AppError> {
    let answer = app_state.guest_service.respond(token, GuestStatus::Refused).await?;
    Ok(Json(answer))
}
