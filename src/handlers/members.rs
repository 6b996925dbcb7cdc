// src/handlers/members.rs

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
        rbac::{CanInviteMember, CanViewMembers, RequireAbility},
    },
    models::auth::{InviteMemberPayload, UpdateMemberPayload, User},
};

// GET /api/members
#[utoipa::path(
    get,
    path = "/api/members",
    tag = "Members",
    responses((status = 200, description = "Members of the team", body = Vec<User>)),
    security(("api_jwt" = []))
)]
pub async fn list_members(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    _guard: RequireAbility<CanViewMembers>,
) -> Result<Json<Vec<User>>, AppError> {
    let members = app_state.gate.hierarchy().effective_members(&user).await?;
    Ok(Json(members))
}

// POST /api/members
#[utoipa::path(
    post,
    path = "/api/members",
    tag = "Members",
    request_body = InviteMemberPayload,
    responses(
        (status = 201, description = "Member invited", body = User),
        (status = 403, description = "Plan members limit reached or role insufficient")
    ),
    security(("api_jwt" = []))
)]
pub async fn invite_member(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    _guard: RequireAbility<CanInviteMember>,
    Json(payload): Json<InviteMemberPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let member = app_state
        .member_service
        .invite(
            effective_account_id(&user),
            payload.name.trim(),
            payload.email.trim(),
            payload.role_id,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(member)))
}

// GET /api/members/{id}
#[utoipa::path(
    get,
    path = "/api/members/{id}",
    tag = "Members",
    params(("id" = Uuid, Path, description = "Member ID")),
    responses((status = 200, description = "Member", body = User)),
    security(("api_jwt" = []))
)]
pub async fn get_member(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<Json<User>, AppError> {
    let member = app_state.member_service.find_member(id).await?;
    app_state
        .gate
        .require(&user, Permission::ViewMember, Some(Resource::Member(&member)))
        .await?;

    Ok(Json(member))
}

// PUT /api/members/{id}
#[utoipa::path(
    put,
    path = "/api/members/{id}",
    tag = "Members",
    params(("id" = Uuid, Path, description = "Member ID")),
    request_body = UpdateMemberPayload,
    responses((status = 200, description = "Member updated", body = User)),
    security(("api_jwt" = []))
)]
pub async fn update_member(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateMemberPayload>,
) -> Result<Json<User>, AppError> {
    payload.validate()?;

    let member = app_state.member_service.find_member(id).await?;
    app_state
        .gate
        .require(&user, Permission::EditMember, Some(Resource::Member(&member)))
        .await?;

    let member = app_state
        .member_service
        .update(&member, payload.name.as_deref().map(str::trim), payload.role_id)
        .await?;

    Ok(Json(member))
}

// DELETE /api/members/{id}
#[utoipa::path(
    delete,
    path = "/api/members/{id}",
    tag = "Members",
    params(("id" = Uuid, Path, description = "Member ID")),
    responses(
        (status = 204, description = "Member removed"),
        (status = 403, description = "Self, root account or another team's member")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_member(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let member = app_state.member_service.find_member(id).await?;
    app_state
        .gate
        .require(&user, Permission::DeleteMember, Some(Resource::Member(&member)))
        .await?;

    app_state.member_service.delete(&member).await?;
    Ok(StatusCode::NO_CONTENT)
}
