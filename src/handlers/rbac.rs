// src/handlers/rbac.rs

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
        rbac::{CanCreateRole, CanViewRoles, RequireAbility},
    },
    models::rbac::{PermissionInfo, Role, SaveRolePayload},
};

// GET /api/permissions (what role-building screens can offer)
#[utoipa::path(
    get,
    path = "/api/permissions",
    tag = "RBAC",
    responses((status = 200, description = "Permission catalog", body = Vec<PermissionInfo>)),
    security(("api_jwt" = []))
)]
pub async fn list_permissions(State(app_state): State<AppState>) -> Json<Vec<PermissionInfo>> {
    Json(app_state.rbac_service.list_permissions())
}

// GET /api/roles
#[utoipa::path(
    get,
    path = "/api/roles",
    tag = "RBAC",
    responses((status = 200, description = "Roles of the team", body = Vec<Role>)),
    security(("api_jwt" = []))
)]
pub async fn list_roles(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    _guard: RequireAbility<CanViewRoles>,
) -> Result<Json<Vec<Role>>, AppError> {
    let roles = app_state.gate.hierarchy().effective_roles(&user).await?;
    Ok(Json(roles))
}

// POST /api/roles
#[utoipa::path(
    post,
    path = "/api/roles",
    tag = "RBAC",
    request_body = SaveRolePayload,
    responses(
        (status = 201, description = "Role created", body = Role),
        (status = 400, description = "Invalid name or permissions"),
        (status = 409, description = "Name already in use")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_role(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    _guard: RequireAbility<CanCreateRole>,
    Json(payload): Json<SaveRolePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let role = app_state
        .rbac_service
        .create_role(effective_account_id(&user), &payload.name, &payload.permissions)
        .await?;

    Ok((StatusCode::CREATED, Json(role)))
}

// PUT /api/roles/{id}
#[utoipa::path(
    put,
    path = "/api/roles/{id}",
    tag = "RBAC",
    params(("id" = Uuid, Path, description = "Role ID")),
    request_body = SaveRolePayload,
    responses((status = 200, description = "Role updated", body = Role)),
    security(("api_jwt" = []))
)]
pub async fn update_role(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<SaveRolePayload>,
) -> Result<Json<Role>, AppError> {
    payload.validate()?;

    let role = app_state.rbac_service.find_role(id).await?;
    app_state
        .gate
        .require(&user, Permission::EditRole, Some(Resource::Role(&role)))
        .await?;

    let role = app_state
        .rbac_service
        .update_role(&role, &payload.name, &payload.permissions)
        .await?;

    Ok(Json(role))
}

// DELETE /api/roles/{id}
#[utoipa::path(
    delete,
    path = "/api/roles/{id}",
    tag = "RBAC",
    params(("id" = Uuid, Path, description = "Role ID")),
    responses((status = 204, description = "Role deleted")),
    security(("api_jwt" = []))
)]
pub async fn delete_role(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let role = app_state.rbac_service.find_role(id).await?;
    app_state
        .gate
        .require(&user, Permission::DeleteRole, Some(Resource::Role(&role)))
        .await?;

    app_state.rbac_service.delete_role(&role).await?;
    Ok(StatusCode::NO_CONTENT)
}
